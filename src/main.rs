use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edge_gateway::config::load_config;
use edge_gateway::store::ConfigStore;
use edge_gateway::{gateway, proxy, AppConfig};

#[derive(Debug, Parser)]
#[command(name = "edge-gateway", about = "WebDAV file gateway and configurable reverse proxy")]
struct Args {
    /// Path to a TOML config file. Built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edge_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let config = load_config(path)?;
            tracing::info!(path = %path.display(), "Configuration loaded");
            config
        }
        None => {
            tracing::info!("No config file given, using defaults");
            AppConfig::default()
        }
    };
    let config = Arc::new(config);

    let mut servers = Vec::new();

    if config.gateway.enabled {
        let listener = TcpListener::bind(&config.gateway.bind_address).await?;
        tracing::info!(
            address = %listener.local_addr()?,
            webdav = %config.webdav.url,
            "File gateway listening"
        );
        let router = gateway::router(gateway::GatewayState::new(config.clone()));
        servers.push(tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await
        }));
    }

    if config.proxy.enabled {
        let store = Arc::new(ConfigStore::open(&config.store.path));
        let listener = TcpListener::bind(&config.proxy.bind_address).await?;
        tracing::info!(
            address = %listener.local_addr()?,
            default_target = %config.proxy.default_target,
            "Reverse proxy listening"
        );
        let router = proxy::router(proxy::ProxyState::new(config.clone(), store));
        servers.push(tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await
        }));
    }

    if servers.is_empty() {
        tracing::warn!("Both services disabled, nothing to do");
        return Ok(());
    }

    for server in servers {
        server.await??;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Resolves when Ctrl+C arrives; axum then stops accepting and drains
/// in-flight requests.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
