use clap::{Parser, Subcommand};
use reqwest::header::{HeaderValue, COOKIE, SET_COOKIE};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the edge gateway reverse proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8090")]
    url: String,

    #[arg(short, long, default_value = "password")]
    password: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe an upstream candidate with a HEAD request
    Test { url: String },
    /// Save a new upstream target
    Save { url: String },
    /// Revert to the built-in default target
    Delete,
    /// Clear the save history
    ClearHistory,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api = format!("{}/admin/api", cli.url);

    // Log in first; every other action needs the session cookie.
    let login = client
        .post(&api)
        .json(&json!({ "action": "login", "password": cli.password }))
        .send()
        .await?;
    let cookie = login
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    let body: Value = login.json().await?;
    if body["success"] != json!(true) {
        eprintln!("Login failed: {}", body["error"].as_str().unwrap_or("?"));
        return Ok(());
    }
    let Some(cookie) = cookie else {
        eprintln!("Login succeeded but no session cookie was set");
        return Ok(());
    };
    let cookie = HeaderValue::from_str(&cookie)?;

    let request = match &cli.command {
        Commands::Test { url } => json!({ "action": "test", "url": url }),
        Commands::Save { url } => json!({ "action": "save", "url": url }),
        Commands::Delete => json!({ "action": "delete" }),
        Commands::ClearHistory => json!({ "action": "clear_history" }),
    };

    let res = client
        .post(&api)
        .header(COOKIE, cookie)
        .json(&request)
        .send()
        .await?;
    print_response(res).await?;

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
