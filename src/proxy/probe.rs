//! Upstream connectivity probe.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of a HEAD probe against a candidate upstream. Serialized directly
/// into the admin API response.
#[derive(Debug, Serialize)]
pub struct ProbeOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(rename = "statusText", skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Bare `host:port` targets are probed over https.
fn probe_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// HEAD the candidate with a 5s deadline. Any response, even a 5xx, counts
/// as reachable; only transport failures and timeouts report an error.
pub async fn test_connection(client: &reqwest::Client, url: &str) -> ProbeOutcome {
    let target = probe_url(url);
    tracing::debug!(target = %target, "probing upstream");

    match client.head(&target).timeout(PROBE_TIMEOUT).send().await {
        Ok(response) => {
            let status = response.status();
            ProbeOutcome {
                success: true,
                status: Some(status.as_u16()),
                status_text: Some(status.canonical_reason().unwrap_or("").to_string()),
                time: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
                error: None,
            }
        }
        Err(e) => ProbeOutcome {
            success: false,
            status: None,
            status_text: None,
            time: None,
            error: Some(e.to_string()),
        },
    }
}
