use crate::configuration::KeepAliveSettings;
use reqwest::Client;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

const PING_TIMEOUT: Duration = Duration::from_secs(10);

/// Starts the keep-alive pinger if it is enabled and configured.
///
/// The task runs until `token` is cancelled and never touches request state.
pub fn spawn_keep_alive(
    settings: &KeepAliveSettings,
    token: CancellationToken,
) -> Option<JoinHandle<()>> {
    if !settings.enabled {
        return None;
    }
    if settings.url.trim().is_empty() {
        warn!("Keep-alive is enabled but no url is configured, not starting it");
        return None;
    }
    if settings.interval().is_zero() {
        warn!("Keep-alive interval must be greater than zero, not starting it");
        return None;
    }

    let client = match Client::builder().timeout(PING_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create keep-alive client: {}", e);
            return None;
        }
    };

    info!(
        "Starting keep-alive for {} every {:?}",
        settings.url,
        settings.interval()
    );
    Some(tokio::spawn(run_keep_alive(
        client,
        settings.url.clone(),
        settings.interval(),
        token,
    )))
}

#[instrument(skip_all, fields(url = %url))]
async fn run_keep_alive(
    client: Client,
    url: String,
    interval_duration: Duration,
    token: CancellationToken,
) {
    let mut interval = tokio::time::interval(interval_duration);
    loop {
        tokio::select! {
            _ = interval.tick() => ping(&client, &url).await,
            _ = token.cancelled() => {
                info!("Keep-alive cancelled for {}", url);
                break;
            }
        }
    }
}

async fn ping(client: &Client, url: &str) {
    match client.get(url).send().await {
        Ok(response) if response.status().is_success() => {
            info!(status = %response.status(), "keep-alive ping");
        }
        Ok(response) => {
            warn!(status = %response.status(), "keep-alive ping returned an error status");
        }
        Err(e) => warn!("Keep-alive ping failed: {}", e),
    }
}
