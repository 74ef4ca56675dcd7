//! Binary entry point: read settings, wire up the handler, serve webhooks.

use pr_butler::services::webhook_server;
use pr_butler::{AppState, ConfigStore, GitHubClient, GitHubClientConfig, Handler, Settings};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The tracing-log bridge in the default fmt subscriber also captures
    // the `log` records emitted throughout the crate.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .compact()
        .init();

    let settings = Settings::from_env()?;

    let client = GitHubClient::new(GitHubClientConfig {
        api_root: settings.api_root.clone(),
        token: settings.github_token.clone(),
        timeout_secs: 30,
    })?;
    let store = ConfigStore::new(&settings.config_dir);
    let state = AppState {
        handler: Arc::new(Handler::new(client, store)),
    };

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("[server] ctrl-c received");
            ctrl_c_cancel.cancel();
        }
    });

    webhook_server::serve(settings.addr, state, cancel).await?;
    Ok(())
}
