//! HTTP backend exposing the Azure tag hierarchy and tag updates.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use aztags::app::api_server::{ApiServer, AppState};
use aztags::app::azure::AzureManagementClient;
use aztags::app::config::{self, ServerConfig};
use aztags::app::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG may come from .env
    let dotenv = config::load_dotenv();
    logging::init_server_logging()?;
    dotenv.log();

    info!(
        "aztags-server {} ({}@{}) starting",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_BRANCH"),
        env!("GIT_COMMIT")
    );

    let config = ServerConfig::from_env()?;
    let client = AzureManagementClient::new(&config.management_endpoint, config.access_token.clone())
        .context("failed to build management API client")?;
    info!(
        "Using management endpoint {} (fetch concurrency {})",
        client.endpoint(),
        config.fetch_concurrency
    );

    let state = AppState::new(Arc::new(client), config.fetch_concurrency);
    let mut server = ApiServer::start(config.bind_address(), state)
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    server.shutdown();
    server.wait().await
}
