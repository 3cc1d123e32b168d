use std::sync::Arc;

use anyhow::Context;
use spread_dashboard::app;
use spread_dashboard::config::ClientConfig;
use spread_dashboard::logging::{init_logging, LoggingConfig};
use spread_dashboard::services::console_sink::ConsoleSink;
use spread_dashboard::services::sink::DashboardSink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let config = ClientConfig::from_env();
    config.validate().map_err(anyhow::Error::msg)?;

    let sink: Arc<dyn DashboardSink> = Arc::new(ConsoleSink::new());
    let state = app::create_app(config, sink).context("failed to build dashboard client")?;

    app::run(state).await
}
