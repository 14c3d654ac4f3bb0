use anyhow::Result;
use autocenter::config::AppConfig;
use autocenter::server::ServerBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("autocenter=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        address = %config.server.address(),
        auth = config.auth.enabled,
        completion_delay_ms = config.settlement.completion_delay_ms,
        sweep_interval_ms = config.settlement.sweep_interval_ms,
        "starting autocenter"
    );

    ServerBuilder::new().with_config(config).serve().await
}
