use hashgate::{api::Server, config::Config, ledger};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// The main entry point for the hashgate service.
///
/// This function initializes logging, loads the configuration, picks the
/// ledger backend and starts the API server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG wins; plain `info` otherwise.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!("hashgate starting with config: {:?}", config);

    if config.session.uses_default_secret() {
        warn!("SECRET_KEY is not set, using the built-in default secret");
    }

    let ledger = ledger::connect(&config.ledger)?;

    let server = Server::new(config, ledger);
    server.start().await?;

    Ok(())
}
