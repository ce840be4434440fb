//! STREAMIA - movie streaming client
//!
//! Restores the stored session against the configured backend, then reads
//! commands from standard input.

use std::sync::Arc;

use streamia_app::{data_dir, AppConfig, SessionStore, Shell};
use streamia_core::{Catalog, DisplayNameStore, KeyValueStore, SqliteStore, TokenStore};
use streamia_net::ApiClient;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DATABASE_FILE: &str = "streamia.db";

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Starting {} {}", config.app_name, config.app_version);
    config.log_summary();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(config)) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> streamia_app::Result<()> {
    let dir = data_dir()?;
    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(dir.join(DATABASE_FILE))?);

    let api = ApiClient::with_timeout(
        &config.api_url,
        TokenStore::new(store.clone()),
        config.request_timeout,
    )?;
    let mut session = SessionStore::new(api, DisplayNameStore::new(store));
    session.restore().await;

    let mut shell = Shell::new(session, Catalog::builtin(), config);
    shell
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    tracing::info!("Goodbye");
    Ok(())
}
