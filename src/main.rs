use demo_app::config::Config;
use demo_app::server::{run, wait_for_signal};
use demo_app::store::{HealthStore, MongoStore};
use std::sync::Arc;
use tracing::{error, info};

/// Default log filter when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    info!(database = %config.database, "Configuration loaded");

    let store = match MongoStore::connect(&config.uri, &config.database).await {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Failed to connect to MongoDB");
            return Err(anyhow::anyhow!("MongoDB connection error: {}", e));
        }
    };
    let store: Arc<dyn HealthStore> = Arc::new(store);

    if let Err(e) = run(&config, store, wait_for_signal()).await {
        error!(error = %e, "Service stopped with an error");
        return Err(e.into());
    }

    info!("Service shut down gracefully");
    Ok(())
}
