use citizen_ai::api::{run_server, AppState};
use citizen_ai::backend::build_backend;
use citizen_ai::config::AppConfig;
use citizen_ai::dispatch::Dispatcher;
use citizen_ai::sentiment::SentimentClassifier;
use citizen_ai::store::InteractionLog;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // .env is optional; real deployments set the environment directly
    dotenvy::dotenv().ok();

    // Setup Logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Citizen AI...");

    // Load Configuration
    let config = AppConfig::load()?;
    info!("Loaded Configuration: {:?}", config);

    // Backend is chosen once and fixed for the process lifetime
    info!("Initializing completion backend...");
    let backend = build_backend(&config.backend).await?;

    info!(
        "📒 Initializing interaction log at {} (queue size: {})...",
        config.storage.path.display(),
        config.storage.queue_size
    );
    let log = InteractionLog::spawn(config.storage.path.clone(), config.storage.queue_size);

    let dispatcher = Dispatcher::new(backend, SentimentClassifier::lexicon(), log)
        .with_failed_completion_logging(config.storage.log_failed_completions);

    let app_state = Arc::new(AppState { dispatcher });

    // Start API Server
    info!("Initializing API Server...");
    run_server(app_state, &config.server.bind_addr).await?;

    Ok(())
}
