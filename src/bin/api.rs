use catat_keuangan::{
    api::start_server,
    classifier::TransactionClassifier,
    config::AppConfig,
    intake::MessageIntake,
    ledger::InMemoryLedger,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing (RUST_LOG overrides)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    info!("🚀 Catat Keuangan - API Server");
    info!("📍 Port: {}", config.port);
    info!(
        "🎯 Auto-commit threshold: {}",
        config.intake.auto_commit_threshold
    );

    // Create components
    let lexicon = config.load_lexicon()?;
    let classifier = TransactionClassifier::new(lexicon)?;
    let ledger = Arc::new(InMemoryLedger::new());

    let intake = Arc::new(MessageIntake::new(classifier, ledger, config.intake));

    info!("✅ Classifier initialized");
    info!("📡 Starting API server...");

    // Start API server
    start_server(intake, config.port).await?;

    Ok(())
}
