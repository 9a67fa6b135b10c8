use catat_keuangan::{classifier::TransactionClassifier, config::AppConfig};
use std::io::{self, BufRead};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Classify each argument, or each stdin line when no arguments are given,
/// and print one JSON reading per line.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON lines
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = AppConfig::from_env()?;
    let lexicon = config.load_lexicon()?;
    let classifier = TransactionClassifier::new(lexicon)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    info!(messages = args.len(), "Classifying");

    if args.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            println!("{}", serde_json::to_string(&classifier.classify(&line))?);
        }
    } else {
        for message in &args {
            println!("{}", serde_json::to_string(&classifier.classify(message))?);
        }
    }

    Ok(())
}
