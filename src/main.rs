use std::env;
use std::sync::Arc;

use anyhow::Context;
use murphy::config::Config;
use murphy::services::{format_signal_message, DeliveryPolicy, SignalEngine, SignalStore};
use murphy::types::{BarSeries, Confirmation, Signal};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// One input file: a symbol and its bars, oldest first.
#[derive(Debug, Deserialize)]
struct SeriesFile {
    symbol: String,
    bars: BarSeries,
}

async fn analyze_file(path: String, store: Arc<SignalStore>) -> anyhow::Result<Signal> {
    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read {}", path))?;
    let file: SeriesFile =
        serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path))?;

    info!("Loaded {} bars for {} from {}", file.bars.len(), file.symbol, path);
    Ok(store.get_signal(&file.symbol, &file.bars))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "murphy=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    let engine = SignalEngine::new(config.engine.clone()).context("invalid engine configuration")?;
    info!(
        "Starting Murphy with the {} profile (min history {} bars)",
        config.engine.profile.name(),
        config.engine.min_history()
    );

    let paths: Vec<String> = env::args().skip(1).collect();
    if paths.is_empty() {
        anyhow::bail!("usage: murphy <series.json>...");
    }

    let store = SignalStore::new(engine);
    let policy = DeliveryPolicy::new(config.delivery.clone());

    // One task per series
    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| tokio::spawn(analyze_file(path, store.clone())))
        .collect();

    let mut failures = 0;
    for handle in handles {
        let signal = match handle.await? {
            Ok(signal) => signal,
            Err(e) => {
                warn!("{:#}", e);
                failures += 1;
                continue;
            }
        };

        let confirmation = Confirmation::disabled();
        let decision = policy.evaluate(&signal, &confirmation);
        info!(
            "{}: {} (deliver={}, {})",
            signal.symbol, signal.direction, decision.deliver, decision.reason
        );

        println!("{}", serde_json::to_string(&signal)?);
        println!("{}", format_signal_message(&signal, Some(&confirmation), &config.currency));
        println!();
    }

    if failures > 0 {
        anyhow::bail!("{} series failed to load", failures);
    }

    Ok(())
}
