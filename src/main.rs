//! Stock News Sentiment: binary entrypoint
//! Boots the Axum HTTP server: config, sentiment lexicon, NewsAPI client,
//! routes and the Prometheus endpoint.

use shuttle_axum::ShuttleAxum;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stock_news_sentiment::config::AppConfig;
use stock_news_sentiment::metrics::Metrics;

/// Compact logs filtered by `RUST_LOG`. Uses `try_init` so a subscriber the
/// hosting runtime already installed is left alone.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stock_news_sentiment=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = AppConfig::load_default()?;
    info!(
        default_ticker = %cfg.ui.default_ticker,
        default_threshold = cfg.ui.default_threshold,
        "config loaded"
    );

    let mut router = stock_news_sentiment::app(&cfg)?;

    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => warn!(error = %e, "metrics disabled"),
    }

    Ok(router.into())
}
