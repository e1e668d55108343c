// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod chart;
pub mod classify;
pub mod config;
pub mod error;
pub mod metrics;
pub mod news;
pub mod pipeline;
pub mod query;
pub mod sentiment;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::classify::{classify, Classification};
pub use crate::error::{AnalysisError, FetchError, ScoringError};
pub use crate::query::format_query;
pub use crate::sentiment::{init_lexicon, LexiconSource, Scorer, SentimentAnalyzer};

use std::sync::Arc;

use tracing::info;

/// Build the application router from config: installs the sentiment lexicon
/// (first call only), constructs the NewsAPI client and wires both into the
/// shared state. Does not install a metrics recorder.
pub fn app(cfg: &config::AppConfig) -> anyhow::Result<axum::Router> {
    let source = LexiconSource::from_config(cfg.sentiment.lexicon_path.as_deref());
    let lexicon = init_lexicon(source)?;
    let scorer = SentimentAnalyzer::with_lexicon(lexicon);

    let news = news::NewsApiClient::new(&cfg.newsapi)?;
    info!(
        endpoint = %news.endpoint(),
        language = %cfg.newsapi.language,
        static_dir = %cfg.static_dir.display(),
        "news client ready"
    );

    let state = AppState::new(Arc::new(news), Arc::new(scorer), cfg);
    Ok(router(state, &cfg.static_dir))
}
