//! # Analysis pipeline
//! One run per user interaction: format query → fetch once → classify.
//!
//! Every failure is terminal for the run; the caller shows the matching
//! [`Notice`] and waits for the user to trigger again.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::classify::{classify, Classification};
use crate::error::AnalysisError;
use crate::news::{headlines, key_fingerprint, NewsSource};
use crate::query::format_query;
use crate::sentiment::Scorer;

pub const FETCH_FAILED_MESSAGE: &str =
    "Failed to fetch news articles. Please check your API key and internet connection.";

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("analysis_runs_total", "Analysis runs started.");
        describe_counter!(
            "analysis_aborted_total",
            "Analysis runs that ended with an error or warning notice."
        );
        describe_counter!("news_fetch_errors_total", "News source fetch/decode errors.");
        describe_counter!("headlines_scored_total", "Headlines passed through the scorer.");
        describe_counter!("buy_signals_total", "Headlines at or above the buy threshold.");
        describe_histogram!("analysis_duration_ms", "Full run time in milliseconds.");
        describe_histogram!("news_fetch_ms", "News source round trip in milliseconds.");
    });
}

/// Inputs collected from the UI sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub api_key: String,
    pub ticker: String,
    pub threshold: f64,
}

impl AnalysisRequest {
    pub fn new(api_key: impl Into<String>, ticker: impl Into<String>, threshold: f64) -> Self {
        Self {
            api_key: api_key.into().trim().to_string(),
            ticker: ticker.into().trim().to_string(),
            threshold,
        }
    }

    /// Without both a key and a ticker the analysis is simply not run.
    pub fn is_ready(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.ticker.trim().is_empty()
    }
}

/// Everything the charts need from a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub ticker: String,
    pub query: String,
    pub threshold: f64,
    pub headlines: Vec<String>,
    pub classification: Classification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Error,
    Warning,
}

/// What the user sees when a run stops early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl AnalysisError {
    /// Two presentations only: an *error* when news could not be fetched or
    /// scored, a *warning* when the search came back empty.
    pub fn notice(&self) -> Notice {
        match self {
            AnalysisError::Fetch(_) => Notice {
                level: NoticeLevel::Error,
                message: FETCH_FAILED_MESSAGE.to_string(),
            },
            AnalysisError::NoArticles { ticker } => Notice {
                level: NoticeLevel::Warning,
                message: format!("No news articles found for ticker: {ticker}"),
            },
            AnalysisError::Scoring(e) => Notice {
                level: NoticeLevel::Error,
                message: format!("Failed to score news headlines: {e}"),
            },
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            AnalysisError::Fetch(_) => "fetch",
            AnalysisError::NoArticles { .. } => "no_articles",
            AnalysisError::Scoring(_) => "scoring",
        }
    }
}

/// Run the whole pipeline once for `req`.
pub async fn run<N, S>(
    source: &N,
    scorer: &S,
    req: &AnalysisRequest,
) -> Result<Analysis, AnalysisError>
where
    N: NewsSource + ?Sized,
    S: Scorer + ?Sized,
{
    ensure_metrics_described();
    counter!("analysis_runs_total").increment(1);
    let t0 = Instant::now();

    let out = run_inner(source, scorer, req).await;

    histogram!("analysis_duration_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    match &out {
        Ok(a) => {
            counter!("headlines_scored_total").increment(a.headlines.len() as u64);
            counter!("buy_signals_total").increment(a.classification.buy_count() as u64);
            info!(
                ticker = %a.ticker,
                query = %a.query,
                threshold = a.threshold,
                headlines = a.headlines.len(),
                buy = a.classification.buy_count(),
                not_buy = a.classification.not_buy_count(),
                "analysis finished"
            );
        }
        Err(e) => {
            counter!("analysis_aborted_total", "reason" => e.reason()).increment(1);
            warn!(ticker = %req.ticker, error = %e, "analysis aborted");
        }
    }
    out
}

async fn run_inner<N, S>(
    source: &N,
    scorer: &S,
    req: &AnalysisRequest,
) -> Result<Analysis, AnalysisError>
where
    N: NewsSource + ?Sized,
    S: Scorer + ?Sized,
{
    let query = format_query(&req.ticker);
    info!(
        ticker = %req.ticker,
        query,
        provider = source.name(),
        key = %key_fingerprint(&req.api_key),
        "analysis started"
    );

    let articles = source.fetch_articles(&req.api_key, query).await?;
    if articles.is_empty() {
        return Err(AnalysisError::NoArticles {
            ticker: req.ticker.clone(),
        });
    }

    let heads = headlines(&articles);
    let classification = classify(scorer, &heads, req.threshold)?;

    Ok(Analysis {
        ticker: req.ticker.clone(),
        query: query.to_string(),
        threshold: req.threshold,
        headlines: heads,
        classification,
    })
}
