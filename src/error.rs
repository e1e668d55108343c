//! Error types shared by the news client, the scorer and the pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while retrieving articles from the news source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The news source answered with something other than 200 OK.
    #[error("news source returned HTTP {status}{}", describe(.code, .message))]
    Status {
        status: u16,
        /// NewsAPI error code (e.g. `apiKeyInvalid`) when the body carried one.
        code: Option<String>,
        message: Option<String>,
    },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("news request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 200 OK, but the body was not the JSON we expected.
    #[error("news response could not be decoded: {0}")]
    Decode(String),
}

fn describe(code: &Option<String>, message: &Option<String>) -> String {
    match (code, message) {
        (Some(c), Some(m)) => format!(" ({c}: {m})"),
        (Some(c), None) => format!(" ({c})"),
        (None, Some(m)) => format!(" ({m})"),
        (None, None) => String::new(),
    }
}

/// Failure inside the sentiment scorer.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("sentiment lexicon has not been initialized; call sentiment::init_lexicon first")]
    LexiconNotInitialized,

    #[error("invalid sentiment lexicon: {0}")]
    InvalidLexicon(String),

    #[error("reading sentiment lexicon from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single analysis run stopped before producing charts.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("no news articles found for ticker {ticker}")]
    NoArticles { ticker: String },

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_includes_newsapi_details() {
        let e = FetchError::Status {
            status: 401,
            code: Some("apiKeyInvalid".into()),
            message: Some("Your API key is invalid".into()),
        };
        assert_eq!(
            e.to_string(),
            "news source returned HTTP 401 (apiKeyInvalid: Your API key is invalid)"
        );

        let bare = FetchError::Status {
            status: 500,
            code: None,
            message: None,
        };
        assert_eq!(bare.to_string(), "news source returned HTTP 500");
    }
}
