// tests/common/mod.rs
//
// Test doubles shared by the integration tests: a canned news source that
// records what it was asked for, and a scorer backed by a lookup table.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use stock_news_sentiment::error::{FetchError, ScoringError};
use stock_news_sentiment::news::{Article, NewsSource};
use stock_news_sentiment::sentiment::Scorer;

pub enum Canned {
    Articles(Vec<Article>),
    Status(u16),
}

pub struct StubNews {
    canned: Canned,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl StubNews {
    pub fn with_titles(titles: &[&str]) -> Self {
        Self {
            canned: Canned::Articles(titles.iter().map(|t| Article::titled(*t)).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            canned: Canned::Articles(articles),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            canned: Canned::Status(status),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl NewsSource for StubNews {
    async fn fetch_articles(&self, api_key: &str, query: &str) -> Result<Vec<Article>, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((api_key.to_string(), query.to_string()));
        match &self.canned {
            Canned::Articles(a) => Ok(a.clone()),
            Canned::Status(s) => Err(FetchError::Status {
                status: *s,
                code: Some("apiKeyInvalid".into()),
                message: None,
            }),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Scores by exact text; empty text is 0.0, anything unknown fails.
pub struct TableScorer(pub HashMap<String, f64>);

impl TableScorer {
    pub fn new(pairs: &[(&str, f64)]) -> Self {
        Self(pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect())
    }
}

impl Scorer for TableScorer {
    fn compound(&self, text: &str) -> Result<f64, ScoringError> {
        if text.is_empty() {
            return Ok(0.0);
        }
        self.0
            .get(text)
            .copied()
            .ok_or_else(|| ScoringError::InvalidLexicon(format!("no score for {text:?}")))
    }
}

/// The three-headline scenario: scores [0.5, -0.2, 0.1].
pub const SCENARIO: [(&str, f64); 3] = [
    ("Alphabet beats estimates", 0.5),
    ("Regulators open probe into Alphabet", -0.2),
    ("Alphabet shares edge up", 0.1),
];

pub fn scenario_titles() -> Vec<&'static str> {
    SCENARIO.iter().map(|(t, _)| *t).collect()
}

pub fn scenario_scorer() -> TableScorer {
    TableScorer::new(&SCENARIO)
}
