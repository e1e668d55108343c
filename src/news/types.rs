// src/news/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: Option<String>,
    pub source_name: Option<String>, // e.g. "Reuters"
    pub url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// One search against a news backend. Called once per analysis run, never retried.
#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_articles(&self, api_key: &str, query: &str) -> Result<Vec<Article>, FetchError>;
    fn name(&self) -> &'static str;
}
