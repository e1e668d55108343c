//! NewsAPI (`/v2/everything`) client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::NewsApiConfig;
use crate::error::FetchError;
use crate::news::key_fingerprint;
use crate::news::types::{Article, NewsSource};

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org";

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<WireArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    source: Option<WireSource>,
    title: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireSource {
    name: Option<String>,
}

/// NewsAPI error body: `{"status":"error","code":"apiKeyInvalid","message":"..."}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl From<WireArticle> for Article {
    fn from(w: WireArticle) -> Self {
        Article {
            title: w.title,
            source_name: w.source.and_then(|s| s.name),
            url: w.url,
            published_at: w
                .published_at
                .as_deref()
                .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    language: String,
}

impl NewsApiClient {
    pub fn new(cfg: &NewsApiConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            language: cfg.language.clone(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v2/everything", self.base_url)
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn fetch_articles(&self, api_key: &str, query: &str) -> Result<Vec<Article>, FetchError> {
        let t0 = Instant::now();
        let key_tag = key_fingerprint(api_key);

        let resp = match self
            .http
            .get(self.endpoint())
            .query(&[
                ("q", query),
                ("language", self.language.as_str()),
                ("apiKey", api_key),
            ])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    provider = self.name(),
                    key = %key_tag,
                    "news http error"
                );
                counter!("news_fetch_errors_total", "kind" => "transport").increment(1);
                return Err(FetchError::Transport(e));
            }
        };

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            let err: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                code = err.code.as_deref().unwrap_or("-"),
                provider = self.name(),
                key = %key_tag,
                "news source rejected request"
            );
            counter!("news_fetch_errors_total", "kind" => "status").increment(1);
            return Err(FetchError::Status {
                status: status.as_u16(),
                code: err.code,
                message: err.message,
            });
        }

        let body = resp.text().await?;
        let parsed: EverythingResponse = serde_json::from_str(&body).map_err(|e| {
            counter!("news_fetch_errors_total", "kind" => "decode").increment(1);
            FetchError::Decode(e.to_string())
        })?;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("news_fetch_ms").record(ms);
        tracing::debug!(
            provider = self.name(),
            query,
            articles = parsed.articles.len(),
            ms,
            "news fetched"
        );

        Ok(parsed.articles.into_iter().map(Article::from).collect())
    }

    fn name(&self) -> &'static str {
        "NewsAPI"
    }
}
