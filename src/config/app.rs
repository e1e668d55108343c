// src/config/app.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::news::newsapi::DEFAULT_BASE_URL;

pub const DEFAULT_CONFIG_PATH: &str = "config/app.toml";

pub const ENV_CONFIG_PATH: &str = "APP_CONFIG_PATH";
pub const ENV_NEWSAPI_BASE_URL: &str = "NEWSAPI_BASE_URL";
pub const ENV_NEWSAPI_LANGUAGE: &str = "NEWSAPI_LANGUAGE";
pub const ENV_LEXICON_PATH: &str = "SENTIMENT_LEXICON_PATH";
pub const ENV_STATIC_DIR: &str = "STATIC_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub newsapi: NewsApiConfig,
    pub ui: UiConfig,
    pub sentiment: SentimentConfig,
    /// Directory served under `/static` (JS/CSS for the UI page).
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsApiConfig {
    pub base_url: String,
    pub language: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

/// Defaults and bounds for the sidebar inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub default_ticker: String,
    pub default_threshold: f64,
    pub threshold_min: f64,
    pub threshold_max: f64,
    pub threshold_step: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// `None` → lexicon bundled into the binary.
    pub lexicon_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            newsapi: NewsApiConfig::default(),
            ui: UiConfig::default(),
            sentiment: SentimentConfig::default(),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            language: "en".to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 4,
            user_agent: concat!("stock-news-sentiment/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_ticker: "GOOG".to_string(),
            default_threshold: 0.1,
            threshold_min: 0.0,
            threshold_max: 1.0,
            threshold_step: 0.01,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: AppConfig = toml::from_str(s).context("parsing app config toml")?;
        cfg.sanitize();
        Ok(cfg)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading app config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Resolve config with env + fallbacks:
    /// 1) $APP_CONFIG_PATH (must exist)
    /// 2) config/app.toml
    /// 3) built-in defaults
    ///
    /// Env overrides are applied on top in every case.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from_file(&pb)?
        } else {
            let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_p.exists() {
                Self::load_from_file(&default_p)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env_overrides();
        cfg.sanitize();
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_nonempty(ENV_NEWSAPI_BASE_URL) {
            self.newsapi.base_url = v;
        }
        if let Some(v) = env_nonempty(ENV_NEWSAPI_LANGUAGE) {
            self.newsapi.language = v;
        }
        if let Some(v) = env_nonempty(ENV_LEXICON_PATH) {
            self.sentiment.lexicon_path = Some(PathBuf::from(v));
        }
        if let Some(v) = env_nonempty(ENV_STATIC_DIR) {
            self.static_dir = PathBuf::from(v);
        }
    }

    fn sanitize(&mut self) {
        let d_news = NewsApiConfig::default();
        self.newsapi.base_url = self.newsapi.base_url.trim().trim_end_matches('/').to_string();
        if self.newsapi.base_url.is_empty() {
            self.newsapi.base_url = d_news.base_url;
        }
        if self.newsapi.language.trim().is_empty() {
            self.newsapi.language = d_news.language;
        }
        if self.newsapi.timeout_secs == 0 {
            self.newsapi.timeout_secs = d_news.timeout_secs;
        }
        if self.newsapi.connect_timeout_secs == 0 {
            self.newsapi.connect_timeout_secs = d_news.connect_timeout_secs;
        }

        let d_ui = UiConfig::default();
        let ui = &mut self.ui;
        ui.default_ticker = ui.default_ticker.trim().to_string();
        if ui.default_ticker.is_empty() {
            ui.default_ticker = d_ui.default_ticker;
        }
        if !ui.threshold_min.is_finite() {
            ui.threshold_min = d_ui.threshold_min;
        }
        if !ui.threshold_max.is_finite() {
            ui.threshold_max = d_ui.threshold_max;
        }
        if ui.threshold_min > ui.threshold_max {
            // swap to keep a valid interval
            std::mem::swap(&mut ui.threshold_min, &mut ui.threshold_max);
        }
        if !(ui.threshold_step.is_finite() && ui.threshold_step > 0.0) {
            ui.threshold_step = d_ui.threshold_step;
        }
        if !ui.default_threshold.is_finite() {
            ui.default_threshold = d_ui.default_threshold;
        }
        ui.default_threshold = ui.default_threshold.clamp(ui.threshold_min, ui.threshold_max);
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn defaults_match_ui_contract() {
        let c = AppConfig::default();
        assert_eq!(c.ui.default_ticker, "GOOG");
        assert_eq!(c.ui.default_threshold, 0.1);
        assert_eq!((c.ui.threshold_min, c.ui.threshold_max), (0.0, 1.0));
        assert_eq!(c.ui.threshold_step, 0.01);
        assert_eq!(c.newsapi.base_url, "https://newsapi.org");
        assert_eq!(c.newsapi.language, "en");
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let c = AppConfig::from_toml_str(
            r#"
            [ui]
            default_ticker = " MSFT "

            [newsapi]
            base_url = "http://127.0.0.1:8080/"
            "#,
        )
        .unwrap();
        assert_eq!(c.ui.default_ticker, "MSFT");
        assert_eq!(c.ui.default_threshold, 0.1);
        assert_eq!(c.newsapi.base_url, "http://127.0.0.1:8080");
        assert_eq!(c.newsapi.timeout_secs, 10);
        assert!(c.sentiment.lexicon_path.is_none());
    }

    #[test]
    fn inverted_bounds_are_swapped_and_default_clamped() {
        let c = AppConfig::from_toml_str(
            r#"
            [ui]
            threshold_min = 0.8
            threshold_max = 0.2
            default_threshold = 0.95
            threshold_step = 0.0
            "#,
        )
        .unwrap();
        assert_eq!((c.ui.threshold_min, c.ui.threshold_max), (0.2, 0.8));
        assert_eq!(c.ui.default_threshold, 0.8);
        assert_eq!(c.ui.threshold_step, 0.01);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(AppConfig::from_toml_str("ui = 3").is_err());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // Isolate CWD so a real config/ in the repo does not interfere
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_CONFIG_PATH);
        env::remove_var(ENV_NEWSAPI_BASE_URL);

        // No files → defaults
        let c = AppConfig::load_default().unwrap();
        assert_eq!(c, {
            let mut d = AppConfig::default();
            d.apply_env_overrides();
            d
        });

        // Env path wins, env overrides apply on top
        let p = tmp.path().join("custom.toml");
        fs::write(&p, "[ui]\ndefault_ticker = \"AAPL\"\n").unwrap();
        env::set_var(ENV_CONFIG_PATH, p.display().to_string());
        env::set_var(ENV_NEWSAPI_BASE_URL, "http://mock.local");
        let c2 = AppConfig::load_default().unwrap();
        assert_eq!(c2.ui.default_ticker, "AAPL");
        assert_eq!(c2.newsapi.base_url, "http://mock.local");

        // Missing env path is an error
        env::set_var(ENV_CONFIG_PATH, tmp.path().join("nope.toml").display().to_string());
        assert!(AppConfig::load_default().is_err());

        env::remove_var(ENV_CONFIG_PATH);
        env::remove_var(ENV_NEWSAPI_BASE_URL);
        env::set_current_dir(&old).unwrap();
    }
}
