use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::chart::{self, SvgCharts};
use crate::config::{AppConfig, UiConfig};
use crate::error::AnalysisError;
use crate::news::NewsSource;
use crate::pipeline::{self, Analysis, AnalysisRequest, NoticeLevel};
use crate::sentiment::Scorer;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Clone)]
pub struct AppState {
    pub news: Arc<dyn NewsSource>,
    pub scorer: Arc<dyn Scorer>,
    pub ui: Arc<UiConfig>,
}

impl AppState {
    pub fn new(news: Arc<dyn NewsSource>, scorer: Arc<dyn Scorer>, cfg: &AppConfig) -> Self {
        Self {
            news,
            scorer,
            ui: Arc::new(cfg.ui.clone()),
        }
    }
}

/// Router with the UI page and the JSON API. Static assets are served from
/// `static_dir` under `/static`.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "ok" }))
        .route("/analyze", post(analyze))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.ui))
}

fn render_index(ui: &UiConfig) -> String {
    INDEX_HTML
        .replace(
            "{{DEFAULT_TICKER}}",
            &html_escape::encode_double_quoted_attribute(&ui.default_ticker),
        )
        .replace("{{THRESHOLD_MIN}}", &ui.threshold_min.to_string())
        .replace("{{THRESHOLD_MAX}}", &ui.threshold_max.to_string())
        .replace("{{THRESHOLD_STEP}}", &ui.threshold_step.to_string())
        .replace("{{THRESHOLD_DEFAULT}}", &format!("{:.2}", ui.default_threshold))
}

#[derive(Debug, Deserialize)]
struct AnalyzeReq {
    #[serde(default)]
    api_key: String,
    #[serde(default)]
    ticker: String,
    #[serde(default)]
    threshold: Option<f64>, // missing → configured default
}

#[derive(Debug, Serialize)]
struct AnalysisView {
    ticker: String,
    query: String,
    threshold: f64,
    headlines: Vec<String>,
    scores: Vec<f64>,
    buy_indices: Vec<usize>,
    buy_count: usize,
    not_buy_count: usize,
    charts: SvgCharts,
}

impl From<Analysis> for AnalysisView {
    fn from(a: Analysis) -> Self {
        let charts = chart::render(&a.ticker, &a.classification);
        let buy_count = a.classification.buy_count();
        let not_buy_count = a.classification.not_buy_count();
        Self {
            ticker: a.ticker,
            query: a.query,
            threshold: a.threshold,
            headlines: a.headlines,
            scores: a.classification.scores,
            buy_indices: a.classification.buy_indices,
            buy_count,
            not_buy_count,
            charts,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum AnalyzeResp {
    Ok(Box<AnalysisView>),
    Warning { message: String },
    Error { message: String },
}

async fn analyze(State(state): State<AppState>, Json(body): Json<AnalyzeReq>) -> Response {
    let threshold = body.threshold.unwrap_or(state.ui.default_threshold);
    let req = AnalysisRequest::new(body.api_key, body.ticker, threshold);
    if !req.is_ready() {
        return StatusCode::NO_CONTENT.into_response();
    }

    match pipeline::run(state.news.as_ref(), state.scorer.as_ref(), &req).await {
        Ok(analysis) => (
            StatusCode::OK,
            Json(AnalyzeResp::Ok(Box::new(analysis.into()))),
        )
            .into_response(),
        Err(e) => {
            let status = match &e {
                AnalysisError::Fetch(_) => StatusCode::BAD_GATEWAY,
                AnalysisError::NoArticles { .. } => StatusCode::OK,
                AnalysisError::Scoring(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let notice = e.notice();
            let resp = match notice.level {
                NoticeLevel::Warning => AnalyzeResp::Warning {
                    message: notice.message,
                },
                NoticeLevel::Error => AnalyzeResp::Error {
                    message: notice.message,
                },
            };
            (status, Json(resp)).into_response()
        }
    }
}
