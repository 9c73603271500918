use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::{Arc, LazyLock};

use super::AppState;
use crate::api::models::{ErrorDetail, ScrapeAccepted, ScrapeAcceptedConfig, ScrapeParams, ScrapeStatus};
use crate::domain::ScrapeMode;
use crate::errors::PlanError;
use crate::services::scrape::run_scrape;

static DATE_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

/// Clears the running flag even if the run task panics
struct RunGuard(Arc<AppState>);

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.runs.release();
    }
}

pub async fn trigger_scrape(
    State(state): State<Arc<AppState>>,
    Json(params): Json<ScrapeParams>,
) -> Response {
    let mode = match parse_mode(&params) {
        Ok(mode) => mode,
        Err(rejection) => return rejection,
    };

    if !state.runs.try_start() {
        return error_response(StatusCode::CONFLICT, "A scrape is already running");
    }

    let task_state = state.clone();
    tokio::spawn(async move {
        let guard = RunGuard(task_state.clone());
        log::info!("Scrape triggered over HTTP ({})", mode);
        let summary = run_scrape(&task_state.config, &mode).await;
        log::info!("Scrape finished: {:?}", summary);
        task_state.runs.finish(summary).await;
        drop(guard);
    });

    let target_date = match mode {
        ScrapeMode::Single(date) => date.format("%Y-%m-%d").to_string(),
        _ => "Range".to_string(),
    };
    let body = ScrapeAccepted {
        message: "Scraping started in background".to_string(),
        config: ScrapeAcceptedConfig {
            mode: mode.name().to_string(),
            target_date,
        },
    };
    (StatusCode::ACCEPTED, Json(body)).into_response()
}

pub async fn scrape_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ScrapeStatus {
        running: state.runs.is_running(),
        last_run: state.runs.last_run().await,
    })
}

fn parse_mode(params: &ScrapeParams) -> Result<ScrapeMode, Response> {
    let date = match params.date.as_deref().filter(|d| !d.is_empty()) {
        Some(raw) => Some(parse_date(raw)?),
        None => None,
    };

    ScrapeMode::from_parts(&params.mode, date).map_err(|e| match e {
        PlanError::MissingDate => {
            error_response(StatusCode::BAD_REQUEST, "Date is required for 'single' mode")
        }
        other => error_response(StatusCode::UNPROCESSABLE_ENTITY, other.to_string()),
    })
}

fn parse_date(raw: &str) -> Result<NaiveDate, Response> {
    let invalid = || error_response(StatusCode::UNPROCESSABLE_ENTITY, "Date must be in YYYY-MM-DD format");
    if !DATE_FORMAT.is_match(raw) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())
}

fn error_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (status, Json(ErrorDetail::new(detail))).into_response()
}
