use serde::{Deserialize, Serialize};

use crate::domain::RunSummary;

/// Body of `POST /scrape`
#[derive(Debug, Deserialize)]
pub struct ScrapeParams {
    pub mode: String,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeAccepted {
    pub message: String,
    pub config: ScrapeAcceptedConfig,
}

#[derive(Debug, Serialize)]
pub struct ScrapeAcceptedConfig {
    pub mode: String,
    pub target_date: String,
}

#[derive(Debug, Serialize)]
pub struct ScrapeStatus {
    pub running: bool,
    pub last_run: Option<RunSummary>,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
