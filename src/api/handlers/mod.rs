use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use crate::config::settings::AppConfig;
use crate::domain::RunSummary;

pub mod dashboard;
pub mod scrape;

pub struct AppState {
    pub config: AppConfig,
    pub runs: RunMonitor,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            runs: RunMonitor::default(),
        }
    }
}

/// Tracks the single background scrape run and its last result
#[derive(Default)]
pub struct RunMonitor {
    running: AtomicBool,
    last_run: Mutex<Option<RunSummary>>,
}

impl RunMonitor {
    /// Claim the run slot; false if a run is already in progress
    pub fn try_start(&self) -> bool {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub async fn finish(&self, summary: RunSummary) {
        *self.last_run.lock().await = Some(summary);
        self.release();
    }

    pub fn release(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub async fn last_run(&self) -> Option<RunSummary> {
        self.last_run.lock().await.clone()
    }
}
