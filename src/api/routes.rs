use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::api::handlers::AppState;
use crate::api::handlers::dashboard::get_dashboard;
use crate::api::handlers::scrape::{scrape_status, trigger_scrape};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/scrape", post(trigger_scrape))
        .route("/scrape/status", get(scrape_status))
        .route("/visualize", get(get_dashboard))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::AppConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn config_in(dir: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::new();
        config.storage.data_dir = dir.join("data");
        config.storage.template_path = dir.join("dashboard.html");
        config.storage.env_file = dir.join(".env");
        config
    }

    fn post_scrape(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/scrape")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(state: Arc<AppState>, request: Request<Body>) -> (StatusCode, String) {
        let response = create_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_rejects_unknown_mode() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::new(config_in(dir.path())));

        let (status, body) = send(state, post_scrape(json!({"mode": "monthly"}))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("Mode must be one of"));
    }

    #[tokio::test]
    async fn test_rejects_bad_date_format() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::new(config_in(dir.path())));

        let (status, body) = send(state, post_scrape(json!({"mode": "single", "date": "06/07/2025"}))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("YYYY-MM-DD"));
    }

    #[tokio::test]
    async fn test_single_requires_date() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::new(config_in(dir.path())));

        let (status, body) = send(state.clone(), post_scrape(json!({"mode": "single"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Date is required for 'single' mode"));
        assert!(!state.runs.is_running());
    }

    #[tokio::test]
    async fn test_second_run_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::new(config_in(dir.path())));
        assert!(state.runs.try_start());

        let (status, _) = send(state.clone(), post_scrape(json!({"mode": "weekend"}))).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert!(state.runs.is_running());
    }

    #[tokio::test]
    async fn test_status_reports_last_run() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::new(config_in(dir.path())));
        state.runs.try_start();
        state
            .runs
            .finish(crate::domain::RunSummary::failed("Authentication failed"))
            .await;

        let request = Request::builder().uri("/scrape/status").body(Body::empty()).unwrap();
        let (status, body) = send(state, request).await;

        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            value,
            json!({"running": false, "last_run": {"status": "failed", "reason": "Authentication failed"}})
        );
    }

    #[tokio::test]
    async fn test_visualize_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dashboard.html"), "<main>{{content}}</main>").unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        let state = Arc::new(AppState::new(config_in(dir.path())));

        let request = Request::builder().uri("/visualize").body(Body::empty()).unwrap();
        let (status, body) = send(state, request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("<main><div class='no-data'>"));
        assert!(body.contains("No Data Available"));
    }
}
