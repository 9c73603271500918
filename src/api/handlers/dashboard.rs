use axum::{extract::State, response::Html};
use std::sync::Arc;

use super::AppState;
use crate::services::dashboard::DashboardService;

pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    let service = DashboardService::new(&state.config);
    Html(service.render_html())
}
