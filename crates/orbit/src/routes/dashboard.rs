use axum::extract::State;
use axum::response::Redirect;
use axum::Json;
use chrono::Local;
use orbit_core::models::{DeployResult, ProjectStatus};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub load: f64,
    pub overloaded: bool,
    pub projects: Vec<ProjectView>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ProjectView {
    pub name: String,
    pub status: String,
    pub state_class: String,
    pub last_result: String,
    pub result_class: &'static str,
    pub time_ago: String,
}

impl ProjectView {
    pub fn new(name: &str, status: &ProjectStatus) -> Self {
        Self {
            name: name.to_string(),
            status: status.status.to_string(),
            state_class: status.status.label().to_lowercase().replace(' ', "-"),
            last_result: status.last_result.to_string(),
            result_class: result_class(status.last_result),
            time_ago: status
                .last_run
                .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "Never".to_string()),
        }
    }
}

fn result_class(result: DeployResult) -> &'static str {
    match result {
        DeployResult::Success => "success",
        r if r.is_failure() => "failed",
        _ => "idle",
    }
}

/// GET /api/dashboard: load gauge plus one row per project, sorted by name.
pub async fn get_dashboard(State(app): State<AppState>) -> Json<DashboardView> {
    let load = app.manager.current_load();
    let projects = app
        .manager
        .statuses()
        .iter()
        .map(|(name, status)| ProjectView::new(name, status))
        .collect();
    Json(DashboardView {
        load,
        overloaded: load > app.manager.load_threshold(),
        projects,
    })
}

/// GET /: the HTML dashboard lives elsewhere; point at its data.
pub async fn index() -> Redirect {
    Redirect::to("/api/dashboard")
}
