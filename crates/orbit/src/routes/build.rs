use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::{Form, Json};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProjectParam {
    #[serde(default)]
    project: String,
}

/// POST /build: the dashboard's "deploy now" button (form-encoded).
pub async fn build_form(
    State(app): State<AppState>,
    Form(form): Form<ProjectParam>,
) -> Result<Redirect, AppError> {
    if form.project.is_empty() {
        return Err(AppError::bad_request("Project name required"));
    }
    app.manager.trigger(&form.project)?;
    Ok(Redirect::to("/"))
}

/// POST /api/build: `{"project": ".."}` body, falling back to `?project=`.
pub async fn build_api(
    State(app): State<AppState>,
    Query(query): Query<ProjectParam>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let project = serde_json::from_slice::<ProjectParam>(&body)
        .ok()
        .map(|p| p.project)
        .filter(|p| !p.is_empty())
        .unwrap_or(query.project);
    if project.is_empty() {
        return Err(AppError::bad_request("Project name required"));
    }
    app.manager.trigger(&project)?;
    Ok(Json(serde_json::json!({ "status": "Build triggered" })))
}
