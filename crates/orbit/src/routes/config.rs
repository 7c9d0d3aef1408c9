use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use orbit_core::models::{OrbitConfig, ProjectConfig};
use serde::Deserialize;

use crate::auth::require_secret;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/config: the full config, secret included.
pub async fn get_config(
    State(app): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<OrbitConfig>, AppError> {
    require_secret(&app, &headers)?;
    Ok(Json(app.manager.config()))
}

#[derive(Debug, Deserialize)]
pub struct GlobalSettings {
    pub port: u16,
    pub secret: String,
}

/// PUT /api/config/global: port and shared secret. A new port applies on the
/// next start.
pub async fn update_global(
    State(app): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<GlobalSettings>,
) -> Result<StatusCode, AppError> {
    require_secret(&app, &headers)?;
    app.manager.update_global(body.port, body.secret).await?;
    Ok(StatusCode::OK)
}

#[derive(Debug, Deserialize)]
pub struct NewProject {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub project: ProjectConfig,
}

/// POST /api/projects
pub async fn create_project(
    State(app): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<NewProject>,
) -> Result<StatusCode, AppError> {
    require_secret(&app, &headers)?;
    app.manager.create_project(&body.name, body.project).await?;
    Ok(StatusCode::CREATED)
}

/// PUT /api/projects/{name}
pub async fn update_project(
    State(app): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    Json(body): Json<ProjectConfig>,
) -> Result<StatusCode, AppError> {
    require_secret(&app, &headers)?;
    app.manager.update_project(&name, body).await?;
    Ok(StatusCode::OK)
}

/// DELETE /api/projects/{name}
pub async fn delete_project(
    State(app): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    require_secret(&app, &headers)?;
    app.manager.delete_project(&name).await?;
    Ok(StatusCode::OK)
}
