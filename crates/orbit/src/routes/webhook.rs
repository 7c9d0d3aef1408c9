use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orbit_core::OrbitError;
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WebhookParams {
    #[serde(default)]
    secret: String,
    #[serde(default)]
    project: String,
}

/// GET/POST /webhook?secret=..&project=..: push hook from the git host.
///
/// Answers in plain text so hook delivery logs stay readable.
pub async fn webhook(
    State(app): State<AppState>,
    Query(params): Query<WebhookParams>,
) -> Response {
    if !app.manager.secret_matches(&params.secret) {
        tracing::warn!(project = %params.project, "webhook rejected: bad secret");
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }

    match app.manager.trigger(&params.project) {
        Ok(()) => (StatusCode::OK, "Orbit initiated").into_response(),
        Err(OrbitError::ProjectNotFound(_)) => {
            (StatusCode::NOT_FOUND, "Project not found").into_response()
        }
        Err(OrbitError::DeployInProgress(_)) => {
            (StatusCode::CONFLICT, "Deployment already in progress").into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
