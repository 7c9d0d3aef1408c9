use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orbit_core::OrbitError;

/// Carries an explicit 400 through the `anyhow::Error` chain.
#[derive(Debug)]
struct BadRequest(String);

impl std::fmt::Display for BadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequest {}

/// Carries an explicit 403 through the `anyhow::Error` chain.
#[derive(Debug)]
struct Forbidden;

impl std::fmt::Display for Forbidden {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Forbidden")
    }
}

impl std::error::Error for Forbidden {}

/// Unified error type for JSON API responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequest(msg.into()).into())
    }

    pub fn forbidden() -> Self {
        Self(Forbidden.into())
    }

    pub fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<BadRequest>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        if self.0.downcast_ref::<Forbidden>().is_some() {
            return StatusCode::FORBIDDEN;
        }
        match self.0.downcast_ref::<OrbitError>() {
            Some(OrbitError::ProjectNotFound(_)) => StatusCode::NOT_FOUND,
            Some(OrbitError::ProjectAlreadyExists(_)) | Some(OrbitError::DeployInProgress(_)) => {
                StatusCode::CONFLICT
            }
            Some(OrbitError::InvalidConfig(_)) => StatusCode::BAD_REQUEST,
            Some(_) | None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
