use axum::http::HeaderMap;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the shared secret on config API calls.
pub const SECRET_HEADER: &str = "x-orbit-secret";

/// Reject the request unless it carries the configured shared secret.
pub fn require_secret(app: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let provided = headers
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if app.manager.secret_matches(provided) {
        Ok(())
    } else {
        tracing::warn!("rejected request with a bad secret");
        Err(AppError::forbidden())
    }
}
