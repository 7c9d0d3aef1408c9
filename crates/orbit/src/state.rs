use std::sync::Arc;

use orbit_core::services::DeployManager;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<DeployManager>,
}

impl AppState {
    pub fn new(manager: Arc<DeployManager>) -> Self {
        Self { manager }
    }
}
