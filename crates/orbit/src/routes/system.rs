use axum::Json;
use orbit_core::services::machine_info::{self, MachineInfo};

/// GET /api/system: host facts for the dashboard header.
pub async fn get_system() -> Json<MachineInfo> {
    Json(machine_info::gather().await)
}
