pub mod config;
pub mod status;

pub use config::{OrbitConfig, ProjectConfig};
pub use status::{DeployResult, DeployState, ProjectStatus};
