pub mod backup;
pub mod config_store;
pub mod cycle;
pub mod deploy_manager;
pub mod git;
pub mod health;
pub mod load_probe;
pub mod machine_info;
pub mod registry;
pub mod runner;

pub use config_store::ConfigStore;
pub use cycle::{CycleSettings, DeploymentCycle};
pub use deploy_manager::DeployManager;
pub use health::{HealthCheck, HttpHealthCheck};
pub use load_probe::{LoadProbe, SystemLoadProbe};
pub use registry::StatusRegistry;
pub use runner::{CommandRunner, ProcessRunner};
