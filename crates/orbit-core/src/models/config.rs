use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level agent configuration, stored as JSON on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrbitConfig {
    #[serde(default)]
    pub port: u16,
    #[serde(rename = "webhook_secret", default)]
    pub secret: String,
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectConfig>,
}

/// How to pull, build, restart and health-check one deployed project.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectConfig {
    pub path: String,
    pub branch: String,
    pub build_cmd: String,
    pub restart_cmd: String,
    pub binary_name: String,
    pub health_url: String,
}

impl ProjectConfig {
    pub fn working_dir(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }

    pub fn binary_path(&self) -> PathBuf {
        self.working_dir().join(&self.binary_name)
    }

    /// `<binary>.bak`, next to the deployed binary.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.binary_name.clone();
        name.push_str(".bak");
        self.working_dir().join(name)
    }
}
