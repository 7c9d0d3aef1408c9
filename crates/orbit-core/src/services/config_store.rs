use std::path::{Path, PathBuf};

use crate::error::{OrbitError, Result};
use crate::models::OrbitConfig;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Reads and writes the JSON config file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load once at startup.
    pub fn load(&self) -> Result<OrbitConfig> {
        if !self.path.exists() {
            return Err(OrbitError::ConfigNotFound(self.path.clone()));
        }
        let contents = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&contents).map_err(|e| OrbitError::InvalidConfig(e.to_string()))
    }

    pub async fn save(&self, config: &OrbitConfig) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(config)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
