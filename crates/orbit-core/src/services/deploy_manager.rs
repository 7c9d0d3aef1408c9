use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::Instrument;

use crate::error::{OrbitError, Result};
use crate::models::{OrbitConfig, ProjectConfig, ProjectStatus};

use super::config_store::ConfigStore;
use super::cycle::DeploymentCycle;
use super::health::HttpHealthCheck;
use super::load_probe::SystemLoadProbe;
use super::registry::StatusRegistry;
use super::runner::ProcessRunner;

/// Entry point for deployments and config edits.
///
/// Owns the live config and the deployment cycle (and through it the status
/// registry). Share it behind an `Arc`.
pub struct DeployManager {
    config: RwLock<OrbitConfig>,
    store: Option<ConfigStore>,
    /// Serializes config edits so the file on disk follows the in-memory order.
    save_lock: tokio::sync::Mutex<()>,
    cycle: DeploymentCycle,
}

impl DeployManager {
    /// Seeds an Idle registry entry for every configured project.
    pub fn new(config: OrbitConfig, cycle: DeploymentCycle) -> Self {
        for name in config.projects.keys() {
            cycle.registry().ensure(name);
        }
        Self {
            config: RwLock::new(config),
            store: None,
            save_lock: tokio::sync::Mutex::new(()),
            cycle,
        }
    }

    /// Wire the real load probe, process runner and HTTP health check.
    pub fn with_system_defaults(config: OrbitConfig) -> Self {
        let cycle = DeploymentCycle::new(
            StatusRegistry::new(),
            Arc::new(SystemLoadProbe),
            Arc::new(ProcessRunner),
            Arc::new(HttpHealthCheck::new()),
        );
        Self::new(config, cycle)
    }

    /// Persist config edits through `store`.
    pub fn with_store(mut self, store: ConfigStore) -> Self {
        self.store = Some(store);
        self
    }

    fn read_config(&self) -> RwLockReadGuard<'_, OrbitConfig> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_config(&self) -> RwLockWriteGuard<'_, OrbitConfig> {
        self.config.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn registry(&self) -> &StatusRegistry {
        self.cycle.registry()
    }

    pub fn config(&self) -> OrbitConfig {
        self.read_config().clone()
    }

    pub fn project(&self, name: &str) -> Option<ProjectConfig> {
        self.read_config().projects.get(name).cloned()
    }

    pub fn port(&self) -> u16 {
        self.read_config().port
    }

    pub fn secret_matches(&self, candidate: &str) -> bool {
        self.read_config().secret == candidate
    }

    pub fn current_load(&self) -> f64 {
        self.cycle.current_load()
    }

    pub fn load_threshold(&self) -> f64 {
        self.cycle.settings().load_threshold
    }

    pub fn is_overloaded(&self) -> bool {
        self.cycle.is_overloaded()
    }

    pub fn statuses(&self) -> BTreeMap<String, ProjectStatus> {
        self.registry().snapshot()
    }

    /// Start a deployment of `name` in the background and return at once.
    ///
    /// The status flips to Building (pending) before this returns. A second
    /// trigger while the project's cycle is still running is rejected with
    /// [`OrbitError::DeployInProgress`] rather than racing on the same binary.
    /// Must be called from within a tokio runtime.
    pub fn trigger(&self, name: &str) -> Result<()> {
        let project = {
            let config = self.read_config();
            let project = config
                .projects
                .get(name)
                .cloned()
                .ok_or_else(|| OrbitError::ProjectNotFound(name.to_string()))?;
            if !self.registry().begin_run(name, Utc::now()) {
                return Err(OrbitError::DeployInProgress(name.to_string()));
            }
            project
        };

        tracing::info!(project = %name, "deploy triggered");
        let cycle = self.cycle.clone();
        let name = name.to_string();
        let span = tracing::info_span!("deploy", project = %name);
        tokio::spawn(
            async move {
                cycle.run(&name, &project).await;
            }
            .instrument(span),
        );
        Ok(())
    }

    /// [`trigger`](Self::trigger), reduced to "was a cycle started".
    pub fn trigger_accepted(&self, name: &str) -> bool {
        self.trigger(name).is_ok()
    }

    pub async fn update_global(&self, port: u16, secret: String) -> Result<()> {
        let _save = self.save_lock.lock().await;
        let (previous, next) = {
            let mut config = self.write_config();
            let previous = config.clone();
            config.port = port;
            config.secret = secret;
            (previous, config.clone())
        };
        self.commit(previous, &next).await
    }

    pub async fn create_project(&self, name: &str, project: ProjectConfig) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(OrbitError::InvalidConfig("project name is required".into()));
        }
        let _save = self.save_lock.lock().await;
        let (previous, next) = {
            let mut config = self.write_config();
            if config.projects.contains_key(name) {
                return Err(OrbitError::ProjectAlreadyExists(name.to_string()));
            }
            let previous = config.clone();
            config.projects.insert(name.to_string(), project);
            (previous, config.clone())
        };
        self.commit(previous, &next).await?;
        self.registry().ensure(name);
        tracing::info!(project = %name, "project created");
        Ok(())
    }

    /// Replace a project's settings. A cycle already running keeps the copy it
    /// started with.
    pub async fn update_project(&self, name: &str, project: ProjectConfig) -> Result<()> {
        let _save = self.save_lock.lock().await;
        let (previous, next) = {
            let mut config = self.write_config();
            let previous = config.clone();
            let entry = config
                .projects
                .get_mut(name)
                .ok_or_else(|| OrbitError::ProjectNotFound(name.to_string()))?;
            *entry = project;
            (previous, config.clone())
        };
        self.commit(previous, &next).await?;
        tracing::info!(project = %name, "project updated");
        Ok(())
    }

    pub async fn delete_project(&self, name: &str) -> Result<()> {
        let _save = self.save_lock.lock().await;
        let (previous, next) = {
            let mut config = self.write_config();
            if !config.projects.contains_key(name) {
                return Err(OrbitError::ProjectNotFound(name.to_string()));
            }
            if self
                .registry()
                .get(name)
                .is_some_and(|status| status.is_in_flight())
            {
                return Err(OrbitError::DeployInProgress(name.to_string()));
            }
            let previous = config.clone();
            config.projects.remove(name);
            (previous, config.clone())
        };
        self.commit(previous, &next).await?;
        self.registry().remove(name);
        tracing::info!(project = %name, "project deleted");
        Ok(())
    }

    /// Persist `next`. On failure the live config goes back to `previous`, so
    /// memory never runs ahead of the file. Callers hold `save_lock`.
    async fn commit(&self, previous: OrbitConfig, next: &OrbitConfig) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        if let Err(e) = store.save(next).await {
            tracing::warn!(
                error = %e,
                path = %store.path().display(),
                "config save failed, reverting"
            );
            *self.write_config() = previous;
            return Err(e);
        }
        Ok(())
    }
}
