use std::sync::Arc;
use std::time::Duration;

use crate::models::{DeployResult, DeployState, ProjectConfig};

use super::backup;
use super::git;
use super::health::HealthCheck;
use super::load_probe::LoadProbe;
use super::registry::StatusRegistry;
use super::runner::CommandRunner;

pub const DEFAULT_LOAD_THRESHOLD: f64 = 1.5;
pub const DEFAULT_COOLING_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Thresholds and waits used by every cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleSettings {
    /// Builds hold while the load average is strictly above this.
    pub load_threshold: f64,
    /// Pause between load samples while holding.
    pub cooling_interval: Duration,
    /// Pause between restart and the health check.
    pub grace_period: Duration,
    pub health_timeout: Duration,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            load_threshold: DEFAULT_LOAD_THRESHOLD,
            cooling_interval: DEFAULT_COOLING_INTERVAL,
            grace_period: DEFAULT_GRACE_PERIOD,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }
}

/// The build / restart / verify / rollback state machine.
///
/// Cheap to clone; every clone shares the same registry and collaborators.
#[derive(Clone)]
pub struct DeploymentCycle {
    registry: StatusRegistry,
    probe: Arc<dyn LoadProbe>,
    runner: Arc<dyn CommandRunner>,
    health: Arc<dyn HealthCheck>,
    settings: CycleSettings,
}

impl DeploymentCycle {
    pub fn new(
        registry: StatusRegistry,
        probe: Arc<dyn LoadProbe>,
        runner: Arc<dyn CommandRunner>,
        health: Arc<dyn HealthCheck>,
    ) -> Self {
        Self {
            registry,
            probe,
            runner,
            health,
            settings: CycleSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: CycleSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn registry(&self) -> &StatusRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &CycleSettings {
        &self.settings
    }

    pub fn current_load(&self) -> f64 {
        self.probe.current_load()
    }

    pub fn is_overloaded(&self) -> bool {
        self.current_load() > self.settings.load_threshold
    }

    /// Drive `name` through one full cycle and return the recorded outcome.
    ///
    /// Every transition is written to the registry before the step it names
    /// starts. Failures are logged and recorded, never returned as errors.
    pub async fn run(&self, name: &str, project: &ProjectConfig) -> DeployResult {
        self.registry.set_status(name, DeployState::CoolingCheck);
        self.wait_for_cool_host(name).await;

        self.registry.set_status(name, DeployState::Building);
        let binary = project.binary_path();
        let backup_path = project.backup_path();
        backup::save(&binary, &backup_path).await;

        let dir = project.working_dir();
        if let Err(e) = git::pull(self.runner.as_ref(), &dir, &project.branch).await {
            tracing::warn!(project = %name, error = %e, "git pull failed");
            return self.finish(name, DeployResult::GitFailure);
        }

        if let Err(e) = self.runner.run_shell(&dir, &project.build_cmd).await {
            tracing::warn!(project = %name, error = %e, "build failed");
            return self.finish(name, DeployResult::BuildFailure);
        }

        self.registry.set_status(name, DeployState::Restarting);
        if let Err(e) = self.runner.run_shell(&dir, &project.restart_cmd).await {
            tracing::warn!(project = %name, error = %e, "restart failed");
            return self.finish(name, DeployResult::RestartFailure);
        }

        self.registry.set_status(name, DeployState::Verifying);
        tokio::time::sleep(self.settings.grace_period).await;

        match self
            .health
            .check(&project.health_url, self.settings.health_timeout)
            .await
        {
            Ok(()) => {
                tracing::info!(project = %name, "deploy succeeded");
                self.finish(name, DeployResult::Success)
            }
            Err(e) => {
                tracing::warn!(project = %name, error = %e, "health check failed, rolling back");
                self.registry.set_status(name, DeployState::RollingBack);
                backup::restore(&binary, &backup_path).await;
                if let Err(e) = self.runner.run_shell(&dir, &project.restart_cmd).await {
                    tracing::warn!(project = %name, error = %e, "restart after rollback failed");
                }
                self.finish(name, DeployResult::Rollback)
            }
        }
    }

    /// Thermal protection: hold until the load average is at or below the
    /// threshold. There is no upper bound on how long this waits.
    async fn wait_for_cool_host(&self, name: &str) {
        loop {
            let load = self.probe.current_load();
            if load <= self.settings.load_threshold {
                return;
            }
            tracing::info!(project = %name, load, "system hot, holding");
            tokio::time::sleep(self.settings.cooling_interval).await;
        }
    }

    fn finish(&self, name: &str, result: DeployResult) -> DeployResult {
        self.registry.set_result(name, DeployState::Idle, Some(result));
        result
    }
}
