use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a project currently is in its deployment cycle.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DeployState {
    #[default]
    Idle,
    CoolingCheck,
    Building,
    Restarting,
    Verifying,
    RollingBack,
}

impl DeployState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::CoolingCheck => "Cooling Check",
            Self::Building => "Building",
            Self::Restarting => "Restarting",
            Self::Verifying => "Verifying",
            Self::RollingBack => "Rolling Back",
        }
    }

    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }
}

impl fmt::Display for DeployState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of the most recently completed cycle.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DeployResult {
    #[default]
    NotApplicable,
    Success,
    GitFailure,
    BuildFailure,
    RestartFailure,
    Rollback,
}

impl DeployResult {
    pub fn label(self) -> &'static str {
        match self {
            Self::NotApplicable => "N/A",
            Self::Success => "Success",
            Self::GitFailure => "Git Fail",
            Self::BuildFailure => "Build Fail",
            Self::RestartFailure => "Restart Fail",
            Self::Rollback => "Rollback",
        }
    }

    pub fn is_failure(self) -> bool {
        matches!(
            self,
            Self::GitFailure | Self::BuildFailure | Self::RestartFailure | Self::Rollback
        )
    }
}

impl fmt::Display for DeployResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatus {
    pub status: DeployState,
    pub last_result: DeployResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Utc>>,
}

impl ProjectStatus {
    pub fn is_in_flight(&self) -> bool {
        !self.status.is_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_status_is_idle_and_never_run() {
        let status = ProjectStatus::default();
        assert_eq!(status.status, DeployState::Idle);
        assert_eq!(status.last_result, DeployResult::NotApplicable);
        assert!(status.last_run.is_none());
        assert!(!status.is_in_flight());
    }

    #[test]
    fn labels_match_dashboard_text() {
        assert_eq!(DeployState::CoolingCheck.to_string(), "Cooling Check");
        assert_eq!(DeployState::RollingBack.to_string(), "Rolling Back");
        assert_eq!(DeployResult::NotApplicable.to_string(), "N/A");
        assert_eq!(DeployResult::GitFailure.to_string(), "Git Fail");
    }

    #[test]
    fn only_failed_outcomes_are_failures() {
        assert!(DeployResult::Rollback.is_failure());
        assert!(DeployResult::BuildFailure.is_failure());
        assert!(!DeployResult::Success.is_failure());
        assert!(!DeployResult::NotApplicable.is_failure());
    }

    #[test]
    fn status_uses_camel_case() {
        let status = ProjectStatus {
            status: DeployState::CoolingCheck,
            last_result: DeployResult::GitFailure,
            last_run: Some(Utc::now()),
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"lastResult\":\"gitFailure\""));
        assert!(json.contains("\"status\":\"coolingCheck\""));
        assert!(json.contains("\"lastRun\""));
    }
}
