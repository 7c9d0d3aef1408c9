use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::models::{DeployResult, DeployState, ProjectStatus};

/// Live deployment status for every known project.
///
/// One map-wide mutex serializes every read and write, so callers always see
/// whole entries. Critical sections are short and never cross an `.await`.
/// Cloning yields another handle to the same map.
#[derive(Debug, Clone, Default)]
pub struct StatusRegistry {
    entries: Arc<Mutex<HashMap<String, ProjectStatus>>>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an Idle entry for each name.
    pub fn with_projects<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let registry = Self::new();
        {
            let mut entries = registry.lock();
            for name in names {
                entries.entry(name.into()).or_default();
            }
        }
        registry
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ProjectStatus>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, name: &str) -> Option<ProjectStatus> {
        self.lock().get(name).cloned()
    }

    pub fn ensure(&self, name: &str) {
        self.lock().entry(name.to_string()).or_default();
    }

    pub fn set_status(&self, name: &str, status: DeployState) {
        self.lock().entry(name.to_string()).or_default().status = status;
    }

    /// Overwrite `status`, and `last_result` when one is given.
    pub fn set_result(&self, name: &str, status: DeployState, result: Option<DeployResult>) {
        let mut entries = self.lock();
        let entry = entries.entry(name.to_string()).or_default();
        entry.status = status;
        if let Some(result) = result {
            entry.last_result = result;
        }
    }

    /// Claim `name` for a new cycle.
    ///
    /// Returns `false` without touching the entry while another cycle for the
    /// same project is in flight. Otherwise marks it Building (pending) with
    /// `last_run = now`.
    pub fn begin_run(&self, name: &str, now: DateTime<Utc>) -> bool {
        let mut entries = self.lock();
        let entry = entries.entry(name.to_string()).or_default();
        if entry.is_in_flight() {
            return false;
        }
        entry.status = DeployState::Building;
        entry.last_run = Some(now);
        true
    }

    pub fn remove(&self, name: &str) -> Option<ProjectStatus> {
        self.lock().remove(name)
    }

    /// Consistent copy of every entry, taken under one lock acquisition.
    pub fn snapshot(&self) -> BTreeMap<String, ProjectStatus> {
        self.lock()
            .iter()
            .map(|(name, status)| (name.clone(), status.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
