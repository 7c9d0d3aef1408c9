//! Deployment engine for Orbit: pulls, builds, restarts and health-checks
//! configured projects, rolling back to the previous binary when a deploy
//! comes up unhealthy.

pub mod error;
pub mod models;
pub mod services;

pub use error::{OrbitError, Result};
