use std::time::Duration;

use async_trait::async_trait;

use crate::error::{OrbitError, Result};

/// Post-restart health probe.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// One attempt against `url`. `Ok` only for an HTTP 200 within `timeout`.
    async fn check(&self, url: &str, timeout: Duration) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct HttpHealthCheck {
    client: reqwest::Client,
}

impl HttpHealthCheck {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HealthCheck for HttpHealthCheck {
    async fn check(&self, url: &str, timeout: Duration) -> Result<()> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OrbitError::Health(format!("{url} timed out after {timeout:?}"))
                } else {
                    OrbitError::Health(format!("{url}: {e}"))
                }
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(OrbitError::Health(format!("{url} returned {status}")));
        }
        Ok(())
    }
}
