//! Polling the service's own liveness route.

use std::time::Duration;

use tracing::info;

use super::error::BootstrapError;
use super::retry::{AttemptError, Delay, FixedBackoff, READINESS_POLL_INTERVAL};
use crate::api::routes::PING_PATH;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// HTTP client checking that the API answers its liveness route.
#[derive(Debug, Clone)]
pub struct ReadinessProbe {
    client: reqwest::Client,
    url: String,
}

impl ReadinessProbe {
    /// Creates a probe for the API served at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Fatal`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, BootstrapError> {
        let client = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .map_err(|err| BootstrapError::Fatal {
                target: "api readiness",
                reason: err.to_string(),
            })?;
        Ok(Self {
            client,
            url: format!("{}{PING_PATH}", base_url.trim_end_matches('/')),
        })
    }

    /// Returns the probed URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs a single probe.
    ///
    /// # Errors
    ///
    /// Returns [`AttemptError::Transient`] if the request fails or the
    /// response status is not a success.
    pub async fn check(&self) -> Result<(), AttemptError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|err| AttemptError::transient(err.to_string()))?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AttemptError::transient(format!("liveness returned {status}")))
        }
    }
}

/// Polls `probe` every [`READINESS_POLL_INTERVAL`] until the API answers.
///
/// # Errors
///
/// Never fails in practice: every probe failure is transient. The result
/// type matches the other connection loops.
pub async fn wait_until_ready<D: Delay>(
    probe: &ReadinessProbe,
    delay: D,
) -> Result<(), BootstrapError> {
    let mut backoff = FixedBackoff::new("api readiness", READINESS_POLL_INTERVAL, delay);
    backoff.connect(|| probe.check()).await?;
    info!(url = probe.url(), "API is serving");
    Ok(())
}
