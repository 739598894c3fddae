//! Fixed-interval retry loop for establishing connections at startup.
//!
//! Transient failures are retried forever with a constant delay between
//! attempts. Only an attempt that reports a [`AttemptError::Fatal`] outcome
//! ends the loop without a connection.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use super::error::BootstrapError;

/// Delay between storage connection attempts.
pub const STORAGE_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// Delay between queue connection attempts.
pub const QUEUE_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// Delay between API readiness polls.
pub const READINESS_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Suspends the caller between attempts.
///
/// Production code sleeps on the Tokio timer; tests substitute an
/// implementation that records the requested delays and returns at once.
#[async_trait]
pub trait Delay: Send + Sync {
    /// Waits for `duration`.
    async fn wait(&self, duration: Duration);
}

/// [`Delay`] backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Progress of a connection loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No attempt has succeeded yet and none is in flight.
    Disconnected,
    /// An attempt is in flight.
    Connecting,
    /// An attempt succeeded; the loop will not run again.
    Connected,
}

/// Outcome of a failed connection attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttemptError {
    /// The target may become reachable later; the attempt is retried.
    #[error("{0}")]
    Transient(String),

    /// Retrying cannot help; startup is aborted.
    #[error("{0}")]
    Fatal(String),
}

impl AttemptError {
    /// Creates a retryable failure.
    #[must_use]
    pub fn transient(reason: impl Into<String>) -> Self {
        Self::Transient(reason.into())
    }

    /// Creates a non-retryable failure.
    #[must_use]
    pub fn fatal(reason: impl Into<String>) -> Self {
        Self::Fatal(reason.into())
    }
}

/// Retries a connection attempt with a fixed delay until it succeeds.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use message_service::bootstrap::retry::{AttemptError, ConnectionState, FixedBackoff, TokioDelay};
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().expect("runtime").block_on(async {
/// let mut backoff = FixedBackoff::new("example", Duration::ZERO, TokioDelay);
/// let mut failures = 2;
/// let value = backoff
///     .connect(|| {
///         let outcome = if failures > 0 {
///             failures -= 1;
///             Err(AttemptError::transient("not yet"))
///         } else {
///             Ok(42)
///         };
///         async move { outcome }
///     })
///     .await
///     .expect("eventually connects");
/// assert_eq!(value, 42);
/// assert_eq!(backoff.attempts(), 3);
/// assert_eq!(backoff.state(), ConnectionState::Connected);
/// # });
/// ```
#[derive(Debug)]
pub struct FixedBackoff<D: Delay = TokioDelay> {
    target: &'static str,
    interval: Duration,
    delay: D,
    state: ConnectionState,
    attempts: u32,
}

impl<D: Delay> FixedBackoff<D> {
    /// Creates a loop for `target` that waits `interval` between attempts.
    #[must_use]
    pub const fn new(target: &'static str, interval: Duration, delay: D) -> Self {
        Self {
            target,
            interval,
            delay,
            state: ConnectionState::Disconnected,
            attempts: 0,
        }
    }

    /// Returns the current loop state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns the number of attempts made so far.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns the configured delay between attempts.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs `attempt` until it succeeds, waiting between transient failures.
    ///
    /// Once connected the loop is finished: calling `connect` again runs a
    /// fresh sequence of attempts.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Fatal`] when an attempt fails with
    /// [`AttemptError::Fatal`]. Transient failures never end the loop.
    pub async fn connect<T, F, Fut>(&mut self, mut attempt: F) -> Result<T, BootstrapError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, AttemptError>> + Send,
        T: Send,
    {
        loop {
            self.state = ConnectionState::Connecting;
            self.attempts = self.attempts.saturating_add(1);
            match attempt().await {
                Ok(value) => {
                    self.state = ConnectionState::Connected;
                    info!(target_name = self.target, attempts = self.attempts, "connected");
                    return Ok(value);
                }
                Err(AttemptError::Transient(reason)) => {
                    self.state = ConnectionState::Disconnected;
                    warn!(
                        target_name = self.target,
                        attempt = self.attempts,
                        retry_in = ?self.interval,
                        %reason,
                        "connection attempt failed, retrying"
                    );
                    self.delay.wait(self.interval).await;
                }
                Err(AttemptError::Fatal(reason)) => {
                    self.state = ConnectionState::Disconnected;
                    return Err(BootstrapError::Fatal {
                        target: self.target,
                        reason,
                    });
                }
            }
        }
    }
}
