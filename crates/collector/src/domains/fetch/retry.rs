use slog::{debug, error, warn, Logger};
use std::{fmt::Display, future::Future, time::Duration};
use tokio::time::sleep;

/// How often, and how patiently, a failing call is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Wait after failed attempt `attempt` (1-based): `attempt * base_delay`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Run `op` until it succeeds or the attempts run out, sleeping between tries.
    /// `op` receives the 1-based attempt number. The last error is returned.
    pub async fn run<T, E, F, Fut>(&self, logger: &Logger, label: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = self.max_attempts();
        let mut attempt = 1;
        loop {
            debug!(logger, "requesting {} (attempt {}/{})", label, attempt, max_attempts);
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= max_attempts => {
                    error!(
                        logger,
                        "error fetching {} (attempt {}/{}): {} - final fail",
                        label,
                        attempt,
                        max_attempts,
                        err
                    );
                    return Err(err);
                }
                Err(err) => {
                    let delay = self.backoff(attempt);
                    warn!(
                        logger,
                        "error fetching {} (attempt {}/{}): {} - retrying in {:?}",
                        label,
                        attempt,
                        max_attempts,
                        err,
                        delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
