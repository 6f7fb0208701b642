//! Retry policy applied by the acquisition layer.
//!
//! Explicit policy object rather than wrapped functions: the acquisition
//! driver owns one policy and applies it around provider `initialize` calls.
//! The executor never retries; once extraction starts, failures are terminal
//! for that extractor in that run.

use std::time::Duration;

use augur_core::config::AcquisitionConfig;
use augur_core::errors::ResourceError;

/// Bounded exponential backoff over transient resource errors.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    pub fn from_config(config: &AcquisitionConfig) -> Self {
        Self::new(
            config.retry_max_attempts(),
            Duration::from_millis(config.retry_base_delay_ms()),
            Duration::from_millis(config.retry_max_delay_ms()),
        )
    }

    /// A policy that never retries (single attempt).
    pub fn disabled() -> Self {
        Self::new(1, Duration::from_millis(0), Duration::from_millis(0))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the given retry (attempt numbering starts at 1).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << (attempt.saturating_sub(1)).min(16);
        self.base_delay
            .saturating_mul(factor as u32)
            .min(self.max_delay)
    }

    /// Run `op`, retrying transient errors up to `max_attempts` total
    /// attempts. Permanent errors return immediately.
    pub fn run<T>(
        &self,
        what: &str,
        mut op: impl FnMut() -> Result<T, ResourceError>,
    ) -> Result<T, ResourceError> {
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        what,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "transient failure, retrying: {e}"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
