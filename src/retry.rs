use std::time::Duration;

/// Bounded retry policy for transient remote errors.
///
/// A failed remote call is retried up to `max_attempts` times with an
/// exponentially growing delay between attempts. The policy is a plain
/// value so the backoff schedule can be tested in isolation from any
/// network code.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Whether another attempt is allowed after `attempt` failures.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delay before the attempt following `attempt` failures: doubles with
    /// each failed attempt (`base`, `2*base`, `4*base`, ...).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay * 2u32.saturating_pow(exponent)
    }

    /// Delay before retrying a rate-limited call, or `None` once the retry
    /// budget is spent. A positive `Retry-After` value announced by the
    /// server takes precedence over the exponential schedule.
    pub fn rate_limit_delay(&self, attempt: u32, retry_after: Option<u64>) -> Option<Duration> {
        if !self.should_retry(attempt) {
            return None;
        }
        match retry_after {
            Some(secs) if secs > 0 => Some(Duration::from_secs(secs)),
            _ => Some(self.delay_for(attempt)),
        }
    }
}
