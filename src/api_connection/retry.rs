//! Bounded retry with exponential backoff for the completion endpoint.

use std::time::Duration;

/// How many times to call the endpoint and how long to wait between calls.
///
/// The delay after the `n`-th failed attempt (1-based) is
/// `base_delay * multiplier^n`, capped at `max_delay`. With the defaults that
/// gives 2 s after the first failure and 4 s after the second.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    multiplier: f64,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn exponential(
        max_attempts: u32,
        base_delay: Duration,
        multiplier: f64,
        max_delay: Duration,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            multiplier,
            max_delay,
        }
    }

    /// Same attempt bound, zero wait. Used where tests cannot afford real sleeps.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::exponential(max_attempts, Duration::ZERO, 2.0, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// `attempt` is the number of attempts already made.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        let secs = self.base_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        if !secs.is_finite() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(secs).min(self.max_delay)
    }

    /// Sum of all backoff sleeps when every attempt fails.
    pub fn worst_case_backoff(&self) -> Duration {
        (1..self.max_attempts).map(|attempt| self.delay(attempt)).sum()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential(3, Duration::from_secs(1), 2.0, Duration::from_secs(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
        assert_eq!(policy.delay(1), Duration::from_secs(2));
        assert_eq!(policy.delay(2), Duration::from_secs(4));
        assert_eq!(policy.worst_case_backoff(), Duration::from_secs(6));
    }

    #[test]
    fn test_delay_is_capped() {
        let policy =
            RetryPolicy::exponential(10, Duration::from_secs(1), 2.0, Duration::from_secs(5));
        assert_eq!(policy.delay(3), Duration::from_secs(5));
    }

    #[test]
    fn test_immediate_never_sleeps() {
        let policy = RetryPolicy::immediate(3);
        assert_eq!(policy.delay(1), Duration::ZERO);
        assert_eq!(policy.worst_case_backoff(), Duration::ZERO);
    }

    #[test]
    fn test_at_least_one_attempt() {
        assert_eq!(RetryPolicy::immediate(0).max_attempts(), 1);
    }
}
