use std::time::Duration;

/// What the driver does after an attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Retry { delay: Duration },
    Exhausted,
}

/// Bounded retry with a fixed delay between attempts.
///
/// The decision depends only on the failure count, so the caller owns all
/// state and each batch starts from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` counts the first attempt; zero is treated as one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Decide after the `fail_count`-th consecutive failure (1-based).
    pub fn decide(&self, fail_count: u32) -> Decision {
        if fail_count >= self.max_attempts {
            Decision::Exhausted
        } else {
            Decision::Retry { delay: self.delay }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_until_limit() {
        let p = RetryPolicy::new(3, Duration::from_millis(750));
        assert_eq!(p.decide(1), Decision::Retry { delay: Duration::from_millis(750) });
        assert_eq!(p.decide(2), Decision::Retry { delay: Duration::from_millis(750) });
        assert_eq!(p.decide(3), Decision::Exhausted);
        assert_eq!(p.decide(4), Decision::Exhausted);
    }

    #[test]
    fn single_attempt_never_retries() {
        let p = RetryPolicy::new(1, Duration::from_millis(10));
        assert_eq!(p.decide(1), Decision::Exhausted);
    }

    #[test]
    fn zero_attempts_clamped() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }
}
