//! Bounded exponential backoff for establishing cache connections.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout, Instant};
use tracing::{info, warn};

/// How hard to try before giving up on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the second attempt; doubles after every failure
    pub base_delay: Duration,
    /// Cap on any single delay
    pub max_delay: Duration,
    /// Attempts including the first one
    pub max_attempts: u32,
    /// Total time budget across all attempts and delays
    pub max_total: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(3),
            max_attempts: 10,
            max_total: Duration::from_secs(60 * 60),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Runs `op` until it succeeds or the policy is exhausted.
///
/// `op` receives the 1-based attempt number. Returns `None` once the attempt
/// cap is reached, an attempt outlives the total budget, or the next delay
/// would overrun it.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    what: &str,
    mut op: F,
) -> Option<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let started = Instant::now();
    let mut attempt = 1;

    loop {
        // Each attempt only gets what is left of the total budget
        let remaining = policy.max_total.saturating_sub(started.elapsed());
        let outcome = match timeout(remaining, op(attempt)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(attempt, "{} timed out, retry time exhausted", what);
                return None;
            }
        };

        match outcome {
            Ok(value) => {
                if attempt > 1 {
                    info!(attempt, "{} succeeded after retrying", what);
                }
                return Some(value);
            }
            Err(err) => {
                if attempt >= policy.max_attempts {
                    warn!(attempt, error = %err, "{} failed, attempts exhausted", what);
                    return None;
                }

                let delay = policy.delay_for(attempt);
                if started.elapsed() + delay > policy.max_total {
                    warn!(attempt, error = %err, "{} failed, retry time exhausted", what);
                    return None;
                }

                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "{} failed, retrying",
                    what
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            max_attempts,
            max_total: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_delay_doubles_then_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for(5), Duration::from_millis(1600));
        assert_eq!(policy.delay_for(6), Duration::from_secs(3));
        assert_eq!(policy.delay_for(40), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let calls = AtomicU32::new(0);

        let result = retry_with_backoff(&fast_policy(5), "connect", |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 3 {
                    Err("refused")
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result, Some(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_at_attempt_cap() {
        let calls = AtomicU32::new(0);

        let result: Option<()> = retry_with_backoff(&fast_policy(4), "connect", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("refused") }
        })
        .await;

        assert!(result.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_gives_up_at_time_ceiling() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(20),
            max_delay: Duration::from_millis(20),
            max_attempts: 1000,
            max_total: Duration::from_millis(50),
        };
        let calls = AtomicU32::new(0);

        let result: Option<()> = retry_with_backoff(&policy, "connect", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("refused") }
        })
        .await;

        assert!(result.is_none());
        let made = calls.load(Ordering::SeqCst);
        assert!((2..=4).contains(&made), "made {} attempts", made);
    }

    #[tokio::test]
    async fn test_slow_attempt_cannot_overrun_time_ceiling() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
            max_attempts: 10,
            max_total: Duration::from_millis(100),
        };
        let started = Instant::now();

        let result: Option<()> = retry_with_backoff(&policy, "connect", |_| async {
            sleep(Duration::from_secs(5)).await;
            Err("refused")
        })
        .await;

        assert!(result.is_none());
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
