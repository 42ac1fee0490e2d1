//! Bounded fixed-delay retry

use std::thread;
use std::time::Duration;

use crate::display::logger;
use crate::error::OptikitResult;

/// Attempts used for CocoaPods operations
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Pause between CocoaPods attempts
pub const DEFAULT_DELAY_MS: u64 = 10_000;

/// How many times to try and how long to wait between tries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Policy with the delay given in milliseconds
    pub const fn from_millis(max_attempts: u32, delay_ms: u64) -> Self {
        Self::new(max_attempts, Duration::from_millis(delay_ms))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_millis(DEFAULT_ATTEMPTS, DEFAULT_DELAY_MS)
    }
}

/// Run `action` until it succeeds or `policy.max_attempts` is reached.
///
/// `action` receives the 1-based attempt number. Every failure is logged;
/// the delay is applied between attempts, never after the last one. When all
/// attempts fail the error of the final attempt is returned unchanged. A
/// policy of zero attempts still tries once.
pub fn retry<T, F>(policy: RetryPolicy, label: &str, mut action: F) -> OptikitResult<T>
where
    F: FnMut(u32) -> OptikitResult<T>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match action(attempt) {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => {
                logger::error(format!(
                    "Attempt {}/{} of `{}` failed: {}",
                    attempt, max_attempts, label, e
                ));
                return Err(e);
            }
            Err(e) => {
                logger::warning(format!(
                    "Attempt {}/{} of `{}` failed: {}",
                    attempt, max_attempts, label, e
                ));
                if !policy.delay.is_zero() {
                    logger::info(format!("Retrying in {} ms...", policy.delay.as_millis()));
                    thread::sleep(policy.delay);
                }
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptikitError;

    fn failure(attempt: u32) -> OptikitError {
        OptikitError::CommandFailed {
            command: "pod repo update".into(),
            status: "exit code 1".into(),
            detail: format!("attempt {}", attempt),
        }
    }

    #[test]
    fn test_always_failing_action_runs_max_attempts() {
        let mut calls = 0;
        let result: OptikitResult<()> = retry(RetryPolicy::new(3, Duration::ZERO), "pod", |n| {
            calls += 1;
            Err(failure(n))
        });

        assert_eq!(calls, 3);
        match result {
            Err(OptikitError::CommandFailed { detail, .. }) => assert_eq!(detail, "attempt 3"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_stops_at_first_success() {
        let mut calls = 0;
        let result = retry(RetryPolicy::new(5, Duration::ZERO), "pod", |n| {
            calls += 1;
            if n < 2 {
                Err(failure(n))
            } else {
                Ok("installed")
            }
        });

        assert_eq!(result.unwrap(), "installed");
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let mut calls = 0;
        let result: OptikitResult<()> = retry(RetryPolicy::new(0, Duration::ZERO), "pod", |n| {
            calls += 1;
            Err(failure(n))
        });

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_delay_applied_between_attempts_only() {
        let delay = Duration::from_millis(20);
        let start = std::time::Instant::now();
        let _: OptikitResult<()> = retry(RetryPolicy::new(3, delay), "pod", |n| Err(failure(n)));

        // Two pauses for three attempts.
        assert!(start.elapsed() >= delay * 2);
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(10));
    }
}
