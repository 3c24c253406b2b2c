use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

/// Exponential backoff policy for one publish call
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(1000),
            multiplier: 2.0,
            max_delay: Duration::from_millis(30_000),
            max_attempts: 5,
        }
    }
}

/// Delay to wait after `completed_failures` failed attempts:
/// initial * multiplier^n, capped at the policy maximum.
pub fn backoff_delay(policy: &RetryPolicy, completed_failures: u32) -> Duration {
    let initial_ms = policy.initial_delay.as_millis() as f64;
    let max_ms = policy.max_delay.as_millis() as f64;
    let delay_ms = initial_ms * policy.multiplier.powi(completed_failures as i32);

    Duration::from_millis(delay_ms.min(max_ms) as u64)
}

/// Invoke `op` up to `max_attempts` times, sleeping the computed backoff
/// between attempts. Exhaustion re-raises the final error unmodified.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut failures = 0;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                failures += 1;
                if failures >= max_attempts {
                    warn!(
                        attempts = failures,
                        error = %error,
                        "❌ Retries exhausted"
                    );
                    return Err(error);
                }

                let delay = backoff_delay(policy, failures - 1);
                debug!(
                    attempt = failures,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "🔄 Attempt failed, backing off before retry"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
