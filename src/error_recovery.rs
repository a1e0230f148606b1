// src/error_recovery.rs
//! Retry with exponential backoff and per-call deadlines for network operations.

use crate::constants::{NETWORK_RETRY_ATTEMPTS, NETWORK_RETRY_MAX_DELAY_MS};
use crate::error::AppError;
use std::future::Future;
use std::time::Duration;

/// Retries an async operation with exponential backoff.
///
/// Only errors for which `AppError::is_retryable` holds are retried; anything
/// else is returned on the first failure.
pub async fn retry_with_backoff<F, T, Fut>(
    mut operation: F,
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut delay = initial_delay;
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                if attempt < max_attempts {
                    log::warn!(
                        "Attempt {} failed ({}), retrying after {:?}",
                        attempt,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, max_delay);
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| AppError::InternalError {
        message: "Retry failed with no error".to_string(),
    }))
}

/// Outer deadline that leaves room for every retried attempt of a call whose
/// attempts are each bounded by `per_attempt`.
pub fn retry_budget(per_attempt: Duration) -> Duration {
    per_attempt * NETWORK_RETRY_ATTEMPTS + Duration::from_millis(NETWORK_RETRY_MAX_DELAY_MS)
}

/// Bounds a network call with a deadline; expiry becomes `AppError::Timeout`.
pub async fn with_timeout<T, Fut>(
    operation: &str,
    after: Duration,
    future: Fut,
) -> Result<T, AppError>
where
    Fut: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(after, future).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout {
            operation: operation.to_string(),
            after,
        }),
    }
}
