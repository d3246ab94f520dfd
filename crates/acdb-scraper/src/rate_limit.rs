//! Retry with exponential backoff for lookup page requests.
//!
//! Transient failures (429, 5xx, network errors) are retried; a missing page or
//! a client error is returned immediately because retrying yields the same answer.

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

/// Upper bound on a single backoff sleep.
const MAX_DELAY_SECS: u64 = 300;

/// Returns `true` if `err` is worth retrying after a backoff delay.
///
/// Retriable: [`FetchError::RateLimited`], [`FetchError::Http`], and
/// [`FetchError::UnexpectedStatus`] with a 5xx status.
fn is_retriable(err: &FetchError) -> bool {
    match err {
        FetchError::RateLimited { .. } | FetchError::Http(_) => true,
        FetchError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        FetchError::NotFound { .. } | FetchError::EmptyPage { .. } | FetchError::InvalidUrl { .. } => {
            false
        }
    }
}

/// Seconds to wait before retry number `attempt` (1-based).
///
/// `backoff_base_secs * 2^(attempt-1)` with ±25 % jitter, never less than a
/// server-provided `Retry-After`, capped at [`MAX_DELAY_SECS`].
fn backoff_delay(backoff_base_secs: u64, attempt: u32, err: &FetchError) -> Duration {
    let computed = backoff_base_secs.saturating_mul(1u64 << (attempt - 1).min(20));
    let floor = match err {
        FetchError::RateLimited {
            retry_after_secs, ..
        } => *retry_after_secs,
        _ => 0,
    };
    let capped = computed.max(floor).min(MAX_DELAY_SECS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let delay_ms = (capped as f64 * 1000.0 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    Duration::from_millis(delay_ms)
}

/// Executes `operation`, retrying transient errors up to `max_retries` extra times.
///
/// With `max_retries = 3` the operation is attempted at most 4 times. Non-retriable
/// errors are returned immediately; after the last retry the last error is returned.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay = backoff_delay(backoff_base_secs, attempt, &err);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient lookup error, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
