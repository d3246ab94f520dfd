//! Retry with exponential back-off and jitter for extraction service calls.

use std::future::Future;
use std::time::Duration;

use crate::error::BackendError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// Network failures, 429, and 5xx responses are transient. Authentication and
/// request errors (other 4xx), undecodable bodies, and empty completions are not.
pub(crate) fn is_retriable(err: &BackendError) -> bool {
    match err {
        BackendError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        BackendError::RateLimited { .. } => true,
        BackendError::Status { status, .. } => *status >= 500,
        BackendError::Deserialize { .. } | BackendError::EmptyCompletion => false,
    }
}

/// Milliseconds to wait before retry number `attempt` (1-based).
///
/// `backoff_base_ms * 2^(attempt-1)` with ±25 % jitter, capped at 60 s, and
/// never less than a server-provided `Retry-After`.
fn backoff_delay_ms(backoff_base_ms: u64, attempt: u32, err: &BackendError) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    let floor_ms = match err {
        BackendError::RateLimited { retry_after_secs } => retry_after_secs.saturating_mul(1000),
        _ => 0,
    };
    jittered.max(floor_ms)
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// See [`backoff_delay_ms`] for the wait between attempts.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, BackendError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
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
                let delay_ms = backoff_delay_ms(backoff_base_ms, attempt, &err);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "extraction service transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
