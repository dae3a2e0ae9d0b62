//! Transient-failure retries for the places client.
//!
//! Only transport problems are retried: timeouts, refused connections and
//! HTTP 5xx. A provider status such as `OVER_QUERY_LIMIT` or
//! `REQUEST_DENIED` comes back with HTTP 200 and would fail the same way on
//! every attempt, so it is returned at once.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::PlacesError;

const MAX_DELAY: Duration = Duration::from_secs(30);

pub(crate) fn is_retriable(err: &PlacesError) -> bool {
    let PlacesError::Http(e) = err else {
        return false;
    };
    e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
}

/// Delay before retry number `retry` (1-based): `base × 2^(retry-1)`, capped
/// at 30 s, scaled by a random factor in `[0.75, 1.25]`.
pub(crate) fn backoff_delay(retry: u32, backoff_base_ms: u64) -> Duration {
    let exponent = retry.saturating_sub(1).min(10);
    let nominal = Duration::from_millis(backoff_base_ms.saturating_mul(1 << exponent)).min(MAX_DELAY);
    nominal.mul_f64(rand::rng().random_range(0.75..=1.25))
}

/// Run `operation`, retrying transient failures up to `max_retries` times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, PlacesError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlacesError>>,
{
    let mut retry = 0;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retry == max_retries || !is_retriable(&err) {
            return Err(err);
        }
        retry += 1;

        let delay = backoff_delay(retry, backoff_base_ms);
        tracing::warn!(
            retry,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "transient places API failure, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}
