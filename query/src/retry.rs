use std::future::Future;
use std::time::Duration;

use crate::error::AppError;
use crate::util::sleep;

/// Run `operation`, retrying failures with exponential backoff.
///
/// Makes at most `max_retries + 1` attempts. The delay before retry *n*
/// (zero-indexed) is `base_delay * 2^n`, strictly doubling. Once attempts are
/// exhausted the last error is returned unmodified.
///
/// Every failure is retried identically: no jitter, no circuit breaking, no
/// classification by error kind. Callers that need a single attempt pass
/// `max_retries = 0`.
pub async fn with_retry<T, Fu>(
    operation: impl Fn() -> Fu,
    max_retries: u32,
    base_delay: Duration,
) -> Result<T, AppError>
where
    Fu: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt >= max_retries {
                    return Err(error);
                }
                sleep(backoff_delay(base_delay, attempt)).await;
                attempt += 1;
            }
        }
    }
}

/// Delay before the retry that follows failed attempt `attempt` (zero-indexed).
///
/// Saturates at `Duration::MAX` instead of overflowing.
pub fn backoff_delay(base_delay: Duration, attempt: u32) -> Duration {
    base_delay
        .checked_mul(2u32.saturating_pow(attempt))
        .unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn failing_op(calls: Rc<Cell<u32>>) -> impl Fn() -> std::pin::Pin<Box<dyn Future<Output = Result<u32, AppError>>>> {
        move || {
            let calls = calls.clone();
            Box::pin(async move {
                calls.set(calls.get() + 1);
                Err(AppError::server("boom", 500))
            })
        }
    }

    #[tokio::test]
    async fn exhausts_after_max_retries_plus_one_attempts() {
        let calls = Rc::new(Cell::new(0));
        let result = with_retry(failing_op(calls.clone()), 3, Duration::from_millis(1)).await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 4, "3 retries means 4 attempts in total");
    }

    #[tokio::test]
    async fn returns_last_error_unmodified() {
        let result: Result<u32, AppError> = with_retry(
            || async { Err(AppError::server("boom", 503)) },
            1,
            Duration::from_millis(1),
        )
        .await;

        let error = result.expect_err("operation always fails");
        assert_eq!(error.message, "boom");
        assert_eq!(error.code, Some(crate::error::ErrorCode::Status(503)));
    }

    #[tokio::test]
    async fn succeeds_on_third_attempt() {
        let calls = Rc::new(Cell::new(0u32));
        let result = with_retry(
            {
                let calls = calls.clone();
                move || {
                    let calls = calls.clone();
                    async move {
                        calls.set(calls.get() + 1);
                        if calls.get() < 3 {
                            Err(AppError::network("offline"))
                        } else {
                            Ok(calls.get())
                        }
                    }
                }
            },
            3,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(result.ok(), Some(3), "should resolve with the 3rd call's result");
        assert_eq!(calls.get(), 3, "exactly 2 failed attempts precede the success");
    }

    #[tokio::test]
    async fn zero_retries_is_a_single_attempt() {
        let calls = Rc::new(Cell::new(0));
        let _ = with_retry(failing_op(calls.clone()), 0, Duration::from_millis(1)).await;
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let base = Duration::from_millis(100);
        assert_eq!(backoff_delay(base, 0), Duration::from_millis(100));
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(200));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(400));
    }

    #[test]
    fn backoff_saturates_instead_of_overflowing() {
        assert_eq!(backoff_delay(Duration::MAX, 40), Duration::MAX);
    }
}
