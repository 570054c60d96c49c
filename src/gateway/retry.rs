//! Retry policy for transient upstream failures.
//!
//! Only two failure classes are retried:
//!
//! | Upstream answer | Delay before the next attempt |
//! |-----------------|-------------------------------|
//! | 429 with `Retry-After: n` | exactly `n` seconds |
//! | 429 without the header | [`RetryPolicy::default_retry_after`] |
//! | 503 | [`RetryPolicy::unavailable_delay`] |
//!
//! Everything else, including timeouts and connection failures, is returned
//! to the caller on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::GatewayError;
use crate::rate_limit::{BucketKey, BucketRateLimiter};

/// Bounded retry policy applied to one logical upstream call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Delay after a 503.
    pub unavailable_delay: Duration,
    /// Delay after a 429 that carried no `Retry-After` header.
    pub default_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            unavailable_delay: Duration::from_secs(2),
            default_retry_after: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay to wait before retrying after `error`, or `None` if it is not retryable.
    pub fn backoff_for(&self, error: &GatewayError) -> Option<Duration> {
        if !error.is_transient() {
            return None;
        }
        match error {
            GatewayError::RateLimitExceeded { retry_after_secs } => Some(
                retry_after_secs
                    .map(Duration::from_secs)
                    .unwrap_or(self.default_retry_after),
            ),
            GatewayError::ServiceUnavailable => Some(self.unavailable_delay),
            _ => None,
        }
    }

    /// Run `attempt` under this policy.
    ///
    /// Every attempt, the first included, is a fresh admission on `bucket`:
    /// the limiter is consulted before each call.
    pub async fn run<T, F, Fut>(
        &self,
        limiter: &BucketRateLimiter,
        bucket: &BucketKey,
        mut attempt: F,
    ) -> Result<T, GatewayError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        let mut retries_left = self.max_retries;
        loop {
            limiter.admit(bucket).await;

            let error = match attempt().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            let Some(delay) = self.backoff_for(&error) else {
                return Err(error);
            };
            if retries_left == 0 {
                tracing::warn!("Retries exhausted on bucket {}: {}", bucket, error);
                return Err(error);
            }
            retries_left -= 1;

            tracing::info!(
                "{} on bucket {}, retrying in {:?} ({} retries left)",
                error,
                bucket,
                delay,
                retries_left
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::rate_limit::RateLimitConfig;
    use std::sync::Mutex;
    use tokio::time::Instant;

    fn limiter() -> BucketRateLimiter {
        BucketRateLimiter::new(RateLimitConfig::disabled())
    }

    /// Replays `outcomes` in order and records when each attempt started.
    struct Script {
        outcomes: Mutex<Vec<Result<u32, GatewayError>>>,
        started: Mutex<Vec<Instant>>,
    }

    impl Script {
        fn new(mut outcomes: Vec<Result<u32, GatewayError>>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: Mutex::new(outcomes),
                started: Mutex::new(Vec::new()),
            }
        }

        async fn call(&self) -> Result<u32, GatewayError> {
            self.started.lock().unwrap().push(Instant::now());
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(GatewayError::InvalidResponse("script exhausted".into())))
        }

        fn attempts(&self) -> Vec<Instant> {
            self.started.lock().unwrap().clone()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_is_honoured() {
        let script = Script::new(vec![
            Err(GatewayError::RateLimitExceeded {
                retry_after_secs: Some(3),
            }),
            Ok(7),
        ]);
        let bucket = BucketKey::named("test");

        let value = RetryPolicy::default()
            .run(&limiter(), &bucket, || script.call())
            .await
            .unwrap();

        assert_eq!(value, 7);
        let attempts = script.attempts();
        assert_eq!(attempts.len(), 2);
        assert!(attempts[1] - attempts[0] >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_retry_after_uses_default() {
        let script = Script::new(vec![
            Err(GatewayError::RateLimitExceeded {
                retry_after_secs: None,
            }),
            Ok(1),
        ]);
        let bucket = BucketKey::named("test");

        RetryPolicy::default()
            .run(&limiter(), &bucket, || script.call())
            .await
            .unwrap();

        let attempts = script.attempts();
        let gap = attempts[1] - attempts[0];
        assert!(gap >= Duration::from_secs(5));
        assert!(gap < Duration::from_millis(5_100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_uses_fixed_delay() {
        let script = Script::new(vec![Err(GatewayError::ServiceUnavailable), Ok(2)]);
        let bucket = BucketKey::named("test");

        let value = RetryPolicy::default()
            .run(&limiter(), &bucket, || script.call())
            .await
            .unwrap();

        assert_eq!(value, 2);
        let attempts = script.attempts();
        let gap = attempts[1] - attempts[0];
        assert!(gap >= Duration::from_secs(2));
        assert!(gap < Duration::from_millis(2_100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhaustion() {
        let script = Script::new(vec![
            Err(GatewayError::ServiceUnavailable),
            Err(GatewayError::ServiceUnavailable),
            Err(GatewayError::ServiceUnavailable),
            Err(GatewayError::ServiceUnavailable),
            Ok(99),
        ]);
        let bucket = BucketKey::named("test");

        let err = RetryPolicy::default()
            .run(&limiter(), &bucket, || script.call())
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::ServiceUnavailable));
        assert_eq!(script.attempts().len(), 4);
    }

    #[test]
    fn test_backoff_matches_transient_classification() {
        let policy = RetryPolicy::default();
        let errors = vec![
            GatewayError::RateLimitExceeded {
                retry_after_secs: Some(1),
            },
            GatewayError::RateLimitExceeded {
                retry_after_secs: None,
            },
            GatewayError::ServiceUnavailable,
            GatewayError::Timeout,
            GatewayError::Api(ApiError::new(404, "Data not found")),
            GatewayError::InvalidArgument("Missing required parameter: puuid".to_string()),
            GatewayError::InvalidResponse("Empty version list".to_string()),
            GatewayError::MissingApiKey,
            GatewayError::GatewayClosed,
            GatewayError::RequestDropped,
        ];

        for error in &errors {
            assert_eq!(
                policy.backoff_for(error).is_some(),
                error.is_transient(),
                "{error}"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_errors_are_not_retried() {
        let script = Script::new(vec![
            Err(GatewayError::Api(ApiError::new(404, "Data not found"))),
            Ok(1),
        ]);
        let bucket = BucketKey::named("test");

        let err = RetryPolicy::default()
            .run(&limiter(), &bucket, || script.call())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(script.attempts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_are_not_retried() {
        let script = Script::new(vec![Err(GatewayError::Timeout), Ok(1)]);
        let bucket = BucketKey::named("test");

        let err = RetryPolicy::default()
            .run(&limiter(), &bucket, || script.call())
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Timeout));
        assert_eq!(script.attempts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_attempt_is_admitted() {
        let limiter = BucketRateLimiter::new(RateLimitConfig {
            short_limit: 1,
            ..RateLimitConfig::default()
        });
        let script = Script::new(vec![
            Err(GatewayError::RateLimitExceeded {
                retry_after_secs: Some(0),
            }),
            Ok(3),
        ]);
        let bucket = BucketKey::named("test");

        RetryPolicy::default()
            .run(&limiter, &bucket, || script.call())
            .await
            .unwrap();

        let attempts = script.attempts();
        assert!(attempts[1] - attempts[0] >= Duration::from_secs(1));
    }
}
