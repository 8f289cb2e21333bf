use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::{Runnable, SimilaritySearch, TripwiseError};

/// Bounded timeout per attempt plus a fixed number of attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, timeout: Option<Duration>) -> Self {
        Self {
            max_attempts,
            timeout,
        }
    }

    /// One attempt, no timeout.
    pub fn none() -> Self {
        Self::new(1, None)
    }

    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, TripwiseError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, TripwiseError>> + Send,
        T: Send,
    {
        if self.max_attempts == 0 {
            return Err(TripwiseError::MaxRetriesExceeded {
                max: 0,
                last: "no attempts allowed".to_string(),
            });
        }

        let mut attempt = 1;
        loop {
            let result = match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, operation()).await {
                    Ok(result) => result,
                    Err(_) => Err(TripwiseError::Timeout(limit)),
                },
                None => operation().await,
            };

            let error = match result {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !is_retryable(&error) {
                return Err(error);
            }
            if attempt >= self.max_attempts {
                if self.max_attempts == 1 {
                    return Err(error);
                }
                return Err(TripwiseError::MaxRetriesExceeded {
                    max: self.max_attempts,
                    last: error.to_string(),
                });
            }

            tracing::warn!(attempt, max = self.max_attempts, error = %error, "retrying external call");
            attempt += 1;
        }
    }
}

/// Transport and provider failures are worth a second try; malformed output is not.
pub fn is_retryable(error: &TripwiseError) -> bool {
    matches!(
        error,
        TripwiseError::LlmProvider(_)
            | TripwiseError::Retrieval(_)
            | TripwiseError::ExternalService(_)
            | TripwiseError::Timeout(_)
    )
}

pub struct Retrying<R> {
    inner: R,
    policy: RetryPolicy,
}

impl<R> Retrying<R> {
    pub fn new(inner: R, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

#[async_trait]
impl<Input, Output, R> Runnable<Input, Output> for Retrying<R>
where
    Input: Send + Sync + Clone + 'static,
    Output: Send + 'static,
    R: Runnable<Input, Output>,
{
    async fn invoke(&self, input: Input) -> Result<Output, TripwiseError> {
        self.policy
            .run(|| self.inner.invoke(input.clone()))
            .await
    }
}

#[async_trait]
impl<S> SimilaritySearch for Retrying<S>
where
    S: SimilaritySearch,
{
    async fn search(&self, query: &str, k: usize) -> Result<Vec<String>, TripwiseError> {
        self.policy.run(|| self.inner.search(query, k)).await
    }
}
