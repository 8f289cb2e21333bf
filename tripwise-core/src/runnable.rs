use async_trait::async_trait;

use crate::TripwiseError;

/// A single asynchronous unit of work: an LLM call, a parser, a retrieval.
#[async_trait]
pub trait Runnable<Input: Send + 'static, Output: Send + 'static>: Send + Sync {
    async fn invoke(&self, input: Input) -> Result<Output, TripwiseError>;
}

#[async_trait]
impl<Input, Output, R> Runnable<Input, Output> for std::sync::Arc<R>
where
    Input: Send + 'static,
    Output: Send + 'static,
    R: Runnable<Input, Output> + ?Sized,
{
    async fn invoke(&self, input: Input) -> Result<Output, TripwiseError> {
        (**self).invoke(input).await
    }
}
