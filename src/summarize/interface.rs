use async_trait::async_trait;

use crate::error::GatewayResult;

/// Abstractive summarization capability
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Fails with `GatewayError::Summarization` when the input does not fit the length bounds
    async fn summarize(&self, text: &str) -> GatewayResult<String>;
}
