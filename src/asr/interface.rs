use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::GatewayResult;

/// Speech-to-text capability
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe raw audio bytes; gives up when `cancel` fires
    async fn transcribe(&self, audio: Vec<u8>, cancel: CancellationToken) -> GatewayResult<String>;
}
