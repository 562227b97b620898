use async_trait::async_trait;

use crate::error::GatewayResult;

/// Translation capability
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source_lang` to `target_lang`.
    ///
    /// Blank input yields an empty string without reaching the model.
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> GatewayResult<String>;
}
