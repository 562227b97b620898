use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use crate::error::{GatewayError, GatewayResult};
use crate::model_service::{ModelServiceClient, TranslateRequest};
use super::interface::Translator;

/// Translator backed by the model service
pub struct TranslateClient {
    model_service: Arc<ModelServiceClient>,
}

impl TranslateClient {
    pub fn new(model_service: Arc<ModelServiceClient>) -> Self {
        Self { model_service }
    }
}

#[async_trait]
impl Translator for TranslateClient {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> GatewayResult<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let request = TranslateRequest {
            text: text.to_string(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
        };

        match self.model_service.translate(&request).await {
            Ok(Ok(response)) => {
                debug!("Translated '{}' to '{}'", text, response.translated_text);
                Ok(response.translated_text)
            }
            Ok(Err(failure)) => {
                error!("Translation failed ({}): {}", failure.status, failure.message);
                Err(GatewayError::Translation(failure.message))
            }
            Err(e) => {
                error!("Translation request failed: {}", e);
                Err(GatewayError::Translation(e.to_string()))
            }
        }
    }
}
