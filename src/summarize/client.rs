use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, warn};

use crate::config::SummarizationConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::model_service::{ModelServiceClient, SummarizeRequest};
use super::interface::Summarizer;

pub struct SummarizeClient {
    model_service: Arc<ModelServiceClient>,
    min_length: u32,
    max_length: u32,
}

impl SummarizeClient {
    pub fn new(model_service: Arc<ModelServiceClient>, config: &SummarizationConfig) -> Self {
        Self {
            model_service,
            min_length: config.min_length,
            max_length: config.max_length,
        }
    }
}

#[async_trait]
impl Summarizer for SummarizeClient {
    async fn summarize(&self, text: &str) -> GatewayResult<String> {
        let request = SummarizeRequest {
            text: text.to_string(),
            min_length: self.min_length,
            max_length: self.max_length,
        };

        match self.model_service.summarize(&request).await? {
            Ok(response) => Ok(response.summary_text),
            Err(failure) if failure.status.is_client_error() => {
                warn!("Summarizer rejected input: {}", failure.message);
                Err(GatewayError::Summarization(failure.message))
            }
            Err(failure) => {
                error!("Summarization failed ({}): {}", failure.status, failure.message);
                Err(GatewayError::ModelService(failure.message))
            }
        }
    }
}
