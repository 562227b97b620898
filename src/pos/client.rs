use async_trait::async_trait;
use std::sync::Arc;
use tracing::error;

use crate::error::{GatewayError, GatewayResult};
use crate::model_service::{ModelServiceClient, PosRequest};
use super::interface::{PosTagger, PosToken};

pub struct PosClient {
    model_service: Arc<ModelServiceClient>,
    lang: String,
}

impl PosClient {
    pub fn new(model_service: Arc<ModelServiceClient>, lang: impl Into<String>) -> Self {
        Self {
            model_service,
            lang: lang.into(),
        }
    }
}

#[async_trait]
impl PosTagger for PosClient {
    async fn tag(&self, text: &str) -> GatewayResult<Vec<PosToken>> {
        let request = PosRequest {
            text: text.to_string(),
            lang: self.lang.clone(),
        };

        let response = match self.model_service.pos_tag(&request).await {
            Ok(Ok(response)) => response,
            Ok(Err(failure)) => {
                error!("POS tagging failed ({}): {}", failure.status, failure.message);
                return Err(GatewayError::PosTagging(failure.message));
            }
            Err(e) => return Err(GatewayError::PosTagging(e.to_string())),
        };

        Ok(response
            .tokens
            .into_iter()
            .map(|t| PosToken { token: t.token, pos: t.pos })
            .collect())
    }
}
