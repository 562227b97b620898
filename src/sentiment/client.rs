use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use crate::config::NeutralRule;
use crate::error::{GatewayError, GatewayResult};
use crate::model_service::{ModelServiceClient, SentimentRequest};
use super::interface::{overall_sentiment, OverallSentiment, SentimentAnalyzer, SentimentScores};

pub struct SentimentClient {
    model_service: Arc<ModelServiceClient>,
    neutral_rule: NeutralRule,
}

impl SentimentClient {
    pub fn new(model_service: Arc<ModelServiceClient>, neutral_rule: NeutralRule) -> Self {
        Self {
            model_service,
            neutral_rule,
        }
    }
}

#[async_trait]
impl SentimentAnalyzer for SentimentClient {
    async fn analyze(&self, text: &str) -> GatewayResult<(SentimentScores, OverallSentiment)> {
        let request = SentimentRequest { text: text.to_string() };

        let response = match self.model_service.sentiment(&request).await {
            Ok(Ok(response)) => response,
            Ok(Err(failure)) => {
                error!("Sentiment analysis failed ({}): {}", failure.status, failure.message);
                return Err(GatewayError::Sentiment(failure.message));
            }
            Err(e) => return Err(GatewayError::Sentiment(e.to_string())),
        };

        let scores = SentimentScores::from_labels(
            response.scores.iter().map(|s| (s.label.as_str(), s.score)),
        );
        let overall = overall_sentiment(&scores, self.neutral_rule);
        debug!("Sentiment scores: {:?}, overall: {:?}", scores, overall);
        Ok((scores, overall))
    }
}
