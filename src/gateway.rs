use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::asr::{AssemblyAiClient, Transcriber};
use crate::config::Config;
use crate::error::{GatewayError, GatewayResult};
use crate::model_service::{HealthResponse, ModelServiceClient};
use crate::pos::{PosClient, PosTagger, PosToken};
use crate::sentiment::{OverallSentiment, SentimentAnalyzer, SentimentClient, SentimentScores};
use crate::summarize::{SummarizeClient, Summarizer};
use crate::translate::{TranslateClient, Translator};

/// Capability handles built once at startup; `None` means initialization failed
#[derive(Default, Clone)]
pub struct ModelGateway {
    pub translator: Option<Arc<dyn Translator>>,
    pub pos_tagger: Option<Arc<dyn PosTagger>>,
    pub sentiment: Option<Arc<dyn SentimentAnalyzer>>,
    pub summarizer: Option<Arc<dyn Summarizer>>,
    pub transcriber: Option<Arc<dyn Transcriber>>,
}

/// Static initialization flags reported by `/health`
#[derive(Debug, Clone, Serialize)]
pub struct InitStatus {
    pub translation: bool,
    pub pos: bool,
    pub sentiment: bool,
    pub summarization: bool,
    pub transcription: bool,
    pub initialized_at: DateTime<Utc>,
}

fn available<T: ?Sized>(handle: &Option<Arc<T>>) -> GatewayResult<&T> {
    handle.as_deref().ok_or(GatewayError::ModelUnavailable)
}

impl ModelGateway {
    /// Probe the model service and build every capability it reports as loaded
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let service = Arc::new(ModelServiceClient::new(
            config.model_service.base_url.clone(),
            config.model_service.timeout(),
        )?);

        let health = match service.health_check().await {
            Ok(health) => health,
            Err(e) => {
                error!(
                    "Model service at {} is unreachable, model capabilities disabled: {}",
                    config.model_service.base_url, e
                );
                HealthResponse::default()
            }
        };

        let mut gateway = Self::default();

        if health.is_loaded("translation") {
            gateway.translator = Some(Arc::new(TranslateClient::new(service.clone())));
        } else {
            error!("Failed to initialize translation model");
        }

        if health.is_loaded("pos") {
            gateway.pos_tagger = Some(Arc::new(PosClient::new(
                service.clone(),
                config.translation.target_lang.clone(),
            )));
        } else {
            error!("Failed to initialize POS tagging pipeline");
        }

        if health.is_loaded("sentiment") {
            gateway.sentiment = Some(Arc::new(SentimentClient::new(
                service.clone(),
                config.sentiment.neutral_rule,
            )));
        } else {
            error!("Failed to initialize sentiment classifier");
        }

        if health.is_loaded("summarization") {
            gateway.summarizer = Some(Arc::new(SummarizeClient::new(
                service.clone(),
                &config.summarization,
            )));
        } else {
            error!("Failed to initialize summarization pipeline");
        }

        match config.transcription.resolved_api_key() {
            Some(key) => {
                gateway.transcriber = Some(Arc::new(AssemblyAiClient::new(&config.transcription, key)?));
            }
            None => warn!("No transcription API key configured, /process_audio is disabled"),
        }

        info!("Model gateway initialized: {:?}", gateway.status());
        Ok(gateway)
    }

    pub fn status(&self) -> InitStatus {
        InitStatus {
            translation: self.translator.is_some(),
            pos: self.pos_tagger.is_some(),
            sentiment: self.sentiment.is_some(),
            summarization: self.summarizer.is_some(),
            transcription: self.transcriber.is_some(),
            initialized_at: Utc::now(),
        }
    }

    /// Translation and POS tagging both loaded, required by the core endpoints
    pub fn core_ready(&self) -> bool {
        self.translator.is_some() && self.pos_tagger.is_some()
    }

    pub fn translator(&self) -> GatewayResult<&dyn Translator> {
        available(&self.translator)
    }

    pub async fn translate(&self, text: &str, source: &str, target: &str) -> GatewayResult<String> {
        self.translator()?.translate(text, source, target).await
    }

    pub async fn tag_part_of_speech(&self, text: &str) -> GatewayResult<Vec<PosToken>> {
        available(&self.pos_tagger)?.tag(text).await
    }

    pub async fn analyze_sentiment(&self, text: &str) -> GatewayResult<(SentimentScores, OverallSentiment)> {
        available(&self.sentiment)?.analyze(text).await
    }

    pub async fn summarize(&self, text: &str) -> GatewayResult<String> {
        available(&self.summarizer)?.summarize(text).await
    }

    pub async fn transcribe(&self, audio: Vec<u8>, cancel: CancellationToken) -> GatewayResult<String> {
        available(&self.transcriber)?.transcribe(audio, cancel).await
    }
}
