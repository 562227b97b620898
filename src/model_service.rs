use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::GatewayResult;

/// HTTP client for the Python inference sidecar
#[derive(Debug, Clone)]
pub struct ModelServiceClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PosRequest {
    pub text: String,
    pub lang: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PosResponse {
    pub tokens: Vec<PosTokenWire>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PosTokenWire {
    pub token: String,
    pub pos: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SentimentRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SentimentResponse {
    pub scores: Vec<LabelScore>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
    pub min_length: u32,
    pub max_length: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary_text: String,
}

/// Which models the sidecar managed to load
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub models: HashMap<String, bool>,
}

impl HealthResponse {
    pub fn is_loaded(&self, model: &str) -> bool {
        self.models.get(model).copied().unwrap_or(false)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Non-success reply from the sidecar
#[derive(Debug)]
pub struct ServiceFailure {
    pub status: StatusCode,
    pub message: String,
}

impl ModelServiceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> GatewayResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn translate(&self, request: &TranslateRequest) -> GatewayResult<Result<TranslateResponse, ServiceFailure>> {
        self.post("translate", request).await
    }

    pub async fn pos_tag(&self, request: &PosRequest) -> GatewayResult<Result<PosResponse, ServiceFailure>> {
        self.post("pos", request).await
    }

    pub async fn sentiment(&self, request: &SentimentRequest) -> GatewayResult<Result<SentimentResponse, ServiceFailure>> {
        self.post("sentiment", request).await
    }

    pub async fn summarize(&self, request: &SummarizeRequest) -> GatewayResult<Result<SummarizeResponse, ServiceFailure>> {
        self.post("summarize", request).await
    }

    pub async fn health_check(&self) -> GatewayResult<HealthResponse> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// POST a JSON body; transport errors are the outer error, service-reported failures the inner one
    async fn post<Req, Resp>(&self, endpoint: &str, request: &Req) -> GatewayResult<Result<Resp, ServiceFailure>>
    where
        Req: Serialize + ?Sized,
        Resp: for<'de> Deserialize<'de>,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(Ok(response.json().await?));
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        debug!("Model service {} returned {}: {}", endpoint, status, message);
        Ok(Err(ServiceFailure { status, message }))
    }
}
