use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use reqwest::Client;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::TranscriptionConfig;
use crate::error::{GatewayError, GatewayResult};
use super::interface::Transcriber;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptJob {
    id: String,
    status: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the AssemblyAI v2 REST protocol: upload, submit, poll
pub struct AssemblyAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    poll_interval: Duration,
    max_wait: Duration,
}

impl AssemblyAiClient {
    pub fn new(config: &TranscriptionConfig, api_key: impl Into<String>) -> GatewayResult<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            poll_interval: config.poll_interval(),
            max_wait: config.max_wait(),
        })
    }

    async fn upload(&self, audio: Vec<u8>) -> GatewayResult<String> {
        let url = format!("{}/v2/upload", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("authorization", &self.api_key)
            .body(audio)
            .send()
            .await?
            .error_for_status()?;
        let body: UploadResponse = response.json().await?;
        Ok(body.upload_url)
    }

    async fn submit(&self, audio_url: &str) -> GatewayResult<String> {
        let url = format!("{}/v2/transcript", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("authorization", &self.api_key)
            .json(&serde_json::json!({ "audio_url": audio_url }))
            .send()
            .await?
            .error_for_status()?;
        let job: TranscriptJob = response.json().await?;
        Ok(job.id)
    }

    async fn fetch(&self, id: &str) -> GatewayResult<TranscriptJob> {
        let url = format!("{}/v2/transcript/{}", self.base_url, id);
        let response = self
            .client
            .get(&url)
            .header("authorization", &self.api_key)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn wait_for_completion(&self, id: &str, cancel: &CancellationToken) -> GatewayResult<String> {
        // A wait too long to represent as an Instant never expires
        let deadline = Instant::now().checked_add(self.max_wait);

        loop {
            let job = self.fetch(id).await?;
            match job.status.as_str() {
                "completed" => return Ok(job.text.unwrap_or_default()),
                "failed" => {
                    warn!("Transcription job {} failed: {:?}", id, job.error);
                    return Err(GatewayError::Transcription("Transcription failed.".to_string()));
                }
                status => debug!("Transcription job {} is {}", id, status),
            }

            let next_poll = Instant::now().checked_add(self.poll_interval);
            if deadline.is_some_and(|deadline| next_poll.map_or(true, |next| next > deadline)) {
                return Err(GatewayError::Transcription(format!(
                    "Transcription timed out after {}s",
                    self.max_wait.as_secs()
                )));
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(GatewayError::Transcription("Transcription cancelled".to_string()));
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }
}

#[async_trait]
impl Transcriber for AssemblyAiClient {
    async fn transcribe(&self, audio: Vec<u8>, cancel: CancellationToken) -> GatewayResult<String> {
        let audio_url = self.upload(audio).await?;
        let id = self.submit(&audio_url).await?;
        info!("Submitted transcription job {}", id);
        self.wait_for_completion(&id, &cancel).await
    }
}
