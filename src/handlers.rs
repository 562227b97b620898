use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{ApiError, GatewayError, GatewayResult};
use crate::keywords::{extract_and_translate_keywords, Keyword};
use crate::pos::PosToken;
use crate::sentiment::{OverallSentiment, SentimentScores};
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Text fields accepted by the JSON endpoints
#[derive(Debug, Default)]
pub struct TextRequest {
    pub text: String,
    pub text1: String,
    pub text2: String,
}

impl TextRequest {
    /// Reject bodies that are absent, not JSON, or not an object; trims every field
    fn parse(payload: Option<Json<Value>>) -> Result<Self, ApiError> {
        let object = match payload {
            Some(Json(Value::Object(object))) if !object.is_empty() => object,
            _ => return Err(ApiError::BadRequest("Invalid or empty JSON payload")),
        };
        let field = |name: &str| {
            object
                .get(name)
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };
        Ok(Self {
            text: field("text"),
            text1: field("text1"),
            text2: field("text2"),
        })
    }

    fn require_text(self) -> Result<String, ApiError> {
        if self.text.is_empty() {
            return Err(ApiError::BadRequest("No text provided"));
        }
        Ok(self.text)
    }
}

#[derive(Debug, Serialize)]
pub struct TextAnalysis {
    pub original_text: String,
    pub translated_text: String,
    pub sentiments: SentimentScores,
    pub overall_sentiment: OverallSentiment,
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct AudioAnalysis {
    pub transcript: String,
    pub sentiments: SentimentScores,
    pub overall_sentiment: OverallSentiment,
    pub summary: String,
}

fn ensure_core_ready(state: &AppState) -> Result<(), ApiError> {
    if state.gateway.core_ready() {
        Ok(())
    } else {
        Err(ApiError::internal(GatewayError::ModelUnavailable.to_string()))
    }
}

async fn translate_text(state: &AppState, text: &str) -> Result<String, GatewayError> {
    let lang = &state.config.translation;
    state
        .gateway
        .translate(text, &lang.source_lang, &lang.target_lang)
        .await
}

pub async fn translate(
    State(state): State<AppState>,
    payload: Option<Json<Value>>,
) -> ApiResult<Value> {
    let text = TextRequest::parse(payload)?.require_text()?;
    ensure_core_ready(&state)?;

    let translated_text = translate_text(&state, &text).await.map_err(|e| {
        error!("Translation error: {}", e);
        ApiError::downstream("Translation failed", e)
    })?;
    Ok(Json(json!({ "translated_text": translated_text })))
}

pub async fn pos(
    State(state): State<AppState>,
    payload: Option<Json<Value>>,
) -> ApiResult<Vec<PosToken>> {
    let text = TextRequest::parse(payload)?.require_text()?;
    ensure_core_ready(&state)?;

    let tagged = async {
        let translated = translate_text(&state, &text).await?;
        state.gateway.tag_part_of_speech(&translated).await
    }
    .await
    .map_err(|e| {
        error!("Error during POS tagging: {}", e);
        ApiError::downstream("Could not fetch POS tags", e)
    })?;
    Ok(Json(tagged))
}

pub async fn translate_keywords(
    State(state): State<AppState>,
    payload: Option<Json<Value>>,
) -> ApiResult<Value> {
    let text = TextRequest::parse(payload)?.require_text()?;
    ensure_core_ready(&state)?;

    let translator = state.gateway.translator().map_err(ApiError::from)?;
    let lang = &state.config.translation;
    let keywords: Vec<Keyword> = extract_and_translate_keywords(
        translator,
        &text,
        state.config.keywords.top_n,
        &lang.source_lang,
        &lang.target_lang,
    )
    .await
    .map_err(|e| {
        error!("Error during keyword translation: {}", e);
        ApiError::downstream("Could not process keywords", e)
    })?;
    Ok(Json(json!({ "keywords": keywords })))
}

pub async fn translate_multiple(
    State(state): State<AppState>,
    payload: Option<Json<Value>>,
) -> ApiResult<Value> {
    let request = TextRequest::parse(payload)?;
    if request.text1.is_empty() || request.text2.is_empty() {
        return Err(ApiError::BadRequest("Both text1 and text2 must be provided"));
    }
    ensure_core_ready(&state)?;

    let (translated_text1, translated_text2) = tokio::try_join!(
        translate_text(&state, &request.text1),
        translate_text(&state, &request.text2),
    )
    .map_err(|e| {
        error!("Translation error: {}", e);
        ApiError::downstream("Translation failed", e)
    })?;
    Ok(Json(json!({
        "translated_text1": translated_text1,
        "translated_text2": translated_text2,
    })))
}

/// A rejected summary is reported in place of the summary, any other failure aborts
async fn summary_or_message(state: &AppState, text: &str) -> Result<String, GatewayError> {
    match state.gateway.summarize(text).await {
        Err(GatewayError::Summarization(message)) => Ok(message),
        other => other,
    }
}

pub async fn process_text(
    State(state): State<AppState>,
    payload: Option<Json<Value>>,
) -> ApiResult<TextAnalysis> {
    let text = TextRequest::parse(payload)?.require_text()?;

    let translated_text = translate_text(&state, &text).await?;
    let (sentiments, overall_sentiment) = state.gateway.analyze_sentiment(&text).await?;
    let summary = summary_or_message(&state, &text).await?;

    Ok(Json(TextAnalysis {
        original_text: text,
        translated_text,
        sentiments,
        overall_sentiment,
        summary,
    }))
}

/// Upload stored under the upload directory; `remove` deletes it, drop is the fallback
struct StoredUpload {
    path: Option<PathBuf>,
}

impl StoredUpload {
    async fn save(dir: &str, file_name: &str, data: &[u8]) -> GatewayResult<Self> {
        tokio::fs::create_dir_all(dir).await?;
        let path = Path::new(dir).join(format!("{}-{}", Uuid::new_v4(), sanitize_file_name(file_name)));
        tokio::fs::write(&path, data).await?;
        debug!("Saved upload to {}", path.display());
        Ok(Self { path: Some(path) })
    }

    async fn read(&self) -> GatewayResult<Vec<u8>> {
        match &self.path {
            Some(path) => Ok(tokio::fs::read(path).await?),
            None => Ok(Vec::new()),
        }
    }

    async fn remove(mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!("Failed to remove upload {}: {}", path.display(), e);
            }
        }
    }
}

impl Drop for StoredUpload {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!("Failed to remove upload {}: {}", path.display(), e);
            }
        }
    }
}

/// Keep only the final path component, replacing anything unusual
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

pub async fn process_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<AudioAnalysis> {
    let mut multipart = multipart.map_err(|_| ApiError::BadRequest("No file part in the request"))?;
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await?;
            upload = Some((file_name, data));
            break;
        }
    }

    let (file_name, data) = upload.ok_or(ApiError::BadRequest("No file part in the request"))?;
    if file_name.is_empty() {
        return Err(ApiError::BadRequest("No selected file"));
    }

    let stored = StoredUpload::save(&state.config.system_config.upload_dir, &file_name, &data).await?;
    info!("Processing audio upload {} ({} bytes)", file_name, data.len());
    drop(data);

    let analysis = analyze_upload(&state, &stored).await;
    stored.remove().await;
    Ok(Json(analysis?))
}

async fn analyze_upload(state: &AppState, stored: &StoredUpload) -> GatewayResult<AudioAnalysis> {
    let audio = stored.read().await?;
    let transcript = state
        .gateway
        .transcribe(audio, state.shutdown.child_token())
        .await?;
    let (sentiments, overall_sentiment) = state.gateway.analyze_sentiment(&transcript).await?;
    let summary = summary_or_message(state, &transcript).await?;

    Ok(AudioAnalysis {
        transcript,
        sentiments,
        overall_sentiment,
        summary,
    })
}
