use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::config::Config;
use crate::handlers;
use crate::state::AppState;

/// Which endpoint sets a handler group mounts
#[derive(Debug, Clone, Copy)]
pub struct HandlerGroup {
    pub welcome: &'static str,
    /// `translate`, `pos`, `translate_keywords`, `translate_multiple`
    pub core: bool,
    /// `process_text`, `process_audio`
    pub processing: bool,
}

impl HandlerGroup {
    pub const PROCESSING: Self = Self {
        welcome: "Welcome to API 1 - Audio and Text Processing!",
        core: true,
        processing: true,
    };

    pub const CORE: Self = Self {
        welcome: "Welcome to API 2 - NLP Services!",
        core: true,
        processing: false,
    };
}

pub fn create_group(group: HandlerGroup, max_upload_bytes: usize) -> Router<AppState> {
    let welcome = group.welcome;
    let mut router = Router::new().route("/", get(move || async move { Json(json!({ "message": welcome })) }));

    if group.core {
        router = router
            .route("/translate", post(handlers::translate))
            .route("/pos", post(handlers::pos))
            .route("/translate_keywords", post(handlers::translate_keywords))
            .route("/translate_multiple", post(handlers::translate_multiple));
    }

    if group.processing {
        router = router
            .route("/process_text", post(handlers::process_text))
            .route(
                "/process_audio",
                post(handlers::process_audio).layer(DefaultBodyLimit::max(max_upload_bytes)),
            );
    }

    router
}

pub fn create_routes(config: &Config) -> Router<AppState> {
    let max_upload_bytes = config.system_config.max_upload_bytes;
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .nest("/api1", create_group(HandlerGroup::PROCESSING, max_upload_bytes))
        .nest("/api2", create_group(HandlerGroup::CORE, max_upload_bytes))
}

async fn home() -> Json<Value> {
    Json(json!({ "message": "Welcome to the unified API server!" }))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "models": state.init_status.as_ref(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    use crate::asr::Transcriber;
    use crate::error::{GatewayError, GatewayResult};
    use crate::gateway::ModelGateway;
    use crate::pos::{PosTagger, PosToken};
    use crate::sentiment::{OverallSentiment, SentimentAnalyzer, SentimentScores};
    use crate::summarize::Summarizer;
    use crate::translate::Translator;

    struct Bracket;

    #[async_trait]
    impl Translator for Bracket {
        async fn translate(&self, text: &str, _: &str, target: &str) -> GatewayResult<String> {
            if text.trim().is_empty() {
                return Ok(String::new());
            }
            if text == "explode" {
                return Err(GatewayError::Translation("generation failed".to_string()));
            }
            Ok(format!("[{}:{}]", target, text))
        }
    }

    struct Whitespace;

    #[async_trait]
    impl PosTagger for Whitespace {
        async fn tag(&self, text: &str) -> GatewayResult<Vec<PosToken>> {
            Ok(text
                .split_whitespace()
                .map(|t| PosToken { token: t.to_string(), pos: "X".to_string() })
                .collect())
        }
    }

    struct Joyful;

    #[async_trait]
    impl SentimentAnalyzer for Joyful {
        async fn analyze(&self, _: &str) -> GatewayResult<(SentimentScores, OverallSentiment)> {
            let scores = SentimentScores { joy: 0.9, ..Default::default() };
            Ok((scores, OverallSentiment::Neutral))
        }
    }

    struct ShortSummary;

    #[async_trait]
    impl Summarizer for ShortSummary {
        async fn summarize(&self, text: &str) -> GatewayResult<String> {
            if text.len() < 10 {
                return Err(GatewayError::Summarization("input too short".to_string()));
            }
            Ok("summary".to_string())
        }
    }

    struct FixedTranscript(Result<&'static str, &'static str>);

    #[async_trait]
    impl Transcriber for FixedTranscript {
        async fn transcribe(&self, _: Vec<u8>, _: CancellationToken) -> GatewayResult<String> {
            self.0
                .map(str::to_string)
                .map_err(|e| GatewayError::Transcription(e.to_string()))
        }
    }

    fn full_gateway(transcript: Result<&'static str, &'static str>) -> ModelGateway {
        ModelGateway {
            translator: Some(Arc::new(Bracket)),
            pos_tagger: Some(Arc::new(Whitespace)),
            sentiment: Some(Arc::new(Joyful)),
            summarizer: Some(Arc::new(ShortSummary)),
            transcriber: Some(Arc::new(FixedTranscript(transcript))),
        }
    }

    fn app_with(gateway: ModelGateway, config: Config) -> Router {
        let routes = create_routes(&config);
        let state = AppState::with_gateway(config, gateway, CancellationToken::new());
        routes.with_state(state)
    }

    fn app() -> Router {
        app_with(full_gateway(Ok("a wonderful recording")), Config::default())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    fn multipart_request(uri: &str, field: &str, file_name: &str, content: &str) -> Request<Body> {
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: audio/wav\r\n\r\n{content}\r\n--{b}--\r\n",
            b = boundary,
        );
        Request::post(uri)
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", boundary))
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn home_and_group_welcome() {
        let (status, body) = send(app(), Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Welcome to the unified API server!");

        let (_, body) = send(app(), Request::get("/api2").body(Body::empty()).unwrap()).await;
        assert_eq!(body["message"], HandlerGroup::CORE.welcome);
    }

    #[tokio::test]
    async fn health_reports_flags() {
        let (status, body) = send(app(), Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["models"]["translation"], true);
        assert_eq!(body["models"]["transcription"], true);
    }

    #[tokio::test]
    async fn translate_in_both_groups() {
        for prefix in ["/api1", "/api2"] {
            let (status, body) =
                post_json(app(), &format!("{}/translate", prefix), json!({"text": " hello "})).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["translated_text"], "[te:hello]");
        }
    }

    #[tokio::test]
    async fn translate_is_repeatable() {
        let (_, first) = post_json(app(), "/api2/translate", json!({"text": "good morning"})).await;
        let (_, second) = post_json(app(), "/api2/translate", json!({"text": "good morning"})).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn missing_text_is_a_client_error() {
        for endpoint in ["translate", "pos", "translate_keywords", "process_text"] {
            let (status, body) = post_json(app(), &format!("/api1/{}", endpoint), json!({"text": "   "})).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", endpoint);
            assert_eq!(body["error"], "No text provided");
        }
    }

    #[tokio::test]
    async fn invalid_payload_is_rejected() {
        let request = Request::post("/api2/translate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("not json"))
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid or empty JSON payload");
    }

    #[tokio::test]
    async fn translation_failure_is_a_server_error() {
        let (status, body) = post_json(app(), "/api2/translate", json!({"text": "explode"})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Translation failed: generation failed");
    }

    #[tokio::test]
    async fn pos_tags_the_translation() {
        let (status, body) = post_json(app(), "/api2/pos", json!({"text": "hello"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"token": "[te:hello]", "pos": "X"}]));
    }

    #[tokio::test]
    async fn keywords_are_translated() {
        let (status, body) = post_json(
            app(),
            "/api2/translate_keywords",
            json!({"text": "rivers and rivers flow into the sea"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let keywords = body["keywords"].as_array().unwrap();
        assert!(keywords.len() <= 6);
        assert_eq!(keywords[0]["keyword"], "rivers");
        assert_eq!(keywords[0]["translated_keyword"], "[te:rivers]");
    }

    #[tokio::test]
    async fn stop_words_only_yield_no_keywords() {
        let (status, body) = post_json(app(), "/api2/translate_keywords", json!({"text": "the and of"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No keywords found");
    }

    #[tokio::test]
    async fn translate_multiple_needs_both_fields() {
        let (status, body) = post_json(app(), "/api2/translate_multiple", json!({"text1": "hello"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Both text1 and text2 must be provided");

        let (status, body) =
            post_json(app(), "/api2/translate_multiple", json!({"text1": "hello", "text2": "world"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["translated_text1"], "[te:hello]");
        assert_eq!(body["translated_text2"], "[te:world]");
    }

    #[tokio::test]
    async fn uninitialized_models_fail_core_endpoints() {
        let gateway = ModelGateway { pos_tagger: None, ..full_gateway(Ok("")) };
        let (status, body) = post_json(app_with(gateway, Config::default()), "/api2/translate", json!({"text": "hi"})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Model initialization failed");
    }

    #[tokio::test]
    async fn processing_routes_only_in_first_group() {
        let request = Request::post("/api2/process_text")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"text": "hi"}).to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn process_text_combines_results() {
        let (status, body) = post_json(app(), "/api1/process_text", json!({"text": "I love sunny days"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["original_text"], "I love sunny days");
        assert_eq!(body["translated_text"], "[te:I love sunny days]");
        assert_eq!(body["sentiments"].as_object().unwrap().len(), 8);
        assert_eq!(body["overall_sentiment"], "neutral");
        assert_eq!(body["summary"], "summary");
    }

    #[tokio::test]
    async fn rejected_summary_is_inlined() {
        let (status, body) = post_json(app(), "/api1/process_text", json!({"text": "short"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "input too short");
    }

    #[tokio::test]
    async fn process_audio_without_file_part() {
        let request = multipart_request("/api1/process_audio", "other", "clip.wav", "RIFF");
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "No file part in the request"}));
    }

    #[tokio::test]
    async fn process_audio_with_empty_filename() {
        let request = multipart_request("/api1/process_audio", "file", "", "RIFF");
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No selected file");
    }

    fn temp_upload_config() -> (Config, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!("uploads-{}", uuid::Uuid::new_v4()));
        let mut config = Config::default();
        config.system_config.upload_dir = dir.to_string_lossy().into_owned();
        (config, dir)
    }

    #[tokio::test]
    async fn process_audio_pipeline_cleans_up() {
        let (config, dir) = temp_upload_config();
        let app = app_with(full_gateway(Ok("a wonderful recording")), config);

        let (status, body) = send(app, multipart_request("/api1/process_audio", "file", "clip.wav", "RIFF")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transcript"], "a wonderful recording");
        assert_eq!(body["summary"], "summary");
        assert_eq!(body["sentiments"]["joy"], 0.9);
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn failed_transcription_is_a_server_error() {
        let (config, dir) = temp_upload_config();
        let app = app_with(full_gateway(Err("Transcription failed.")), config);

        let (status, body) = send(app, multipart_request("/api1/process_audio", "file", "clip.wav", "RIFF")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("Transcription failed."));
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn large_audio_upload_is_accepted() {
        let (config, dir) = temp_upload_config();
        let app = app_with(full_gateway(Ok("a long recording")), config);
        let audio = "a".repeat(3 * 1024 * 1024);

        let (status, body) = send(app, multipart_request("/api1/process_audio", "file", "long.wav", &audio)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transcript"], "a long recording");
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn upload_over_the_limit_is_too_large() {
        let (mut config, dir) = temp_upload_config();
        config.system_config.max_upload_bytes = 1024;
        let app = app_with(full_gateway(Ok("unused")), config);
        let audio = "a".repeat(64 * 1024);

        let (status, body) = send(app, multipart_request("/api1/process_audio", "file", "long.wav", &audio)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_ne!(body["error"], "No file part in the request");
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn translate_multiple_failure_is_a_server_error() {
        let (status, body) = post_json(
            app(),
            "/api2/translate_multiple",
            json!({"text1": "explode", "text2": "world"}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Translation failed: generation failed");
    }

    #[tokio::test]
    async fn keyword_translation_failure_is_a_server_error() {
        let (status, body) = post_json(app(), "/api2/translate_keywords", json!({"text": "explode"})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Could not process keywords: generation failed");
    }

    #[tokio::test]
    async fn pos_translation_failure_is_a_server_error() {
        let (status, body) = post_json(app(), "/api2/pos", json!({"text": "explode"})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Could not fetch POS tags: generation failed");
    }
}
