use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors raised by the model gateway and the keyword pipeline
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Translation(String),

    #[error("{0}")]
    PosTagging(String),

    #[error("{0}")]
    Sentiment(String),

    #[error("{0}")]
    Summarization(String),

    #[error("{0}")]
    Transcription(String),

    #[error("{0}")]
    ModelService(String),

    #[error("No keywords found")]
    NoKeywordsFound,

    #[error("Model initialization failed")]
    ModelUnavailable,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Error surfaced to HTTP clients as `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(&'static str),
    Internal(String),
    /// Request body rejected by the extractor, e.g. over the upload limit
    Rejected(StatusCode, String),
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Wrap a downstream failure, prefixing its message with a fixed context
    pub fn downstream(context: &str, err: GatewayError) -> Self {
        match err {
            GatewayError::NoKeywordsFound => Self::BadRequest("No keywords found"),
            GatewayError::ModelUnavailable => Self::Internal(err.to_string()),
            other => Self::Internal(format!("{}: {}", context, other)),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected(status, _) => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(msg) => msg,
            Self::Internal(msg) => msg,
            Self::Rejected(_, msg) => msg,
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NoKeywordsFound => Self::BadRequest("No keywords found"),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::Rejected(err.status(), err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
