use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::analysis::stage::StageError;
use crate::ingest::IngestError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Json(#[from] JsonRejection),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Stage(#[from] StageError),
}

/// Status, machine-readable code, and user-facing message for one error.
struct ErrorBody {
    status: StatusCode,
    code: &'static str,
    message: String,
    extra: Map<String, Value>,
}

impl ErrorBody {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            extra: Map::new(),
        }
    }

    fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

impl AppError {
    fn body(&self) -> ErrorBody {
        match self {
            AppError::Validation(msg) => {
                ErrorBody::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Json(rejection) => json_body(rejection),
            AppError::Ingest(e) => ingest_body(e),
            AppError::Stage(e) => stage_body(e),
        }
    }
}

fn json_body(rejection: &JsonRejection) -> ErrorBody {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ErrorBody::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "INPUT_TOO_LARGE",
            "Request body is too large",
        );
    }
    ErrorBody::new(
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
        rejection.body_text(),
    )
}

fn ingest_body(error: &IngestError) -> ErrorBody {
    match error {
        IngestError::MissingFilename => {
            ErrorBody::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", error.to_string())
        }
        IngestError::UnsupportedFormat(_) => {
            ErrorBody::new(StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT", error.to_string())
        }
        IngestError::Unreadable { .. } | IngestError::TooShort => {
            ErrorBody::new(StatusCode::BAD_REQUEST, "DECODE_ERROR", error.to_string())
        }
        IngestError::Io(_) | IngestError::Worker(_) => {
            tracing::error!("Upload handling error: {error}");
            ErrorBody::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "The uploaded file could not be processed",
            )
        }
    }
}

fn stage_body(error: &StageError) -> ErrorBody {
    let body = match error {
        StageError::InvalidInput(msg) => {
            ErrorBody::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        StageError::InputTooLarge { chars, limit } => ErrorBody::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "INPUT_TOO_LARGE",
            error.to_string(),
        )
        .with("chars", *chars)
        .with("limit", *limit),
        StageError::UnparseableOutput { stage, .. } => {
            tracing::error!("{error}");
            ErrorBody::new(
                StatusCode::BAD_GATEWAY,
                "UNPARSEABLE_MODEL_OUTPUT",
                format!("Failed to parse the {stage} result returned by the language model"),
            )
        }
        StageError::Transport { .. } => {
            tracing::error!("{error}");
            ErrorBody::new(
                StatusCode::BAD_GATEWAY,
                "MODEL_GATEWAY_ERROR",
                "The language model service could not complete the request",
            )
        }
        StageError::Serialization(e) => {
            tracing::error!("Stage input serialization error: {e}");
            ErrorBody::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred",
            )
        }
    };

    let body = match error.stage() {
        Some(stage) => body.with("stage", stage.to_string()),
        None => body,
    };
    match error.raw_response() {
        Some(raw) => body.with("raw_response", raw),
        None => body,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let ErrorBody {
            status,
            code,
            message,
            extra,
        } = self.body();

        let mut error = Map::new();
        error.insert("code".to_string(), json!(code));
        error.insert("message".to_string(), json!(message));
        error.extend(extra);

        let body = Json(json!({ "error": error }));

        (status, body).into_response()
    }
}
