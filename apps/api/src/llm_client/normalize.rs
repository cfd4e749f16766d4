//! Response normalizer: turns raw model text into typed records.
//!
//! Models are told to answer with bare JSON but regularly wrap it in a markdown
//! fence anyway, sometimes tagged (```` ```json ````), sometimes untagged, sometimes
//! not at all. Normalization is two steps:
//!
//! 1. `strip_json_fences`: trim, drop a leading fence (and its `json` tag) and a
//!    trailing fence. Nothing else is removed.
//! 2. Parse the remainder as JSON, then coerce it into the target record. Records
//!    are tolerant: unknown fields are ignored and missing fields default.
//!
//! Failures keep the raw model text verbatim so callers can surface it for diagnosis.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

const FENCE: &str = "```";
const JSON_TAG: &str = "json";

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("model output is not valid JSON: {reason}")]
    InvalidJson { reason: String, raw_response: String },

    #[error("model output does not fit the expected structure: {reason}")]
    UnexpectedShape { reason: String, raw_response: String },
}

impl NormalizeError {
    pub fn reason(&self) -> &str {
        match self {
            NormalizeError::InvalidJson { reason, .. }
            | NormalizeError::UnexpectedShape { reason, .. } => reason,
        }
    }

    pub fn into_raw_response(self) -> String {
        match self {
            NormalizeError::InvalidJson { raw_response, .. }
            | NormalizeError::UnexpectedShape { raw_response, .. } => raw_response,
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix(FENCE) {
        text = strip_json_tag(rest);
    }
    if let Some(rest) = text.strip_suffix(FENCE) {
        text = rest;
    }
    text.trim()
}

fn strip_json_tag(text: &str) -> &str {
    match text.get(..JSON_TAG.len()) {
        Some(tag) if tag.eq_ignore_ascii_case(JSON_TAG) => &text[JSON_TAG.len()..],
        _ => text,
    }
}

/// Strips fences and parses the remainder as an untyped JSON document.
pub fn parse_json_value(raw: &str) -> Result<Value, NormalizeError> {
    serde_json::from_str(strip_json_fences(raw)).map_err(|e| NormalizeError::InvalidJson {
        reason: e.to_string(),
        raw_response: raw.to_string(),
    })
}

/// Strips fences, parses, and coerces the model output into `T`.
pub fn normalize<T: DeserializeOwned>(raw: &str) -> Result<T, NormalizeError> {
    let value = parse_json_value(raw)?;
    serde_json::from_value(value).map_err(|e| NormalizeError::UnexpectedShape {
        reason: e.to_string(),
        raw_response: raw.to_string(),
    })
}
