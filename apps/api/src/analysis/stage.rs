//! Stage result typing shared by the extraction and matching stages.

use std::fmt;

use thiserror::Error;

use crate::llm_client::normalize::NormalizeError;
use crate::llm_client::GatewayError;

/// Inputs shorter than this (after trimming) carry no usable content.
pub const MIN_MEANINGFUL_CHARS: usize = 10;

/// Which model-backed stage produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extraction,
    Matching,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extraction => f.write_str("extraction"),
            Stage::Matching => f.write_str("matching"),
        }
    }
}

/// Why a stage did not produce a record.
#[derive(Debug, Error)]
pub enum StageError {
    /// Network failure, timeout, rejected credentials, or an empty completion.
    #[error("{stage} stage: model gateway failure: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: GatewayError,
    },

    /// The model answered, but not with a usable structured document.
    #[error("{stage} stage: unparseable model output: {reason}")]
    UnparseableOutput {
        stage: Stage,
        reason: String,
        raw_response: String,
    },

    /// Rejected before any model call.
    #[error("{0}")]
    InvalidInput(String),

    #[error("Resume text is too large ({chars} characters, limit is {limit})")]
    InputTooLarge { chars: usize, limit: usize },

    #[error("Failed to serialize stage input: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StageError {
    pub fn transport(stage: Stage, source: GatewayError) -> Self {
        StageError::Transport { stage, source }
    }

    pub fn unparseable(stage: Stage, error: NormalizeError) -> Self {
        let reason = error.reason().to_string();
        StageError::UnparseableOutput {
            stage,
            reason,
            raw_response: error.into_raw_response(),
        }
    }

    /// The raw model text, when the failure happened after the model answered.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            StageError::UnparseableOutput { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            StageError::Transport { stage, .. } | StageError::UnparseableOutput { stage, .. } => {
                Some(*stage)
            }
            _ => None,
        }
    }
}

/// Outcome of a model-backed stage: the parsed record or a typed failure.
pub type StageResult<T> = Result<T, StageError>;

/// Rejects a job description too short to match against.
pub fn validate_job_description(job_description: &str) -> StageResult<()> {
    if job_description.trim().chars().count() < MIN_MEANINGFUL_CHARS {
        return Err(StageError::InvalidInput(
            "Job description is too short. Please provide a detailed job description."
                .to_string(),
        ));
    }
    Ok(())
}

/// Rejects résumé text that is empty or beyond what the extraction call can absorb.
pub fn validate_resume_text(resume_text: &str, max_chars: usize) -> StageResult<()> {
    let trimmed = resume_text.trim();
    if trimmed.chars().count() < MIN_MEANINGFUL_CHARS {
        return Err(StageError::InvalidInput(
            "Resume text is too short to extract meaningful details.".to_string(),
        ));
    }
    let chars = trimmed.chars().count();
    if chars > max_chars {
        return Err(StageError::InputTooLarge {
            chars,
            limit: max_chars,
        });
    }
    Ok(())
}
