//! Resume extraction stage. Turns plain résumé text into a `ResumeRecord`.

use tracing::{info, warn};

use crate::analysis::prompts::{extraction_system_prompt, EXTRACT_RESUME_INSTRUCTION};
use crate::analysis::stage::{validate_resume_text, Stage, StageError, StageResult};
use crate::llm_client::normalize::normalize;
use crate::llm_client::{CompletionRequest, ModelGateway, ModelSettings};
use crate::models::resume::ResumeRecord;

/// Builds the user message for the extraction call.
pub fn build_extraction_payload(resume_text: &str) -> String {
    format!("{EXTRACT_RESUME_INSTRUCTION}\n\n{}", resume_text.trim())
}

/// Extracts a structured résumé from plain text with one model call.
///
/// Text that is blank or longer than `max_chars` is rejected before the call.
pub async fn extract_resume(
    gateway: &dyn ModelGateway,
    settings: &ModelSettings,
    max_chars: usize,
    resume_text: &str,
) -> StageResult<ResumeRecord> {
    validate_resume_text(resume_text, max_chars)?;

    let system = extraction_system_prompt();
    let payload = build_extraction_payload(resume_text);
    info!(
        "Extracting resume details: model={}, bytes={}",
        settings.model,
        resume_text.len()
    );

    let raw = gateway
        .complete(CompletionRequest {
            system: &system,
            user: &payload,
            settings,
        })
        .await
        .map_err(|e| {
            warn!("Resume extraction call failed: {e}");
            StageError::transport(Stage::Extraction, e)
        })?;

    let record: ResumeRecord = normalize(&raw).map_err(|e| {
        warn!("Resume extraction returned unparseable output: {e}");
        StageError::unparseable(Stage::Extraction, e)
    })?;

    if record.is_empty() {
        warn!("Resume extraction produced an empty record");
    }
    info!(
        "Resume extracted: {} roles, {} technical skills",
        record.work_experience.len(),
        record.technical_skills.len()
    );

    Ok(record)
}
