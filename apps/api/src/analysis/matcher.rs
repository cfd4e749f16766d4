//! Job matching stage. Assesses a `ResumeRecord` against a job description.
//!
//! Stateless with respect to extraction: any caller-supplied record is accepted.

use tracing::{info, warn};

use crate::analysis::prompts::{matching_system_prompt, matching_user_prompt};
use crate::analysis::stage::{validate_job_description, Stage, StageError, StageResult};
use crate::llm_client::normalize::normalize;
use crate::llm_client::{CompletionRequest, ModelGateway, ModelSettings};
use crate::models::resume::ResumeRecord;
use crate::models::verdict::MatchVerdict;

/// Builds the user message: the résumé as pretty JSON, then the job description.
pub fn build_matching_payload(
    resume: &ResumeRecord,
    job_description: &str,
) -> Result<String, serde_json::Error> {
    let resume_json = serde_json::to_string_pretty(resume)?;
    Ok(matching_user_prompt(&resume_json, job_description.trim()))
}

/// Scores a résumé against a job description with one model call.
///
/// Job descriptions under the minimum length are rejected before the call.
pub async fn match_resume(
    gateway: &dyn ModelGateway,
    settings: &ModelSettings,
    resume: &ResumeRecord,
    job_description: &str,
) -> StageResult<MatchVerdict> {
    validate_job_description(job_description)?;

    let system = matching_system_prompt();
    let payload = build_matching_payload(resume, job_description)?;
    info!(
        "Matching resume against job description: model={}, jd_bytes={}",
        settings.model,
        job_description.len()
    );

    let raw = gateway
        .complete(CompletionRequest {
            system: &system,
            user: &payload,
            settings,
        })
        .await
        .map_err(|e| {
            warn!("Job matching call failed: {e}");
            StageError::transport(Stage::Matching, e)
        })?;

    let verdict: MatchVerdict = normalize(&raw).map_err(|e| {
        warn!("Job matching returned unparseable output: {e}");
        StageError::unparseable(Stage::Matching, e)
    })?;

    info!(
        "Match verdict: {} ({}%)",
        verdict.verdict, verdict.match_percentage
    );

    Ok(verdict)
}
