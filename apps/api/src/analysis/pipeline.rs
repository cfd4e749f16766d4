//! Orchestration entry points: extract only, match only, and the combined analysis.
//!
//! Flow for `analyze`: validate JD → extract_resume → match_resume.
//! An extraction failure ends the pipeline; matching is never invoked.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::analysis::extractor::extract_resume;
use crate::analysis::matcher::match_resume;
use crate::analysis::stage::{validate_job_description, StageResult};
use crate::config::Config;
use crate::llm_client::{ModelGateway, ModelSettings};
use crate::models::resume::ResumeRecord;
use crate::models::verdict::MatchVerdict;

/// Per-stage model settings plus the extraction input bound.
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub extraction: ModelSettings,
    pub matching: ModelSettings,
    pub max_resume_chars: usize,
}

impl AnalysisSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            extraction: config.extraction_settings(),
            matching: config.matching_settings(),
            max_resume_chars: config.max_resume_chars,
        }
    }
}

/// Result of the combined workflow.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub resume_details: ResumeRecord,
    pub match_analysis: MatchVerdict,
}

/// Entry point shared by the HTTP layer. Holds no per-request state.
#[derive(Clone)]
pub struct Analyzer {
    gateway: Arc<dyn ModelGateway>,
    settings: AnalysisSettings,
}

impl Analyzer {
    pub fn new(gateway: Arc<dyn ModelGateway>, settings: AnalysisSettings) -> Self {
        Self { gateway, settings }
    }

    pub async fn extract(&self, resume_text: &str) -> StageResult<ResumeRecord> {
        extract_resume(
            self.gateway.as_ref(),
            &self.settings.extraction,
            self.settings.max_resume_chars,
            resume_text,
        )
        .await
    }

    pub async fn match_job(
        &self,
        resume: &ResumeRecord,
        job_description: &str,
    ) -> StageResult<MatchVerdict> {
        match_resume(
            self.gateway.as_ref(),
            &self.settings.matching,
            resume,
            job_description,
        )
        .await
    }

    /// Extracts, then matches the extracted record. The JD is checked up front so a
    /// bad JD never costs an extraction call.
    pub async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> StageResult<AnalysisOutcome> {
        validate_job_description(job_description)?;

        let resume_details = self.extract(resume_text).await?;
        let match_analysis = self.match_job(&resume_details, job_description).await?;

        info!(
            "Analysis complete: {} ({}%)",
            match_analysis.verdict, match_analysis.match_percentage
        );

        Ok(AnalysisOutcome {
            resume_details,
            match_analysis,
        })
    }
}
