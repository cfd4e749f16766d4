//! Axum route handlers for the analysis API.

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::pipeline::AnalysisOutcome;
use crate::analysis::stage::validate_job_description;
use crate::errors::AppError;
use crate::ingest::{extract_text_from_upload, IngestError};
use crate::models::resume::ResumeRecord;
use crate::models::verdict::MatchVerdict;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_details: ResumeRecord,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub resume_details: ResumeRecord,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub match_analysis: MatchVerdict,
}

/// Fields of the multipart upload forms.
#[derive(Debug, Default)]
struct UploadForm {
    filename: Option<String>,
    data: Option<Bytes>,
    job_description: Option<String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
        {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("file") => {
                    form.filename = field.file_name().map(str::to_string);
                    form.data = Some(field.bytes().await.map_err(|e| {
                        AppError::Validation(format!("Failed to read uploaded file: {e}"))
                    })?);
                }
                Some("job_description") => {
                    form.job_description = Some(field.text().await.map_err(|e| {
                        AppError::Validation(format!("Failed to read job_description: {e}"))
                    })?);
                }
                _ => {}
            }
        }
        Ok(form)
    }

    fn file(&mut self) -> Result<(String, Bytes), AppError> {
        let data = self
            .data
            .take()
            .ok_or_else(|| AppError::Validation("A résumé file is required".to_string()))?;
        let filename = self
            .filename
            .take()
            .filter(|f| !f.trim().is_empty())
            .ok_or(IngestError::MissingFilename)?;
        Ok((filename, data))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /extract-resume
///
/// Multipart `file` (PDF, DOCX or TXT) → structured résumé.
pub async fn handle_extract_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let (filename, data) = form.file()?;

    let resume_text =
        extract_text_from_upload(state.config.upload_dir.clone(), &filename, data).await?;
    let resume_details = state.analyzer.extract(&resume_text).await?;

    Ok(Json(ExtractResponse { resume_details }))
}

/// POST /match-job
///
/// JSON `{resume_details, job_description}` → match verdict.
/// The résumé may come from an earlier extraction or from anywhere else.
pub async fn handle_match_job(
    State(state): State<AppState>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResponse>, AppError> {
    let Json(request) = payload?;
    let match_analysis = state
        .analyzer
        .match_job(&request.resume_details, &request.job_description)
        .await?;

    Ok(Json(MatchResponse { match_analysis }))
}

/// POST /analyze
///
/// Multipart `file` + `job_description` → extraction then matching.
/// The JD is checked before the file is touched.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisOutcome>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let job_description = form.job_description.take().unwrap_or_default();
    validate_job_description(&job_description)?;
    let (filename, data) = form.file()?;

    info!("Running full analysis for '{filename}'");
    let resume_text =
        extract_text_from_upload(state.config.upload_dir.clone(), &filename, data).await?;
    let outcome = state.analyzer.analyze(&resume_text, &job_description).await?;

    Ok(Json(outcome))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::analysis::pipeline::{AnalysisSettings, Analyzer};
    use crate::config::Config;
    use crate::llm_client::testing::ScriptedGateway;
    use crate::routes::build_router;
    use crate::state::AppState;

    const BOUNDARY: &str = "matcher-test-boundary";
    const RESUME_TEXT: &str =
        "John Smith, Software Engineer, 5 years Python experience, B.S. Computer Science";
    const JOB_DESCRIPTION: &str = "Senior Python engineer to build data APIs. Required: Python.";
    const EXTRACTION_REPLY: &str =
        r#"{"contact_info": {"name": "John Smith"}, "technical_skills": ["Python"]}"#;
    const MATCH_REPLY: &str = r#"{"match_percentage": 88, "verdict": "STRONG_MATCH", "summary": "Good fit."}"#;

    struct Harness {
        app: Router,
        gateway: Arc<ScriptedGateway>,
        upload_dir: TempDir,
    }

    fn harness(gateway: ScriptedGateway) -> Harness {
        let upload_dir = tempfile::tempdir().unwrap();
        let dir = upload_dir.path().to_string_lossy().to_string();
        let config = Config::from_lookup(move |key| match key {
            "LLM_API_KEY" => Some("test-key".to_string()),
            "UPLOAD_DIR" => Some(dir.clone()),
            _ => None,
        })
        .unwrap();

        let gateway = Arc::new(gateway);
        let analyzer = Analyzer::new(gateway.clone(), AnalysisSettings::from_config(&config));
        let app = build_router(AppState { analyzer, config });
        Harness {
            app,
            gateway,
            upload_dir,
        }
    }

    fn multipart_request(uri: &str, filename: &str, file: &str, jd: Option<&str>) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n{file}\r\n"
        );
        if let Some(jd) = jd {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"job_description\"\r\n\r\n{jd}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn upload_dir_is_empty(harness: &Harness) -> bool {
        std::fs::read_dir(harness.upload_dir.path()).unwrap().count() == 0
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness(ScriptedGateway::new());
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(h.app.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_extract_resume_from_txt_upload() {
        let h = harness(ScriptedGateway::new().reply(format!("```json\n{EXTRACTION_REPLY}\n```")));

        let request = multipart_request("/extract-resume", "resume.txt", RESUME_TEXT, None);
        let (status, body) = send(h.app.clone(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resume_details"]["contact_info"]["name"], "John Smith");
        assert_eq!(body["resume_details"]["technical_skills"], json!(["Python"]));
        assert!(h.gateway.recorded()[0].user.contains(RESUME_TEXT));
        assert!(upload_dir_is_empty(&h));
    }

    #[tokio::test]
    async fn test_extract_resume_rejects_unsupported_format() {
        let h = harness(ScriptedGateway::new());

        let request = multipart_request("/extract-resume", "resume.rtf", RESUME_TEXT, None);
        let (status, body) = send(h.app.clone(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FORMAT");
        assert_eq!(h.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_extract_resume_unparseable_output_returns_raw() {
        let reply = "Sorry, here is a summary instead of JSON.";
        let h = harness(ScriptedGateway::new().reply(reply));

        let request = multipart_request("/extract-resume", "resume.txt", RESUME_TEXT, None);
        let (status, body) = send(h.app.clone(), request).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "UNPARSEABLE_MODEL_OUTPUT");
        assert_eq!(body["error"]["raw_response"], reply);
        assert!(upload_dir_is_empty(&h));
    }

    #[tokio::test]
    async fn test_match_job_returns_verdict() {
        let h = harness(ScriptedGateway::new().reply(MATCH_REPLY));

        let request = json_request(
            "/match-job",
            json!({
                "resume_details": {"contact_info": {"name": "Jane Doe"}, "technical_skills": ["Python"]},
                "job_description": JOB_DESCRIPTION
            }),
        );
        let (status, body) = send(h.app.clone(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["match_analysis"]["verdict"], "STRONG_MATCH");
        assert_eq!(body["match_analysis"]["match_percentage"], 88);
    }

    #[tokio::test]
    async fn test_match_job_short_description_makes_no_call() {
        let h = harness(ScriptedGateway::new());

        let request = json_request(
            "/match-job",
            json!({"resume_details": {}, "job_description": "short"}),
        );
        let (status, body) = send(h.app.clone(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(h.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_match_job_wrong_field_type_is_json_error() {
        let h = harness(ScriptedGateway::new());

        let request = json_request(
            "/match-job",
            json!({
                "resume_details": {"technical_skills": "Python, SQL"},
                "job_description": JOB_DESCRIPTION
            }),
        );
        let (status, body) = send(h.app.clone(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("technical_skills"));
        assert_eq!(h.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_match_job_malformed_body_is_json_error() {
        let h = harness(ScriptedGateway::new());

        let request = Request::builder()
            .method("POST")
            .uri("/match-job")
            .header("content-type", "application/json")
            .body(Body::from("{\"resume_details\": {"))
            .unwrap();
        let (status, body) = send(h.app.clone(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_match_job_missing_content_type_is_json_error() {
        let h = harness(ScriptedGateway::new());

        let request = Request::builder()
            .method("POST")
            .uri("/match-job")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(h.app.clone(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_analyze_runs_full_pipeline() {
        let h = harness(
            ScriptedGateway::new()
                .reply(EXTRACTION_REPLY)
                .reply(format!("```json\n{MATCH_REPLY}\n```")),
        );

        let request = multipart_request("/analyze", "resume.txt", RESUME_TEXT, Some(JOB_DESCRIPTION));
        let (status, body) = send(h.app.clone(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resume_details"]["contact_info"]["name"], "John Smith");
        assert_eq!(body["match_analysis"]["match_percentage"], 88);
        assert_eq!(h.gateway.call_count(), 2);
        assert!(upload_dir_is_empty(&h));
    }

    #[tokio::test]
    async fn test_analyze_short_description_rejected_before_upload() {
        let h = harness(ScriptedGateway::new());

        let request = multipart_request("/analyze", "resume.txt", RESUME_TEXT, Some("short"));
        let (status, body) = send(h.app.clone(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(h.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_extraction_failure_skips_matching() {
        let h = harness(ScriptedGateway::new().reply("not json at all"));

        let request = multipart_request("/analyze", "resume.txt", RESUME_TEXT, Some(JOB_DESCRIPTION));
        let (status, body) = send(h.app.clone(), request).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["stage"], "extraction");
        assert_eq!(h.gateway.call_count(), 1);
        assert!(upload_dir_is_empty(&h));
    }

    #[tokio::test]
    async fn test_analyze_blank_document_is_decode_error() {
        let h = harness(ScriptedGateway::new());

        let request = multipart_request("/analyze", "resume.txt", "   ", Some(JOB_DESCRIPTION));
        let (status, body) = send(h.app.clone(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "DECODE_ERROR");
        assert_eq!(h.gateway.call_count(), 0);
    }
}
