// All prompt constants for the analysis stages.
// The system prompts are the output-schema contract with the model; keep them in
// sync with `models::resume::ResumeRecord` and `models::verdict::MatchVerdict`.
// Shared fragments from llm_client::prompts are spliced in by the builders below.

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_INVENTION_INSTRUCTION};

/// System prompt template for résumé extraction. Build with `extraction_system_prompt`.
pub const EXTRACT_RESUME_SYSTEM: &str = r#"You are an expert resume parser. Read the resume text supplied by the user and extract its contents into a single JSON object.

Return a JSON object with this EXACT schema:
{
  "contact_info": {
    "name": "string or null",
    "email": "string or null",
    "phone": "string or null",
    "location": "string or null",
    "linkedin": "string or null",
    "portfolio": "string or null",
    "github": "string or null"
  },
  "professional_summary": "string or null",
  "work_experience": [
    {
      "company": "string",
      "title": "string",
      "start_date": "string or null",
      "end_date": "string or null (use \"Present\" for a current role)",
      "responsibilities": ["string"],
      "achievements": ["string"]
    }
  ],
  "education": [
    {
      "degree": "string",
      "institution": "string",
      "graduation_date": "string or null",
      "gpa": "string or null",
      "honors": "string or null"
    }
  ],
  "technical_skills": ["string"],
  "soft_skills": ["string"],
  "certifications": ["string"],
  "projects": [
    {
      "name": "string",
      "description": "string or null",
      "technologies": ["string"],
      "link": "string or null"
    }
  ],
  "languages": ["string"],
  "awards": ["string"]
}

RULES:
1. Keep entries in the order they appear in the resume.
2. List each skill as its own short string (e.g. "Python", not "Python and Django").
3. Separate measurable achievements from day-to-day responsibilities.
4. {no_invention}
5. {json_only}"#;

/// Prefix for the extraction user message. The résumé text follows it.
pub const EXTRACT_RESUME_INSTRUCTION: &str = "Extract information from this resume:";

/// System prompt template for résumé-to-job matching. Build with `matching_system_prompt`.
pub const MATCH_JOB_SYSTEM: &str = r#"You are an experienced technical recruiter. Compare the candidate's structured resume with the job description supplied by the user and assess how well they fit.

Return a JSON object with this EXACT schema:
{
  "match_percentage": 0,
  "verdict": "STRONG_MATCH | MODERATE_MATCH | WEAK_MATCH | POOR_MATCH",
  "matching_skills": ["string"],
  "missing_critical_requirements": ["string"],
  "missing_preferred_skills": ["string"],
  "experience_assessment": "string",
  "education_fit": "string",
  "key_strengths": ["string"],
  "gaps_to_address": ["string"],
  "recommendations": ["string"],
  "interview_likelihood": "string",
  "summary": "string"
}

SCORING GUIDE:
- match_percentage is an integer from 0 to 100.
- STRONG_MATCH: 80-100. Meets all critical requirements and most preferred ones.
- MODERATE_MATCH: 60-79. Meets most critical requirements with some gaps.
- WEAK_MATCH: 40-59. Missing several critical requirements.
- POOR_MATCH: 0-39. Does not meet the core requirements.

RULES:
1. Judge only from the resume and job description provided. Do not assume skills that are not listed.
2. Distinguish hard requirements ("required", "must have") from preferred ones ("nice to have", "a plus").
3. Recommendations must be concrete actions the candidate can take.
4. {json_only}"#;

/// Closing instruction of the matching user message.
pub const MATCH_JOB_INSTRUCTION: &str = "Analyze how well this resume matches the job description.";

pub fn extraction_system_prompt() -> String {
    EXTRACT_RESUME_SYSTEM
        .replace("{no_invention}", NO_INVENTION_INSTRUCTION)
        .replace("{json_only}", JSON_ONLY_SYSTEM)
}

pub fn matching_system_prompt() -> String {
    MATCH_JOB_SYSTEM.replace("{json_only}", JSON_ONLY_SYSTEM)
}

/// Matching user message. Both parts are inserted verbatim in a single pass.
pub fn matching_user_prompt(resume_json: &str, job_description: &str) -> String {
    format!(
        "RESUME DETAILS:\n{resume_json}\n\nJOB DESCRIPTION:\n{job_description}\n\n{MATCH_JOB_INSTRUCTION}"
    )
}
