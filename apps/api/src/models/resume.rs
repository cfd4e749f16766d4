use serde::{Deserialize, Serialize};

use super::{lenient_list, lenient_string, lenient_text, null_as_default, records_without_nulls};

/// Structured résumé as extracted by the model.
///
/// Every scalar is optional and every list defaults to empty: the source document
/// may omit anything, and the model is asked to report absence rather than guess.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub contact_info: ContactInfo,
    #[serde(deserialize_with = "lenient_string")]
    pub professional_summary: Option<String>,
    #[serde(deserialize_with = "records_without_nulls")]
    pub work_experience: Vec<WorkExperience>,
    #[serde(deserialize_with = "records_without_nulls")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "lenient_list")]
    pub technical_skills: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub soft_skills: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub certifications: Vec<String>,
    #[serde(deserialize_with = "records_without_nulls")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "lenient_list")]
    pub languages: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub awards: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub linkedin: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub portfolio: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    #[serde(deserialize_with = "lenient_text")]
    pub company: String,
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub responsibilities: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(deserialize_with = "lenient_text")]
    pub degree: String,
    #[serde(deserialize_with = "lenient_text")]
    pub institution: String,
    #[serde(deserialize_with = "lenient_string")]
    pub graduation_date: Option<String>,
    /// Kept as text: models return "3.8", "3.8/4.0" or a bare number.
    #[serde(deserialize_with = "lenient_string")]
    pub gpa: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub honors: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub technologies: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub link: Option<String>,
}

impl ResumeRecord {
    /// True when the model extracted nothing useful at all.
    pub fn is_empty(&self) -> bool {
        *self == ResumeRecord::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_record_defaults_everything_else() {
        let json = r#"{"contact_info":{"name":"Jane Doe"},"technical_skills":["Python"]}"#;
        let record: ResumeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.contact_info.name.as_deref(), Some("Jane Doe"));
        assert!(record.contact_info.email.is_none());
        assert_eq!(record.technical_skills, vec!["Python"]);
        assert!(record.work_experience.is_empty());
        assert!(record.awards.is_empty());
        assert!(!record.is_empty());
    }

    #[test]
    fn test_nulls_and_unknown_fields_are_tolerated() {
        let json = r#"{
            "contact_info": null,
            "professional_summary": null,
            "work_experience": null,
            "technical_skills": ["Rust"],
            "hobbies": ["chess"],
            "confidence": 0.9
        }"#;
        let record: ResumeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.contact_info, ContactInfo::default());
        assert!(record.professional_summary.is_none());
        assert!(record.work_experience.is_empty());
        assert_eq!(record.technical_skills, vec!["Rust"]);
    }

    #[test]
    fn test_numeric_scalars_coerce_to_text() {
        let json = r#"{
            "education": [{
                "degree": "B.S. Computer Science",
                "institution": "State University",
                "graduation_date": 2019,
                "gpa": 3.8,
                "honors": ["Cum Laude", "Dean's List"]
            }]
        }"#;
        let record: ResumeRecord = serde_json::from_str(json).unwrap();
        let education = &record.education[0];
        assert_eq!(education.graduation_date.as_deref(), Some("2019"));
        assert_eq!(education.gpa.as_deref(), Some("3.8"));
        assert_eq!(education.honors.as_deref(), Some("Cum Laude, Dean's List"));
    }

    #[test]
    fn test_work_experience_preserves_order_and_lists() {
        let json = r#"{
            "work_experience": [
                {"company": "Acme", "title": "Engineer", "start_date": "2020-01",
                 "end_date": "Present", "responsibilities": ["Built APIs"], "achievements": null},
                {"company": "Initech", "title": null}
            ]
        }"#;
        let record: ResumeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.work_experience.len(), 2);
        assert_eq!(record.work_experience[0].company, "Acme");
        assert_eq!(record.work_experience[0].responsibilities, vec!["Built APIs"]);
        assert!(record.work_experience[0].achievements.is_empty());
        assert_eq!(record.work_experience[1].company, "Initech");
        assert_eq!(record.work_experience[1].title, "");
    }

    #[test]
    fn test_null_list_items_are_skipped() {
        let json = r#"{
            "contact_info": {"name": "John Smith"},
            "technical_skills": ["Python", null, "SQL"],
            "education": [null, {"degree": "B.S. Computer Science"}],
            "projects": [{"name": "matcher", "technologies": [null, "Rust"]}]
        }"#;
        let record: ResumeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.technical_skills, vec!["Python", "SQL"]);
        assert_eq!(record.education.len(), 1);
        assert_eq!(record.projects[0].technologies, vec!["Rust"]);
    }

    #[test]
    fn test_object_in_scalar_field_is_rejected() {
        let json = r#"{"contact_info": {"name": {"first": "Jane"}}}"#;
        assert!(serde_json::from_str::<ResumeRecord>(json).is_err());
    }

    #[test]
    fn test_default_record_is_empty() {
        assert!(ResumeRecord::default().is_empty());
        let parsed: ResumeRecord = serde_json::from_str("{}").unwrap();
        assert!(parsed.is_empty());
    }
}
