use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::ModelSettings;

const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub extraction_model: String,
    pub extraction_temperature: f32,
    pub extraction_max_tokens: u32,
    pub extraction_timeout_secs: u64,
    pub matching_model: String,
    pub matching_temperature: f32,
    pub matching_timeout_secs: u64,
    pub max_concurrent_model_calls: usize,
    pub max_resume_chars: usize,
    pub max_upload_bytes: usize,
    pub upload_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            llm_api_key: require(&lookup, "LLM_API_KEY")?,
            llm_base_url: lookup("LLM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            extraction_model: lookup("EXTRACTION_MODEL")
                .unwrap_or_else(|| "llama-3.1-8b-instant".to_string()),
            extraction_temperature: parse_or(&lookup, "EXTRACTION_TEMPERATURE", 0.1)?,
            extraction_max_tokens: parse_or(&lookup, "EXTRACTION_MAX_TOKENS", 2000)?,
            extraction_timeout_secs: parse_or(&lookup, "EXTRACTION_TIMEOUT_SECS", 60)?,
            matching_model: lookup("MATCHING_MODEL")
                .unwrap_or_else(|| "llama-3.3-70b-versatile".to_string()),
            matching_temperature: parse_or(&lookup, "MATCHING_TEMPERATURE", 0.2)?,
            matching_timeout_secs: parse_or(&lookup, "MATCHING_TIMEOUT_SECS", 120)?,
            max_concurrent_model_calls: parse_or(&lookup, "MAX_CONCURRENT_MODEL_CALLS", 8)?,
            max_resume_chars: parse_or(&lookup, "MAX_RESUME_CHARS", 24_000)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            port: parse_or(&lookup, "PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Settings for the résumé extraction call: small model, near-zero temperature, capped output.
    pub fn extraction_settings(&self) -> ModelSettings {
        ModelSettings {
            model: self.extraction_model.clone(),
            temperature: self.extraction_temperature,
            max_tokens: Some(self.extraction_max_tokens),
            timeout: Duration::from_secs(self.extraction_timeout_secs),
        }
    }

    /// Settings for the job matching call: larger model, low but non-zero temperature.
    pub fn matching_settings(&self) -> ModelSettings {
        ModelSettings {
            model: self.matching_model.clone(),
            temperature: self.matching_temperature,
            max_tokens: None,
            timeout: Duration::from_secs(self.matching_timeout_secs),
        }
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
