//! Document ingestion: uploaded résumé file to plain text.
//!
//! The upload is spooled into a `NamedTempFile` under the configured upload dir and
//! decoded from there. The temp file is removed when the guard drops, on every path.

pub mod decode;

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::stage::MIN_MEANINGFUL_CHARS;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("No filename provided")]
    MissingFilename,

    #[error("Unsupported file format '{0}'. Please upload PDF, DOCX, or TXT.")]
    UnsupportedFormat(String),

    #[error("Error reading {format}: {reason}")]
    Unreadable {
        format: DocumentFormat,
        reason: String,
    },

    #[error("Could not extract meaningful text from the file. Please check the file content.")]
    TooShort,

    #[error("Upload storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document decoding task failed: {0}")]
    Worker(String),
}

/// Résumé file formats we can turn into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    /// Picks the format from the filename extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self, IngestError> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(IngestError::MissingFilename);
        }
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "txt" => Ok(DocumentFormat::Txt),
            _ => Err(IngestError::UnsupportedFormat(extension)),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Txt => "txt",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => f.write_str("PDF"),
            DocumentFormat::Docx => f.write_str("DOCX"),
            DocumentFormat::Txt => f.write_str("TXT"),
        }
    }
}

/// An upload written to disk. Dropping it deletes the file.
pub struct SpooledUpload {
    file: NamedTempFile,
    format: DocumentFormat,
}

impl SpooledUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }
}

/// Writes upload bytes to a fresh temp file in `dir`.
pub fn spool_upload(
    dir: &Path,
    format: DocumentFormat,
    data: &[u8],
) -> Result<SpooledUpload, IngestError> {
    let mut file = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(&format!(".{}", format.extension()))
        .tempfile_in(dir)?;
    file.write_all(data)?;
    file.flush()?;
    debug!("Spooled {} byte upload to {}", data.len(), file.path().display());
    Ok(SpooledUpload { file, format })
}

/// Spools, decodes, and length-checks an uploaded résumé.
///
/// Decoding is blocking work and runs on the blocking pool.
pub async fn extract_text_from_upload(
    upload_dir: PathBuf,
    filename: &str,
    data: Bytes,
) -> Result<String, IngestError> {
    let format = DocumentFormat::from_filename(filename)?;
    info!("Decoding {format} upload '{filename}' ({} bytes)", data.len());

    let text = tokio::task::spawn_blocking(move || {
        let upload = spool_upload(&upload_dir, format, &data)?;
        decode::decode_document(upload.path(), upload.format())
    })
    .await
    .map_err(|e| IngestError::Worker(e.to_string()))??;

    ensure_meaningful(&text)?;
    Ok(text)
}

/// Rejects decoded text that is too short to describe anyone.
pub fn ensure_meaningful(text: &str) -> Result<(), IngestError> {
    if text.trim().chars().count() < MIN_MEANINGFUL_CHARS {
        return Err(IngestError::TooShort);
    }
    Ok(())
}
