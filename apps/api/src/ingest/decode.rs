//! Format-specific text decoders. All blocking; call from the blocking pool.

use std::path::Path;

use docx_rs::{DocumentChild, ParagraphChild, RunChild};

use super::{DocumentFormat, IngestError};

pub fn decode_document(path: &Path, format: DocumentFormat) -> Result<String, IngestError> {
    match format {
        DocumentFormat::Pdf => decode_pdf(path),
        DocumentFormat::Docx => decode_docx(path),
        DocumentFormat::Txt => decode_txt(path),
    }
}

fn decode_pdf(path: &Path) -> Result<String, IngestError> {
    // pdf-extract panics on some malformed font tables instead of returning an error.
    std::panic::catch_unwind(|| pdf_extract::extract_text(path))
        .map_err(|_| unreadable(DocumentFormat::Pdf, "the PDF structure could not be parsed"))?
        .map_err(|e| unreadable(DocumentFormat::Pdf, e))
}

/// Paragraph text, one paragraph per line.
fn decode_docx(path: &Path) -> Result<String, IngestError> {
    let data = std::fs::read(path)?;
    let docx = docx_rs::read_docx(&data).map_err(|e| unreadable(DocumentFormat::Docx, e))?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for paragraph_child in &paragraph.children {
                if let ParagraphChild::Run(run) = paragraph_child {
                    for run_child in &run.children {
                        if let RunChild::Text(text) = run_child {
                            line.push_str(&text.text);
                        }
                    }
                }
            }
            lines.push(line);
        }
    }
    Ok(lines.join("\n"))
}

fn decode_txt(path: &Path) -> Result<String, IngestError> {
    let data = std::fs::read(path)?;
    let text = String::from_utf8(data).map_err(|e| unreadable(DocumentFormat::Txt, e))?;
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

fn unreadable(format: DocumentFormat, error: impl std::fmt::Display) -> IngestError {
    IngestError::Unreadable {
        format,
        reason: error.to_string(),
    }
}
