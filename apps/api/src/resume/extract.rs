//! Resume upload text extraction.

use crate::errors::AppError;

/// 10 MB.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Below this many words the PDF is most likely scanned images.
const MIN_EXTRACTED_WORDS: usize = 20;

/// Extracts plain text from PDF bytes. CPU-bound; call from `spawn_blocking`.
pub fn extract_pdf_text(data: &[u8]) -> Result<String, AppError> {
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(
            "File too large. Maximum size is 10MB".to_string(),
        ));
    }
    if !data.starts_with(b"%PDF-") {
        return Err(AppError::Validation(
            "Invalid file type. Only PDF resumes are supported".to_string(),
        ));
    }

    let raw = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| AppError::UnprocessableEntity(format!("Could not read PDF: {e}")))?;
    let text = clean_extracted_text(&raw);

    if text.split_whitespace().count() < MIN_EXTRACTED_WORDS {
        return Err(AppError::UnprocessableEntity(
            "No readable text found in PDF. Scanned resumes are not supported".to_string(),
        ));
    }
    Ok(text)
}

/// Collapses runs of spaces inside lines and keeps at most one blank line
/// between paragraphs.
pub fn clean_extracted_text(raw: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    for line in raw.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() && out.last().map(|l| l.is_empty()).unwrap_or(true) {
            continue;
        }
        out.push(line);
    }
    while out.last().map(|l| l.is_empty()).unwrap_or(false) {
        out.pop();
    }
    out.join("\n")
}
