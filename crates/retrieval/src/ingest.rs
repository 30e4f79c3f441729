//! Document ingestion: turning uploaded bytes into extractable text.
//!
//! Supports PDF (via the `pdf-extract` crate) and UTF-8 plain text. The
//! format is sniffed from the leading bytes, not the filename.

use crate::types::Document;
use paperchat_core::{AppError, AppResult};
use std::path::Path;

/// Magic bytes at the start of every PDF file.
const PDF_MAGIC: &[u8] = b"%PDF";

/// Extract text from an uploaded byte stream.
///
/// PDFs are detected by their `%PDF` header; everything else is treated as
/// UTF-8 plain text. Unreadable input, invalid UTF-8 and extraction that
/// yields no text all fail with `ExtractionFailed`.
pub fn extract_text(bytes: &[u8], source: &str) -> AppResult<Document> {
    let text = if bytes.starts_with(PDF_MAGIC) {
        extract_pdf_text(bytes)?
    } else {
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            AppError::ExtractionFailed(format!("'{}' is not valid UTF-8 text: {}", source, e))
        })?
    };

    if text.trim().is_empty() {
        return Err(AppError::ExtractionFailed(format!(
            "No text could be extracted from '{}'",
            source
        )));
    }

    tracing::info!(
        "Extracted {} characters from '{}'",
        text.chars().count(),
        source
    );

    Ok(Document::new(source, text))
}

/// Read and extract a document from a file on disk.
///
/// An unreadable file is an `ExtractionFailed` like every other ingestion
/// problem, so the shell reports one consistent category.
pub fn read_file(path: &Path) -> AppResult<Document> {
    let bytes = std::fs::read(path).map_err(|e| {
        AppError::ExtractionFailed(format!("Cannot read '{}': {}", path.display(), e))
    })?;
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    extract_text(&bytes, &source)
}

fn extract_pdf_text(bytes: &[u8]) -> AppResult<String> {
    tracing::debug!("Extracting PDF text ({} bytes)", bytes.len());

    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::ExtractionFailed(format!("Unreadable PDF: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_plain_text_extraction() {
        let doc = extract_text(b"The sky is blue.", "notes.txt").unwrap();
        assert_eq!(doc.text, "The sky is blue.");
        assert_eq!(doc.source, "notes.txt");
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let err = extract_text(&[0xff, 0xfe, 0x00, 0x41], "garbage.bin").unwrap_err();
        assert!(matches!(err, AppError::ExtractionFailed(_)));
    }

    #[test]
    fn test_corrupt_pdf_fails() {
        // Carries the PDF magic but no valid structure behind it
        let err = extract_text(b"%PDF-1.7 this is not a real pdf", "broken.pdf").unwrap_err();
        assert!(matches!(err, AppError::ExtractionFailed(_)));
    }

    #[test]
    fn test_empty_input_fails() {
        let err = extract_text(b"   \n  ", "blank.txt").unwrap_err();
        assert!(matches!(err, AppError::ExtractionFailed(_)));
        assert!(err.to_string().contains("blank.txt"));
    }

    #[test]
    fn test_read_file_uses_filename_as_source() {
        let mut file = NamedTempFile::with_suffix(".txt").unwrap();
        file.write_all(b"Grass is green.").unwrap();

        let doc = read_file(file.path()).unwrap();
        assert_eq!(doc.text, "Grass is green.");
        assert!(doc.source.ends_with(".txt"));
    }

    #[test]
    fn test_read_missing_file_is_extraction_failure() {
        let err = read_file(Path::new("/nonexistent/file.txt")).unwrap_err();
        assert!(matches!(err, AppError::ExtractionFailed(_)));
        assert!(err.to_string().contains("/nonexistent/file.txt"));
    }
}
