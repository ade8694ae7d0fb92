//! Document text extraction: PDF (two-pass, with an OCR fallback for
//! low-yield documents) and DOCX (paragraph concatenation).
//!
//! Uploaded bytes are staged in a named temp file for the duration of one
//! `extract` call; the file is removed on every exit path by RAII drop.

use std::io::Write;
use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod docx;
mod ocr;
mod pdf;

/// An uploaded resume file, held in memory until extraction. Transient —
/// nothing about it survives the request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub bytes: Bytes,
}

/// Supported input formats, derived from the uploaded filename's extension
/// (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename).extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => ".pdf",
            DocumentKind::Docx => ".docx",
        }
    }
}

/// Whether resume text came from direct document parsing or from optical
/// character recognition of rasterized pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Native,
    OcrFallback,
}

#[derive(Debug)]
pub struct ExtractionResult {
    pub raw_text: String,
    pub method: ExtractionMethod,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file format: {0} (expected .pdf or .docx)")]
    UnsupportedFormat(String),

    #[error("failed to extract text: {0}")]
    Extraction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Converts an uploaded document into raw text.
///
/// Empty and zero-page documents yield empty text rather than an error;
/// whether that is still screenable is decided downstream.
pub fn extract(document: &UploadedDocument) -> Result<ExtractionResult, ExtractError> {
    let kind = DocumentKind::from_filename(&document.filename)
        .ok_or_else(|| ExtractError::UnsupportedFormat(extension_label(&document.filename)))?;

    // Both format backends want a real file; the temp file is dropped (and
    // unlinked) on every exit path below, including the error ones.
    let mut staged = tempfile::Builder::new()
        .prefix("resume-upload-")
        .suffix(kind.suffix())
        .tempfile()?;
    staged.write_all(&document.bytes)?;
    staged.flush()?;

    match kind {
        DocumentKind::Pdf => pdf::extract_pdf(staged.path()),
        DocumentKind::Docx => docx::extract_docx(staged.path()).map(|raw_text| ExtractionResult {
            raw_text,
            method: ExtractionMethod::Native,
        }),
    }
}

fn extension_label(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_else(|| filename.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_filename_is_case_insensitive() {
        assert_eq!(DocumentKind::from_filename("cv.pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_filename("CV.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_filename("resume.Docx"), Some(DocumentKind::Docx));
    }

    #[test]
    fn test_kind_rejects_other_extensions() {
        assert_eq!(DocumentKind::from_filename("resume.txt"), None);
        assert_eq!(DocumentKind::from_filename("archive.pdf.zip"), None);
        assert_eq!(DocumentKind::from_filename("no_extension"), None);
    }

    #[test]
    fn test_extract_unsupported_format() {
        let document = UploadedDocument {
            filename: "notes.txt".to_string(),
            bytes: Bytes::from_static(b"plain text"),
        };
        match extract(&document) {
            Err(ExtractError::UnsupportedFormat(label)) => assert_eq!(label, ".txt"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_corrupt_pdf_is_extraction_error() {
        let document = UploadedDocument {
            filename: "broken.pdf".to_string(),
            bytes: Bytes::from_static(b"this is not a pdf"),
        };
        assert!(matches!(extract(&document), Err(ExtractError::Extraction(_))));
    }

    #[test]
    fn test_extract_docx_round_trip() {
        // Minimal DOCX: a zip archive holding word/document.xml.
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Jane Doe</w:t></w:r><w:r><w:t xml:space="preserve"> — Engineer</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>Python, SQL</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("word/document.xml", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }

        let document = UploadedDocument {
            filename: "cv.docx".to_string(),
            bytes: Bytes::from(cursor.into_inner()),
        };
        let result = extract(&document).unwrap();
        assert_eq!(result.method, ExtractionMethod::Native);
        assert_eq!(result.raw_text, "Jane Doe — Engineer\n\nPython, SQL");
    }

    #[test]
    fn test_extract_docx_not_an_archive() {
        let document = UploadedDocument {
            filename: "cv.docx".to_string(),
            bytes: Bytes::from_static(b"definitely not a zip"),
        };
        assert!(matches!(extract(&document), Err(ExtractError::Extraction(_))));
    }
}
