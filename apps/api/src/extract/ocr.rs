//! Optical character recognition for scanned PDFs, via the system
//! `pdftoppm` (poppler-utils) and `tesseract` binaries. Page images are
//! rendered into a scratch tempdir that is removed when the call returns.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info, warn};

use super::ExtractError;

const OCR_DPI: u32 = 300;
const OCR_LANG: &str = "eng";

/// Probes for the OCR toolchain on PATH.
pub fn is_available() -> bool {
    let pdftoppm = Command::new("pdftoppm").arg("-v").output().is_ok();
    let tesseract = Command::new("tesseract").arg("--version").output().is_ok();

    if !pdftoppm {
        debug!("pdftoppm not found - install poppler-utils for OCR support");
    }
    if !tesseract {
        debug!("tesseract not found - install tesseract-ocr for OCR support");
    }

    pdftoppm && tesseract
}

/// Rasterizes every page of the PDF and runs recognition on each, returning
/// the per-page text joined by newlines.
pub fn recognize_document(path: &Path) -> Result<String, ExtractError> {
    if !is_available() {
        return Err(ExtractError::Extraction(
            "OCR requires pdftoppm (poppler-utils) and tesseract to be installed".to_string(),
        ));
    }

    let scratch = tempfile::tempdir()?;
    let output_prefix = scratch.path().join("page");

    let rendered = Command::new("pdftoppm")
        .arg("-png")
        .arg("-r")
        .arg(OCR_DPI.to_string())
        .arg(path)
        .arg(&output_prefix)
        .output()?;

    if !rendered.status.success() {
        return Err(ExtractError::Extraction(format!(
            "pdftoppm failed: {}",
            String::from_utf8_lossy(&rendered.stderr)
        )));
    }

    let mut images: Vec<_> = std::fs::read_dir(scratch.path())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
        .collect();
    images.sort();

    if images.is_empty() {
        return Err(ExtractError::Extraction(
            "pdftoppm produced no page images".to_string(),
        ));
    }

    let mut pages = Vec::with_capacity(images.len());
    for (i, image) in images.iter().enumerate() {
        let recognized = Command::new("tesseract")
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(OCR_LANG)
            .output()?;

        if !recognized.status.success() {
            warn!(
                "tesseract reported a failure on page {}: {}",
                i + 1,
                String::from_utf8_lossy(&recognized.stderr)
            );
        }

        pages.push(String::from_utf8_lossy(&recognized.stdout).into_owned());
    }

    info!(pages = pages.len(), "OCR pass complete");
    Ok(pages.join("\n"))
}
