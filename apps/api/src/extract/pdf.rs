//! PDF text extraction.
//!
//! Two native passes per document: a strict per-page pass that keeps layout
//! runs separate (lopdf), and a character-flow pass (pdf-extract) used to
//! retry pages the strict pass read poorly. Documents that stay below a
//! minimum yield after both passes go through OCR, and the longer output
//! wins wholesale.

use std::path::Path;

use lopdf::Document;
use tracing::{debug, warn};

use super::ocr;
use super::{ExtractError, ExtractionMethod, ExtractionResult};

/// A page below this many characters is retried with the flow pass.
const PAGE_RETRY_MIN_CHARS: usize = 50;
/// A document below this many characters total triggers the OCR fallback.
const OCR_MIN_TOTAL_CHARS: usize = 100;

pub fn extract_pdf(path: &Path) -> Result<ExtractionResult, ExtractError> {
    let native = extract_native(path)?;

    if printable_chars(&native) >= OCR_MIN_TOTAL_CHARS {
        return Ok(ExtractionResult {
            raw_text: native,
            method: ExtractionMethod::Native,
        });
    }

    // Low-yield document, likely scanned. Rasterize and recognize; keep
    // whichever side reads more (documented prefer-longer policy).
    match ocr::recognize_document(path) {
        Ok(recognized) if printable_chars(&recognized) > printable_chars(&native) => {
            debug!(
                native_chars = printable_chars(&native),
                ocr_chars = printable_chars(&recognized),
                "preferring OCR output over native extraction"
            );
            Ok(ExtractionResult {
                raw_text: recognized,
                method: ExtractionMethod::OcrFallback,
            })
        }
        Ok(_) => Ok(ExtractionResult {
            raw_text: native,
            method: ExtractionMethod::Native,
        }),
        Err(e) => {
            warn!("OCR fallback unavailable, keeping native extraction: {e}");
            Ok(ExtractionResult {
                raw_text: native,
                method: ExtractionMethod::Native,
            })
        }
    }
}

/// Runs the strict pass, retrying low-yield pages with the flow pass.
/// A zero-page document comes back as empty text, not an error; extraction
/// only fails when neither pass can read the file at all.
fn extract_native(path: &Path) -> Result<String, ExtractError> {
    match strict_pages(path) {
        Ok(pages) => {
            let needs_flow = pages.iter().any(|p| p.trim().len() < PAGE_RETRY_MIN_CHARS);
            let flow = if needs_flow {
                flow_pages(path).unwrap_or_else(|e| {
                    debug!("flow pass failed, keeping strict pages: {e}");
                    Vec::new()
                })
            } else {
                Vec::new()
            };
            Ok(merge_passes(&pages, &flow))
        }
        Err(strict_err) => match flow_pages(path) {
            Ok(pages) => {
                debug!("strict pass failed ({strict_err}), using flow pass");
                Ok(pages.join("\n"))
            }
            Err(flow_err) => Err(ExtractError::Extraction(format!(
                "strict pass: {strict_err}; flow pass: {flow_err}"
            ))),
        },
    }
}

/// Per-page extraction via lopdf content streams. A page whose stream fails
/// to decode contributes an empty string, which the flow pass then covers.
fn strict_pages(path: &Path) -> Result<Vec<String>, String> {
    let doc = Document::load(path).map_err(|e| format!("failed to load PDF: {e}"))?;
    Ok(doc
        .get_pages()
        .into_keys()
        .map(|page| doc.extract_text(&[page]).unwrap_or_default())
        .collect())
}

/// Per-page extraction via pdf-extract, which reflows characters into
/// reading order and tolerates layouts the strict pass fragments.
fn flow_pages(path: &Path) -> Result<Vec<String>, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    pdf_extract::extract_text_from_mem_by_pages(&bytes)
        .map_err(|e| format!("character-flow extraction failed: {e}"))
}

/// Joins pages with newlines, substituting the flow-pass page wherever the
/// strict page fell under the retry threshold and the flow page read more.
fn merge_passes(strict: &[String], flow: &[String]) -> String {
    strict
        .iter()
        .enumerate()
        .map(|(i, tight)| {
            if tight.trim().len() >= PAGE_RETRY_MIN_CHARS {
                return tight.trim_end();
            }
            match flow.get(i) {
                Some(reflowed) if reflowed.trim().len() > tight.trim().len() => {
                    reflowed.trim_end()
                }
                _ => tight.trim_end(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Yield measured in printable characters, the unit both fallback
/// thresholds are defined in.
fn printable_chars(text: &str) -> usize {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_ascii_punctuation() || c.is_whitespace())
        .count()
}
