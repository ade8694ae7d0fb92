//! The per-document screening pipeline and the batch runner.
//!
//! Each document flows extract → normalize → request → parse on its own
//! task; a failure anywhere turns into a `FailedDocument` record for that
//! file alone and never aborts siblings. The batch result is always a
//! partition of successes and failures.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::analysis::parser::ResponseGrammar;
use crate::analysis::requester::{request_analysis, AnalysisError};
use crate::extract::{self, ExtractError, UploadedDocument};
use crate::llm_client::LlmClient;
use crate::models::report::{FailedDocument, ScreenedResume, ScreeningCriteria, ScreeningResponse};
use crate::text::normalize;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{filename}: {source}")]
    Extract {
        filename: String,
        #[source]
        source: ExtractError,
    },

    #[error("{filename}: {source}")]
    Analysis {
        filename: String,
        #[source]
        source: AnalysisError,
    },

    #[error("{filename}: {message}")]
    Task { filename: String, message: String },
}

impl PipelineError {
    pub fn filename(&self) -> &str {
        match self {
            PipelineError::Extract { filename, .. }
            | PipelineError::Analysis { filename, .. }
            | PipelineError::Task { filename, .. } => filename,
        }
    }

    /// Error text without the filename prefix, for the failure record.
    pub fn detail(&self) -> String {
        match self {
            PipelineError::Extract { source, .. } => source.to_string(),
            PipelineError::Analysis { source, .. } => source.to_string(),
            PipelineError::Task { message, .. } => message.clone(),
        }
    }
}

/// Runs one document through the full pipeline.
pub async fn screen_document(
    llm: &LlmClient,
    grammar: &dyn ResponseGrammar,
    criteria: &ScreeningCriteria,
    document: UploadedDocument,
) -> Result<ScreenedResume, PipelineError> {
    let filename = document.filename.clone();

    // Extraction parses binary formats and may shell out for OCR; keep it
    // off the async workers.
    let extraction = tokio::task::spawn_blocking(move || extract::extract(&document))
        .await
        .map_err(|e| PipelineError::Task {
            filename: filename.clone(),
            message: format!("extraction task failed: {e}"),
        })?
        .map_err(|e| PipelineError::Extract {
            filename: filename.clone(),
            source: e,
        })?;

    let cleaned = normalize(&extraction.raw_text);
    debug!(
        file = %filename,
        method = ?extraction.method,
        chars = cleaned.len(),
        "resume text ready"
    );

    let response = request_analysis(llm, &cleaned, criteria)
        .await
        .map_err(|e| PipelineError::Analysis {
            filename: filename.clone(),
            source: e,
        })?;

    let report = grammar.parse(&response);
    Ok(ScreenedResume {
        filename,
        extraction_method: extraction.method,
        report,
    })
}

/// Screens a batch of documents, one task per document, and partitions the
/// outcomes. Input order does not matter: results are re-sorted by
/// descending match score.
pub async fn run_screening(
    llm: LlmClient,
    grammar: Arc<dyn ResponseGrammar>,
    criteria: ScreeningCriteria,
    documents: Vec<UploadedDocument>,
) -> ScreeningResponse {
    let total = documents.len();
    let mut tasks = JoinSet::new();

    for document in documents {
        let llm = llm.clone();
        let grammar = Arc::clone(&grammar);
        let criteria = criteria.clone();
        tasks.spawn(async move {
            screen_document(&llm, grammar.as_ref(), &criteria, document).await
        });
    }

    let mut outcomes = Vec::with_capacity(total);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            // A panicked task degrades to a failure record; the filename is
            // gone with the task.
            Err(e) => outcomes.push(Err(PipelineError::Task {
                filename: "(unknown)".to_string(),
                message: format!("screening task failed: {e}"),
            })),
        }
    }

    partition_outcomes(outcomes, total)
}

/// Splits per-document outcomes into ranked successes and failure records.
pub fn partition_outcomes(
    outcomes: Vec<Result<ScreenedResume, PipelineError>>,
    total: usize,
) -> ScreeningResponse {
    let mut results = Vec::new();
    let mut failures = Vec::new();

    for outcome in outcomes {
        match outcome {
            Ok(screened) => results.push(screened),
            Err(e) => {
                warn!("screening failed for {}: {}", e.filename(), e.detail());
                failures.push(FailedDocument {
                    filename: e.filename().to_string(),
                    error: e.detail(),
                });
            }
        }
    }

    results.sort_by(|a, b| b.report.match_score.cmp(&a.report.match_score));

    ScreeningResponse {
        analyzed: results.len(),
        total,
        results,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractionMethod;
    use crate::models::report::AnalysisReport;

    fn screened(filename: &str, score: u8) -> ScreenedResume {
        ScreenedResume {
            filename: filename.to_string(),
            extraction_method: ExtractionMethod::Native,
            report: AnalysisReport {
                match_score: score,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_partition_sorts_by_descending_score_and_keeps_failures() {
        let outcomes = vec![
            Ok(screened("low.pdf", 41)),
            Err(PipelineError::Extract {
                filename: "broken.pdf".to_string(),
                source: ExtractError::Extraction("unreadable".to_string()),
            }),
            Ok(screened("high.pdf", 93)),
        ];

        let response = partition_outcomes(outcomes, 3);
        assert_eq!(response.total, 3);
        assert_eq!(response.analyzed, 2);
        assert_eq!(response.results[0].filename, "high.pdf");
        assert_eq!(response.results[1].filename, "low.pdf");
        assert_eq!(response.failures.len(), 1);
        assert_eq!(response.failures[0].filename, "broken.pdf");
        assert_eq!(response.failures[0].error, "failed to extract text: unreadable");
    }

    #[test]
    fn test_partition_all_failures_is_not_an_error() {
        let outcomes = vec![Err(PipelineError::Analysis {
            filename: "cv.docx".to_string(),
            source: AnalysisError::EmptyInput,
        })];
        let response = partition_outcomes(outcomes, 1);
        assert_eq!(response.analyzed, 0);
        assert!(response.results.is_empty());
        assert_eq!(response.failures[0].filename, "cv.docx");
    }

    #[test]
    fn test_pipeline_error_separates_filename_from_detail() {
        let e = PipelineError::Analysis {
            filename: "cv.pdf".to_string(),
            source: AnalysisError::RequestFailed("connection refused".to_string()),
        };
        assert_eq!(e.filename(), "cv.pdf");
        assert_eq!(e.detail(), "analysis request failed: connection refused");
        assert_eq!(e.to_string(), "cv.pdf: analysis request failed: connection refused");
    }

    #[tokio::test]
    async fn test_batch_with_one_bad_document_partitions() {
        // Both documents fail before any remote call is attempted: one on
        // format, one on empty text after docx extraction of a bad archive.
        let llm = LlmClient::new("test-key".to_string());
        let grammar: Arc<dyn ResponseGrammar> =
            Arc::new(crate::analysis::parser::NumberedListGrammar);
        let documents = vec![
            UploadedDocument {
                filename: "resume.txt".to_string(),
                bytes: bytes::Bytes::from_static(b"unsupported"),
            },
            UploadedDocument {
                filename: "resume.docx".to_string(),
                bytes: bytes::Bytes::from_static(b"not a zip"),
            },
        ];

        let response = run_screening(llm, grammar, ScreeningCriteria::default(), documents).await;
        assert_eq!(response.total, 2);
        assert_eq!(response.analyzed, 0);
        assert_eq!(response.failures.len(), 2);
        let mut failed: Vec<_> = response.failures.iter().map(|f| f.filename.as_str()).collect();
        failed.sort();
        assert_eq!(failed, vec!["resume.docx", "resume.txt"]);
    }
}
