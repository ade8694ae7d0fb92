//! Axum route handler for the Screening API.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::info;

use crate::errors::AppError;
use crate::extract::UploadedDocument;
use crate::models::report::{ScreeningCriteria, ScreeningResponse};
use crate::screening::pipeline::run_screening;
use crate::state::AppState;

/// POST /api/v1/screenings
///
/// Multipart form: any number of file parts (the resumes) plus optional
/// `technical_skills` / `soft_skills` text parts with comma-separated
/// values. Returns the ranked batch partition; per-document failures ride
/// in the response body and are never an HTTP error.
pub async fn handle_screen(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let mut documents = Vec::new();
    let mut technical_skills = String::new();
    let mut soft_skills = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart request: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("technical_skills") => {
                technical_skills = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable technical_skills field: {e}")))?;
            }
            Some("soft_skills") => {
                soft_skills = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable soft_skills field: {e}")))?;
            }
            _ => {
                // Every other part with a filename is treated as a resume.
                let Some(filename) = field.file_name().map(str::to_string) else {
                    continue;
                };
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("failed to read upload '{filename}': {e}"))
                })?;
                documents.push(UploadedDocument { filename, bytes });
            }
        }
    }

    if documents.is_empty() {
        return Err(AppError::Validation(
            "at least one resume file is required".to_string(),
        ));
    }

    let criteria = ScreeningCriteria::from_comma_lists(&technical_skills, &soft_skills);
    info!(
        files = documents.len(),
        general_evaluation = criteria.is_empty(),
        "screening batch started"
    );

    let response = run_screening(
        state.llm.clone(),
        Arc::clone(&state.grammar),
        criteria,
        documents,
    )
    .await;

    info!(
        analyzed = response.analyzed,
        failed = response.failures.len(),
        "screening batch complete"
    );

    Ok(Json(response))
}
