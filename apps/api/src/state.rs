use std::sync::Arc;

use crate::analysis::parser::ResponseGrammar;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Pluggable reply grammar. Default: `NumberedListGrammar` (line-pattern
    /// matching). A structured-output grammar can be swapped in here without
    /// touching the pipeline.
    pub grammar: Arc<dyn ResponseGrammar>,
}
