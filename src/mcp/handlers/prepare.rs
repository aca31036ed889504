//! Handler for the document preparation tool.

use crate::{
    corpus::CorpusApi,
    mcp::{
        format::structured_result,
        handlers::{corpus_error, parse_arguments},
    },
};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PrepareArgs {
    text: String,
}

/// Handle `prepare-document`, chunking and measuring caller-supplied text.
pub(crate) fn handle_prepare<S: CorpusApi + ?Sized>(
    corpus: &S,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: PrepareArgs = parse_arguments(arguments)?;
    let prepared = corpus
        .prepare_document(&args.text)
        .map_err(corpus_error)?;
    structured_result(&prepared)
}
