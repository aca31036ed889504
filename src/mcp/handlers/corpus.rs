//! Handlers for corpus inspection tools.

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
use serde_json::json;

#[derive(Debug, Deserialize)]
struct CompanyArgs {
    company_id: String,
}

#[derive(Debug, Deserialize)]
struct DocumentArgs {
    company_id: String,
    item_id: String,
}

/// Handle `corpus-status`: item counts without assembling the corpus.
pub(crate) async fn handle_status<S: CorpusApi + ?Sized>(
    corpus: &S,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: CompanyArgs = parse_arguments(arguments)?;
    let status = corpus
        .status(&args.company_id)
        .await
        .map_err(corpus_error)?;
    structured_result(&status)
}

/// Handle `corpus-stats`.
pub(crate) async fn handle_stats<S: CorpusApi + ?Sized>(
    corpus: &S,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: CompanyArgs = parse_arguments(arguments)?;
    let stats = corpus.stats(&args.company_id).await.map_err(corpus_error)?;
    structured_result(&json!({ "stats": stats }))
}

/// Handle `list-documents`, returning previews of every corpus item.
pub(crate) async fn handle_list_documents<S: CorpusApi + ?Sized>(
    corpus: &S,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: CompanyArgs = parse_arguments(arguments)?;
    let documents = corpus
        .documents(&args.company_id)
        .await
        .map_err(corpus_error)?;
    let count = documents.len();
    structured_result(&json!({ "documents": documents, "count": count }))
}

/// Handle `get-document`, returning the full content of one item.
pub(crate) async fn handle_get_document<S: CorpusApi + ?Sized>(
    corpus: &S,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: DocumentArgs = parse_arguments(arguments)?;
    let document = corpus
        .document_content(&args.company_id, &args.item_id)
        .await
        .map_err(corpus_error)?;
    structured_result(&json!({ "document": document }))
}
