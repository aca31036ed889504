//! Handlers for lexical search and knowledge-base questions.

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
struct SearchArgs {
    company_id: String,
    search_term: String,
}

#[derive(Debug, Deserialize)]
struct QueryArgs {
    company_id: String,
    question: String,
}

/// Handle `search-corpus`.
pub(crate) async fn handle_search<S: CorpusApi + ?Sized>(
    corpus: &S,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: SearchArgs = parse_arguments(arguments)?;
    if args.search_term.trim().is_empty() {
        return Err(McpError::invalid_params(
            "search_term must not be blank",
            None,
        ));
    }

    let results = corpus
        .search(&args.company_id, &args.search_term)
        .await
        .map_err(corpus_error)?;
    let count = results.len();
    structured_result(&json!({
        "results": results,
        "count": count,
        "searchTerm": args.search_term,
    }))
}

/// Handle `query-corpus`, answering a question from the assembled corpus.
pub(crate) async fn handle_query<S: CorpusApi + ?Sized>(
    corpus: &S,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: QueryArgs = parse_arguments(arguments)?;
    let answer = corpus
        .query(&args.company_id, &args.question)
        .await
        .map_err(corpus_error)?;
    structured_result(&answer)
}
