//! Handler for the metrics tool.

use crate::{corpus::CorpusApi, mcp::format::structured_result};
use rmcp::{ErrorData as McpError, model::CallToolResult};

/// Handle the `metrics` tool, returning the current corpus counters.
pub(crate) fn handle_metrics<S: CorpusApi + ?Sized>(
    corpus: &S,
) -> Result<CallToolResult, McpError> {
    structured_result(&corpus.metrics_snapshot())
}
