//! Tool handlers for the MCP server.

use crate::corpus::CorpusError;
use rmcp::{ErrorData as McpError, model::JsonObject};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub mod corpus;
pub mod metrics;
pub mod prepare;
pub mod search;

/// Parse structured arguments supplied to a tool invocation.
pub(crate) fn parse_arguments<T: DeserializeOwned>(
    arguments: Option<JsonObject>,
) -> Result<T, McpError> {
    let value = arguments
        .map(Value::Object)
        .unwrap_or_else(|| Value::Object(JsonObject::new()));
    parse_arguments_value(value)
}

/// Deserialize arguments represented as a JSON value into the target type.
pub(crate) fn parse_arguments_value<T: DeserializeOwned>(value: Value) -> Result<T, McpError> {
    serde_json::from_value(value)
        .map_err(|err| McpError::invalid_params(format!("Invalid arguments: {err}"), None))
}

/// Map corpus failures onto MCP errors; caller mistakes become `invalid_params`.
pub(crate) fn corpus_error(err: CorpusError) -> McpError {
    match err {
        CorpusError::InvalidInput(_)
        | CorpusError::NotFound { .. }
        | CorpusError::Chunking(_)
        | CorpusError::EmptyCorpus { .. } => McpError::invalid_params(err.to_string(), None),
        other => {
            tracing::error!(error = %other, "Corpus operation failed");
            McpError::internal_error(other.to_string(), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{corpus::ChunkingError, store::StoreError};
    use rmcp::model::ErrorCode;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Args {
        company_id: String,
    }

    #[test]
    fn missing_arguments_are_invalid_params() {
        let err = parse_arguments::<Args>(None).unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("company_id"));
    }

    #[test]
    fn parses_object_arguments() {
        let Value::Object(arguments) = json!({ "company_id": "acme" }) else {
            unreachable!()
        };
        let args: Args = parse_arguments(Some(arguments)).unwrap();
        assert_eq!(args.company_id, "acme");
    }

    #[test]
    fn caller_errors_map_to_invalid_params() {
        let not_found = corpus_error(CorpusError::NotFound {
            company_id: "acme".into(),
            item_id: "x".into(),
        });
        assert_eq!(not_found.code, ErrorCode::INVALID_PARAMS);

        let chunking = corpus_error(CorpusError::Chunking(ChunkingError::InvalidChunkSize));
        assert_eq!(chunking.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn store_errors_map_to_internal_error() {
        let err = corpus_error(CorpusError::CorpusUnavailable(StoreError::Fixture(
            "missing".into(),
        )));
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    }
}
