//! Formatting helpers shared across MCP handlers and resources.

use crate::corpus::{CorpusSettings, StoreHealthSnapshot};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, ResourceContents},
};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value, json};

pub(crate) const APPLICATION_JSON: &str = "application/json";

/// Build the health payload summarizing record store and generation status.
pub(crate) fn health_payload(
    snapshot: &StoreHealthSnapshot,
    generation_enabled: bool,
    generation_model: &str,
) -> String {
    let mut store = Map::new();
    store.insert("reachable".into(), Value::Bool(snapshot.reachable));
    if let Some(error) = snapshot.error.as_ref() {
        store.insert("error".into(), Value::String(error.clone()));
    }

    let payload = json!({
        "recordStore": Value::Object(store),
        "generation": {
            "enabled": generation_enabled,
            "model": generation_model,
        },
    });

    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
}

/// Serialize a value to JSON, falling back to compact formatting on error.
pub(crate) fn serialize_json<T: Serialize>(value: &T, context_uri: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|error| {
        tracing::warn!(uri = context_uri, %error, "Failed to serialize JSON prettily");
        serde_json::to_string(value).unwrap_or_else(|_| "{}".into())
    })
}

/// Build JSON resource contents for MCP resource responses.
pub(crate) fn json_resource_contents(uri: &str, text: String) -> ResourceContents {
    ResourceContents::TextResourceContents {
        uri: uri.to_string(),
        mime_type: Some(APPLICATION_JSON.into()),
        text,
        meta: None,
    }
}

/// Wrap a serializable payload as a structured tool result.
pub(crate) fn structured_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let value = serde_json::to_value(value)
        .map_err(|err| McpError::internal_error(format!("Failed to encode result: {err}"), None))?;
    Ok(CallToolResult::structured(value))
}

/// Settings snapshot returned by the `settings` resource.
#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct SettingsSnapshot {
    /// Chunking defaults used by `prepare-document`.
    pub(crate) chunking: ChunkingSettingsSnapshot,
    /// Search defaults used by `search-corpus`.
    pub(crate) search: SearchSettingsSnapshot,
    /// Generation settings used by `query-corpus`.
    pub(crate) generation: GenerationSettingsSnapshot,
}

#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct ChunkingSettingsSnapshot {
    pub(crate) chunk_size: usize,
    pub(crate) chunk_overlap: usize,
}

#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct SearchSettingsSnapshot {
    /// Characters kept on each side of the first match.
    pub(crate) snippet_radius: usize,
}

#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct GenerationSettingsSnapshot {
    pub(crate) enabled: bool,
    pub(crate) model: String,
}

impl SettingsSnapshot {
    pub(crate) fn new(settings: &CorpusSettings, generation_enabled: bool) -> Self {
        Self {
            chunking: ChunkingSettingsSnapshot {
                chunk_size: settings.chunk_size,
                chunk_overlap: settings.chunk_overlap,
            },
            search: SearchSettingsSnapshot {
                snippet_radius: settings.snippet_radius,
            },
            generation: GenerationSettingsSnapshot {
                enabled: generation_enabled,
                model: settings.generation_model.clone(),
            },
        }
    }
}
