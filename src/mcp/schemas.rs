//! JSON schema builders for MCP tools.

use serde_json::{Map, Value};

const COMPANY_ID_DESCRIPTION: &str = "Company whose documents and call recordings form the corpus";

/// Schema for tools that only take a company identifier.
pub(crate) fn company_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("company_id".into(), string_schema(COMPANY_ID_DESCRIPTION));
    finalize_object_schema(properties, &["company_id"])
}

/// Build the schema describing the `get-document` tool input.
pub(crate) fn document_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("company_id".into(), string_schema(COMPANY_ID_DESCRIPTION));
    properties.insert(
        "item_id".into(),
        string_schema("Identifier of a document or call recording in the corpus"),
    );
    finalize_object_schema(properties, &["company_id", "item_id"])
}

/// Build the schema describing the `search-corpus` tool input.
pub(crate) fn search_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("company_id".into(), string_schema(COMPANY_ID_DESCRIPTION));

    let mut term_schema = Map::new();
    term_schema.insert("type".into(), Value::String("string".into()));
    term_schema.insert(
        "description".into(),
        Value::String(
            "Case-insensitive literal term, matched exactly including whitespace".into(),
        ),
    );
    term_schema.insert("minLength".into(), Value::from(1));
    properties.insert("search_term".into(), Value::Object(term_schema));

    finalize_object_schema(properties, &["company_id", "search_term"])
}

/// Build the schema describing the `query-corpus` tool input.
pub(crate) fn query_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("company_id".into(), string_schema(COMPANY_ID_DESCRIPTION));
    properties.insert(
        "question".into(),
        string_schema("Question answered from the company corpus"),
    );
    finalize_object_schema(properties, &["company_id", "question"])
}

/// Build the schema describing the `prepare-document` tool input.
pub(crate) fn prepare_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "text".into(),
        string_schema("Raw text to split into overlapping chunks and measure"),
    );
    finalize_object_schema(properties, &["text"])
}

/// Schema for tools without arguments.
pub(crate) fn empty_object_schema() -> Map<String, Value> {
    finalize_object_schema(Map::new(), &[])
}

fn string_schema(description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("string".into()));
    schema.insert("description".into(), Value::String(description.into()));
    Value::Object(schema)
}

fn finalize_object_schema(properties: Map<String, Value>, required: &[&str]) -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("object".into()));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert(
            "required".into(),
            Value::Array(
                required
                    .iter()
                    .map(|&key| Value::String(key.into()))
                    .collect(),
            ),
        );
    }
    schema.insert("additionalProperties".into(), Value::Bool(false));
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_schema_requires_company_and_term() {
        let schema = search_input_schema();
        assert_eq!(schema["required"], json!(["company_id", "search_term"]));
        assert_eq!(schema["properties"]["search_term"]["minLength"], json!(1));
        assert_eq!(schema["additionalProperties"], json!(false));
    }

    #[test]
    fn empty_schema_has_no_required_list() {
        let schema = empty_object_schema();
        assert!(!schema.contains_key("required"));
        assert_eq!(schema["properties"], json!({}));
    }
}
