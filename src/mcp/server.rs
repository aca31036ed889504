//! MCP server bootstrap and request dispatch.

use std::{borrow::Cow, sync::Arc};

use crate::{
    corpus::CorpusService,
    mcp::{
        format::{SettingsSnapshot, health_payload, json_resource_contents, serialize_json},
        handlers::{
            corpus::{handle_get_document, handle_list_documents, handle_stats, handle_status},
            metrics::handle_metrics,
            prepare::handle_prepare,
            search::{handle_query, handle_search},
        },
        registry, schemas,
    },
};
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        AnnotateAble, CallToolRequestParam, CallToolResult, JsonObject,
        ListResourceTemplatesResult, ListResourcesResult, ListToolsResult, RawResource,
        ReadResourceRequestParam, ReadResourceResult, Resource, ServerCapabilities, ServerInfo,
        Tool, ToolAnnotations,
    },
};
const HEALTH_URI: &str = "mcp://health";
const SETTINGS_URI: &str = "mcp://settings";
const USAGE_URI: &str = "mcp://usage";

/// MCP server implementation exposing Rusty Corpus operations.
#[derive(Clone)]
pub struct RustyCorpusMcpServer {
    corpus: Arc<CorpusService>,
    registry: Arc<registry::Registry>,
}

impl RustyCorpusMcpServer {
    /// Create a new MCP server backed by the supplied corpus service.
    pub fn new(corpus: Arc<CorpusService>) -> Self {
        let mut registry = registry::Registry::default();
        registry.register_resource(HEALTH_URI, resource_health);
        registry.register_resource(SETTINGS_URI, resource_settings);
        registry.register_resource(USAGE_URI, resource_usage);

        registry.register_tool("corpus-status", tool_status);
        registry.register_tool("corpus-stats", tool_stats);
        registry.register_tool("list-documents", tool_list_documents);
        registry.register_tool("get-document", tool_get_document);
        registry.register_tool("search-corpus", tool_search);
        registry.register_tool("query-corpus", tool_query);
        registry.register_tool("prepare-document", tool_prepare);
        registry.register_tool("metrics", tool_metrics);

        Self {
            corpus,
            registry: Arc::new(registry),
        }
    }

    fn describe_tools(&self) -> Vec<Tool> {
        let company_schema = Arc::new(schemas::company_input_schema());
        vec![
            read_only_tool(
                "corpus-status",
                "Corpus Status",
                "Check whether a company has any documents or call recordings before digging in.",
                company_schema.clone(),
            ),
            read_only_tool(
                "corpus-stats",
                "Corpus Statistics",
                "Word and character totals, file type breakdown, and the largest and smallest items.",
                company_schema.clone(),
            ),
            read_only_tool(
                "list-documents",
                "List Corpus Documents",
                "Browse every corpus item with a short preview and word count.",
                company_schema,
            ),
            read_only_tool(
                "get-document",
                "Get Document",
                "Fetch the full text of one document or call recording by id.",
                Arc::new(schemas::document_input_schema()),
            ),
            read_only_tool(
                "search-corpus",
                "Search Corpus",
                "Find items containing a literal term, ranked by match count with a highlighted snippet.",
                Arc::new(schemas::search_input_schema()),
            ),
            Tool {
                name: Cow::Borrowed("query-corpus"),
                title: Some("Ask the Corpus".to_string()),
                description: Some(Cow::Borrowed(
                    "Answer a question using the whole company corpus as context; requires a generation provider.",
                )),
                input_schema: Arc::new(schemas::query_input_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Ask the Corpus")
                        .read_only(true)
                        .idempotent(false)
                        .open_world(true),
                ),
                icons: None,
            },
            read_only_tool(
                "prepare-document",
                "Prepare Document",
                "Split text into overlapping chunks and report its word, sentence, and paragraph metrics.",
                Arc::new(schemas::prepare_input_schema()),
            ),
            read_only_tool(
                "metrics",
                "Metrics Snapshot",
                "Check how many corpora, searches, and prepared documents the server has handled.",
                Arc::new(schemas::empty_object_schema()),
            ),
        ]
    }

    fn describe_resources(&self) -> Vec<Resource> {
        let mut health = RawResource::new(HEALTH_URI, "health");
        health.description = Some("Record store reachability and generation availability".into());

        let mut settings = RawResource::new(SETTINGS_URI, "settings");
        settings.description = Some("Effective chunking, search, and generation defaults".into());

        let mut usage = RawResource::new(USAGE_URI, "usage");
        usage.description = Some("Recommended tool flow for exploring a company corpus".into());

        vec![
            health.no_annotation(),
            settings.no_annotation(),
            usage.no_annotation(),
        ]
    }
}

fn read_only_tool(
    name: &'static str,
    title: &'static str,
    description: &'static str,
    input_schema: Arc<JsonObject>,
) -> Tool {
    Tool {
        name: Cow::Borrowed(name),
        title: Some(title.to_string()),
        description: Some(Cow::Borrowed(description)),
        input_schema,
        output_schema: None,
        annotations: Some(
            ToolAnnotations::with_title(title)
                .read_only(true)
                .idempotent(true)
                .open_world(false),
        ),
        icons: None,
    }
}

fn resource_health(
    server: &RustyCorpusMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    let corpus = server.corpus.clone();
    Box::pin(async move {
        let snapshot = corpus.store_health().await;
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                HEALTH_URI,
                health_payload(
                    &snapshot,
                    corpus.generation_enabled(),
                    &corpus.settings().generation_model,
                ),
            )],
        })
    })
}

fn resource_settings(
    server: &RustyCorpusMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    let corpus = server.corpus.clone();
    Box::pin(async move {
        let payload = SettingsSnapshot::new(corpus.settings(), corpus.generation_enabled());
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                SETTINGS_URI,
                serialize_json(&payload, SETTINGS_URI),
            )],
        })
    })
}

fn resource_usage(
    _server: &RustyCorpusMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    Box::pin(async move {
        let usage = serde_json::json!({
            "title": "Rusty Corpus MCP Usage",
            "policy": [
                "Call corpus-status first; an empty corpus has nothing to search or ask.",
                "Prefer search-corpus over get-document when looking for a specific fact.",
                "Search terms are literal and case-insensitive, not regular expressions.",
                "query-corpus sends the whole corpus to the model; use it for synthesis, not lookup.",
            ],
            "flows": [
                {
                    "name": "Explore",
                    "steps": [
                        "corpus-status({ company_id })",
                        "list-documents({ company_id })",
                        "get-document({ company_id, item_id })"
                    ]
                },
                {
                    "name": "Find & Ask",
                    "steps": [
                        "search-corpus({ company_id, search_term })",
                        "query-corpus({ company_id, question })"
                    ]
                }
            ]
        });
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                USAGE_URI,
                serialize_json(&usage, USAGE_URI),
            )],
        })
    })
}

fn tool_status(server: &RustyCorpusMcpServer, request: CallToolRequestParam) -> registry::ToolFuture {
    let corpus = server.corpus.clone();
    Box::pin(async move { handle_status(corpus.as_ref(), request.arguments).await })
}

fn tool_stats(server: &RustyCorpusMcpServer, request: CallToolRequestParam) -> registry::ToolFuture {
    let corpus = server.corpus.clone();
    Box::pin(async move { handle_stats(corpus.as_ref(), request.arguments).await })
}

fn tool_list_documents(
    server: &RustyCorpusMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let corpus = server.corpus.clone();
    Box::pin(async move { handle_list_documents(corpus.as_ref(), request.arguments).await })
}

fn tool_get_document(
    server: &RustyCorpusMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let corpus = server.corpus.clone();
    Box::pin(async move { handle_get_document(corpus.as_ref(), request.arguments).await })
}

fn tool_search(server: &RustyCorpusMcpServer, request: CallToolRequestParam) -> registry::ToolFuture {
    let corpus = server.corpus.clone();
    Box::pin(async move { handle_search(corpus.as_ref(), request.arguments).await })
}

fn tool_query(server: &RustyCorpusMcpServer, request: CallToolRequestParam) -> registry::ToolFuture {
    let corpus = server.corpus.clone();
    Box::pin(async move { handle_query(corpus.as_ref(), request.arguments).await })
}

fn tool_prepare(
    server: &RustyCorpusMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let result = handle_prepare(server.corpus.as_ref(), request.arguments);
    Box::pin(std::future::ready(result))
}

fn tool_metrics(
    server: &RustyCorpusMcpServer,
    _request: CallToolRequestParam,
) -> registry::ToolFuture {
    let result = handle_metrics(server.corpus.as_ref());
    Box::pin(std::future::ready(result))
}

impl ServerHandler for RustyCorpusMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut implementation = rmcp::model::Implementation::from_build_env();
        implementation.name = "rusty-corpus".to_string();
        implementation.title = Some("Rusty Corpus MCP".to_string());
        implementation.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: implementation,
            instructions: Some(
                "Use this server to explore a company's documents and call recordings: check corpus status, browse and read items, run literal keyword search, review corpus statistics, and ask questions answered from the corpus.".into(),
            ),
            ..ServerInfo::default()
        }
    }

    fn list_resources(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        let resources = self.describe_resources();
        std::future::ready(Ok(ListResourcesResult::with_all_items(resources)))
    }

    fn list_resource_templates(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourceTemplatesResult, McpError>> + Send + '_
    {
        std::future::ready(Ok(ListResourceTemplatesResult::with_all_items(Vec::new())))
    }

    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools = self.describe_tools();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            if let Some(handler) = self.registry.resources.get(request.uri.as_str()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown resource URI: {}", request.uri),
                None,
            ))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            if let Some(handler) = self.registry.tools.get(request.name.as_ref()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown tool: {}", request.name),
                None,
            ))
        }
    }
}
