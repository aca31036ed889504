use std::sync::Arc;

use httpmock::{
    Method::{GET, POST},
    Mock, MockServer,
};
use rmcp::{
    handler::client::ClientHandler,
    model::{
        self, CallToolRequestParam, ClientInfo, PaginatedRequestParam, ReadResourceRequestParam,
        ResourceContents,
    },
    service::{RoleClient, RoleServer, RunningService, Service, serve_directly},
    transport::async_rw::AsyncRwTransport,
};
use rustycorpus::{config, corpus::CorpusService, logging, mcp::RustyCorpusMcpServer};
use serde_json::{Value, json};
use tokio::{io::split, sync::OnceCell};

static INIT: OnceCell<()> = OnceCell::const_new();
static MOCK_SERVER: OnceCell<&'static MockServer> = OnceCell::const_new();
static MOCK_HANDLES: OnceCell<Vec<Mock<'static>>> = OnceCell::const_new();

const COMPANY: &str = "acme";
const GENERATED_ANSWER: &str = "Plans start at $10 per seat.";

fn set_env(key: &str, value: &str) {
    // SAFETY: Tests run in a single process and establish deterministic configuration upfront.
    unsafe { std::env::set_var(key, value) }
}

fn arguments(value: Value) -> Option<model::JsonObject> {
    value.as_object().cloned()
}

#[derive(Clone, Default)]
struct DummyClientHandler;

impl ClientHandler for DummyClientHandler {
    fn get_info(&self) -> ClientInfo {
        ClientInfo::default()
    }
}

struct TestHarness {
    service: RunningService<RoleClient, DummyClientHandler>,
    server: RunningService<RoleServer, RustyCorpusMcpServer>,
}

async fn register_mocks(server: &'static MockServer) -> Vec<Mock<'static>> {
    vec![
        server
            .mock_async(|when, then| {
                when.method(GET).path("/companies/acme/documents");
                then.status(200).json_body(json!({
                    "items": [{
                        "_id": "doc-1",
                        "name": "Pricing",
                        "content": "Pricing overview. Our pricing has three tiers.",
                        "fileUrl": "https://files.example.com/pricing.pdf"
                    }]
                }));
            })
            .await,
        server
            .mock_async(|when, then| {
                when.method(GET).path("/companies/acme/call-recordings");
                then.status(200).json_body(json!({
                    "items": [{
                        "_id": "call-1",
                        "contactId": "C1",
                        "date": "2024-01-05T10:00:00Z",
                        "duration": 120,
                        "recordingUrl": "https://files.example.com/call-1.mp3",
                        "analysis": {
                            "transcription": {
                                "fullTranscript": "The customer asked about pricing discounts."
                            }
                        }
                    }]
                }));
            })
            .await,
        server
            .mock_async(|when, then| {
                when.method(GET).path("/companies/acme/documents/count");
                then.status(200).json_body(json!({ "count": 1 }));
            })
            .await,
        server
            .mock_async(|when, then| {
                when.method(GET).path("/companies/acme/call-recordings/count");
                then.status(200).json_body(json!({ "count": 1 }));
            })
            .await,
        server
            .mock_async(|when, then| {
                when.method(GET).path("/health");
                then.status(200).json_body(json!({ "status": "ok" }));
            })
            .await,
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200).json_body(json!({
                    "response": GENERATED_ANSWER,
                    "done": true
                }));
            })
            .await,
    ]
}

impl TestHarness {
    async fn new() -> Self {
        INIT.get_or_init(|| async {
            let mock_server = Box::leak(Box::new(MockServer::start_async().await));
            let base_url = mock_server.base_url();

            set_env("RECORD_STORE_URL", &base_url);
            set_env("GENERATION_PROVIDER", "ollama");
            set_env("GENERATION_MODEL", "llama3");
            set_env("OLLAMA_URL", &base_url);
            set_env("CORPUS_CHUNK_SIZE", "16");
            set_env("CORPUS_CHUNK_OVERLAP", "4");

            MOCK_SERVER.set(mock_server).ok();
            let server = MOCK_SERVER.get().expect("mock server initialized");
            MOCK_HANDLES.set(register_mocks(server).await).ok();

            config::init_config();
            logging::init_tracing(false);
        })
        .await;

        let corpus = CorpusService::from_config(config::get_config())
            .expect("corpus service from test config");
        let server = RustyCorpusMcpServer::new(Arc::new(corpus));

        let (client_stream, server_stream) = tokio::io::duplex(16 * 1024);
        let (client_read, client_write) = split(client_stream);
        let (server_read, server_write) = split(server_stream);

        let client_transport = AsyncRwTransport::new_client(client_read, client_write);
        let server_transport = AsyncRwTransport::new_server(server_read, server_write);

        let server_info = server.get_info();
        let client_handler = DummyClientHandler;
        let client_info = ClientHandler::get_info(&client_handler);

        let server =
            serve_directly::<RoleServer, _, _, _, _>(server, server_transport, Some(client_info));
        let service = serve_directly::<RoleClient, _, _, _, _>(
            client_handler,
            client_transport,
            Some(server_info),
        );

        Self { service, server }
    }

    async fn shutdown(self) {
        let Self { service, server } = self;
        let _ = service.cancel().await;
        let _ = server.cancel().await;
    }
}

fn expect_invalid_params(err: rmcp::service::ServiceError) {
    match err {
        rmcp::service::ServiceError::McpError(data) => {
            assert_eq!(data.code, model::ErrorCode::INVALID_PARAMS);
        }
        other => panic!("expected MCP error, got {other:?}"),
    }
}

#[tokio::test]
async fn initialize_and_list_tools() {
    let harness = TestHarness::new().await;
    let service = &harness.service;

    let info = service
        .peer_info()
        .expect("server info should be initialized");
    assert_eq!(info.server_info.name, "rusty-corpus");
    assert!(info.capabilities.tools.is_some());
    assert!(info.capabilities.resources.is_some());

    let tools_result = service
        .list_tools(Some(PaginatedRequestParam { cursor: None }))
        .await
        .expect("list_tools");

    let names: Vec<_> = tools_result
        .tools
        .iter()
        .map(|tool| tool.name.as_ref())
        .collect();

    for expected in [
        "corpus-status",
        "corpus-stats",
        "list-documents",
        "get-document",
        "search-corpus",
        "query-corpus",
        "prepare-document",
        "metrics",
    ] {
        assert!(names.contains(&expected), "missing tool {expected}");
    }

    harness.shutdown().await;
}

#[tokio::test]
async fn status_and_stats_reflect_store_contents() {
    let harness = TestHarness::new().await;
    let service = &harness.service;

    let status = service
        .call_tool(CallToolRequestParam {
            name: "corpus-status".into(),
            arguments: arguments(json!({ "company_id": COMPANY })),
        })
        .await
        .expect("status tool call");
    assert_eq!(status.is_error, Some(false));
    let payload = status.structured_content.expect("structured payload");
    assert_eq!(payload["exists"], json!(true));
    assert_eq!(payload["documentCount"], json!(1));
    assert_eq!(payload["callRecordingCount"], json!(1));
    assert_eq!(payload["totalCount"], json!(2));

    let stats = service
        .call_tool(CallToolRequestParam {
            name: "corpus-stats".into(),
            arguments: arguments(json!({ "company_id": COMPANY })),
        })
        .await
        .expect("stats tool call");
    let payload = stats.structured_content.expect("structured stats");
    assert_eq!(payload["stats"]["totalDocuments"], json!(2));
    assert_eq!(payload["stats"]["documentTypes"]["pdf"], json!(1));
    assert_eq!(payload["stats"]["documentTypes"]["mp3"], json!(1));

    harness.shutdown().await;
}

#[tokio::test]
async fn search_ranks_and_highlights_matches() {
    let harness = TestHarness::new().await;
    let service = &harness.service;

    let response = service
        .call_tool(CallToolRequestParam {
            name: "search-corpus".into(),
            arguments: arguments(json!({ "company_id": COMPANY, "search_term": "PRICING" })),
        })
        .await
        .expect("search tool call");

    let payload = response.structured_content.expect("structured search");
    assert_eq!(payload["searchTerm"], json!("PRICING"));
    assert_eq!(payload["count"], json!(2));
    let results = payload["results"].as_array().expect("results array");
    assert_eq!(results[0]["id"], json!("doc-1"));
    assert_eq!(results[0]["matches"], json!(2));
    assert_eq!(results[1]["id"], json!("call-1"));
    assert!(
        results[0]["snippet"]
            .as_str()
            .is_some_and(|snippet| snippet.contains("**Pricing**"))
    );

    let spaced = service
        .call_tool(CallToolRequestParam {
            name: "search-corpus".into(),
            arguments: arguments(json!({ "company_id": COMPANY, "search_term": " pricing" })),
        })
        .await
        .expect("search tool call with leading space");
    let payload = spaced.structured_content.expect("structured search");
    assert_eq!(payload["searchTerm"], json!(" pricing"));
    let results = payload["results"].as_array().expect("results array");
    assert_eq!(results[0]["id"], json!("doc-1"));
    assert_eq!(results[0]["matches"], json!(1));

    harness.shutdown().await;
}

#[tokio::test]
async fn blank_search_and_unknown_document_are_invalid_params() {
    let harness = TestHarness::new().await;
    let service = &harness.service;

    let err = service
        .call_tool(CallToolRequestParam {
            name: "search-corpus".into(),
            arguments: arguments(json!({ "company_id": COMPANY, "search_term": "   " })),
        })
        .await
        .expect_err("blank search should fail");
    expect_invalid_params(err);

    let err = service
        .call_tool(CallToolRequestParam {
            name: "get-document".into(),
            arguments: arguments(json!({ "company_id": COMPANY, "item_id": "nope" })),
        })
        .await
        .expect_err("unknown item should fail");
    expect_invalid_params(err);

    harness.shutdown().await;
}

#[tokio::test]
async fn query_answers_from_generation_provider() {
    let harness = TestHarness::new().await;
    let service = &harness.service;

    let response = service
        .call_tool(CallToolRequestParam {
            name: "query-corpus".into(),
            arguments: arguments(json!({
                "company_id": COMPANY,
                "question": "What do plans cost?"
            })),
        })
        .await
        .expect("query tool call");

    let payload = response.structured_content.expect("structured answer");
    assert_eq!(payload["answer"], json!(GENERATED_ANSWER));
    let source_ids: Vec<_> = payload["sources"]
        .as_array()
        .expect("sources array")
        .iter()
        .map(|source| source["id"].clone())
        .collect();
    assert_eq!(source_ids, vec![json!("doc-1"), json!("call-1")]);

    harness.shutdown().await;
}

#[tokio::test]
async fn prepare_document_uses_configured_chunking() {
    let harness = TestHarness::new().await;
    let service = &harness.service;

    let response = service
        .call_tool(CallToolRequestParam {
            name: "prepare-document".into(),
            arguments: arguments(json!({ "text": "The quick brown fox jumps over the lazy dog." })),
        })
        .await
        .expect("prepare tool call");

    let payload = response.structured_content.expect("structured preparation");
    assert_eq!(payload["chunkSize"], json!(16));
    assert_eq!(payload["chunkOverlap"], json!(4));
    assert_eq!(payload["metrics"]["wordCount"], json!(9));
    assert_eq!(payload["chunks"][0]["content"], json!("The quick brown "));

    let metrics = service
        .call_tool(CallToolRequestParam {
            name: "metrics".into(),
            arguments: arguments(json!({})),
        })
        .await
        .expect("metrics tool call");
    let metrics = metrics.structured_content.expect("structured metrics");
    assert!(metrics["documentsPrepared"].as_u64().is_some_and(|n| n >= 1));

    harness.shutdown().await;
}

#[tokio::test]
async fn health_resource_reports_reachable_store() {
    let harness = TestHarness::new().await;
    let service = &harness.service;

    let result = service
        .read_resource(ReadResourceRequestParam {
            uri: "mcp://health".into(),
        })
        .await
        .expect("read health resource");

    let text = match &result.contents[0] {
        ResourceContents::TextResourceContents { text, .. } => text.clone(),
        other => panic!("unexpected contents: {other:?}"),
    };
    let payload: Value = serde_json::from_str(&text).expect("health json");
    assert_eq!(payload["recordStore"]["reachable"], json!(true));
    assert_eq!(payload["generation"]["enabled"], json!(true));

    harness.shutdown().await;
}
