//! HTTP surface for Rusty Corpus.
//!
//! Routes mirror the corpus viewer's paths:
//!
//! - `GET /corpus/:company_id/status` – Document and call counts without assembling the corpus.
//! - `GET /corpus/:company_id/stats` – Totals, averages, type histogram, and extremes.
//! - `GET /corpus/:company_id/documents` – Preview listing of every corpus item.
//! - `GET /corpus/:company_id/documents/:item_id/content` – Full content of one item.
//! - `GET /corpus/:company_id/search?searchTerm=` – Ranked lexical search with snippets.
//! - `POST /corpus/:company_id/query` – Answer a question with the corpus as context.
//! - `POST /documents/prepare` – Chunk and measure a document before upload.
//! - `GET /metrics` and `GET /commands` – Counters and a machine-readable command catalog.
//!
//! The HTTP surface shares the corpus service with the MCP server, so behavior is identical
//! across interfaces.

use crate::corpus::{
    CorpusApi, CorpusDocumentSummary, CorpusError, CorpusStats, DocumentContent, KnowledgeAnswer,
    PreparedDocument, SearchResult,
};
use crate::metrics::MetricsSnapshot;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router exposing the corpus API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: CorpusApi + 'static,
{
    Router::new()
        .route("/corpus/:company_id/status", get(corpus_status::<S>))
        .route("/corpus/:company_id/stats", get(corpus_stats::<S>))
        .route("/corpus/:company_id/documents", get(list_documents::<S>))
        .route(
            "/corpus/:company_id/documents/:item_id/content",
            get(document_content::<S>),
        )
        .route("/corpus/:company_id/search", get(search_corpus::<S>))
        .route("/corpus/:company_id/query", post(query_corpus::<S>))
        .route("/documents/prepare", post(prepare_document::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

async fn corpus_status<S>(
    State(service): State<Arc<S>>,
    Path(company_id): Path<String>,
) -> Result<Json<crate::corpus::CorpusStatus>, AppError>
where
    S: CorpusApi,
{
    Ok(Json(service.status(&company_id).await?))
}

#[derive(Serialize)]
struct StatsResponse {
    stats: CorpusStats,
}

async fn corpus_stats<S>(
    State(service): State<Arc<S>>,
    Path(company_id): Path<String>,
) -> Result<Json<StatsResponse>, AppError>
where
    S: CorpusApi,
{
    let stats = service.stats(&company_id).await?;
    Ok(Json(StatsResponse { stats }))
}

#[derive(Serialize)]
struct DocumentsResponse {
    documents: Vec<CorpusDocumentSummary>,
    count: usize,
}

async fn list_documents<S>(
    State(service): State<Arc<S>>,
    Path(company_id): Path<String>,
) -> Result<Json<DocumentsResponse>, AppError>
where
    S: CorpusApi,
{
    let documents = service.documents(&company_id).await?;
    Ok(Json(DocumentsResponse {
        count: documents.len(),
        documents,
    }))
}

#[derive(Serialize)]
struct DocumentResponse {
    document: DocumentContent,
}

async fn document_content<S>(
    State(service): State<Arc<S>>,
    Path((company_id, item_id)): Path<(String, String)>,
) -> Result<Json<DocumentResponse>, AppError>
where
    S: CorpusApi,
{
    let document = service.document_content(&company_id, &item_id).await?;
    Ok(Json(DocumentResponse { document }))
}

/// Query string for `GET /corpus/:company_id/search`.
#[derive(Deserialize)]
struct SearchParams {
    #[serde(rename = "searchTerm", default)]
    search_term: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    results: Vec<SearchResult>,
    count: usize,
    search_term: String,
}

/// Search the corpus; a missing or blank `searchTerm` is rejected.
async fn search_corpus<S>(
    State(service): State<Arc<S>>,
    Path(company_id): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError>
where
    S: CorpusApi,
{
    let search_term = params
        .search_term
        .filter(|term| !term.trim().is_empty())
        .ok_or_else(|| CorpusError::InvalidInput("searchTerm is required".into()))?;
    let results = service.search(&company_id, &search_term).await?;
    tracing::info!(
        company_id = %company_id,
        search_term = %search_term,
        results = results.len(),
        "Search request completed"
    );
    Ok(Json(SearchResponse {
        count: results.len(),
        results,
        search_term,
    }))
}

/// Request body for `POST /corpus/:company_id/query`.
#[derive(Deserialize)]
struct QueryRequest {
    question: String,
}

async fn query_corpus<S>(
    State(service): State<Arc<S>>,
    Path(company_id): Path<String>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<KnowledgeAnswer>, AppError>
where
    S: CorpusApi,
{
    Ok(Json(service.query(&company_id, &request.question).await?))
}

/// Request body for `POST /documents/prepare`.
#[derive(Deserialize)]
struct PrepareRequest {
    text: String,
}

async fn prepare_document<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<PrepareRequest>,
) -> Result<Json<PreparedDocument>, AppError>
where
    S: CorpusApi,
{
    Ok(Json(service.prepare_document(&request.text)?))
}

async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: CorpusApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "corpus_status",
                method: "GET",
                path: "/corpus/:company_id/status",
                description: "Report whether a company has corpus content, with document and call counts.",
                request_example: None,
            },
            CommandDescriptor {
                name: "corpus_stats",
                method: "GET",
                path: "/corpus/:company_id/stats",
                description: "Return word and character totals, per-document averages, a file type histogram, and the largest and smallest items.",
                request_example: None,
            },
            CommandDescriptor {
                name: "list_documents",
                method: "GET",
                path: "/corpus/:company_id/documents",
                description: "List every document and call recording with a 200 character preview.",
                request_example: None,
            },
            CommandDescriptor {
                name: "get_document",
                method: "GET",
                path: "/corpus/:company_id/documents/:item_id/content",
                description: "Return the full content of one corpus item.",
                request_example: None,
            },
            CommandDescriptor {
                name: "search",
                method: "GET",
                path: "/corpus/:company_id/search?searchTerm=",
                description: "Case-insensitive literal search ranked by match count, with highlighted snippets.",
                request_example: None,
            },
            CommandDescriptor {
                name: "query",
                method: "POST",
                path: "/corpus/:company_id/query",
                description: "Answer a question using the whole corpus as context. Requires a generation provider.",
                request_example: Some(json!({ "question": "What pricing did we quote last week?" })),
            },
            CommandDescriptor {
                name: "prepare_document",
                method: "POST",
                path: "/documents/prepare",
                description: "Chunk a document into overlapping windows and compute its text metrics.",
                request_example: Some(json!({ "text": "Document contents" })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return corpus activity counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

struct AppError(CorpusError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CorpusError::NotFound { .. } | CorpusError::EmptyCorpus { .. } => {
                StatusCode::NOT_FOUND
            }
            CorpusError::InvalidInput(_) | CorpusError::Chunking(_) => StatusCode::BAD_REQUEST,
            CorpusError::CorpusUnavailable(_) | CorpusError::GenerationUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            CorpusError::MalformedRecord { .. } | CorpusError::Generation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "Request failed");
        }
        (status, self.0.to_string()).into_response()
    }
}

impl From<CorpusError> for AppError {
    fn from(inner: CorpusError) -> Self {
        Self(inner)
    }
}
