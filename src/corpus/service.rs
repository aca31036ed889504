//! Corpus service coordinating store reads, normalization, statistics, search, and generation.

use crate::{
    config::{Config, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_SNIPPET_RADIUS},
    corpus::{
        chunking::chunk_document,
        document_metrics::{calculate_document_metrics, word_count},
        normalize::{normalize_call_recording, normalize_document, parse_call_date},
        prompt::build_knowledge_prompt,
        search::search_items,
        stats::compute_stats,
        types::{
            CorpusDocumentSummary, CorpusError, CorpusItem, CorpusStats, CorpusStatus,
            DocumentContent, KnowledgeAnswer, PreparedDocument, SearchResult, SourceRef,
        },
    },
    generation::{GenerationClient, GenerationRequest, get_generation_client},
    metrics::{CorpusMetrics, MetricsSnapshot},
    store::{CallRecordingRecord, DocumentRecord, RecordStore, build_record_store},
};
use async_trait::async_trait;
use std::sync::Arc;

const PREVIEW_CHARS: usize = 200;

/// Tunables applied by the corpus service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusSettings {
    /// Chunk window in characters for document preparation.
    pub chunk_size: usize,
    /// Characters shared by consecutive chunks.
    pub chunk_overlap: usize,
    /// Characters kept on each side of the first search match.
    pub snippet_radius: usize,
    /// Model used for knowledge-base answers.
    pub generation_model: String,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            snippet_radius: DEFAULT_SNIPPET_RADIUS,
            generation_model: "llama3".to_string(),
        }
    }
}

impl CorpusSettings {
    /// Settings derived from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            snippet_radius: config.snippet_radius,
            generation_model: config.generation_model.clone(),
        }
    }
}

/// Reachability of the record store.
#[derive(Debug, Clone)]
pub struct StoreHealthSnapshot {
    /// Whether the store answered its health check.
    pub reachable: bool,
    /// Diagnostic captured when the store is unreachable.
    pub error: Option<String>,
}

/// Abstraction over corpus operations used by external surfaces (HTTP, MCP).
#[async_trait]
pub trait CorpusApi: Send + Sync {
    /// Existence check from store counts, without assembling the corpus.
    ///
    /// Counts are raw store records, so records that assembly skips (missing id or call date)
    /// still count: a company can report `exists` while `documents` returns nothing.
    async fn status(&self, company_id: &str) -> Result<CorpusStatus, CorpusError>;

    /// Preview listing of every corpus item.
    async fn documents(&self, company_id: &str)
    -> Result<Vec<CorpusDocumentSummary>, CorpusError>;

    /// Full content of one corpus item.
    async fn document_content(
        &self,
        company_id: &str,
        item_id: &str,
    ) -> Result<DocumentContent, CorpusError>;

    /// Corpus-wide statistics.
    async fn stats(&self, company_id: &str) -> Result<CorpusStats, CorpusError>;

    /// Ranked lexical search.
    async fn search(&self, company_id: &str, term: &str)
    -> Result<Vec<SearchResult>, CorpusError>;

    /// Chunk and measure a document before it is stored.
    fn prepare_document(&self, text: &str) -> Result<PreparedDocument, CorpusError>;

    /// Answer a question using the whole corpus as context.
    async fn query(&self, company_id: &str, question: &str)
    -> Result<KnowledgeAnswer, CorpusError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

/// Builds a company's corpus on demand and serves every read operation over it.
///
/// The corpus is rebuilt from both stores on each call; nothing is cached between requests.
/// Construct the service once near process start and share it through an `Arc`.
pub struct CorpusService {
    store: Arc<dyn RecordStore>,
    generator: Option<Arc<dyn GenerationClient>>,
    settings: CorpusSettings,
    metrics: Arc<CorpusMetrics>,
}

impl CorpusService {
    /// Assemble a service from explicit collaborators.
    pub fn new(
        store: Arc<dyn RecordStore>,
        generator: Option<Arc<dyn GenerationClient>>,
        settings: CorpusSettings,
    ) -> Self {
        Self {
            store,
            generator,
            settings,
            metrics: Arc::new(CorpusMetrics::new()),
        }
    }

    /// Build the service selected by configuration.
    pub fn from_config(config: &Config) -> Result<Self, CorpusError> {
        tracing::info!(store = %config.record_store.describe(), "Initializing record store");
        let store = build_record_store(&config.record_store)?;
        let generator = get_generation_client(config)?;
        if generator.is_none() {
            tracing::info!("No generation provider configured; knowledge queries disabled");
        }
        Ok(Self::new(store, generator, CorpusSettings::from_config(config)))
    }

    /// Active tunables.
    pub fn settings(&self) -> &CorpusSettings {
        &self.settings
    }

    /// Whether knowledge-base queries can be answered.
    pub fn generation_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Probe the record store.
    pub async fn store_health(&self) -> StoreHealthSnapshot {
        match self.store.health_check().await {
            Ok(()) => StoreHealthSnapshot {
                reachable: true,
                error: None,
            },
            Err(error) => {
                tracing::warn!(error = %error, "Record store health check failed");
                StoreHealthSnapshot {
                    reachable: false,
                    error: Some(error.to_string()),
                }
            }
        }
    }

    /// Fetch both stores concurrently and normalize the records: documents first, then calls,
    /// each in store order.
    ///
    /// Either fetch failing fails the whole assembly. Records without an id (or a call without a
    /// date) are skipped; a call whose date cannot be parsed fails the assembly.
    pub async fn assemble(&self, company_id: &str) -> Result<Vec<CorpusItem>, CorpusError> {
        let company_id = require_non_blank(company_id, "company_id")?;
        let fetched = tokio::try_join!(
            self.store.find_documents_by_company(company_id),
            self.store.find_call_recordings_by_company(company_id),
        );
        let (documents, calls) = fetched.inspect_err(|error| {
            tracing::error!(company_id, error = %error, "Failed to fetch corpus records");
        })?;

        let fetched_documents = documents.len();
        let fetched_calls = calls.len();
        let mut items = normalize_documents(company_id, &documents);
        items.extend(normalize_calls(company_id, &calls)?);

        self.metrics.record_assembly(items.len() as u64);
        tracing::info!(
            company_id,
            documents = fetched_documents,
            calls = fetched_calls,
            items = items.len(),
            "Corpus assembled"
        );
        Ok(items)
    }
}

#[async_trait]
impl CorpusApi for CorpusService {
    async fn status(&self, company_id: &str) -> Result<CorpusStatus, CorpusError> {
        let company_id = require_non_blank(company_id, "company_id")?;
        let (document_count, call_recording_count) = tokio::try_join!(
            self.store.count_documents_by_company(company_id),
            self.store.count_call_recordings_by_company(company_id),
        )?;
        let total_count = document_count + call_recording_count;
        Ok(CorpusStatus {
            exists: total_count > 0,
            document_count,
            call_recording_count,
            total_count,
        })
    }

    async fn documents(
        &self,
        company_id: &str,
    ) -> Result<Vec<CorpusDocumentSummary>, CorpusError> {
        let items = self.assemble(company_id).await?;
        Ok(items.into_iter().map(summarize_item).collect())
    }

    async fn document_content(
        &self,
        company_id: &str,
        item_id: &str,
    ) -> Result<DocumentContent, CorpusError> {
        let item_id = require_non_blank(item_id, "item_id")?;
        let items = self.assemble(company_id).await?;
        let item = items
            .into_iter()
            .find(|item| item.id == item_id)
            .ok_or_else(|| CorpusError::NotFound {
                company_id: company_id.to_string(),
                item_id: item_id.to_string(),
            })?;

        Ok(DocumentContent {
            content_length: item.content.chars().count(),
            word_count: word_count(&item.content),
            id: item.id,
            title: item.title,
            url: item.url,
            content: item.content,
        })
    }

    async fn stats(&self, company_id: &str) -> Result<CorpusStats, CorpusError> {
        let items = self.assemble(company_id).await?;
        Ok(compute_stats(&items))
    }

    async fn search(
        &self,
        company_id: &str,
        term: &str,
    ) -> Result<Vec<SearchResult>, CorpusError> {
        let items = self.assemble(company_id).await?;
        let results = search_items(&items, term, self.settings.snippet_radius);
        self.metrics.record_search();
        tracing::debug!(company_id, term, results = results.len(), "Corpus searched");
        Ok(results)
    }

    fn prepare_document(&self, text: &str) -> Result<PreparedDocument, CorpusError> {
        if text.trim().is_empty() {
            return Err(CorpusError::InvalidInput(
                "document text must not be empty".into(),
            ));
        }
        let CorpusSettings {
            chunk_size,
            chunk_overlap,
            ..
        } = self.settings;
        let chunks = chunk_document(text, chunk_size, chunk_overlap)?;
        let metrics = calculate_document_metrics(text);

        self.metrics.record_preparation(chunks.len() as u64);
        tracing::info!(
            chunks = chunks.len(),
            words = metrics.word_count,
            chunk_size,
            chunk_overlap,
            "Document prepared"
        );

        Ok(PreparedDocument {
            chunks,
            metrics,
            chunk_size,
            chunk_overlap,
        })
    }

    async fn query(
        &self,
        company_id: &str,
        question: &str,
    ) -> Result<KnowledgeAnswer, CorpusError> {
        let question = require_non_blank(question, "question")?;
        let generator = self
            .generator
            .as_ref()
            .ok_or(CorpusError::GenerationUnavailable)?;

        let items = self.assemble(company_id).await?;
        if items.is_empty() {
            return Err(CorpusError::EmptyCorpus {
                company_id: company_id.to_string(),
            });
        }

        let prompt = build_knowledge_prompt(question, &items);
        tracing::debug!(
            company_id,
            items = items.len(),
            prompt_chars = prompt.chars().count(),
            "Submitting knowledge query"
        );
        let generated = generator
            .generate(GenerationRequest::knowledge_answer(
                self.settings.generation_model.clone(),
                prompt,
            ))
            .await?;

        Ok(KnowledgeAnswer {
            answer: generated.text,
            sources: items
                .into_iter()
                .map(|item| SourceRef {
                    id: item.id,
                    title: item.title,
                })
                .collect(),
        })
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

fn require_non_blank<'a>(value: &'a str, field: &str) -> Result<&'a str, CorpusError> {
    if value.trim().is_empty() {
        Err(CorpusError::InvalidInput(format!("{field} must not be empty")))
    } else {
        Ok(value)
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

fn normalize_documents(company_id: &str, records: &[DocumentRecord]) -> Vec<CorpusItem> {
    records
        .iter()
        .filter_map(|record| match present(record.id.as_deref()) {
            Some(id) => Some(normalize_document(id.to_string(), record)),
            None => {
                tracing::warn!(company_id, name = %record.name, "Skipping document without id");
                None
            }
        })
        .collect()
}

fn normalize_calls(
    company_id: &str,
    records: &[CallRecordingRecord],
) -> Result<Vec<CorpusItem>, CorpusError> {
    let mut items = Vec::with_capacity(records.len());
    for record in records {
        let Some(id) = present(record.id.as_deref()) else {
            tracing::warn!(
                company_id,
                contact_id = %record.contact_id,
                "Skipping call recording without id"
            );
            continue;
        };
        let Some(raw_date) = present(record.date.as_deref()) else {
            tracing::warn!(company_id, id, "Skipping call recording without date");
            continue;
        };
        let date = parse_call_date(raw_date).map_err(|reason| CorpusError::MalformedRecord {
            id: id.to_string(),
            reason,
        })?;
        items.push(normalize_call_recording(id.to_string(), date, record));
    }
    Ok(items)
}

fn summarize_item(item: CorpusItem) -> CorpusDocumentSummary {
    let content_length = item.content.chars().count();
    let mut content_preview: String = item.content.chars().take(PREVIEW_CHARS).collect();
    if content_length > PREVIEW_CHARS {
        content_preview.push_str("...");
    }

    CorpusDocumentSummary {
        word_count: word_count(&item.content),
        id: item.id,
        title: item.title,
        url: item.url,
        item_type: item.item_type,
        content_preview,
        content_length,
    }
}
