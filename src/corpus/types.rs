//! Core data types and error definitions for corpus assembly, statistics, and search.

use crate::{generation::GenerationClientError, store::StoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors produced while turning raw text into chunks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkingError {
    /// A zero-length window can never make progress.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
    /// Overlap must leave a positive step between windows.
    #[error("chunk overlap {chunk_overlap} must be smaller than chunk size {chunk_size}")]
    InvalidOverlap {
        /// Configured window length.
        chunk_size: usize,
        /// Configured overlap length.
        chunk_overlap: usize,
    },
}

/// Errors emitted by corpus operations.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// One of the backing stores could not be read; no partial corpus is returned.
    #[error("Corpus unavailable: {0}")]
    CorpusUnavailable(#[from] StoreError),
    /// Requested item id is in neither store for the company.
    #[error("Item '{item_id}' not found in corpus for company '{company_id}'")]
    NotFound {
        /// Company whose corpus was searched.
        company_id: String,
        /// Identifier that was requested.
        item_id: String,
    },
    /// A stored record carries a value that cannot be interpreted.
    #[error("Malformed record '{id}': {reason}")]
    MalformedRecord {
        /// Identifier of the offending record.
        id: String,
        /// What was wrong with it.
        reason: String,
    },
    /// Caller supplied unusable input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Company has no documents or call recordings to answer from.
    #[error("No corpus content available for company '{company_id}'")]
    EmptyCorpus {
        /// Company that was queried.
        company_id: String,
    },
    /// Chunking rejected its parameters.
    #[error("Failed to chunk document: {0}")]
    Chunking(#[from] ChunkingError),
    /// Generation backend failed.
    #[error("Text generation failed: {0}")]
    Generation(#[from] GenerationClientError),
    /// No generation backend is configured.
    #[error("Knowledge-base queries are disabled (no generation provider configured)")]
    GenerationUnavailable,
}

/// Kind of source record a corpus item was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorpusItemType {
    /// Uploaded document.
    Document,
    /// Call recording, transcribed or not.
    CallRecording,
}

/// Uniform view over a document or a call recording.
///
/// Derived on every request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusItem {
    /// Source record identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Full text used for statistics and search.
    pub content: String,
    /// File or recording URL.
    pub url: String,
    /// Source kind.
    #[serde(rename = "type")]
    pub item_type: CorpusItemType,
    /// Whether a call's content is a real transcript. Absent for documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_transcript: Option<bool>,
}

/// Segment of a document produced at preparation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text.
    pub content: String,
    /// Zero-based position within the document.
    pub index: usize,
}

/// Per-text counts and derived averages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetrics {
    /// Whitespace-separated tokens.
    pub word_count: usize,
    /// Unicode scalar values.
    pub character_count: usize,
    /// Maximal runs of `.`, `!` or `?`.
    pub sentence_count: usize,
    /// Non-blank blocks separated by blank lines.
    pub paragraph_count: usize,
    /// Characters per word.
    pub average_word_length: f64,
    /// Words per sentence.
    pub average_sentence_length: f64,
    /// Words per paragraph.
    pub average_paragraph_length: f64,
}

/// Largest or smallest document by word count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentExtreme {
    /// Corpus item identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Whitespace-separated tokens.
    pub word_count: usize,
}

/// Corpus-wide aggregate statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusStats {
    /// Items in the corpus.
    pub total_documents: usize,
    /// Words across all items.
    pub total_words: usize,
    /// Characters across all items.
    pub total_characters: usize,
    /// Rounded half away from zero.
    pub average_words_per_document: u64,
    /// Rounded half away from zero.
    pub average_characters_per_document: u64,
    /// Lower-cased file extension to item count.
    pub document_types: BTreeMap<String, usize>,
    /// Item with the most words, `null` for an empty corpus.
    pub largest_document: Option<DocumentExtreme>,
    /// Item with the fewest words, `null` for an empty corpus.
    pub smallest_document: Option<DocumentExtreme>,
}

/// Ranked lexical search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Corpus item identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// File or recording URL.
    pub url: String,
    /// Non-overlapping case-insensitive occurrences of the term.
    pub matches: usize,
    /// Context around the first match with every match wrapped in `**`.
    pub snippet: String,
    /// `matches * 10`.
    pub relevance: usize,
}

/// Cheap existence check computed from store counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusStatus {
    /// Whether the company has any documents or calls.
    pub exists: bool,
    /// Stored documents.
    pub document_count: u64,
    /// Stored call recordings.
    pub call_recording_count: u64,
    /// Documents plus call recordings.
    pub total_count: u64,
}

/// Listing entry for the corpus document browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusDocumentSummary {
    /// Corpus item identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// File or recording URL.
    pub url: String,
    /// Source kind.
    #[serde(rename = "type")]
    pub item_type: CorpusItemType,
    /// First 200 characters, followed by `...` when truncated.
    pub content_preview: String,
    /// Content length in characters.
    pub content_length: usize,
    /// Whitespace-separated tokens.
    pub word_count: usize,
}

/// Full content of a single corpus item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContent {
    /// Corpus item identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// File or recording URL.
    pub url: String,
    /// Full text.
    pub content: String,
    /// Content length in characters.
    pub content_length: usize,
    /// Whitespace-separated tokens.
    pub word_count: usize,
}

/// Chunks and metrics computed for a document before it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedDocument {
    /// Overlapping character windows in order.
    pub chunks: Vec<Chunk>,
    /// Counts and averages for the whole text.
    pub metrics: DocumentMetrics,
    /// Window length used.
    pub chunk_size: usize,
    /// Overlap used.
    pub chunk_overlap: usize,
}

/// Corpus item cited as context for a generated answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Corpus item identifier.
    pub id: String,
    /// Display title.
    pub title: String,
}

/// Generated answer to a knowledge-base question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeAnswer {
    /// Generated text.
    pub answer: String,
    /// Items supplied as context, in prompt order.
    pub sources: Vec<SourceRef>,
}
