//! Corpus assembly, chunking, metrics, statistics, and lexical search.

pub mod chunking;
pub mod document_metrics;
pub mod normalize;
pub mod prompt;
pub mod search;
mod service;
pub mod stats;
pub mod types;

pub use service::{CorpusApi, CorpusService, CorpusSettings, StoreHealthSnapshot};
pub use types::{
    Chunk, ChunkingError, CorpusDocumentSummary, CorpusError, CorpusItem, CorpusItemType,
    CorpusStats, CorpusStatus, DocumentContent, DocumentExtreme, DocumentMetrics,
    KnowledgeAnswer, PreparedDocument, SearchResult, SourceRef,
};
