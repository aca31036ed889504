//! Read-only access to a company's documents and call recordings.

pub mod client;
pub mod memory;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::RecordStoreConfig;

pub use client::HttpRecordStore;
pub use memory::InMemoryRecordStore;
pub use types::{CallAnalysis, CallRecordingRecord, DocumentRecord, StoreError, Transcription};

/// Query surface over the document and call-recording collections.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All documents owned by the company, in store order.
    async fn find_documents_by_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<DocumentRecord>, StoreError>;

    /// All call recordings owned by the company, in store order.
    async fn find_call_recordings_by_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<CallRecordingRecord>, StoreError>;

    /// Number of documents owned by the company.
    async fn count_documents_by_company(&self, company_id: &str) -> Result<u64, StoreError>;

    /// Number of call recordings owned by the company.
    async fn count_call_recordings_by_company(&self, company_id: &str) -> Result<u64, StoreError>;

    /// Confirm the backing store is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Build the record store selected by configuration.
pub fn build_record_store(config: &RecordStoreConfig) -> Result<Arc<dyn RecordStore>, StoreError> {
    match config {
        RecordStoreConfig::Http {
            url,
            api_key,
            timeout_secs,
        } => Ok(Arc::new(HttpRecordStore::new(
            url,
            api_key.clone(),
            *timeout_secs,
        )?)),
        RecordStoreConfig::Fixture { path } => {
            Ok(Arc::new(InMemoryRecordStore::from_json_file(path)?))
        }
    }
}
