//! In-memory [`RecordStore`] used for fixtures, demos, and tests.
//!
//! Records live in a `HashMap` keyed by company behind `std::sync::RwLock`. Insertion order is
//! preserved per company so assembled corpora stay deterministic.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use serde::Deserialize;

use crate::store::{
    RecordStore,
    types::{CallRecordingRecord, DocumentRecord, StoreError},
};

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompanyRecords {
    #[serde(default)]
    documents: Vec<DocumentRecord>,
    #[serde(default)]
    call_recordings: Vec<CallRecordingRecord>,
}

#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    companies: HashMap<String, CompanyRecords>,
}

/// Record store holding every company's records in process memory.
#[derive(Default)]
pub struct InMemoryRecordStore {
    companies: RwLock<HashMap<String, CompanyRecords>>,
}

impl InMemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON fixture shaped as `{"companies": {"<id>": {"documents": [], "callRecordings": []}}}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|err| StoreError::Fixture(format!("{}: {err}", path.display())))?;
        let store = Self::from_json_str(&raw)?;
        tracing::info!(path = %path.display(), "Loaded record fixture");
        Ok(store)
    }

    /// Parse fixture JSON already held in memory.
    pub fn from_json_str(raw: &str) -> Result<Self, StoreError> {
        let fixture: Fixture =
            serde_json::from_str(raw).map_err(|err| StoreError::Fixture(err.to_string()))?;
        Ok(Self {
            companies: RwLock::new(fixture.companies),
        })
    }

    /// Append a document to a company's records.
    pub fn insert_document(&self, company_id: &str, record: DocumentRecord) {
        let mut companies = self
            .companies
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        companies
            .entry(company_id.to_string())
            .or_default()
            .documents
            .push(record);
    }

    /// Append a call recording to a company's records.
    pub fn insert_call_recording(&self, company_id: &str, record: CallRecordingRecord) {
        let mut companies = self
            .companies
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        companies
            .entry(company_id.to_string())
            .or_default()
            .call_recordings
            .push(record);
    }

    fn with_company<T>(&self, company_id: &str, read: impl FnOnce(&CompanyRecords) -> T) -> T {
        let companies = self.companies.read().unwrap_or_else(PoisonError::into_inner);
        match companies.get(company_id) {
            Some(records) => read(records),
            None => read(&CompanyRecords::default()),
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find_documents_by_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<DocumentRecord>, StoreError> {
        Ok(self.with_company(company_id, |records| records.documents.clone()))
    }

    async fn find_call_recordings_by_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<CallRecordingRecord>, StoreError> {
        Ok(self.with_company(company_id, |records| records.call_recordings.clone()))
    }

    async fn count_documents_by_company(&self, company_id: &str) -> Result<u64, StoreError> {
        Ok(self.with_company(company_id, |records| records.documents.len() as u64))
    }

    async fn count_call_recordings_by_company(&self, company_id: &str) -> Result<u64, StoreError> {
        Ok(self.with_company(company_id, |records| records.call_recordings.len() as u64))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn document(id: &str) -> DocumentRecord {
        DocumentRecord {
            id: Some(id.to_string()),
            name: format!("{id}.pdf"),
            content: "text".into(),
            file_url: format!("https://files.example.com/{id}.pdf"),
        }
    }

    #[tokio::test]
    async fn scopes_records_by_company() {
        let store = InMemoryRecordStore::new();
        store.insert_document("acme", document("a"));
        store.insert_document("acme", document("b"));
        store.insert_document("globex", document("c"));

        let acme = store.find_documents_by_company("acme").await.expect("docs");
        assert_eq!(
            acme.iter().map(|doc| doc.id.as_deref()).collect::<Vec<_>>(),
            vec![Some("a"), Some("b")]
        );
        assert_eq!(store.count_documents_by_company("globex").await.expect("count"), 1);
        assert_eq!(store.count_call_recordings_by_company("acme").await.expect("count"), 0);
        assert!(
            store
                .find_call_recordings_by_company("missing")
                .await
                .expect("calls")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn loads_fixture_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{
                "companies": {{
                    "acme": {{
                        "documents": [{{ "_id": "d1", "name": "Guide", "content": "Hello", "fileUrl": "guide.md" }}],
                        "callRecordings": [{{ "_id": "c1", "contactId": "C1", "date": "2024-01-05" }}]
                    }}
                }}
            }}"#
        )
        .expect("write fixture");

        let store = InMemoryRecordStore::from_json_file(file.path()).expect("fixture");
        let calls = store
            .find_call_recordings_by_company("acme")
            .await
            .expect("calls");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].contact_id, "C1");
        assert_eq!(store.count_documents_by_company("acme").await.expect("count"), 1);
    }

    #[test]
    fn rejects_malformed_fixture() {
        let err = InMemoryRecordStore::from_json_str("{ not json").err().expect("error");
        assert!(matches!(err, StoreError::Fixture(_)));
    }
}
