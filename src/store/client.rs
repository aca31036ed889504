//! HTTP adapter for the company record service.

use crate::store::{
    RecordStore,
    types::{CallRecordingRecord, DocumentRecord, StoreError},
};
use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ItemsResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

/// Record store backed by the company record service REST API.
///
/// Every company-scoped request lives under `companies/{company_id}/`; the identifier is
/// percent-encoded as a single path segment.
pub struct HttpRecordStore {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
}

impl HttpRecordStore {
    /// Construct a client for the record service at `url`.
    pub fn new(url: &str, api_key: Option<String>, timeout_secs: u64) -> Result<Self, StoreError> {
        let client = Client::builder()
            .user_agent("rusty-corpus/0.1")
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        let base_url = normalize_base_url(url).map_err(StoreError::InvalidUrl)?;
        tracing::debug!(
            url = %base_url,
            has_api_key = api_key.as_deref().is_some_and(|key| !key.is_empty()),
            timeout_secs,
            "Initialized record store HTTP client"
        );

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|err| StoreError::InvalidUrl(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| StoreError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<reqwest::RequestBuilder, StoreError> {
        let url = self.endpoint(segments)?;
        let mut req = self.client.request(method, url);
        if let Some(api_key) = &self.api_key
            && !api_key.is_empty()
        {
            req = req.header("api-key", api_key);
        }
        Ok(req)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, StoreError> {
        let response = self.request(Method::GET, segments)?.send().await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = StoreError::UnexpectedStatus { status, body };
            tracing::error!(error = %error, path = %segments.join("/"), "Record store request failed");
            Err(error)
        }
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn find_documents_by_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<DocumentRecord>, StoreError> {
        let payload: ItemsResponse<DocumentRecord> = self
            .get_json(&["companies", company_id, "documents"])
            .await?;
        tracing::debug!(company_id, documents = payload.items.len(), "Fetched documents");
        Ok(payload.items)
    }

    async fn find_call_recordings_by_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<CallRecordingRecord>, StoreError> {
        let payload: ItemsResponse<CallRecordingRecord> = self
            .get_json(&["companies", company_id, "call-recordings"])
            .await?;
        tracing::debug!(company_id, calls = payload.items.len(), "Fetched call recordings");
        Ok(payload.items)
    }

    async fn count_documents_by_company(&self, company_id: &str) -> Result<u64, StoreError> {
        let payload: CountResponse = self
            .get_json(&["companies", company_id, "documents", "count"])
            .await?;
        Ok(payload.count)
    }

    async fn count_call_recordings_by_company(&self, company_id: &str) -> Result<u64, StoreError> {
        let payload: CountResponse = self
            .get_json(&["companies", company_id, "call-recordings", "count"])
            .await?;
        Ok(payload.count)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let response = self.request(Method::GET, &["health"])?.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(StoreError::UnexpectedStatus { status, body })
        }
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = Url::parse(url).map_err(|err| err.to_string())?;
    if parsed.cannot_be_a_base() {
        return Err(format!("{url} cannot be used as a base URL"));
    }
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::GET, MockServer};
    use serde_json::json;

    fn store_for(server: &MockServer, api_key: Option<&str>) -> HttpRecordStore {
        HttpRecordStore {
            client: Client::builder()
                .user_agent("rusty-corpus-test")
                .build()
                .expect("client"),
            base_url: server.base_url(),
            api_key: api_key.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn fetches_documents_with_api_key() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/companies/acme/documents")
                    .header("api-key", "secret");
                then.status(200).json_body(json!({
                    "items": [
                        {
                            "_id": "doc-1",
                            "name": "Pitch deck",
                            "content": "We sell widgets.",
                            "fileUrl": "https://files.example.com/pitch.pdf"
                        }
                    ]
                }));
            })
            .await;

        let store = store_for(&server, Some("secret"));
        let documents = store
            .find_documents_by_company("acme")
            .await
            .expect("documents");

        mock.assert();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id.as_deref(), Some("doc-1"));
        assert_eq!(documents[0].file_url, "https://files.example.com/pitch.pdf");
    }

    #[tokio::test]
    async fn encodes_company_id_as_single_segment() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/companies/a%2Fb/call-recordings/count");
                then.status(200).json_body(json!({ "count": 7 }));
            })
            .await;

        let store = store_for(&server, None);
        let count = store
            .count_call_recordings_by_company("a/b")
            .await
            .expect("count");

        mock.assert();
        assert_eq!(count, 7);
    }

    #[tokio::test]
    async fn surfaces_unexpected_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/companies/acme/call-recordings");
                then.status(500).body("database offline");
            })
            .await;

        let store = store_for(&server, None);
        let err = store
            .find_call_recordings_by_company("acme")
            .await
            .expect_err("should fail");

        match err {
            StoreError::UnexpectedStatus { status, body } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(body, "database offline");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(HttpRecordStore::new("not a url", None, 5).is_err());
    }
}
