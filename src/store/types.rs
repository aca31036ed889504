//! Record shapes and errors shared by the record store adapters.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned while reading records from a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid record store URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Record store responded with an unexpected status code.
    #[error("Unexpected record store response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from the store.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Fixture file could not be read or decoded.
    #[error("Failed to load record fixture: {0}")]
    Fixture(String),
}

/// Uploaded document as kept by the document store.
///
/// `id` is optional on the wire; records without one are skipped during assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Store identifier (`_id`).
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    /// Display name chosen at upload time.
    #[serde(default)]
    pub name: String,
    /// Extracted document text.
    #[serde(default)]
    pub content: String,
    /// URL of the uploaded file.
    #[serde(default)]
    pub file_url: String,
}

/// Call recording as kept by the call-recording store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecordingRecord {
    /// Store identifier (`_id`).
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    /// Contact the call was held with.
    #[serde(default)]
    pub contact_id: String,
    /// Call date as an RFC 3339 timestamp or a `YYYY-MM-DD` date.
    #[serde(default)]
    pub date: Option<String>,
    /// Call length in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Free-form summary entered by the rep.
    #[serde(default)]
    pub summary: Option<String>,
    /// Tags attached at upload time.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// URL of the audio file.
    #[serde(default)]
    pub recording_url: String,
    /// Analysis output attached by the transcription pipeline.
    #[serde(default)]
    pub analysis: Option<CallAnalysis>,
}

/// Analysis block attached to a call recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallAnalysis {
    /// Transcription output, when the call has been transcribed.
    #[serde(default)]
    pub transcription: Option<Transcription>,
}

/// Transcription output for a call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcription {
    /// Complete transcript text.
    #[serde(default)]
    pub full_transcript: Option<String>,
}

impl CallRecordingRecord {
    /// Transcript text, when present.
    pub fn full_transcript(&self) -> Option<&str> {
        self.analysis
            .as_ref()
            .and_then(|analysis| analysis.transcription.as_ref())
            .and_then(|transcription| transcription.full_transcript.as_deref())
    }
}
