//! Conversion of raw store records into [`CorpusItem`]s.
//!
//! Everything here is infallible: the assembler validates identifiers and dates first and hands
//! over an already-parsed call date.

use crate::{
    corpus::types::{CorpusItem, CorpusItemType},
    store::{CallRecordingRecord, DocumentRecord},
};
use time::{
    Date, OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

/// Map a document record onto a corpus item, copying content verbatim.
pub fn normalize_document(id: String, record: &DocumentRecord) -> CorpusItem {
    CorpusItem {
        id,
        title: record.name.clone(),
        content: record.content.clone(),
        url: record.file_url.clone(),
        item_type: CorpusItemType::Document,
        has_transcript: None,
    }
}

/// Map a call recording onto a corpus item.
///
/// A transcript that is non-blank after trimming becomes the content as-is. Otherwise the
/// content is a descriptive sentence built from contact, date, duration, summary, and tags.
pub fn normalize_call_recording(
    id: String,
    date: Date,
    record: &CallRecordingRecord,
) -> CorpusItem {
    let day = format_call_date(date);
    let transcript = record
        .full_transcript()
        .filter(|transcript| !transcript.trim().is_empty());

    let (content, has_transcript) = match transcript {
        Some(transcript) => (transcript.to_string(), true),
        None => (synthesize_call_content(record, &day), false),
    };

    CorpusItem {
        id,
        title: format!("Call with {} on {day}", record.contact_id),
        content,
        url: record.recording_url.clone(),
        item_type: CorpusItemType::CallRecording,
        has_transcript: Some(has_transcript),
    }
}

fn synthesize_call_content(record: &CallRecordingRecord, day: &str) -> String {
    let summary_part = record
        .summary
        .as_deref()
        .filter(|summary| !summary.trim().is_empty())
        .map(|summary| format!("Summary: {summary}"))
        .unwrap_or_default();
    let tags_part = record
        .tags
        .as_deref()
        .filter(|tags| !tags.is_empty())
        .map(|tags| format!("Tags: {}", tags.join(", ")))
        .unwrap_or_default();

    format!(
        "Call recording with contact {} on {day}. Duration: {} seconds. {summary_part} {tags_part}",
        record.contact_id,
        format_duration(record.duration),
    )
}

/// Parse a stored call date, accepting RFC 3339 timestamps or plain `YYYY-MM-DD` dates.
///
/// Timestamps are converted to UTC before the calendar date is taken.
pub fn parse_call_date(raw: &str) -> Result<Date, String> {
    let raw = raw.trim();
    if let Ok(timestamp) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(timestamp.to_offset(UtcOffset::UTC).date());
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|err| format!("invalid call date '{raw}': {err}"))
}

/// Render a date as `YYYY-MM-DD`.
pub fn format_call_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Seconds without a trailing `.0` for whole values; absent durations render as `0`.
pub fn format_duration(duration: Option<f64>) -> String {
    match duration {
        // f64 Display already drops the fractional part for whole numbers.
        Some(seconds) => seconds.to_string(),
        None => "0".to_string(),
    }
}
