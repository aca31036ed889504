//! Corpus-wide statistics.

use std::collections::BTreeMap;

use super::{
    document_metrics::word_count,
    types::{CorpusItem, CorpusStats, DocumentExtreme},
};

const UNKNOWN_TYPE: &str = "unknown";

/// Aggregate word and character totals, averages, a type histogram, and the largest and
/// smallest items by word count.
pub fn compute_stats(items: &[CorpusItem]) -> CorpusStats {
    if items.is_empty() {
        return CorpusStats::default();
    }

    let mut total_words = 0;
    let mut total_characters = 0;
    let mut document_types: BTreeMap<String, usize> = BTreeMap::new();
    let mut largest: Option<DocumentExtreme> = None;
    let mut smallest: Option<DocumentExtreme> = None;

    for item in items {
        let words = word_count(&item.content);
        total_words += words;
        total_characters += item.content.chars().count();
        *document_types
            .entry(document_type_from_url(&item.url))
            .or_default() += 1;

        if largest.as_ref().is_none_or(|current| words > current.word_count) {
            largest = Some(extreme(item, words));
        }
        if smallest.as_ref().is_none_or(|current| words < current.word_count) {
            smallest = Some(extreme(item, words));
        }
    }

    let count = items.len();
    CorpusStats {
        total_documents: count,
        total_words,
        total_characters,
        average_words_per_document: rounded_average(total_words, count),
        average_characters_per_document: rounded_average(total_characters, count),
        document_types,
        largest_document: largest,
        smallest_document: smallest,
    }
}

/// Lower-cased extension of the last path segment of `url`, or `"unknown"`.
///
/// Query strings and fragments are ignored, as is the host of an absolute URL.
pub fn document_type_from_url(url: &str) -> String {
    let without_suffix = url.split(['?', '#']).next().unwrap_or_default();
    let path = match without_suffix.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("", |slash| &rest[slash..]),
        None => without_suffix,
    };
    let file_name = path.rsplit('/').next().unwrap_or_default();

    match file_name.rsplit_once('.') {
        Some((_, extension)) if !extension.is_empty() => extension.to_lowercase(),
        _ => UNKNOWN_TYPE.to_string(),
    }
}

fn extreme(item: &CorpusItem, word_count: usize) -> DocumentExtreme {
    DocumentExtreme {
        id: item.id.clone(),
        title: item.title.clone(),
        word_count,
    }
}

fn rounded_average(total: usize, count: usize) -> u64 {
    (total as f64 / count as f64).round() as u64
}
