//! Case-insensitive literal search with relevance scoring and highlighted snippets.
//!
//! Matching operates on characters with a one-to-one lowercase fold, so match positions in the
//! folded text are also valid positions in the original content.

use super::types::{CorpusItem, SearchResult};

const RELEVANCE_PER_MATCH: usize = 10;
const ELLIPSIS: &str = "...";
const HIGHLIGHT: &str = "**";

/// Search `items` for `term`, returning matching items ordered by descending relevance.
///
/// The term is matched exactly as given, whitespace included. Items without a match are
/// skipped. Ties keep their input order.
pub fn search_items(items: &[CorpusItem], term: &str, snippet_radius: usize) -> Vec<SearchResult> {
    if term.is_empty() {
        return Vec::new();
    }
    let needle: Vec<char> = term.chars().map(fold).collect();

    let mut results: Vec<SearchResult> = items
        .iter()
        .filter_map(|item| {
            let content: Vec<char> = item.content.chars().collect();
            let folded: Vec<char> = content.iter().copied().map(fold).collect();
            let positions = find_matches(&folded, &needle);
            let first = *positions.first()?;

            let window_start = first.saturating_sub(snippet_radius);
            let window_end = (first + needle.len() + snippet_radius).min(content.len());
            let snippet = build_snippet(
                &content[window_start..window_end],
                &folded[window_start..window_end],
                &needle,
            );

            Some(SearchResult {
                id: item.id.clone(),
                title: item.title.clone(),
                url: item.url.clone(),
                matches: positions.len(),
                snippet,
                relevance: positions.len() * RELEVANCE_PER_MATCH,
            })
        })
        .collect();

    // `sort_by` is stable.
    results.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    results
}

/// Characters whose lowercase form expands to several characters (`'İ'` → `"i̇"`) are left
/// unfolded, so they only match themselves.
fn fold(ch: char) -> char {
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}

/// Start positions of non-overlapping occurrences of `needle` in `haystack`.
fn find_matches(haystack: &[char], needle: &[char]) -> Vec<usize> {
    let mut positions = Vec::new();
    if needle.is_empty() || needle.len() > haystack.len() {
        return positions;
    }
    let mut index = 0;
    while index + needle.len() <= haystack.len() {
        if haystack[index..index + needle.len()] == *needle {
            positions.push(index);
            index += needle.len();
        } else {
            index += 1;
        }
    }
    positions
}

fn build_snippet(window: &[char], folded_window: &[char], needle: &[char]) -> String {
    let mut snippet = String::with_capacity(window.len() + 2 * ELLIPSIS.len());
    snippet.push_str(ELLIPSIS);
    let mut cursor = 0;
    for start in find_matches(folded_window, needle) {
        snippet.extend(&window[cursor..start]);
        snippet.push_str(HIGHLIGHT);
        snippet.extend(&window[start..start + needle.len()]);
        snippet.push_str(HIGHLIGHT);
        cursor = start + needle.len();
    }
    snippet.extend(&window[cursor..]);
    snippet.push_str(ELLIPSIS);
    snippet
}
