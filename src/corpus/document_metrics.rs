//! Per-text word, character, sentence, and paragraph metrics.

use super::types::DocumentMetrics;

/// Count words, characters, sentences, and paragraphs in `text` and derive the averages.
///
/// Averages divide by `max(count, 1)` so empty or unpunctuated text never yields `NaN`.
pub fn calculate_document_metrics(text: &str) -> DocumentMetrics {
    let word_count = word_count(text);
    let character_count = text.chars().count();
    let sentence_count = sentence_count(text);
    let paragraph_count = paragraph_count(text);

    DocumentMetrics {
        word_count,
        character_count,
        sentence_count,
        paragraph_count,
        average_word_length: ratio(character_count, word_count),
        average_sentence_length: ratio(word_count, sentence_count),
        average_paragraph_length: ratio(word_count, paragraph_count),
    }
}

/// Whitespace-separated token count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn sentence_count(text: &str) -> usize {
    let mut runs = 0;
    let mut in_terminator = false;
    for ch in text.chars() {
        let terminator = matches!(ch, '.' | '!' | '?');
        if terminator && !in_terminator {
            runs += 1;
        }
        in_terminator = terminator;
    }
    runs
}

fn paragraph_count(text: &str) -> usize {
    let mut paragraphs = 0;
    let mut in_paragraph = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            in_paragraph = false;
        } else if !in_paragraph {
            paragraphs += 1;
            in_paragraph = true;
        }
    }
    paragraphs
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    numerator as f64 / denominator.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_zeroed() {
        let metrics = calculate_document_metrics("");
        assert_eq!(metrics, DocumentMetrics::default());
        assert!(!metrics.average_word_length.is_nan());
        assert!(!metrics.average_sentence_length.is_nan());
        assert!(!metrics.average_paragraph_length.is_nan());
    }

    #[test]
    fn counts_sentences_by_terminator_runs() {
        let metrics = calculate_document_metrics("Hi there. Really?! Yes... ok");
        assert_eq!(metrics.sentence_count, 3);
        assert_eq!(metrics.word_count, 5);
        assert!((metrics.average_sentence_length - 5.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unpunctuated_text_has_no_sentences() {
        let metrics = calculate_document_metrics("just some words");
        assert_eq!(metrics.sentence_count, 0);
        assert!((metrics.average_sentence_length - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn counts_paragraphs_between_blank_lines() {
        let text = "First paragraph line one.\nline two.\n\n  \nSecond paragraph.\n\n\nThird.";
        let metrics = calculate_document_metrics(text);
        assert_eq!(metrics.paragraph_count, 3);
        assert_eq!(calculate_document_metrics("   \n\n ").paragraph_count, 0);
        assert_eq!(calculate_document_metrics("one block").paragraph_count, 1);
    }

    #[test]
    fn averages_use_characters_per_word() {
        let metrics = calculate_document_metrics("ab cd");
        assert_eq!(metrics.character_count, 5);
        assert!((metrics.average_word_length - 2.5).abs() < f64::EPSILON);
        assert!((metrics.average_paragraph_length - 2.0).abs() < f64::EPSILON);
    }
}
