//! Prompt construction for knowledge-base questions.

use super::types::CorpusItem;

/// Render corpus items and a question into the knowledge-base prompt.
///
/// Each item becomes a `Document:`/`Content:` block terminated by `---`.
pub fn build_knowledge_prompt(question: &str, items: &[CorpusItem]) -> String {
    let context = items
        .iter()
        .map(|item| format!("Document: {}\nContent: {}\n---\n", item.title, item.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Using the following documents as context, please answer this question: \"{question}\"\n\n\
         Context:\n{context}\n\n\
         Please provide a comprehensive answer based on the information in these documents."
    )
}
