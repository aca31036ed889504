//! Fixed-window character chunking.
//!
//! Windows are measured in Unicode scalar values, never bytes, so multi-byte text is never split
//! inside a character. Each window starts `chunk_size - chunk_overlap` characters after the
//! previous one and consecutive windows share `chunk_overlap` characters. Dropping the first
//! `chunk_overlap` characters of every chunk after the first and concatenating the rest
//! reconstructs the input exactly.

use super::types::{Chunk, ChunkingError};

/// Split `text` into overlapping windows of at most `chunk_size` characters.
///
/// Empty input yields no chunks; input no longer than `chunk_size` yields a single chunk equal to
/// the input.
pub fn chunk_text(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<String>, ChunkingError> {
    if chunk_size == 0 {
        return Err(ChunkingError::InvalidChunkSize);
    }
    if chunk_overlap >= chunk_size {
        return Err(ChunkingError::InvalidOverlap {
            chunk_size,
            chunk_overlap,
        });
    }

    // Byte offset of every char boundary, including the end of the string.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();
    let total = boundaries.len() - 1;
    if total == 0 {
        return Ok(Vec::new());
    }

    let step = chunk_size - chunk_overlap;
    let mut chunks = Vec::with_capacity(total.div_ceil(step));
    let mut start = 0;
    loop {
        let end = (start + chunk_size).min(total);
        chunks.push(text[boundaries[start]..boundaries[end]].to_string());
        if end == total {
            break;
        }
        start += step;
    }
    Ok(chunks)
}

/// Chunk `text` and attach zero-based indices.
pub fn chunk_document(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<Chunk>, ChunkingError> {
    Ok(chunk_text(text, chunk_size, chunk_overlap)?
        .into_iter()
        .enumerate()
        .map(|(index, content)| Chunk { content, index })
        .collect())
}
