//! Text chunking into fixed-size overlapping windows.
//!
//! Chunk sizes and overlap are measured in characters, not bytes, so the
//! windows are UTF-8 safe and the size contract holds for multi-byte text.

use crate::types::Chunk;
use paperchat_core::{AppError, AppResult};

/// Split text into overlapping fixed-size chunks.
///
/// Chunk `i` starts at char offset `i * (chunk_size - overlap)`. Every chunk
/// except possibly the last has exactly `chunk_size` chars; the final chunk
/// absorbs the remainder and emission stops once a chunk reaches the end of
/// the text. Consecutive chunks share exactly `overlap` chars.
///
/// # Errors
/// `InvalidConfiguration` if `overlap >= chunk_size` or `chunk_size == 0`.
/// Empty input yields an empty sequence, not an error.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> AppResult<Vec<Chunk>> {
    if chunk_size == 0 {
        return Err(AppError::InvalidConfiguration(
            "chunk_size must be greater than zero".to_string(),
        ));
    }

    if overlap >= chunk_size {
        return Err(AppError::InvalidConfiguration(format!(
            "overlap ({}) must be smaller than chunk_size ({})",
            overlap, chunk_size
        )));
    }

    if text.is_empty() {
        return Ok(vec![]);
    }

    // Byte offset of each char, plus a sentinel for one-past-the-end
    let mut byte_offsets: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
    byte_offsets.push(text.len());
    let total_chars = byte_offsets.len() - 1;

    let step = chunk_size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut position = 0u32;

    loop {
        let end = (start + chunk_size).min(total_chars);
        chunks.push(Chunk {
            position,
            start,
            end,
            text: text[byte_offsets[start]..byte_offsets[end]].to_string(),
        });
        position += 1;

        if end == total_chars {
            break;
        }
        start += step;
    }

    tracing::debug!(
        "Chunked {} chars into {} chunks (size: {}, overlap: {})",
        total_chars,
        chunks.len(),
        chunk_size,
        overlap
    );

    Ok(chunks)
}
