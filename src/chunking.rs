//! Character-window chunking of page text.
//!
//! Windows are measured in Unicode scalar values so multi-byte text is never
//! split inside a character. Consecutive windows share `chunk_overlap`
//! characters, and every chunk remembers the page it came from.

use anyhow::Result;

use crate::models::{Chunk, PageText};

/// Collapse every run of whitespace to a single space and trim the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `text` into overlapping windows tagged with `page`.
///
/// Window `i` starts at `i * (chunk_size - chunk_overlap)`. Windows that are
/// empty after cleaning are dropped.
pub fn chunk_text(
    text: &str,
    page: u32,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<Chunk>> {
    if chunk_size == 0 {
        anyhow::bail!("chunk_size must be greater than zero");
    }
    if chunk_overlap >= chunk_size {
        anyhow::bail!("chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})");
    }

    let chars: Vec<char> = text.chars().collect();
    let stride = chunk_size - chunk_overlap;
    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let window: String = chars[start..end].iter().collect();
        let cleaned = clean_text(&window);
        if !cleaned.is_empty() {
            chunks.push(Chunk {
                page,
                text: cleaned,
            });
        }
        start += stride;
    }

    Ok(chunks)
}

/// Chunk every non-empty page, preserving page order.
pub fn chunk_pages(
    pages: &[PageText],
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<Chunk>> {
    let mut all_chunks = Vec::new();
    for page in pages {
        if page.text.is_empty() {
            continue;
        }
        all_chunks.extend(chunk_text(&page.text, page.page, chunk_size, chunk_overlap)?);
    }
    Ok(all_chunks)
}
