//! Document loading and chunking glue for index creation.
//!
//! Chunk size and overlap come straight from config/CLI and are handed to
//! the splitter untouched — the retrieval core has no opinion about them.

use std::path::Path;

use text_splitter::{ChunkConfig, TextSplitter};

use crate::error::{RagError, Result};

/// Read a UTF-8 text file and split it into overlapping character chunks.
pub fn load_and_split(path: &Path, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    split_text(&text, chunk_size, chunk_overlap)
}

/// Split text into chunks of at most `chunk_size` characters with
/// `chunk_overlap` characters of overlap between neighbors.
pub fn split_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<String>> {
    if chunk_size == 0 {
        return Err(RagError::InvalidArgument(
            "chunk_size must be positive".into(),
        ));
    }
    let config = ChunkConfig::new(chunk_size)
        .with_overlap(chunk_overlap)
        .map_err(|e| RagError::InvalidArgument(format!("bad chunking parameters: {e}")))?;
    let splitter = TextSplitter::new(config);
    Ok(splitter.chunks(text).map(str::to_string).collect())
}
