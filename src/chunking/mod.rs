//! Transcript chunking for retrieval.
//!
//! Transcripts are plain text without timing, so chunking is purely textual:
//! bounded-size windows with overlap, cut at the most natural boundary that
//! fits.

mod splitter;

pub use splitter::RecursiveSplitter;

use crate::config::ChunkingSettings;
use serde::{Deserialize, Serialize};

/// A contiguous slice of a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Text content of this chunk.
    pub content: String,
    /// Byte offset where the chunk starts in the transcript.
    pub start: usize,
    /// Byte offset one past the end of the chunk.
    pub end: usize,
    /// Position of this chunk in the transcript.
    pub order: usize,
}

impl TextChunk {
    pub fn new(content: String, start: usize, end: usize, order: usize) -> Self {
        Self {
            content,
            start,
            end,
            order,
        }
    }
}

/// Configuration for chunking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared between neighbouring chunks.
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl From<&ChunkingSettings> for ChunkingConfig {
    fn from(settings: &ChunkingSettings) -> Self {
        Self {
            chunk_size: settings.chunk_size,
            chunk_overlap: settings.chunk_overlap,
        }
    }
}
