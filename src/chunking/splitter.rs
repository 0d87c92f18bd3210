//! Recursive boundary-aware text splitting.
//!
//! The text is first cut into contiguous pieces no longer than the chunk size,
//! preferring paragraph, line, sentence and word boundaries in that order.
//! Separators stay attached to the piece they end, so the pieces tile the
//! input exactly. Pieces are then merged greedily into chunks, and each new
//! chunk re-uses a tail of the previous one as overlap.

use super::{ChunkingConfig, TextChunk};
use crate::error::{Result, VidchatError};
use std::collections::VecDeque;
use std::ops::Range;

/// Boundaries ordered from most to least preferred. The empty separator means
/// "split between characters".
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", "? ", "! ", "; ", ", ", " ", ""];

/// A contiguous byte range of the input plus its length in characters.
#[derive(Debug, Clone)]
struct Piece {
    range: Range<usize>,
    chars: usize,
}

/// Splits text into overlapping chunks.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveSplitter {
    /// Create a splitter, rejecting an overlap that is not smaller than the size.
    pub fn new(config: &ChunkingConfig) -> Result<Self> {
        if config.chunk_size == 0 {
            return Err(VidchatError::InvalidInput("chunk size must be positive".to_string()));
        }
        if config.chunk_overlap >= config.chunk_size {
            return Err(VidchatError::InvalidInput(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                config.chunk_overlap, config.chunk_size
            )));
        }

        Ok(Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        })
    }

    /// Split `text` into ordered, overlapping chunks.
    pub fn split(&self, text: &str) -> Vec<TextChunk> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut pieces = Vec::new();
        self.split_recursive(text, 0..text.len(), SEPARATORS, &mut pieces);
        self.merge(text, pieces)
    }

    fn split_recursive(
        &self,
        text: &str,
        range: Range<usize>,
        separators: &[&str],
        out: &mut Vec<Piece>,
    ) {
        let slice = &text[range.clone()];
        let chars = slice.chars().count();

        if chars <= self.chunk_size {
            out.push(Piece { range, chars });
            return;
        }

        // First separator that actually occurs, so every level does some work.
        let position = separators
            .iter()
            .position(|sep| sep.is_empty() || slice.contains(sep));

        let (separator, rest) = match position {
            Some(i) => (separators[i], &separators[i + 1..]),
            None => ("", &[][..]),
        };

        if separator.is_empty() {
            self.split_chars(text, range, out);
            return;
        }

        let mut start = range.start;
        for (idx, _) in slice.match_indices(separator) {
            let end = range.start + idx + separator.len();
            if end > start {
                self.split_recursive(text, start..end, rest, out);
            }
            start = end;
        }
        if start < range.end {
            self.split_recursive(text, start..range.end, rest, out);
        }
    }

    /// Last resort: cut between characters, never inside a UTF-8 sequence.
    fn split_chars(&self, text: &str, range: Range<usize>, out: &mut Vec<Piece>) {
        let mut start = range.start;
        let mut count = 0;

        for (idx, _) in text[range.clone()].char_indices() {
            if count == self.chunk_size {
                out.push(Piece { range: start..range.start + idx, chars: count });
                start = range.start + idx;
                count = 0;
            }
            count += 1;
        }

        if start < range.end {
            out.push(Piece { range: start..range.end, chars: count });
        }
    }

    fn merge(&self, text: &str, pieces: Vec<Piece>) -> Vec<TextChunk> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<Piece> = VecDeque::new();
        let mut window_chars = 0;

        for piece in pieces {
            if window_chars + piece.chars > self.chunk_size && !window.is_empty() {
                chunks.push(Self::emit(text, &window, chunks.len()));

                // Keep a tail of the window as overlap, but only as much as
                // still leaves room for the incoming piece.
                while window_chars > self.chunk_overlap
                    || (window_chars + piece.chars > self.chunk_size && window_chars > 0)
                {
                    match window.pop_front() {
                        Some(first) => window_chars -= first.chars,
                        None => break,
                    }
                }
            }

            window_chars += piece.chars;
            window.push_back(piece);
        }

        if !window.is_empty() {
            chunks.push(Self::emit(text, &window, chunks.len()));
        }

        chunks
    }

    fn emit(text: &str, window: &VecDeque<Piece>, order: usize) -> TextChunk {
        let start = window.front().map(|p| p.range.start).unwrap_or_default();
        let end = window.back().map(|p| p.range.end).unwrap_or(start);
        TextChunk::new(text[start..end].to_string(), start, end, order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(size: usize, overlap: usize) -> RecursiveSplitter {
        RecursiveSplitter::new(&ChunkingConfig { chunk_size: size, chunk_overlap: overlap }).unwrap()
    }

    fn lecture(sentences: usize) -> String {
        (0..sentences)
            .map(|i| format!("Sentence number {} talks about recursion and base cases.", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn assert_covers(text: &str, chunks: &[TextChunk]) {
        let mut covered = vec![false; text.len()];
        for chunk in chunks {
            assert_eq!(&text[chunk.start..chunk.end], chunk.content);
            for flag in &mut covered[chunk.start..chunk.end] {
                *flag = true;
            }
        }
        if let Some(gap) = covered.iter().position(|c| !c) {
            panic!("byte {} not covered by any chunk", gap);
        }
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let text = "The video explains recursion using a function that calls itself.";
        let chunks = splitter(1000, 200).split(text);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, text);
        assert_eq!(chunks[0].order, 0);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(splitter(100, 10).split("").is_empty());
    }

    #[test]
    fn test_every_byte_is_covered() {
        let text = lecture(120);
        let chunks = splitter(300, 60).split(&text);

        assert!(chunks.len() > 1);
        assert_covers(&text, &chunks);
    }

    #[test]
    fn test_chunks_respect_size_and_overlap() {
        let text = lecture(80);
        let chunks = splitter(250, 80).split(&text);

        for chunk in &chunks {
            assert!(chunk.content.chars().count() <= 250, "chunk too long: {}", chunk.content.len());
        }
        for pair in chunks.windows(2) {
            assert!(pair[1].start < pair[0].end, "neighbouring chunks should overlap");
            assert!(pair[1].start > pair[0].start, "chunks must advance");
        }
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.order, i);
        }
    }

    #[test]
    fn test_prefers_sentence_boundaries() {
        let text = lecture(30);
        let chunks = splitter(200, 0).split(&text);

        for chunk in &chunks[..chunks.len() - 1] {
            assert!(chunk.content.ends_with(". "), "split mid-sentence: {:?}", chunk.content);
        }
    }

    #[test]
    fn test_paragraphs_split_before_sentences() {
        let para = "One. Two. Three.";
        let text = format!("{}\n\n{}\n\n{}", para, para, para);
        let chunks = splitter(20, 0).split(&text);

        assert_eq!(chunks[0].content, "One. Two. Three.\n\n");
        assert_covers(&text, &chunks);
    }

    #[test]
    fn test_unbroken_text_falls_back_to_characters() {
        let text = "é".repeat(45);
        let chunks = splitter(10, 3).split(&text);

        assert_covers(&text, &chunks);
        for chunk in &chunks {
            assert!(chunk.content.chars().count() <= 10);
        }
    }

    #[test]
    fn test_rejects_overlap_not_smaller_than_size() {
        let config = ChunkingConfig { chunk_size: 100, chunk_overlap: 100 };
        assert!(RecursiveSplitter::new(&config).is_err());

        let config = ChunkingConfig { chunk_size: 0, chunk_overlap: 0 };
        assert!(RecursiveSplitter::new(&config).is_err());
    }
}
