//! Prompt context from retrieved chunks.

use crate::vector_store::SearchResult;

/// Join retrieved chunks into the context block of the prompt, best match first.
pub fn format_context_for_prompt(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| r.document.chunk.content.trim())
        .filter(|content| !content.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::TextChunk;
    use crate::vector_store::Document;

    fn result(text: &str, score: f32) -> SearchResult {
        SearchResult {
            document: Document::new(TextChunk::new(text.to_string(), 0, text.len(), 0), vec![]),
            score,
        }
    }

    #[test]
    fn test_format_context() {
        let results = vec![result("First part. ", 0.9), result("   ", 0.5), result("Second part.", 0.4)];
        assert_eq!(format_context_for_prompt(&results), "First part.\n\nSecond part.");
    }

    #[test]
    fn test_empty_context() {
        assert_eq!(format_context_for_prompt(&[]), "");
    }
}
