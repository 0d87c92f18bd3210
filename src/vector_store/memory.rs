//! Brute-force in-memory vector store.

use super::{cosine_similarity, Document, SearchResult};
use crate::error::{Result, VidchatError};

/// Ephemeral vector store, scored by cosine similarity.
#[derive(Debug, Default)]
pub struct MemoryVectorStore {
    documents: Vec<Document>,
    dimensions: Option<usize>,
}

impl MemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add documents. Every embedding must have the same length.
    pub fn insert_batch(&mut self, docs: Vec<Document>) -> Result<usize> {
        let count = docs.len();
        for doc in docs {
            let len = doc.embedding.len();
            match self.dimensions {
                Some(dims) if dims != len => {
                    return Err(VidchatError::Rag(format!(
                        "embedding has {} dimensions, index expects {}",
                        len, dims
                    )));
                }
                Some(_) => {}
                None => self.dimensions = Some(len),
            }
            self.documents.push(doc);
        }
        Ok(count)
    }

    /// Return the `limit` most similar documents, best first.
    pub fn search(&self, query_embedding: &[f32], limit: usize) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = self
            .documents
            .iter()
            .map(|doc| SearchResult {
                document: doc.clone(),
                score: cosine_similarity(query_embedding, &doc.embedding),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);
        results
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::TextChunk;

    fn doc(text: &str, order: usize, embedding: Vec<f32>) -> Document {
        Document::new(TextChunk::new(text.to_string(), 0, text.len(), order), embedding)
    }

    #[test]
    fn test_memory_vector_store() {
        let mut store = MemoryVectorStore::new();

        store
            .insert_batch(vec![
                doc("Hello world", 0, vec![1.0, 0.0, 0.0]),
                doc("Goodbye world", 1, vec![0.0, 1.0, 0.0]),
                doc("Hello again", 2, vec![0.9, 0.1, 0.0]),
            ])
            .unwrap();

        assert_eq!(store.len(), 3);

        let results = store.search(&[1.0, 0.0, 0.0], 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document.chunk.content, "Hello world");
        assert_eq!(results[1].document.chunk.content, "Hello again");
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn test_limit_larger_than_store() {
        let mut store = MemoryVectorStore::new();
        store.insert_batch(vec![doc("only", 0, vec![1.0, 1.0])]).unwrap();

        assert_eq!(store.search(&[1.0, 0.0], 4).len(), 1);
        assert!(MemoryVectorStore::new().search(&[1.0], 4).is_empty());
    }

    #[test]
    fn test_rejects_mixed_dimensions() {
        let mut store = MemoryVectorStore::new();
        let result = store.insert_batch(vec![doc("a", 0, vec![1.0, 0.0]), doc("b", 1, vec![1.0])]);
        assert!(matches!(result, Err(VidchatError::Rag(_))));
    }
}
