//! The question answering pipeline.

use super::chat::{ChatModel, OpenAIChatModel};
use super::context::format_context_for_prompt;
use crate::chunking::{ChunkingConfig, RecursiveSplitter};
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, VidchatError};
use crate::vector_store::{Document, MemoryVectorStore};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Answers questions about a transcript. Holds no per-question state.
#[derive(Clone)]
pub struct QaPipeline {
    splitter: RecursiveSplitter,
    embedder: Arc<dyn Embedder>,
    chat: Arc<dyn ChatModel>,
    prompts: Prompts,
    top_k: usize,
}

impl QaPipeline {
    pub fn new(
        splitter: RecursiveSplitter,
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
        prompts: Prompts,
        top_k: usize,
    ) -> Self {
        Self {
            splitter,
            embedder,
            chat,
            prompts,
            top_k: top_k.max(1),
        }
    }

    /// Build the OpenAI-backed pipeline from configuration.
    ///
    /// The API key is read once here. Without one the pipeline still builds
    /// and every answer fails with a configuration error.
    pub fn from_settings(settings: &Settings, prompts: Prompts) -> Result<Self> {
        let api_key = settings.api_key();
        let timeout = Duration::from_secs(settings.openai.timeout_secs);

        let splitter = RecursiveSplitter::new(&ChunkingConfig::from(&settings.chunking))?;
        let embedder = OpenAIEmbedder::new(
            api_key.as_deref(),
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
            timeout,
        );
        let chat = OpenAIChatModel::new(
            api_key.as_deref(),
            &settings.rag.model,
            settings.rag.temperature,
            timeout,
        );

        Ok(Self::new(
            splitter,
            Arc::new(embedder),
            Arc::new(chat),
            prompts,
            settings.rag.top_k,
        ))
    }

    /// Answer `question` from `transcript`.
    #[instrument(skip(self, transcript), fields(transcript_len = transcript.len()))]
    pub async fn answer(&self, transcript: &str, question: &str) -> Result<String> {
        let chunks = self.splitter.split(transcript);
        if chunks.is_empty() {
            return Err(VidchatError::Rag("transcript is empty".to_string()));
        }
        debug!("Split transcript into {} chunks", chunks.len());

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(VidchatError::Embedding(format!(
                "expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let mut store = MemoryVectorStore::new();
        store.insert_batch(
            chunks
                .into_iter()
                .zip(embeddings)
                .map(|(chunk, embedding)| Document::new(chunk, embedding))
                .collect(),
        )?;

        let query = self.embedder.embed(question).await?;
        let results = store.search(&query, self.top_k);
        info!("Retrieved {} of {} chunks", results.len(), store.len());

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), format_context_for_prompt(&results));
        let user_prompt = self.prompts.render_with_custom(&self.prompts.qa.user, &vars);

        let answer = self.chat.complete(&self.prompts.qa.system, &user_prompt).await?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(VidchatError::Rag("Empty response from LLM".to_string()));
        }

        Ok(answer.to_string())
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const DIMS: usize = 64;

    /// Bag-of-words hashing embedder.
    pub struct WordEmbedder;

    pub fn word_vector(text: &str) -> Vec<f32> {
        let mut v = vec![0.0; DIMS];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let bucket = word
                .to_lowercase()
                .bytes()
                .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
            v[bucket % DIMS] += 1.0;
        }
        v
    }

    #[async_trait]
    impl Embedder for WordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(word_vector(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| word_vector(t)).collect())
        }

        fn dimensions(&self) -> usize {
            DIMS
        }
    }

    /// Replies with a fixed prefix and records the last prompt.
    #[derive(Default)]
    pub struct RecordingChat {
        pub last_prompt: Mutex<Option<String>>,
    }

    #[async_trait]
    impl ChatModel for RecordingChat {
        async fn complete(&self, _system: &str, user: &str) -> Result<String> {
            *self.last_prompt.lock().unwrap() = Some(user.to_string());
            Ok(" The video explains recursion. ".to_string())
        }
    }

    pub fn pipeline(chat: Arc<RecordingChat>) -> QaPipeline {
        QaPipeline::new(
            RecursiveSplitter::new(&ChunkingConfig::default()).unwrap(),
            Arc::new(WordEmbedder),
            chat,
            Prompts::default(),
            4,
        )
    }
}
