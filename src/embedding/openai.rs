//! OpenAI embeddings implementation.

use super::Embedder;
use crate::error::{Result, VidchatError};
use crate::openai::{client_or_config_error, lazy_client};
use async_openai::config::OpenAIConfig;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_openai::Client;
use async_trait::async_trait;
use futures::{stream, StreamExt, TryStreamExt};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, instrument};

/// Inputs per embeddings request.
const BATCH_SIZE: usize = 100;

/// Batch requests in flight at once.
const MAX_CONCURRENT_BATCHES: usize = 4;

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: std::result::Result<Client<OpenAIConfig>, String>,
    model: String,
    dimensions: usize,
}

impl OpenAIEmbedder {
    /// Create an embedder bound to an API key.
    ///
    /// A missing key is reported by each call rather than here.
    pub fn new(api_key: Option<&str>, model: &str, dimensions: usize, timeout: Duration) -> Self {
        Self {
            client: lazy_client(api_key, timeout),
            model: model.to_string(),
            dimensions,
        }
    }

    async fn request_batch(
        &self,
        client: &Client<OpenAIConfig>,
        batch: &[String],
    ) -> Result<Vec<Vec<f32>>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(EmbeddingInput::StringArray(batch.to_vec()))
            .dimensions(self.dimensions as u32)
            .build()
            .map_err(|e| VidchatError::Embedding(format!("Failed to build request: {}", e)))?;

        let response = client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| VidchatError::OpenAI(format!("Embedding API error: {}", e)))?;

        // The API may answer out of order.
        let mut data = response.data;
        data.sort_by_key(|e| e.index);

        if data.len() != batch.len() {
            return Err(VidchatError::Embedding(format!(
                "expected {} embeddings, got {}",
                batch.len(),
                data.len()
            )));
        }

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

/// Split `texts` into owned batches and run `request` on up to
/// [`MAX_CONCURRENT_BATCHES`] of them at once. Output keeps input order.
async fn embed_in_batches<F, Fut>(texts: &[String], request: F) -> Result<Vec<Vec<f32>>>
where
    F: FnMut(Vec<String>) -> Fut,
    Fut: Future<Output = Result<Vec<Vec<f32>>>>,
{
    let batches: Vec<Vec<String>> = texts.chunks(BATCH_SIZE).map(<[String]>::to_vec).collect();

    let results: Vec<Vec<Vec<f32>>> = stream::iter(batches)
        .map(request)
        .buffered(MAX_CONCURRENT_BATCHES)
        .try_collect()
        .await?;

    Ok(results.into_iter().flatten().collect())
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| VidchatError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let client = client_or_config_error(&self.client)?;

        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let all_embeddings = embed_in_batches(texts, move |batch| async move {
            self.request_batch(client, &batch).await
        })
        .await?;

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
