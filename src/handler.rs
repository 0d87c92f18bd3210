//! Chat request handling: resolve, answer, or apologise.

use crate::fallback::pick_apology;
use crate::rag::QaPipeline;
use crate::resolver::{Resolution, TranscriptResolver};
use crate::video::VideoId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Body of a chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Body of a chat reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
}

/// Answers questions about videos. Never fails: any problem becomes an apology.
#[derive(Clone)]
pub struct ChatHandler {
    resolver: Arc<TranscriptResolver>,
    pipeline: QaPipeline,
}

impl ChatHandler {
    pub fn new(resolver: Arc<TranscriptResolver>, pipeline: QaPipeline) -> Self {
        Self { resolver, pipeline }
    }

    pub fn resolver(&self) -> &TranscriptResolver {
        &self.resolver
    }

    /// Answer `message` about the video identified by `video_id`.
    #[instrument(skip(self, message), fields(video_id = %video_id))]
    pub async fn handle(&self, video_id: &str, message: &str) -> ChatReply {
        let answer = self.try_answer(video_id, message).await;

        let message = match answer {
            Ok(answer) => answer,
            Err(cause) => {
                warn!("Answering with an apology: {}", cause);
                pick_apology(&mut rand::thread_rng()).to_string()
            }
        };

        ChatReply { message }
    }

    async fn try_answer(&self, video_id: &str, question: &str) -> Result<String, String> {
        let video_id = VideoId::parse(video_id).map_err(|e| e.to_string())?;

        if question.trim().is_empty() {
            return Err("empty question".to_string());
        }

        let record = match self.resolver.resolve(&video_id).await {
            Resolution::Found(record) => record,
            Resolution::Downloaded(record) => {
                info!("Transcript created at {}", record.path.display());
                record
            }
            Resolution::Failed(reason) => return Err(reason.to_string()),
        };

        self.pipeline
            .answer(&record.text, question)
            .await
            .map_err(|e| e.to_string())
    }
}
