//! OpenAI Whisper speech model.

use super::SpeechModel;
use crate::error::{Result, VidchatError};
use crate::openai::{client_or_config_error, lazy_client};
use async_openai::config::OpenAIConfig;
use async_openai::types::{AudioInput, AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_openai::Client;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Largest audio file the hosted API accepts.
const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// Hosted Whisper speech model.
pub struct WhisperApiModel {
    client: std::result::Result<Client<OpenAIConfig>, String>,
    model: String,
}

impl WhisperApiModel {
    /// Create a Whisper model bound to an API key.
    ///
    /// A missing key is not an error here; each call will fail with a
    /// configuration error instead.
    pub fn new(api_key: Option<&str>, model: &str, timeout: Duration) -> Self {
        Self {
            client: lazy_client(api_key, timeout),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl SpeechModel for WhisperApiModel {
    fn name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn recognize(&self, audio_path: &Path, language: &str) -> Result<String> {
        let client = client_or_config_error(&self.client)?;

        let size = tokio::fs::metadata(audio_path).await?.len();
        if size > MAX_UPLOAD_BYTES {
            return Err(VidchatError::Transcription(format!(
                "audio is {:.1} MB, hosted Whisper accepts at most 25 MB; use transcription.provider = \"local\" for long videos",
                size as f64 / (1024.0 * 1024.0)
            )));
        }

        debug!("Transcribing {} bytes of audio with {}", size, self.model);

        let file_bytes = tokio::fs::read(audio_path).await?;

        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(
                audio_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("audio.m4a")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model)
            .language(language)
            .response_format(AudioResponseFormat::Json)
            .build()
            .map_err(|e| VidchatError::Transcription(format!("Failed to build request: {}", e)))?;

        let response = client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| VidchatError::OpenAI(format!("Whisper API error: {}", e)))?;

        Ok(response.text)
    }
}
