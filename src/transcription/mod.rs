//! Speech-to-text.
//!
//! The speech model is loaded once at startup ([`load_model`]) and shared by
//! reference; [`Transcriber`] owns the single-use lifecycle of an audio file.
//!
//! # Backends
//!
//! - **openai** (default): hosted Whisper.
//! - **local**: whisper.cpp in-process, behind the `local-whisper` feature.

#[cfg(feature = "local-whisper")]
mod local;
mod whisper;

#[cfg(feature = "local-whisper")]
pub use local::LocalWhisperModel;
pub use whisper::WhisperApiModel;

use crate::config::{Settings, TranscriptionProvider};
use crate::error::{Result, VidchatError};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// A loaded speech recognition model.
#[async_trait]
pub trait SpeechModel: Send + Sync {
    /// Human-readable model name for logs.
    fn name(&self) -> &str;

    /// Recognize speech in an audio file, constrained to `language`.
    async fn recognize(&self, audio_path: &Path, language: &str) -> Result<String>;
}

/// Load the configured speech model.
pub fn load_model(settings: &Settings) -> Result<Arc<dyn SpeechModel>> {
    let model: Arc<dyn SpeechModel> = match settings.transcription.provider {
        TranscriptionProvider::Openai => Arc::new(WhisperApiModel::new(
            settings.api_key().as_deref(),
            &settings.transcription.model,
            Duration::from_secs(settings.openai.timeout_secs),
        )),
        TranscriptionProvider::Local => load_local(settings)?,
    };

    info!("Speech model ready: {}", model.name());
    Ok(model)
}

#[cfg(feature = "local-whisper")]
fn load_local(settings: &Settings) -> Result<Arc<dyn SpeechModel>> {
    Ok(Arc::new(LocalWhisperModel::load(
        &settings.model_dir(),
        &settings.transcription.variant,
        settings.transcription.device,
    )?))
}

#[cfg(not(feature = "local-whisper"))]
fn load_local(_settings: &Settings) -> Result<Arc<dyn SpeechModel>> {
    Err(VidchatError::Config(
        "transcription.provider = \"local\" requires building with --features local-whisper"
            .to_string(),
    ))
}

/// Turns an audio file into text and then removes the file.
#[derive(Clone)]
pub struct Transcriber {
    model: Arc<dyn SpeechModel>,
}

impl Transcriber {
    pub fn new(model: Arc<dyn SpeechModel>) -> Self {
        Self { model }
    }

    /// Transcribe `audio_path` in `language`.
    ///
    /// The audio file is deleted afterwards whether recognition succeeded or
    /// not; callers must not expect it to exist once this returns. The text
    /// is returned exactly as the model produced it.
    #[instrument(skip(self), fields(model = %self.model.name()))]
    pub async fn transcribe(&self, audio_path: Option<&Path>, language: &str) -> Result<String> {
        let audio_path = audio_path
            .ok_or_else(|| VidchatError::InvalidInput("audio file path is required".to_string()))?;

        let result = self.model.recognize(audio_path, language).await;

        match tokio::fs::remove_file(audio_path).await {
            Ok(()) => debug!("Removed {}", audio_path.display()),
            Err(e) => warn!("Failed to remove audio file {}: {}", audio_path.display(), e),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedModel {
        reply: Result<String>,
        calls: AtomicUsize,
    }

    impl FixedModel {
        fn ok(text: &str) -> Self {
            Self { reply: Ok(text.to_string()), calls: AtomicUsize::new(0) }
        }

        fn failing() -> Self {
            Self {
                reply: Err(VidchatError::Transcription("model crashed".into())),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SpeechModel for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn recognize(&self, audio_path: &Path, language: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(audio_path.exists(), "audio must exist while recognizing");
            assert_eq!(language, "en");
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(VidchatError::Transcription(e.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_transcribe_deletes_audio() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("abc123.m4a");
        std::fs::write(&audio, b"fake audio").unwrap();

        let transcriber = Transcriber::new(Arc::new(FixedModel::ok("  Hello there. ")));
        let text = transcriber.transcribe(Some(audio.as_path()), "en").await.unwrap();

        assert_eq!(text, "  Hello there. ");
        assert!(!audio.exists());
    }

    #[tokio::test]
    async fn test_audio_deleted_even_when_recognition_fails() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("abc123.m4a");
        std::fs::write(&audio, b"fake audio").unwrap();

        let transcriber = Transcriber::new(Arc::new(FixedModel::failing()));
        let result = transcriber.transcribe(Some(audio.as_path()), "en").await;

        tokio_test::assert_err!(result);
        assert!(!audio.exists());
    }

    #[tokio::test]
    async fn test_missing_path_fails_fast() {
        let model = Arc::new(FixedModel::ok("unused"));
        let transcriber = Transcriber::new(model.clone());

        let err = transcriber.transcribe(None, "en").await.unwrap_err();

        assert!(matches!(err, VidchatError::InvalidInput(_)));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_openai_provider_loads() {
        let mut settings = Settings::default();
        settings.transcription.provider = TranscriptionProvider::Openai;
        settings.openai.api_key = Some("sk-test".to_string());
        let model = load_model(&settings).unwrap();
        assert_eq!(model.name(), "whisper-1");
    }

    #[cfg(not(feature = "local-whisper"))]
    #[test]
    fn test_local_provider_requires_feature() {
        let mut settings = Settings::default();
        settings.transcription.provider = TranscriptionProvider::Local;
        assert!(matches!(load_model(&settings), Err(VidchatError::Config(_))));
    }

    #[cfg(feature = "local-whisper")]
    #[test]
    fn test_default_local_model_uses_configured_variant() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.transcription.model_dir = dir.path().display().to_string();
        settings.transcription.variant = "base".to_string();

        let Err(VidchatError::Config(msg)) = load_model(&settings) else {
            panic!("expected a missing model error");
        };
        assert!(msg.contains("ggml-base.bin"), "unexpected error: {}", msg);
    }
}
