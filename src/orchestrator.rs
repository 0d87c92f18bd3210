//! Service wiring for vidchat.
//!
//! Builds the long-lived pieces once: the speech model, the resolver and the
//! QA pipeline. Commands and the HTTP server share them from here.

use crate::audio::YtDlpFetcher;
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::handler::ChatHandler;
use crate::rag::QaPipeline;
use crate::resolver::TranscriptResolver;
use crate::transcription::{load_model, Transcriber};
use std::sync::Arc;
use tracing::info;

/// The assembled application.
pub struct Orchestrator {
    settings: Settings,
    resolver: Arc<TranscriptResolver>,
    pipeline: QaPipeline,
}

impl Orchestrator {
    /// Load the speech model and build every service from `settings`.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let model = load_model(&settings)?;
        let fetcher = Arc::new(YtDlpFetcher::with_config(
            Settings::expand_path(&settings.download.yt_dlp_path),
            &settings.download.audio_format,
        ));
        let resolver = Arc::new(TranscriptResolver::from_settings(
            &settings,
            fetcher,
            Transcriber::new(model),
        ));
        let pipeline = QaPipeline::from_settings(&settings, prompts)?;

        if settings.api_key().is_none() {
            info!("No OpenAI API key configured; answers will fall back to apologies");
        }

        Ok(Self {
            settings,
            resolver,
            pipeline,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn resolver(&self) -> &TranscriptResolver {
        &self.resolver
    }

    pub fn pipeline(&self) -> &QaPipeline {
        &self.pipeline
    }

    /// A request handler sharing this orchestrator's services.
    pub fn handler(&self) -> ChatHandler {
        ChatHandler::new(Arc::clone(&self.resolver), self.pipeline.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranscriptionProvider;

    /// Defaults with the hosted speech model, which needs no model file.
    fn hosted_settings() -> Settings {
        let mut settings = Settings::default();
        settings.transcription.provider = TranscriptionProvider::Openai;
        settings
    }

    #[test]
    fn test_builds_from_defaults() {
        let orchestrator = Orchestrator::new(hosted_settings()).unwrap();
        assert_eq!(
            orchestrator.resolver().store().dir(),
            Settings::default().transcript_dir()
        );
    }

    #[test]
    fn test_rejects_bad_chunking() {
        let mut settings = hosted_settings();
        settings.chunking.chunk_overlap = settings.chunking.chunk_size;
        assert!(Orchestrator::new(settings).is_err());
    }
}
