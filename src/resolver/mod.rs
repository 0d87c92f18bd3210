//! Transcript resolution: cache, then download and transcribe.
//!
//! [`TranscriptResolver::resolve`] never returns an error. Every outcome is a
//! [`Resolution`], and a failure carries only a coarse [`FailureReason`]; the
//! underlying cause is logged here and nowhere else.

mod store;

pub use store::{TranscriptEntry, TranscriptStore};

use crate::audio::AudioFetcher;
use crate::config::Settings;
use crate::transcription::Transcriber;
use crate::video::VideoId;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, instrument, warn};

/// A transcript stored on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRecord {
    pub video_id: VideoId,
    pub text: String,
    pub path: PathBuf,
}

/// Why a transcript could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    AudioDownload,
    Transcription,
    Storage,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::AudioDownload => "audio download failed",
            FailureReason::Transcription => "transcription failed",
            FailureReason::Storage => "transcript storage failed",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Served from the transcript cache.
    Found(TranscriptRecord),
    /// Freshly downloaded, transcribed and stored.
    Downloaded(TranscriptRecord),
    Failed(FailureReason),
}

impl Resolution {
    pub fn record(&self) -> Option<&TranscriptRecord> {
        match self {
            Resolution::Found(record) | Resolution::Downloaded(record) => Some(record),
            Resolution::Failed(_) => None,
        }
    }
}

/// Per-video async locks. Entries are dropped once nobody holds them.
#[derive(Default)]
struct KeyedLocks {
    inner: Mutex<HashMap<VideoId, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyedLocks {
    fn acquire(&self, key: &VideoId) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(map.entry(key.clone()).or_default())
    }

    fn release(&self, key: &VideoId, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map, one held by the caller.
        if Arc::strong_count(&lock) == 2 {
            map.remove(key);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Resolves transcripts for videos, caching them on disk.
pub struct TranscriptResolver {
    store: TranscriptStore,
    fetcher: Arc<dyn AudioFetcher>,
    transcriber: Transcriber,
    audio_dir: PathBuf,
    language: String,
    locks: Option<KeyedLocks>,
}

impl TranscriptResolver {
    pub fn new(
        store: TranscriptStore,
        fetcher: Arc<dyn AudioFetcher>,
        transcriber: Transcriber,
        audio_dir: impl Into<PathBuf>,
        language: &str,
    ) -> Self {
        Self {
            store,
            fetcher,
            transcriber,
            audio_dir: audio_dir.into(),
            language: language.to_string(),
            locks: Some(KeyedLocks::default()),
        }
    }

    /// Build a resolver from configuration.
    pub fn from_settings(
        settings: &Settings,
        fetcher: Arc<dyn AudioFetcher>,
        transcriber: Transcriber,
    ) -> Self {
        Self::new(
            TranscriptStore::new(settings.transcript_dir()),
            fetcher,
            transcriber,
            settings.audio_dir(),
            &settings.transcription.language,
        )
        .with_single_flight(settings.storage.single_flight)
    }

    /// Serialize concurrent resolutions of the same video (on by default).
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.locks = enabled.then(KeyedLocks::default);
        self
    }

    pub fn store(&self) -> &TranscriptStore {
        &self.store
    }

    /// Resolve the transcript for `video_id`.
    #[instrument(skip(self), fields(video_id = %video_id))]
    pub async fn resolve(&self, video_id: &VideoId) -> Resolution {
        let Some(locks) = &self.locks else {
            return self.resolve_unlocked(video_id).await;
        };

        let lock = locks.acquire(video_id);
        let resolution = {
            let _guard = lock.lock().await;
            self.resolve_unlocked(video_id).await
        };
        locks.release(video_id, lock);

        resolution
    }

    async fn resolve_unlocked(&self, video_id: &VideoId) -> Resolution {
        if let Err(e) = self.ensure_dirs().await {
            warn!("Cannot prepare storage directories: {}", e);
            return Resolution::Failed(FailureReason::Storage);
        }

        match self.store.read(video_id).await {
            Ok(Some(record)) => {
                debug!("Transcript cache hit");
                return Resolution::Found(record);
            }
            Ok(None) => info!("No cached transcript, fetching audio"),
            Err(e) => {
                warn!("Cannot read cached transcript: {}", e);
                return Resolution::Failed(FailureReason::Storage);
            }
        }

        let artifact = match self.fetcher.fetch(video_id, &self.audio_dir).await {
            Ok(artifact) => artifact,
            Err(e) => {
                warn!("Audio download failed: {}", e);
                return Resolution::Failed(FailureReason::AudioDownload);
            }
        };

        let text = match self
            .transcriber
            .transcribe(Some(artifact.path.as_path()), &self.language)
            .await
        {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("Transcription produced no text");
                return Resolution::Failed(FailureReason::Transcription);
            }
            Err(e) => {
                warn!("Transcription failed: {}", e);
                return Resolution::Failed(FailureReason::Transcription);
            }
        };

        match self.store.write(video_id, &text).await {
            Ok(record) => {
                info!("Transcribed {} characters", record.text.len());
                Resolution::Downloaded(record)
            }
            Err(e) => {
                warn!("Cannot store transcript: {}", e);
                Resolution::Failed(FailureReason::Storage)
            }
        }
    }

    async fn ensure_dirs(&self) -> crate::error::Result<()> {
        self.store.ensure_dir().await?;
        tokio::fs::create_dir_all(&self.audio_dir).await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use crate::audio::{AudioArtifact, AudioFetcher};
    use crate::error::{Result, VidchatError};
    use crate::transcription::SpeechModel;
    use crate::video::VideoId;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Writes a placeholder audio file, optionally after a delay.
    #[derive(Default)]
    pub struct FakeFetcher {
        pub calls: AtomicUsize,
        pub delay: Option<Duration>,
    }

    impl FakeFetcher {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AudioFetcher for FakeFetcher {
        async fn fetch(&self, video_id: &VideoId, save_dir: &Path) -> Result<AudioArtifact> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let path = save_dir.join(video_id.file_name("m4a"));
            tokio::fs::write(&path, b"fake audio").await?;
            Ok(AudioArtifact::new(video_id.clone(), path))
        }
    }

    /// Always fails, like a video that does not exist.
    #[derive(Default)]
    pub struct FailingFetcher {
        pub calls: AtomicUsize,
    }

    #[async_trait]
    impl AudioFetcher for FailingFetcher {
        async fn fetch(&self, video_id: &VideoId, _save_dir: &Path) -> Result<AudioArtifact> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(VidchatError::AudioDownload(format!("{} is unavailable", video_id)))
        }
    }

    /// Returns a fixed transcript, or an error when `text` is `None`.
    pub struct ScriptedSpeech {
        pub text: Option<String>,
        pub calls: AtomicUsize,
    }

    impl ScriptedSpeech {
        pub fn saying(text: &str) -> Self {
            Self { text: Some(text.to_string()), calls: AtomicUsize::new(0) }
        }

        pub fn broken() -> Self {
            Self { text: None, calls: AtomicUsize::new(0) }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SpeechModel for ScriptedSpeech {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn recognize(&self, _audio_path: &Path, _language: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.text
                .clone()
                .ok_or_else(|| VidchatError::Transcription("decoder error".into()))
        }
    }
}
