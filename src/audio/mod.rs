//! Audio acquisition.
//!
//! The fetcher guarantees that `{save_dir}/{video_id}.{format}` exists; the
//! transcriber consumes and deletes it.

#[cfg(feature = "local-whisper")]
mod convert;
mod downloader;

#[cfg(feature = "local-whisper")]
pub use convert::to_whisper_wav;
pub use downloader::YtDlpFetcher;

use crate::error::Result;
use crate::video::VideoId;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A downloaded audio file waiting to be transcribed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    pub video_id: VideoId,
    pub path: PathBuf,
}

impl AudioArtifact {
    pub fn new(video_id: VideoId, path: PathBuf) -> Self {
        Self { video_id, path }
    }
}

/// Ensures a local audio file exists for a video.
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Return the audio file for `video_id`, downloading it into `save_dir` if absent.
    async fn fetch(&self, video_id: &VideoId, save_dir: &Path) -> Result<AudioArtifact>;
}
