//! Audio download via yt-dlp.

use super::{AudioArtifact, AudioFetcher};
use crate::error::{Result, VidchatError};
use crate::video::VideoId;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Downloads the audio track of a YouTube video with yt-dlp.
pub struct YtDlpFetcher {
    binary: PathBuf,
    audio_format: String,
}

impl YtDlpFetcher {
    /// Create a fetcher using `yt-dlp` from PATH and the m4a container.
    pub fn new() -> Self {
        Self::with_config("yt-dlp", "m4a")
    }

    /// Create a fetcher with a custom binary and audio container.
    pub fn with_config(binary: impl Into<PathBuf>, audio_format: &str) -> Self {
        Self {
            binary: binary.into(),
            audio_format: audio_format.to_string(),
        }
    }

    /// Where the audio for `video_id` is expected to land in `save_dir`.
    pub fn target_path(&self, video_id: &VideoId, save_dir: &Path) -> PathBuf {
        save_dir.join(video_id.file_name(&self.audio_format))
    }

    async fn run_download(&self, video_id: &VideoId, save_dir: &Path) -> Result<()> {
        let url = video_id.watch_url();
        let template = save_dir.join(format!("{}.%(ext)s", video_id));

        info!("Downloading {}", url);

        let result = Command::new(&self.binary)
            .arg("--format")
            .arg(format!("{}/bestaudio/best", self.audio_format))
            .arg("--extract-audio")
            .arg("--audio-format")
            .arg(&self.audio_format)
            .arg("--output")
            .arg(&template)
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg(&url)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(VidchatError::ToolNotFound(self.binary.display().to_string()));
            }
            Err(e) => {
                return Err(VidchatError::AudioDownload(format!("yt-dlp execution failed: {e}")));
            }
        };

        // Exit status is only informative; file presence decides success.
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("yt-dlp exited with {}: {}", output.status, stderr.trim());
        }

        Ok(())
    }
}

impl Default for YtDlpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioFetcher for YtDlpFetcher {
    #[instrument(skip(self, save_dir), fields(video_id = %video_id))]
    async fn fetch(&self, video_id: &VideoId, save_dir: &Path) -> Result<AudioArtifact> {
        let target = self.target_path(video_id, save_dir);

        if target.exists() {
            debug!("Using cached audio file {}", target.display());
            return Ok(AudioArtifact::new(video_id.clone(), target));
        }

        tokio::fs::create_dir_all(save_dir).await?;
        self.run_download(video_id, save_dir).await?;

        if target.exists() {
            info!("Audio downloaded to {}", target.display());
            Ok(AudioArtifact::new(video_id.clone(), target))
        } else {
            Err(VidchatError::AudioDownload(format!(
                "expected {} after download, file is missing",
                target.display()
            )))
        }
    }
}
