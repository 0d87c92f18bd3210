//! ffmpeg conversion to the sample format whisper.cpp expects.

use crate::error::{Result, VidchatError};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Convert any audio file to 16 kHz mono 16-bit PCM WAV.
pub async fn to_whisper_wav(source: &Path, dest: &Path) -> Result<()> {
    debug!("Converting {:?} to 16kHz WAV", source);

    let result = Command::new("ffmpeg")
        .arg("-i").arg(source)
        .arg("-vn")
        .arg("-ar").arg("16000")
        .arg("-ac").arg("1")
        .arg("-c:a").arg("pcm_s16le")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(VidchatError::Transcription(format!("ffmpeg conversion failed: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(VidchatError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(VidchatError::Transcription(format!("ffmpeg error: {e}"))),
    }
}
