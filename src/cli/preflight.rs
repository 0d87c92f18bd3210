//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::config::{Settings, TranscriptionProvider};
use crate::error::{Result, VidchatError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Downloading audio needs yt-dlp and ffmpeg; the hosted model needs a key.
    Transcribe,
    /// Answering needs an API key.
    Ask,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Transcribe => {
            check_tool(&settings.download.yt_dlp_path)?;
            check_tool("ffmpeg")?;
            if settings.transcription.provider == TranscriptionProvider::Openai {
                check_api_key(settings)?;
            }
        }
        Operation::Ask => {
            check_api_key(settings)?;
        }
    }
    Ok(())
}

/// Check if an OpenAI API key is configured.
pub fn check_api_key(settings: &Settings) -> Result<()> {
    match settings.api_key() {
        Some(_) => Ok(()),
        None => Err(VidchatError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...' or in a .env file"
                .to_string(),
        )),
    }
}

/// Check if an external tool is available.
pub fn check_tool(name: &str) -> Result<()> {
    // ffmpeg uses -version (single dash), yt-dlp uses --version
    let version_arg = if name.ends_with("ffmpeg") { "-version" } else { "--version" };
    let program = Settings::expand_path(name);

    match Command::new(&program).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(VidchatError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(VidchatError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(VidchatError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool() {
        let err = check_tool("vidchat-no-such-tool").unwrap_err();
        assert!(matches!(err, VidchatError::ToolNotFound(_)));
    }

    #[test]
    fn test_api_key_from_config() {
        let mut settings = Settings::default();
        settings.openai.api_key = Some("sk-test".to_string());
        assert!(check(Operation::Ask, &settings).is_ok());
    }
}
