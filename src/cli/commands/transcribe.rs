//! Transcribe command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::resolver::Resolution;
use crate::video::VideoId;
use anyhow::{bail, Result};

/// Resolve a video's transcript, downloading it if needed.
pub async fn run_transcribe(video: &str, settings: Settings) -> Result<()> {
    let video_id = VideoId::parse(video)?;
    let orchestrator = Orchestrator::new(settings)?;

    let cached = orchestrator.resolver().store().path_for(&video_id).exists();
    if !cached {
        if let Err(e) = preflight::check(Operation::Transcribe, orchestrator.settings()) {
            Output::error(&format!("{}", e));
            Output::info("Run 'vidchat doctor' for detailed diagnostics.");
            return Err(e.into());
        }
    }

    let spinner = Output::spinner(&format!("Transcribing {}...", video_id.watch_url()));
    let resolution = orchestrator.resolver().resolve(&video_id).await;
    spinner.finish_and_clear();

    let (source, record) = match resolution {
        Resolution::Found(record) => ("cache", record),
        Resolution::Downloaded(record) => ("downloaded", record),
        Resolution::Failed(reason) => {
            Output::error(&format!("{}: {}", video_id, reason));
            bail!("{}", reason);
        }
    };

    Output::success(&format!("Transcript ready for {}", video_id));
    Output::kv("Source", source);
    Output::kv("Path", &record.path.display().to_string());
    Output::kv("Characters", &record.text.chars().count().to_string());

    Ok(())
}
