//! Transcripts command: list or remove cached transcripts.

use crate::cli::Output;
use crate::config::Settings;
use crate::resolver::TranscriptStore;
use crate::video::VideoId;
use anyhow::Result;

/// List cached transcripts, or remove one.
pub async fn run_transcripts(remove: Option<&str>, settings: &Settings) -> Result<()> {
    let store = TranscriptStore::new(settings.transcript_dir());

    if let Some(video) = remove {
        let video_id = VideoId::parse(video)?;
        if store.remove(&video_id).await? {
            Output::success(&format!("Removed transcript for {}", video_id));
        } else {
            Output::warning(&format!("No cached transcript for {}", video_id));
        }
        return Ok(());
    }

    let entries = store.list().await?;
    if entries.is_empty() {
        Output::info("No transcripts cached yet. Use 'vidchat transcribe <video>' to add one.");
        return Ok(());
    }

    Output::header(&format!("Cached Transcripts ({})", entries.len()));
    println!();

    for entry in &entries {
        let modified = entry
            .modified
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Output::transcript_info(entry.video_id.as_str(), entry.size_bytes, &modified);
    }

    println!();
    Output::kv("Directory", &store.dir().display().to_string());

    Ok(())
}
