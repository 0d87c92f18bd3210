//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::resolver::Resolution;
use crate::video::VideoId;
use anyhow::{bail, Result};

/// Run the ask command.
pub async fn run_ask(video: &str, question: &str, settings: Settings) -> Result<()> {
    let video_id = VideoId::parse(video)?;

    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'vidchat doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner(&format!("Fetching transcript for {}...", video_id));
    let resolution = orchestrator.resolver().resolve(&video_id).await;
    spinner.finish_and_clear();

    let record = match resolution {
        Resolution::Found(record) => record,
        Resolution::Downloaded(record) => {
            Output::info(&format!("Transcribed and cached at {}", record.path.display()));
            record
        }
        Resolution::Failed(reason) => {
            Output::error(&format!("Could not get a transcript for {}: {}", video_id, reason));
            bail!("{}", reason);
        }
    };

    let spinner = Output::spinner("Thinking...");
    let answer = orchestrator.pipeline().answer(&record.text, question).await;
    spinner.finish_and_clear();

    match answer {
        Ok(answer) => {
            println!("\n{}\n", answer);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            Err(e.into())
        }
    }
}
