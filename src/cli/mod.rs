//! CLI module for vidchat.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// vidchat - ask questions about YouTube videos
///
/// Downloads a video's audio, transcribes it once, caches the transcript and
/// answers questions about it with retrieval-augmented generation.
#[derive(Parser, Debug)]
#[command(name = "vidchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to [server] host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to [server] port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask a question about a video
    Ask {
        /// YouTube URL or video ID
        video: String,

        /// The question to ask
        question: String,
    },

    /// Fetch and cache a video's transcript without asking anything
    Transcribe {
        /// YouTube URL or video ID
        video: String,
    },

    /// List cached transcripts
    Transcripts {
        /// Remove the cached transcript for this video instead
        #[arg(long, value_name = "VIDEO")]
        remove: Option<String>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from(["vidchat", "-vv", "ask", "abc123", "What is this about?"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Ask { video, question } => {
                assert_eq!(video, "abc123");
                assert_eq!(question, "What is this about?");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::parse_from(["vidchat", "serve"]);
        assert!(matches!(cli.command, Commands::Serve { host: None, port: None }));
    }

    #[test]
    fn test_parse_transcripts_remove() {
        let cli = Cli::parse_from(["vidchat", "transcripts", "--remove", "abc123"]);
        assert!(matches!(cli.command, Commands::Transcripts { remove: Some(ref id) } if id == "abc123"));
    }
}
