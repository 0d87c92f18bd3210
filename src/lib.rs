//! vidchat - ask questions about YouTube videos
//!
//! Given a video and a question, vidchat finds the video's transcript (from a
//! local cache, or by downloading the audio and running speech-to-text once),
//! then answers the question with retrieval-augmented generation over that
//! transcript.
//!
//! # Architecture
//!
//! - `video` - Video ID parsing and validation
//! - `audio` - Audio download with yt-dlp
//! - `transcription` - Speech-to-text models and the transcriber
//! - `resolver` - Transcript cache and the cache / download / transcribe cascade
//! - `chunking` - Transcript splitting
//! - `embedding` - Embedding generation
//! - `vector_store` - Ephemeral similarity index
//! - `rag` - Question answering pipeline
//! - `handler` - Request handling with apology fallback
//! - `server` - HTTP API
//! - `orchestrator` - Service wiring
//!
//! # Example
//!
//! ```rust,no_run
//! use vidchat::config::Settings;
//! use vidchat::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator = Orchestrator::new(Settings::load()?)?;
//!
//!     let reply = orchestrator
//!         .handler()
//!         .handle("dQw4w9WgXcQ", "What is this video about?")
//!         .await;
//!     println!("{}", reply.message);
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod fallback;
pub mod handler;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod resolver;
pub mod server;
pub mod transcription;
pub mod vector_store;
pub mod video;

pub use error::{Result, VidchatError};
