//! Error types for vidchat.

use thiserror::Error;

/// Library-level error type for vidchat operations.
#[derive(Error, Debug)]
pub enum VidchatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid video ID: {0}")]
    InvalidVideoId(String),

    #[error("Audio download failed: {0}")]
    AudioDownload(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("RAG error: {0}")]
    Rag(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for vidchat operations.
pub type Result<T> = std::result::Result<T, VidchatError>;
