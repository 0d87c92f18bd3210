//! Configuration module for vidchat.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, QaPrompts};
pub use settings::{
    ChunkingSettings, Device, DownloadSettings, EmbeddingSettings, GeneralSettings,
    OpenAISettings, PromptSettings, RagSettings, ServerSettings, Settings, StorageSettings,
    TranscriptionProvider, TranscriptionSettings,
};
