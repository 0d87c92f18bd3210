//! Retrieval-augmented question answering over a single transcript.
//!
//! Each question builds its own index: split the transcript, embed the
//! chunks, retrieve the closest ones and hand them to a chat model.

mod chat;
pub mod context;
mod pipeline;

pub use chat::{ChatModel, OpenAIChatModel};
pub use context::format_context_for_prompt;
pub use pipeline::QaPipeline;

#[cfg(test)]
pub(crate) use pipeline::fakes as pipeline_fakes;
