//! Program generation: prompts, the generation service seam and response
//! cleaning.
//!
//! The orchestrator only talks to [`CodeGenerator`]. [`ChatCompletionsClient`]
//! is the production adapter for OpenAI-compatible chat completion
//! endpoints; tests substitute scripted generators.

mod clean;
mod client;
mod error;
mod prompt;

pub use clean::clean_response;
pub use client::{
    ChatCompletionsClient, CodeGenerator, DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE, GenerationSettings,
};
pub use error::GenerationError;
pub use prompt::{NO_DETAILS_PLACEHOLDER, Prompt, PromptBuilder, RepairContext};
