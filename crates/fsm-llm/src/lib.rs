pub mod client;
pub mod openai;

pub use client::{ChatMessage, ChatRole, CompletionRequest, LlmError, ModelClient, Result};
pub use openai::OpenAiClient;
