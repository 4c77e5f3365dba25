//! LLM provider abstraction.
//!
//! The generation orchestrator only needs one thing from a provider: a
//! single system+user exchange whose reply is a JSON document. The trait
//! keeps the transport swappable (OpenAI-compatible endpoints, test
//! stubs) without the orchestrator knowing.

mod openai;
mod provider;

pub use openai::OpenAiProvider;
pub use provider::{CompletionOptions, LlmError, LlmProvider};
