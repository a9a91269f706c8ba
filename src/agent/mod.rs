pub mod context;
pub mod core;
pub mod llm;
pub mod prompt;

pub use context::Context;
pub use core::{Agent, ITERATION_LIMIT_REPLY};
pub use llm::{ChatProvider, LlmClient};
