mod function;
mod openai;

pub use function::{FunctionCall, FunctionDefinition, Tool, ToolCall};
pub use openai::{ApiError, ChatRequest, ChatResponse, Choice, Message};
