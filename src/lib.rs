pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod tools;
pub mod types;

pub use agent::{Agent, ChatProvider, Context, LlmClient};
pub use cli::run_cli;
pub use config::{AgentConfig, Config, Credentials};
pub use error::{ConfigError, RegistryError, ToolError};
pub use tools::{ToolOutcome, ToolRegistry, ToolSpec, Workspace};
