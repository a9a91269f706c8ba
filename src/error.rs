use std::path::PathBuf;

use thiserror::Error;

/// 启动阶段错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please set {0} in your environment or .env file")]
    MissingCredential(String),

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// 工具执行错误，最终会被转换为模型可见的字符串
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("path escapes the working directory: {0}")]
    PathEscape(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("tool already registered: {0}")]
    Duplicate(String),
}
