//! 基础设施配置文件的读写工具（Dockerfile / K8s YAML / CI 流水线等）

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

use crate::error::ToolError;
use crate::tools::{ToolOutcome, ToolSpec};

use super::fs::Workspace;

pub const WRITE_CONFIG_FILE: &str = "write_config_file";
pub const READ_CONFIG_FILE: &str = "read_config_file";

pub const WRITE_ERROR_PREFIX: &str = "Error:";
pub const READ_ERROR_PREFIX: &str = "Error reading file:";

static WRITE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::json!({
        "type": "object",
        "properties": {
            "filename": {
                "type": "string",
                "description": "Exact file name, e.g. Dockerfile, deployment.yaml"
            },
            "content": {
                "type": "string",
                "description": "Full valid file contents to write"
            },
            "description": {
                "type": "string",
                "description": "Short summary of what this file does"
            }
        },
        "required": ["filename", "content", "description"]
    })
});

static READ_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::json!({
        "type": "object",
        "properties": {
            "filename": {
                "type": "string",
                "description": "File name to read"
            }
        },
        "required": ["filename"]
    })
});

#[derive(Debug, Deserialize)]
struct WriteInput {
    filename: String,
    content: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ReadInput {
    filename: String,
}

fn parse_input<T: serde::de::DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidInput(e.to_string()))
}

fn writing_notice(path: &Path) -> String {
    format!("📌 Writing to: {}", path.display())
}

fn wrote_notice(path: &Path, bytes: usize) -> String {
    format!("✅ WROTE {} ({} bytes)", path.display(), bytes)
}

fn reading_notice(path: &Path) -> String {
    format!("👀 Reading {}", path.display())
}

/// 生成基础设施配置文件
pub struct WriteConfigFile {
    workspace: Workspace,
}

impl WriteConfigFile {
    pub fn new(workspace: Workspace) -> Self {
        WriteConfigFile { workspace }
    }

    async fn write(&self, args: Value) -> Result<String, ToolError> {
        let input: WriteInput = parse_input(args)?;
        info!(tool = WRITE_CONFIG_FILE, filename = %input.filename, "tool triggered");
        println!("{}", writing_notice(&self.workspace.resolve(&input.filename)?));

        let path = self.workspace.write(&input.filename, &input.content).await?;
        println!("{}", wrote_notice(&path, input.content.len()));
        info!(
            tool = WRITE_CONFIG_FILE,
            path = %path.display(),
            bytes = input.content.len(),
            "file written"
        );

        Ok(format!(
            "Success: created {} at {}. {}",
            input.filename,
            path.display(),
            input.description
        ))
    }
}

#[async_trait]
impl ToolSpec for WriteConfigFile {
    fn name(&self) -> &str {
        WRITE_CONFIG_FILE
    }

    fn description(&self) -> &str {
        "Generate infrastructure configuration files (Dockerfile, Kubernetes YAML, CI pipelines, Cargo.toml, etc)."
    }

    fn parameters_schema(&self) -> Value {
        WRITE_SCHEMA.clone()
    }

    async fn execute(&self, args: Value) -> ToolOutcome {
        match self.write(args).await {
            Ok(message) => ToolOutcome::success(message),
            Err(e) => {
                warn!(tool = WRITE_CONFIG_FILE, error = %e, "write failed");
                ToolOutcome::failure(format!("{} {}", WRITE_ERROR_PREFIX, e))
            }
        }
    }
}

/// 读取配置文件用于审查
pub struct ReadConfigFile {
    workspace: Workspace,
}

impl ReadConfigFile {
    pub fn new(workspace: Workspace) -> Self {
        ReadConfigFile { workspace }
    }

    async fn read(&self, args: Value) -> Result<String, ToolError> {
        let input: ReadInput = parse_input(args)?;
        info!(tool = READ_CONFIG_FILE, filename = %input.filename, "tool triggered");
        println!("{}", reading_notice(&self.workspace.resolve(&input.filename)?));
        self.workspace.read(&input.filename).await
    }
}

#[async_trait]
impl ToolSpec for ReadConfigFile {
    fn name(&self) -> &str {
        READ_CONFIG_FILE
    }

    fn description(&self) -> &str {
        "Read an infra config file for audit."
    }

    fn parameters_schema(&self) -> Value {
        READ_SCHEMA.clone()
    }

    async fn execute(&self, args: Value) -> ToolOutcome {
        match self.read(args).await {
            Ok(content) => ToolOutcome::success(content),
            Err(e) => {
                warn!(tool = READ_CONFIG_FILE, error = %e, "read failed");
                ToolOutcome::failure(format!("{} {}", READ_ERROR_PREFIX, e))
            }
        }
    }
}
