pub mod builtins;
pub mod registry;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{FunctionDefinition, Tool};

pub use builtins::fs::Workspace;
pub use registry::ToolRegistry;

/// 工具执行结果
///
/// `message` 原样交给模型；`success` 只给宿主代码用，
/// 用来区分“工具失败”和“工具成功但返回了像错误的文本”。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub success: bool,
    pub message: String,
}

impl ToolOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        ToolOutcome {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ToolOutcome {
            success: false,
            message: message.into(),
        }
    }
}

/// 可注册到 [`ToolRegistry`] 的工具
///
/// `execute` 不返回 `Result`：所有失败都必须转换成描述性文本。
#[async_trait]
pub trait ToolSpec: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// 发给模型的 JSON Schema
    fn parameters_schema(&self) -> Value;

    async fn execute(&self, args: Value) -> ToolOutcome;

    fn definition(&self) -> Tool {
        Tool::function(FunctionDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        })
    }
}
