use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// 模型发出的函数调用；OpenAI 的 arguments 是 JSON 字符串，
/// Ollama 兼容端点则直接给对象，两种都保留为 Value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl FunctionCall {
    /// 把 arguments 统一解析成 JSON 对象
    pub fn parsed_arguments(&self) -> serde_json::Result<serde_json::Value> {
        match &self.arguments {
            serde_json::Value::String(raw) if raw.trim().is_empty() => {
                Ok(serde_json::json!({}))
            }
            serde_json::Value::String(raw) => serde_json::from_str(raw),
            serde_json::Value::Null => Ok(serde_json::json!({})),
            other => Ok(other.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDefinition,
}

impl Tool {
    pub fn function(function: FunctionDefinition) -> Self {
        Tool {
            tool_type: "function".to_string(),
            function,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tool_type: Option<String>,
    pub function: FunctionCall,
}
