use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::types::{FunctionCall, Tool};

use super::builtins::{ReadConfigFile, WriteConfigFile};
use super::{ToolOutcome, ToolSpec, Workspace};

/// 工具注册表：名称唯一，按注册顺序对外暴露
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ToolSpec>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册内置的两个配置文件工具
    pub fn with_builtins(workspace: Workspace) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register(WriteConfigFile::new(workspace.clone()))?;
        registry.register(ReadConfigFile::new(workspace))?;
        Ok(registry)
    }

    pub fn register<T: ToolSpec + 'static>(&mut self, tool: T) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(Arc::new(tool));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolSpec>> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// 获取所有工具定义
    pub fn definitions(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// 按名称精确匹配执行
    pub async fn execute(&self, name: &str, args: Value) -> ToolOutcome {
        match self.get(name) {
            Some(tool) => tool.execute(args).await,
            None => ToolOutcome::failure(format!("Error: unknown tool: {}", name)),
        }
    }

    /// 执行模型发出的函数调用，参数无法解析时返回错误文本
    pub async fn execute_call(&self, call: &FunctionCall) -> ToolOutcome {
        match call.parsed_arguments() {
            Ok(args) => self.execute(&call.name, args).await,
            Err(e) => ToolOutcome::failure(format!(
                "Error: invalid arguments for {}: {}",
                call.name, e
            )),
        }
    }
}
