use crate::types::{Message, ToolCall};

/// 上下文 - 管理对话历史和系统提示
pub struct Context {
    system_prompt: String,
    messages: Vec<Message>,
}

impl Context {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Context {
            system_prompt: system_prompt.into(),
            messages: Vec::new(),
        }
    }

    /// 添加用户消息
    pub fn add_user(&mut self, content: &str) {
        self.messages.push(Message::user(content));
    }

    /// 添加助手消息
    pub fn add_assistant(&mut self, content: &str, tool_calls: Option<Vec<ToolCall>>) {
        self.messages.push(Message::assistant(content, tool_calls));
    }

    /// 添加工具结果
    pub fn add_tool_result(&mut self, tool_call_id: &str, content: &str) {
        self.messages.push(Message::tool(tool_call_id, content));
    }

    /// 获取所有消息（包含系统提示）
    pub fn messages(&self) -> Vec<Message> {
        let mut all = Vec::with_capacity(self.messages.len() + 1);
        all.push(Message::system(self.system_prompt.clone()));
        all.extend(self.messages.iter().cloned());
        all
    }

    /// 获取原始消息（不含系统提示）
    pub fn raw_messages(&self) -> &[Message] {
        &self.messages
    }

    /// 清空对话历史（保留系统提示）
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
