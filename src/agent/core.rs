use tracing::{debug, info, warn};

use crate::config::AgentConfig;
use crate::tools::ToolRegistry;
use crate::types::ToolCall;

use super::context::Context;
use super::llm::ChatProvider;

pub const ITERATION_LIMIT_REPLY: &str =
    "This request took too many steps. Please simplify it or start over with /clear.";

/// Agent：模型配置 + 系统提示 + 工具注册表
pub struct Agent {
    context: Context,
    provider: Box<dyn ChatProvider>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Agent {
    pub fn new(config: AgentConfig, provider: Box<dyn ChatProvider>, tools: ToolRegistry) -> Self {
        Agent {
            context: Context::new(config.system_prompt()),
            provider,
            tools,
            config,
        }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// 清空对话历史
    pub fn clear_history(&mut self) {
        self.context.clear();
    }

    /// 处理一轮用户输入，期间按需执行工具，直到模型给出最终回复
    pub async fn chat(&mut self, user_input: &str) -> String {
        self.context.add_user(user_input);

        let max_iterations = self.config.max_iterations;
        let max_tool_calls = self.config.max_tool_calls;
        let definitions = self.tools.definitions();

        for iteration in 1..=max_iterations {
            debug!(iteration, max_iterations, "agent iteration");

            let messages = self.context.messages();
            let response = match self.provider.chat(&messages, &definitions).await {
                Ok(resp) => resp,
                Err(e) => {
                    warn!(error = %e, "model provider unavailable");
                    let error_msg = format!("Sorry, the model service is unavailable: {}", e);
                    self.context.add_assistant(&error_msg, None);
                    return error_msg;
                }
            };

            let tool_calls = match response.tool_calls {
                Some(calls) if !calls.is_empty() => calls,
                _ => {
                    self.context.add_assistant(&response.content, None);
                    return response.content;
                }
            };

            if tool_calls.len() > max_tool_calls {
                let warning_msg = format!(
                    "Too many tool calls in one step ({}), at most {} are allowed.",
                    tool_calls.len(),
                    max_tool_calls
                );
                println!("⚠️ {}", warning_msg);
                self.context.add_assistant(&warning_msg, None);
                continue;
            }

            self.context
                .add_assistant(&response.content, Some(tool_calls.clone()));

            for (tool_call_id, result) in self.execute_tool_calls(&tool_calls).await {
                self.context.add_tool_result(&tool_call_id, &result);
            }
        }

        self.context.add_assistant(ITERATION_LIMIT_REPLY, None);
        ITERATION_LIMIT_REPLY.to_string()
    }

    /// 逐个执行，前一个完成后才开始下一个
    async fn execute_tool_calls(&self, tool_calls: &[ToolCall]) -> Vec<(String, String)> {
        let mut results = Vec::with_capacity(tool_calls.len());

        for tool_call in tool_calls {
            println!("\n⚡ TRIGGERED: {}", tool_call.function.name);

            let outcome = self.tools.execute_call(&tool_call.function).await;
            if outcome.success {
                info!(tool = %tool_call.function.name, "tool succeeded");
                println!("✅ {} done", tool_call.function.name);
            } else {
                warn!(tool = %tool_call.function.name, message = %outcome.message, "tool failed");
                println!("❌ {}", outcome.message);
            }

            results.push((tool_call.id.clone(), outcome.message));
        }

        results
    }
}
