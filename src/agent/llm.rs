use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{AgentConfig, Credentials};
use crate::types::{ChatRequest, ChatResponse, Message, Tool};

/// 模型服务抽象，Agent 循环只依赖它
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn chat(&self, messages: &[Message], tools: &[Tool]) -> Result<Message>;
}

/// OpenAI 兼容的 `/chat/completions` 客户端
pub struct LlmClient {
    client: Client,
    config: AgentConfig,
    credentials: Credentials,
}

impl LlmClient {
    pub fn new(config: AgentConfig, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(LlmClient {
            client,
            config,
            credentials,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// 首次调用失败后最多重试 `max_llm_retries` 次
    pub async fn chat_with_retry(&self, messages: &[Message], tools: &[Tool]) -> Result<Message> {
        let max_retries = self.config.max_llm_retries;
        let mut last_error = None;

        for attempt in 0..=max_retries {
            match self.chat_once(messages, tools).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if attempt < max_retries {
                        warn!(
                            retry = attempt + 1,
                            max_retries,
                            error = %e,
                            "model call failed, retrying"
                        );
                        tokio::time::sleep(retry_backoff(attempt + 1)).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(anyhow::anyhow!(
            "model call failed after {} attempts: {:?}",
            max_retries.saturating_add(1),
            last_error
        ))
    }

    async fn chat_once(&self, messages: &[Message], tools: &[Tool]) -> Result<Message> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: messages.to_vec(),
            tools: (!tools.is_empty()).then(|| tools.to_vec()),
            reasoning_effort: self.config.reasoning_effort.clone(),
            stream: false,
        };

        let url = self.endpoint();
        debug!(%url, model = %request.model, messages = request.messages.len(), "sending chat request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.credentials.api_key())
            .json(&request)
            .send()
            .await
            .context("failed to call chat completions API")?;

        let status = response.status();
        let text = response.text().await.context("failed to read response body")?;

        if !status.is_success() {
            return Err(anyhow::anyhow!("chat completions API error: {} - {}", status, text));
        }

        parse_response(&text)
    }
}

#[async_trait]
impl ChatProvider for LlmClient {
    async fn chat(&self, messages: &[Message], tools: &[Tool]) -> Result<Message> {
        self.chat_with_retry(messages, tools).await
    }
}

const MAX_BACKOFF_SHIFT: usize = 6;

/// 第 n 次重试前的等待：`100ms * 2^n`，上限 6.4s
fn retry_backoff(retry: usize) -> Duration {
    Duration::from_millis(100 << retry.min(MAX_BACKOFF_SHIFT))
}

/// 解析响应体，取第一个 choice，并为缺失 id 的工具调用补上 id
fn parse_response(text: &str) -> Result<Message> {
    let response: ChatResponse = serde_json::from_str(text)
        .with_context(|| format!("failed to parse chat response: {}", text))?;

    if let Some(err) = response.error {
        return Err(anyhow::anyhow!("provider error: {}", err.message));
    }

    let mut message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .context("chat response contained no choices")?;

    if let Some(calls) = message.tool_calls.as_mut() {
        for call in calls.iter_mut().filter(|c| c.id.is_empty()) {
            call.id = format!("call_{}", uuid::Uuid::new_v4().simple());
        }
    }

    Ok(message)
}
