use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::agent::prompt::SYSTEM_PROMPT;
use crate::error::ConfigError;

/// 必需的凭证环境变量
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// 模型服务凭证，只从环境读取，不写入配置文件
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Credentials {
            api_key: api_key.into(),
        }
    }

    /// 从环境读取 `OPENAI_API_KEY`，缺失或为空时直接报错
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(API_KEY_ENV) {
            Some(key) if !key.trim().is_empty() => Ok(Credentials::new(key.trim())),
            _ => Err(ConfigError::MissingCredential(API_KEY_ENV.to_string())),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Agent 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub model: String,
    pub base_url: String,
    /// 仅推理模型接受该参数，默认不发送
    pub reasoning_effort: Option<String>,
    /// 为空时使用内置提示词
    pub system_prompt: Option<String>,
    pub max_iterations: usize,
    pub max_llm_retries: usize,
    pub max_tool_calls: usize,
    pub request_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            reasoning_effort: None,
            system_prompt: None,
            max_iterations: 10,
            max_llm_retries: 3,
            max_tool_calls: 5,
            request_timeout_secs: 120,
        }
    }
}

impl AgentConfig {
    /// 应用环境变量覆盖（`OPENAI_MODEL` / `OPENAI_BASE_URL`）
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    pub(crate) fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("OPENAI_MODEL").filter(|v| !v.trim().is_empty()) {
            self.model = model.trim().to_string();
        }
        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().trim_end_matches('/').to_string();
        }
        self
    }

    pub fn system_prompt(&self) -> &str {
        match self.system_prompt.as_deref() {
            Some(prompt) if !prompt.trim().is_empty() => prompt.trim(),
            _ => SYSTEM_PROMPT,
        }
    }
}

/// 统一配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub agent: AgentConfig,
}

impl Config {
    /// 从文件加载配置，文件不存在时返回默认值
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// 默认配置路径 `~/.infra-architect/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".infra-architect")
            .join("config.toml")
    }

    /// 从默认位置加载配置
    pub fn load_default() -> Result<Self> {
        Self::load(&Self::default_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_credential_is_an_error() {
        let err = Credentials::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(ref name) if name == API_KEY_ENV));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn blank_credential_is_treated_as_missing() {
        let err = Credentials::from_lookup(lookup(&[(API_KEY_ENV, "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(_)));
    }

    #[test]
    fn credential_is_read_and_redacted_in_debug() {
        let creds = Credentials::from_lookup(lookup(&[(API_KEY_ENV, "sk-test")])).unwrap();
        assert_eq!(creds.api_key(), "sk-test");
        assert!(!format!("{:?}", creds).contains("sk-test"));
    }

    #[test]
    fn env_overrides_model_and_base_url() {
        let config = AgentConfig::default().with_overrides(lookup(&[
            ("OPENAI_MODEL", "gpt-4o"),
            ("OPENAI_BASE_URL", "http://localhost:11434/v1/"),
        ]));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn default_prompt_used_when_not_overridden() {
        let mut config = AgentConfig::default();
        assert_eq!(config.system_prompt(), SYSTEM_PROMPT);

        config.system_prompt = Some("  ".to_string());
        assert_eq!(config.system_prompt(), SYSTEM_PROMPT);

        config.system_prompt = Some("You write Helm charts.".to_string());
        assert_eq!(config.system_prompt(), "You write Helm charts.");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.agent.model, DEFAULT_MODEL);
        assert_eq!(config.agent.max_iterations, 10);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[agent]\nmodel = \"o4-mini\"\nreasoning_effort = \"medium\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.agent.model, "o4-mini");
        assert_eq!(config.agent.reasoning_effort.as_deref(), Some("medium"));
        assert_eq!(config.agent.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.agent.max_tool_calls, 5);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[agent\nmodel = ").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Parse { .. })
        ));
    }
}
