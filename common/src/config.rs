use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use anyhow::Result;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key. The key itself
    /// never lives in the config file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Total attempt ceiling for rate-limited completion calls.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_base_url() -> String { "https://api.groq.com/openai/v1".to_string() }
fn default_model() -> String { "llama-3.3-70b-versatile".to_string() }
fn default_api_key_env() -> String { "GROQ_API_KEY".to_string() }
fn default_max_retries() -> u32 { 3 }
fn default_timeout_secs() -> u64 { 30 }
fn default_log_file() -> String { "server_logs.txt".to_string() }

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            log_file: default_log_file(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Built-in defaults when no config file is present; the tool runs with
    /// zero setup beyond the API key.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn default_path() -> String {
        std::env::var("LOGWARDEN_CONFIG")
            .unwrap_or_else(|_| "./config/default.toml".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.llm.model, "llama-3.3-70b-versatile");
        assert_eq!(config.llm.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.llm.max_retries, 3);
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.analyzer.log_file, "server_logs.txt");
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config: Config = toml::from_str(
            "[llm]\nmodel = \"mixtral-8x7b-32768\"\nmax_retries = 5\n",
        )
        .unwrap();
        assert_eq!(config.llm.model, "mixtral-8x7b-32768");
        assert_eq!(config.llm.max_retries, 5);
        assert_eq!(config.llm.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.analyzer.log_file, "server_logs.txt");
    }

    #[test]
    fn analyzer_section_is_honored() {
        let config: Config =
            toml::from_str("[analyzer]\nlog_file = \"/var/log/nginx/access.log\"\n").unwrap();
        assert_eq!(config.analyzer.log_file, "/var/log/nginx/access.log");
    }
}
