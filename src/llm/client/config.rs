//! LLM client configuration.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini generateContent API (default)
    #[default]
    Gemini,
    /// OpenAI-compatible API (OpenAI, Groq, Together.ai, etc.)
    OpenAI,
    /// Ollama API (local, no key)
    Ollama,
}

impl LlmProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "openai" | "groq" | "together" => Some(Self::OpenAI),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAI => "openai",
            Self::Ollama => "ollama",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com",
            Self::OpenAI => "https://api.openai.com",
            Self::Ollama => "http://localhost:11434",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-1.5-flash",
            Self::OpenAI => "gpt-4o-mini",
            Self::Ollama => "llama3.1:8b",
        }
    }

    /// Environment variables that may carry this provider's credential.
    pub fn key_vars(&self) -> &'static [&'static str] {
        match self {
            Self::Gemini => &["GOOGLE_API_KEY", "GEMINI_API_KEY"],
            Self::OpenAI => &["OPENAI_API_KEY", "GROQ_API_KEY"],
            Self::Ollama => &[],
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the LLM client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// LLM provider (gemini, openai or ollama)
    #[serde(default)]
    pub provider: LlmProvider,
    /// API endpoint (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// API key; normally supplied through the environment
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model name (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Maximum tokens in response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for generation (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f32 {
    0.3
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            endpoint: None,
            api_key: None,
            model: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// Effective endpoint, without a trailing slash.
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
            .trim_end_matches('/')
    }

    /// Effective model name.
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Apply overrides from the process environment.
    ///
    /// Environment variables:
    /// - `LLM_PROVIDER`: gemini, openai (or groq/together), ollama
    /// - `LLM_ENDPOINT`: API endpoint
    /// - `LLM_API_KEY`: API key for any provider
    /// - `GOOGLE_API_KEY` / `GEMINI_API_KEY`: Gemini key
    /// - `OPENAI_API_KEY` / `GROQ_API_KEY`: OpenAI-compatible key
    /// - `LLM_MODEL`: model name
    /// - `LLM_MAX_TOKENS`, `LLM_TEMPERATURE`, `LLM_TIMEOUT_SECS`
    ///
    /// `LLM_API_KEY` wins over provider-specific keys.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit_provider = lookup("LLM_PROVIDER");
        if let Some(ref val) = explicit_provider {
            if let Some(provider) = LlmProvider::from_str(val) {
                self.provider = provider;
            }
        }

        if let Some(endpoint) = lookup("LLM_ENDPOINT") {
            self.endpoint = Some(endpoint);
        } else if self.endpoint.is_none() {
            // groq/together share the OpenAI wire format but not the host
            match explicit_provider.as_deref().map(str::to_lowercase).as_deref() {
                Some("groq") => self.endpoint = Some("https://api.groq.com/openai".to_string()),
                Some("together") => self.endpoint = Some("https://api.together.xyz".to_string()),
                _ => {}
            }
        }

        if let Some(key) = lookup("LLM_API_KEY").filter(|v| !v.is_empty()) {
            self.api_key = Some(key);
        } else if self.api_key.is_none() {
            self.api_key = self
                .provider
                .key_vars()
                .iter()
                .find_map(|var| lookup(var).filter(|v| !v.is_empty()));
        }

        if let Some(val) = lookup("LLM_MODEL") {
            self.model = Some(val);
        }
        if let Some(n) = lookup("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.max_tokens = n;
        }
        if let Some(t) = lookup("LLM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.temperature = t;
        }
        if let Some(n) = lookup("LLM_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_secs = n;
        }
        self
    }

    /// Fail if the provider needs a credential and none was configured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let has_key = self
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty());
        if self.provider.requires_api_key() && !has_key {
            let mut vars = vec!["LLM_API_KEY"];
            vars.extend_from_slice(self.provider.key_vars());
            return Err(ConfigError::MissingCredential {
                service: format!("LLM provider '{}'", self.provider),
                vars: vars.join(" or "),
            });
        }
        Ok(())
    }
}
