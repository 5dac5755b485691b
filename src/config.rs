//! Configuration management for demystify using the prefer crate.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::LlmConfig;

/// Default HTTP bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Missing credential for {service}: set {vars}")]
    MissingCredential { service: String, vars: String },
}

/// Google Cloud services used for OCR and translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Use Cloud Vision OCR for documents without a text layer
    #[serde(default = "default_true")]
    pub ocr_enabled: bool,
    /// Use Cloud Translation before falling back to the LLM
    #[serde(default = "default_true")]
    pub translation_enabled: bool,
    #[serde(default, skip_serializing)]
    pub vision_api_key: Option<String>,
    #[serde(default, skip_serializing)]
    pub translate_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_endpoint: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_service_timeout")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_service_timeout() -> u64 {
    60
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            ocr_enabled: true,
            translation_enabled: true,
            vision_api_key: None,
            translate_api_key: None,
            vision_endpoint: None,
            translate_endpoint: None,
            timeout_secs: default_service_timeout(),
        }
    }
}

impl ServicesConfig {
    /// Apply overrides from the process environment.
    ///
    /// `GOOGLE_CLOUD_API_KEY` enables both services. `GOOGLE_VISION_API_KEY`
    /// and `GOOGLE_TRANSLATE_API_KEY` take precedence for their service.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let shared = get("GOOGLE_CLOUD_API_KEY");

        if let Some(key) = get("GOOGLE_VISION_API_KEY").or_else(|| shared.clone()) {
            self.vision_api_key = Some(key);
        }
        if let Some(key) = get("GOOGLE_TRANSLATE_API_KEY").or(shared) {
            self.translate_api_key = Some(key);
        }
        self
    }

    /// Vision key, if OCR is enabled.
    pub fn ocr_key(&self) -> Option<&str> {
        self.vision_api_key
            .as_deref()
            .filter(|_| self.ocr_enabled)
    }

    /// Translation key, if translation is enabled.
    pub fn translation_key(&self) -> Option<&str> {
        self.translate_api_key
            .as_deref()
            .filter(|_| self.translation_enabled)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum size of one upload request, in megabytes
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
    /// Idle seconds before a session is evicted (0 keeps sessions forever)
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_max_upload_mb() -> usize {
    25
}

fn default_session_ttl() -> u64 {
    3600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_mb: default_max_upload_mb(),
            session_ttl_secs: default_session_ttl(),
        }
    }
}

impl ServerConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    pub fn session_ttl(&self) -> Option<Duration> {
        match self.session_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Optional paths that are available at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub ocr: bool,
    pub translation: bool,
}

/// Configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub server: ServerConfig,

    /// Path the config was loaded from.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Discover and load the config file. Falls back to defaults only
    /// when no file is found; a discovered file that fails to parse is an
    /// error.
    pub async fn load() -> Result<Self, ConfigError> {
        let discovered = prefer::discovery::find_config_file("demystify").await.ok();
        Self::load_discovered(discovered.as_deref()).await
    }

    async fn load_discovered(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path).await,
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file path.
    /// The parser is chosen by file extension (toml, yaml/yml, else JSON).
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents)
                .map_err(|e| ConfigError::Parse(format!("TOML: {}", e)))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::Parse(format!("YAML: {}", e)))?,
            _ => serde_json::from_str(&contents)
                .map_err(|e| ConfigError::Parse(format!("JSON: {}", e)))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Apply environment overrides to every section.
    pub fn with_env_overrides(mut self) -> Self {
        self.llm = self.llm.with_env_overrides();
        self.services = self.services.with_env_overrides();
        if let Ok(bind) = std::env::var("DEMYSTIFY_BIND") {
            if !bind.is_empty() {
                self.server.bind = bind;
            }
        }
        self
    }
}

/// Expand `~` and resolve a relative path against `base_dir`.
pub fn resolve_path(path_str: &str, base_dir: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(path_str);
    let path = Path::new(expanded.as_ref());

    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Validated runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub llm: LlmConfig,
    pub services: ServicesConfig,
    pub server: ServerConfig,
    pub capabilities: Capabilities,
    pub source_path: Option<PathBuf>,
}

impl Settings {
    /// Validate a config. A missing LLM credential is fatal; missing Google
    /// Cloud keys only disable the corresponding capability.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.llm.validate()?;

        let capabilities = Capabilities {
            ocr: config.services.ocr_key().is_some(),
            translation: config.services.translation_key().is_some(),
        };

        Ok(Self {
            llm: config.llm,
            services: config.services,
            server: config.server,
            capabilities,
            source_path: config.source_path,
        })
    }
}

/// Load the config (explicit path or discovered), apply environment
/// overrides and validate.
pub async fn load_settings(config_path: Option<&Path>) -> Result<Settings, ConfigError> {
    let config = match config_path {
        Some(path) => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            let resolved = resolve_path(&path.to_string_lossy(), &cwd);
            Config::load_from_path(&resolved).await?
        }
        None => Config::load().await?,
    };

    if let Some(ref path) = config.source_path {
        tracing::debug!("Loaded config from {}", path.display());
    }

    Settings::from_config(config.with_env_overrides())
}
