use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use chatdigest_llm::{OpenAIConfig, ProviderConfig};
use chatdigest_persist::StorageBackend;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub digest: DigestConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub telegram_token: String,
    #[serde(default)]
    pub llm_api_key: String,
    #[serde(default)]
    pub mongodb_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub api_url: String,
    /// Long-poll timeout passed to getUpdates
    pub poll_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DigestConfig {
    pub interval_minutes: i64,
    pub poll_interval_secs: u64,
    pub retention_days: i64,
    pub message_ceiling: usize,
    pub trailer: String,
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub provider: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub azure_endpoint: Option<String>,
    #[serde(default)]
    pub azure_api_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (TELEGRAM_, DIGEST_, STORAGE_, LLM_, LOG_ prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        for prefix in ["TELEGRAM", "DIGEST", "STORAGE", "LLM", "LOG"] {
            builder = builder.add_source(
                Environment::default()
                    .prefix(prefix)
                    .separator("_")
                    .try_parsing(true),
            );
        }

        // Legacy name for the global default interval
        if let Ok(minutes) = std::env::var("SUMMARY_INTERVAL_MINUTES") {
            builder = builder.set_override("digest.interval_minutes", minutes)?;
        }

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        cfg.telegram_token = std::env::var("TELEGRAM_TOKEN")
            .map_err(|_| ConfigError::Message("TELEGRAM_TOKEN environment variable is required".to_string()))?;

        let key_var = match cfg.llm.provider.as_str() {
            "azure_openai" => "AZURE_OPENAI_API_KEY",
            _ => "OPENAI_API_KEY",
        };
        cfg.llm_api_key = std::env::var(key_var)
            .map_err(|_| ConfigError::Message(format!("{} environment variable is required", key_var)))?;

        cfg.mongodb_uri = std::env::var("MONGODB_URI").ok();

        cfg.validate()?;
        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.digest.interval_minutes <= 0 {
            return Err(ConfigError::Message("digest.interval_minutes must be positive".to_string()));
        }
        if self.digest.retention_days <= 0 {
            return Err(ConfigError::Message("digest.retention_days must be positive".to_string()));
        }
        if self.digest.trailer.chars().count() >= self.digest.message_ceiling {
            return Err(ConfigError::Message("digest.trailer must be shorter than digest.message_ceiling".to_string()));
        }
        Ok(())
    }

    pub fn provider_config(&self) -> Result<ProviderConfig, ConfigError> {
        match self.llm.provider.as_str() {
            "openai" => {
                let mut openai = OpenAIConfig::new(self.llm_api_key.clone());
                if let Some(base_url) = &self.llm.base_url {
                    openai = openai.with_base_url(base_url.clone());
                }
                Ok(ProviderConfig::OpenAI(openai))
            }
            "azure_openai" => {
                let endpoint = self.llm.azure_endpoint.clone().ok_or_else(|| {
                    ConfigError::Message("llm.azure_endpoint is required for azure_openai".to_string())
                })?;
                let api_version = self.llm.azure_api_version.clone().ok_or_else(|| {
                    ConfigError::Message("llm.azure_api_version is required for azure_openai".to_string())
                })?;
                Ok(ProviderConfig::azure_openai(self.llm_api_key.clone(), endpoint, api_version))
            }
            other => Err(ConfigError::Message(format!("Unknown llm.provider: {}", other))),
        }
    }

    pub fn storage_backend(&self) -> Result<StorageBackend, ConfigError> {
        match self.storage.backend.as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "mongodb" => {
                let uri = self.mongodb_uri.clone().ok_or_else(|| {
                    ConfigError::Message("MONGODB_URI environment variable is required for the mongodb backend".to_string())
                })?;
                Ok(StorageBackend::MongoDb {
                    uri,
                    database: self.storage.database.clone(),
                })
            }
            other => Err(ConfigError::Message(format!("Unknown storage.backend: {}", other))),
        }
    }
}
