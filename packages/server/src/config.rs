use common::config::{StorageConfig, SynonymConfig};
use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
    /// Largest accepted request body in bytes.
    pub max_upload_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub synonyms: SynonymConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Self::with_defaults()?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., ICONS__STORAGE__UPLOAD_ROOT)
            .add_source(Self::environment())
            .build()?;

        s.try_deserialize()
    }

    /// Server and database defaults. Storage and synonym defaults come from
    /// their serde default functions.
    fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("server.max_upload_size", 256 * 1024 * 1024)?
            .set_default("database.url", "sqlite://icons.db?mode=rwc")
    }

    fn environment() -> Environment {
        Environment::with_prefix("ICONS").separator("__")
    }
}
