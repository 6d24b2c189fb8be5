//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: `BOOKSHELF_`, nested keys separated by `__`,
//!    e.g. `BOOKSHELF_SERVER__PORT=8080`)
//! 2. TOML file: `./bookshelf.toml`, or the path in `BOOKSHELF_CONFIG`
//! 3. Default values

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Environment variable naming an alternative TOML file.
pub const CONFIG_PATH_ENV: &str = "BOOKSHELF_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "bookshelf.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive (trace, debug, info, warn, error, or a full `EnvFilter` string).
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Which document store backs the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackendKind,

    /// MongoDB connection string; ignored by the memory backend.
    #[serde(default = "default_store_uri")]
    pub uri: String,

    /// MongoDB database name; ignored by the memory backend.
    #[serde(default = "default_store_database")]
    pub database: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    #[default]
    Memory,
    Mongodb,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3030
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_store_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_store_database() -> String {
    "crud_api".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackendKind::default(),
            uri: default_store_uri(),
            database: default_store_database(),
        }
    }
}

impl Config {
    /// Builds the layered figment without extracting it.
    pub fn figment() -> Figment {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("BOOKSHELF_").split("__"))
    }

    /// Loads configuration from defaults, the TOML file, and the environment.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}
