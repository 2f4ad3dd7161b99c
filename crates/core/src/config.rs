use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::ModelEntry;

/// Environment variable that overrides `auth.api_key`
pub const API_KEY_ENV: &str = "MODELHUB_API_KEY";

/// API key used when none is configured. Fine for a local demo, nothing else.
pub const SAMPLE_API_KEY: &str = "ml-model-key-2024";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Shared-secret authentication
    #[serde(default)]
    pub auth: AuthConfig,

    /// Where artifacts and sidecar metadata live
    #[serde(default)]
    pub storage: StorageConfig,

    /// Registered models
    #[serde(default)]
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL advertised in download/metadata links (default: http://localhost:{port})
    #[serde(default)]
    pub public_url: Option<String>,

    /// Close connections idle for longer than this
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Key required for downloads, sent as `X-API-Key` or `Authorization: Bearer`
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base directory for artifacts (default: ~/.config/modelhub/models/)
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// JSON registry document (`{"models": [...]}`); takes precedence over `models`
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Inline model entries
    #[serde(default = "default_models")]
    pub models: Vec<ModelEntry>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_idle_timeout_secs() -> u64 {
    60
}

fn default_api_key() -> String {
    SAMPLE_API_KEY.to_string()
}

fn default_base_path() -> PathBuf {
    Config::base_dir()
        .map(|p| p.join("models"))
        .unwrap_or_else(|_| PathBuf::from("models"))
}

fn default_models() -> Vec<ModelEntry> {
    vec![ModelEntry::iris_sample()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            storage: StorageConfig::default(),
            registry: RegistryConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: None,
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            file: None,
            models: default_models(),
        }
    }
}

impl Config {
    /// Get the base directory: ~/.config/modelhub/
    pub fn base_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map(PathBuf::from)
            .or_else(|_| std::env::var("USERPROFILE").map(PathBuf::from))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(home.join(".config").join("modelhub"))
    }

    /// Get the config file path: ~/.config/modelhub/config.toml
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }

    /// Load config from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            Self::read_file(&config_path)?
        } else {
            Config::default()
        };

        config.override_api_key(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Load config from an explicit path, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read_file(path)?;
        config.override_api_key(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read a config file as written, without environment overrides
    pub fn read_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    fn override_api_key(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.is_empty()) {
            self.auth.api_key = key;
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.auth.api_key.is_empty() {
            anyhow::bail!("auth.api_key must not be empty");
        }
        if self.server.idle_timeout_secs == 0 {
            anyhow::bail!("server.idle_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        (self.server.host.as_str(), self.server.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Could not resolve {}:{}",
                    self.server.host,
                    self.server.port
                )
            })
    }

    /// Base URL for links handed out to clients, without a trailing slash
    pub fn public_url(&self) -> String {
        match &self.server.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.server.port),
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.server.idle_timeout_secs)
    }

    /// Whether the built-in sample key is still in use
    pub fn uses_sample_key(&self) -> bool {
        self.auth.api_key == SAMPLE_API_KEY
    }
}
