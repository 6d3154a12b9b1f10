use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

pub const ENV_API_TOKEN: &str = "WEATHER_API_TOKEN";
pub const ENV_PROVIDER_API_KEY: &str = "VISUALCROSSING_API_KEY";
pub const ENV_BIND: &str = "WEATHER_BIND";

/// Credentials and endpoint of the upstream provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Overrides the public timeline endpoint, e.g. for a proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_token = "shared-secret"
///
/// [server]
/// bind = "127.0.0.1:5000"
///
/// [visualcrossing]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Shared secret callers must send as `token`.
    pub api_token: Option<String>,

    #[serde(default)]
    pub server: ServerConfig,

    pub visualcrossing: Option<ProviderConfig>,
}

impl Config {
    /// Load config from the platform config directory, or return an empty
    /// default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-relay", "weather-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply environment overrides on top of the file contents.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Same as [`Config::apply_env`] with an injectable variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api_token = Some(token);
        }

        if let Some(api_key) = lookup(ENV_PROVIDER_API_KEY) {
            self.upsert_provider_api_key(api_key);
        }

        if let Some(bind) = lookup(ENV_BIND) {
            self.server.bind = bind;
        }
    }

    /// Set/replace the provider API key, keeping any configured base URL.
    pub fn upsert_provider_api_key(&mut self, api_key: String) {
        match self.visualcrossing.as_mut() {
            Some(provider) => provider.api_key = api_key,
            None => {
                self.visualcrossing = Some(ProviderConfig {
                    api_key,
                    base_url: None,
                })
            }
        }
    }

    /// Returns the provider API key, if present.
    pub fn provider_api_key(&self) -> Option<&str> {
        self.visualcrossing.as_ref().map(|cfg| cfg.api_key.as_str())
    }

    pub fn provider_base_url(&self) -> Option<&str> {
        self.visualcrossing.as_ref().and_then(|cfg| cfg.base_url.as_deref())
    }

    /// The shared token, or an error explaining how to configure it.
    pub fn require_api_token(&self) -> Result<&str> {
        self.api_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API token configured.\n\
                     Hint: run `weather-server configure` or set {ENV_API_TOKEN}."
                )
            })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.server.bind))
    }
}
