mod file_config;

pub use file_config::{AuthConfig, FileConfig};

use crate::auth::Credentials;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin";
pub const DEFAULT_LOG_DIR: &str = "api_logs";

pub const ENV_CONFIG_FILE: &str = "RESTAURANT_API_CONFIG";
pub const ENV_BASE_URL: &str = "RESTAURANT_API_BASE_URL";
pub const ENV_USERNAME: &str = "RESTAURANT_API_USERNAME";
pub const ENV_PASSWORD: &str = "RESTAURANT_API_PASSWORD";
pub const ENV_LOG_DIR: &str = "RESTAURANT_API_LOG_DIR";
pub const ENV_TIMEOUT_SECS: &str = "RESTAURANT_API_TIMEOUT_SECS";

/// Values read from the environment. Everything is optional; unset values
/// fall back to the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub config_file: Option<PathBuf>,
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so resolution can be
    /// exercised without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let request_timeout_secs = match non_empty(ENV_TIMEOUT_SECS) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("{} is not a number: {:?}", ENV_TIMEOUT_SECS, raw))?,
            ),
            None => None,
        };

        Ok(Self {
            config_file: non_empty(ENV_CONFIG_FILE).map(PathBuf::from),
            base_url: non_empty(ENV_BASE_URL),
            username: non_empty(ENV_USERNAME),
            password: non_empty(ENV_PASSWORD),
            log_dir: non_empty(ENV_LOG_DIR).map(PathBuf::from),
            request_timeout_secs,
        })
    }
}

/// Fully resolved settings for a suite run.
#[derive(Debug, Clone)]
pub struct ApiTestConfig {
    /// Root of the API, without trailing slash (e.g. `http://localhost:8080/api`).
    pub base_url: String,
    pub credentials: Credentials,
    pub log_dir: PathBuf,
    /// `None` keeps the HTTP client's default (no timeout).
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiTestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: Credentials::default(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            request_timeout_secs: None,
        }
    }
}

impl ApiTestConfig {
    /// Reads the environment and, if `RESTAURANT_API_CONFIG` points at a
    /// file, the TOML config on top of it.
    pub fn load() -> Result<Self> {
        let env = EnvConfig::from_env()?;
        let file = match &env.config_file {
            Some(path) => Some(FileConfig::load(path)?),
            None => None,
        };
        Self::resolve(&env, file)
    }

    /// Resolve configuration from the environment and an optional TOML file.
    /// TOML values override environment values where present.
    pub fn resolve(env: &EnvConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let file_auth = file.auth.unwrap_or_default();
        let defaults = Credentials::default();

        let base_url = file
            .base_url
            .or_else(|| env.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            bail!("base_url must not be empty");
        }

        let credentials = Credentials {
            username: file_auth
                .username
                .or_else(|| env.username.clone())
                .unwrap_or(defaults.username),
            password: file_auth
                .password
                .or_else(|| env.password.clone())
                .unwrap_or(defaults.password),
            remember_me: file_auth.remember_me.unwrap_or(defaults.remember_me),
        };

        let log_dir = file
            .log_dir
            .map(PathBuf::from)
            .or_else(|| env.log_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

        let request_timeout_secs = file.request_timeout_secs.or(env.request_timeout_secs);
        if request_timeout_secs == Some(0) {
            bail!("request_timeout_secs must be greater than zero");
        }

        Ok(Self {
            base_url,
            credentials,
            log_dir,
            request_timeout_secs,
        })
    }

    /// Returns a copy pointing at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}
