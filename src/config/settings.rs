use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::env_file::EnvFile;
use crate::domain::{Credentials, Session};
use crate::session::ProbePolicy;

pub const BASE_URL_KEY: &str = "WEB_BASE_URL";
pub const EMAIL_KEY: &str = "WEB_EMAIL";
pub const PASSWORD_KEY: &str = "WEB_PASSWORD";
pub const TOKEN_KEY: &str = "WEB_TOKEN";

#[derive(Debug, Clone)]
pub struct ScraperSettings {
    pub rate_limit_ms: u64,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub probe_policy: ProbePolicy,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            rate_limit_ms: 1000, // 1 req/sec
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            timeout_secs: 30,
            probe_policy: ProbePolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    pub template_path: PathBuf,
    pub env_file: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            template_path: PathBuf::from("templates/dashboard.html"),
            env_file: PathBuf::from(".env"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub scraper: ScraperSettings,
    pub storage: StorageSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, overridden by whatever the process environment sets
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(ms) = lookup("SCRAPE_RATE_LIMIT_MS") {
            config.scraper.rate_limit_ms = ms
                .parse()
                .with_context(|| format!("SCRAPE_RATE_LIMIT_MS is not a number: {}", ms))?;
        }
        if let Some(secs) = lookup("SCRAPE_TIMEOUT_SECS") {
            config.scraper.timeout_secs = secs
                .parse()
                .with_context(|| format!("SCRAPE_TIMEOUT_SECS is not a number: {}", secs))?;
        }
        if let Some(policy) = lookup("WEB_TOKEN_PROBE") {
            config.scraper.probe_policy = policy.parse()?;
        }
        if let Some(dir) = lookup("DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("TEMPLATE_PATH") {
            config.storage.template_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("ENV_FILE") {
            config.storage.env_file = PathBuf::from(path);
        }

        Ok(config)
    }
}

/// Booking service connection details from the persisted config store
#[derive(Debug, Clone)]
pub struct BookingSettings {
    pub base_url: String,
    pub credentials: Credentials,
    pub token: Option<String>,
}

impl BookingSettings {
    /// Read the env file fresh (it holds the latest token), then fall back
    /// to the process environment.
    pub fn load(env_file: &Path) -> Result<Self> {
        let file_values = EnvFile::new(env_file).read_values()?;
        Self::from_sources(&file_values, |key| std::env::var(key).ok())
    }

    pub fn from_sources<F>(file_values: &HashMap<String, String>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| {
            file_values
                .get(key)
                .cloned()
                .or_else(|| env(key))
                .filter(|v| !v.trim().is_empty())
        };
        let required = |key: &str| lookup(key).with_context(|| format!("{} is not configured", key));

        Ok(Self {
            base_url: required(BASE_URL_KEY)?,
            credentials: Credentials {
                email: required(EMAIL_KEY)?,
                password: required(PASSWORD_KEY)?,
            },
            token: lookup(TOKEN_KEY),
        })
    }

    pub fn into_session(self) -> Session {
        Session::new(self.base_url, self.credentials, self.token)
    }
}
