//! Client settings with builder pattern
//!
//! Settings come from a TOML file, the environment (with `.env` support) or
//! the builder; the CLI layers its own flags on top.

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::pluralization::PluralizationPolicy;
use crate::api::transport::Credentials;

pub const ENV_URL: &str = "ODATA_URL";
pub const ENV_USER: &str = "ODATA_USER";
pub const ENV_PASSWORD: &str = "ODATA_PASSWORD";
pub const ENV_TOKEN: &str = "ODATA_TOKEN";
pub const ENV_PLURALIZATION: &str = "ODATA_PLURALIZATION";
pub const ENV_TIMEOUT_SECS: &str = "ODATA_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection and name-matching settings for one OData service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Service root, e.g. `https://host/service.svc`
    pub base_url: String,
    pub credentials: Credentials,
    pub pluralization: PluralizationPolicy,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            credentials: Credentials::None,
            pluralization: PluralizationPolicy::default(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientSettings {
    pub fn builder() -> ClientSettingsBuilder {
        ClientSettingsBuilder::new()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse settings TOML")
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        debug!("Loaded settings from {}", path.display());
        Self::from_toml_str(&text)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }

    /// Load using `lookup` for variable values; unset variables keep defaults
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().overlay_env(lookup)
    }

    /// Apply any set environment variables on top of these settings
    pub fn overlay_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_URL) {
            self.base_url = url;
        }

        if let Some(token) = get(ENV_TOKEN) {
            self.credentials = Credentials::Bearer { token };
        } else if let Some(username) = get(ENV_USER) {
            self.credentials = Credentials::Basic {
                username,
                password: get(ENV_PASSWORD).unwrap_or_default(),
            };
        }

        if let Some(policy) = get(ENV_PLURALIZATION) {
            self.pluralization = policy
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .with_context(|| format!("Invalid {}", ENV_PLURALIZATION))?;
        }

        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} '{}'", ENV_TIMEOUT_SECS, secs))?;
        }

        Ok(self)
    }
}

/// `<config dir>/odata-cli/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("odata-cli")
        .join("config.toml")
}

/// Builder for ClientSettings
#[derive(Debug)]
pub struct ClientSettingsBuilder {
    settings: ClientSettings,
}

impl ClientSettingsBuilder {
    pub fn new() -> Self {
        Self {
            settings: ClientSettings::default(),
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.settings.base_url = url.into();
        self
    }

    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.settings.credentials = Credentials::Bearer {
            token: token.into(),
        };
        self
    }

    pub fn pluralization(mut self, policy: PluralizationPolicy) -> Self {
        self.settings.pluralization = policy;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.settings.request_timeout_secs = timeout.as_secs();
        self
    }

    /// Build the final settings
    pub fn build(self) -> ClientSettings {
        self.settings
    }
}

impl Default for ClientSettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
