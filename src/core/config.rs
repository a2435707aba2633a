use super::currency::CurrencyCode;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const BASE_URL_ENV: &str = "XCONV_BASE_URL";
pub const API_KEY_ENV: &str = "XCONV_API_KEY";

/// Connection settings of the rate service.
///
/// Both values are optional here; a missing one is reported by the provider
/// as a fetch failure rather than a startup error.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl ApiConfig {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        ApiConfig {
            base_url: Some(base_url.to_string()),
            api_key: Some(api_key.to_string()),
        }
    }

    /// Returns `(base_url, api_key)` when both are present and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let base_url = self.base_url.as_deref().map(str::trim)?;
        let api_key = self.api_key.as_deref().map(str::trim)?;
        if base_url.is_empty() || api_key.is_empty() {
            return None;
        }
        Some((base_url.trim_end_matches('/'), api_key))
    }
}

/// Initial state of the converter, also restored on every currency change.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Defaults {
    pub base_code: CurrencyCode,
    pub target_code: CurrencyCode,
    pub base_amount: Option<f64>,
    pub target_amount: Option<f64>,
    pub fixed_decimals: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            base_code: CurrencyCode::new("USD"),
            target_code: CurrencyCode::new("EUR"),
            base_amount: Some(1.0),
            target_amount: None,
            fixed_decimals: 2,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub defaults: Defaults,
}

impl AppConfig {
    /// Loads the default config file if one exists, then applies the
    /// environment overrides.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        let config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            debug!(
                "No config file at {}, using built-in defaults",
                config_path.display()
            );
            AppConfig::default()
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "xconv", "xconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Replaces API settings with non-blank values returned by `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(base_url) = non_blank(BASE_URL_ENV) {
            debug!("Using base URL from {}", BASE_URL_ENV);
            self.api.base_url = Some(base_url);
        }
        if let Some(api_key) = non_blank(API_KEY_ENV) {
            debug!("Using API key from {}", API_KEY_ENV);
            self.api.api_key = Some(api_key);
        }
        self
    }
}
