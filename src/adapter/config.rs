//! Configuration
//!
//! JSON config file with environment overrides for the database and catalog sync.

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::application::dto::pipeline_config::PipelineConfig;
use crate::domain::services::label_layout::HighlightBasis;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    pub poll_interval_secs: u64,
    pub settle_delay_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
            settle_delay_secs: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    // Pipeline
    pub input_file: String,
    pub data_dir: String,
    pub currency_symbol: String,
    pub document_currency_symbol: String,
    pub highlight_basis: HighlightBasis,

    // Audit store (PostgreSQL when set, JSON lines file otherwise)
    pub database_url: Option<String>,
    pub audit_log_path: String,

    // Catalog sync (enabled only when both are set)
    pub cms_api_url: Option<String>,
    pub cms_api_key: Option<String>,
    pub sync_timeout_secs: u64,

    pub watch: WatchConfig,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_file: "data/pos_prices.csv".to_string(),
            data_dir: "data".to_string(),
            currency_symbol: "₹".to_string(),
            // The PDF uses the standard Type1 fonts, which have no rupee glyph
            document_currency_symbol: "Rs.".to_string(),
            highlight_basis: HighlightBasis::default(),
            database_url: None,
            audit_log_path: "data/price_update_log.jsonl".to_string(),
            cms_api_url: None,
            cms_api_key: None,
            sync_timeout_secs: 10,
            watch: WatchConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Catalog sync endpoint settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl Config {
    /// Load the config file, falling back to defaults when it does not exist
    pub fn load(path: &str) -> Result<Self> {
        let path = expand(path);
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Apply `DATABASE_URL`, `CMS_API_URL` and `CMS_API_KEY` from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (environment-style keys)
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(url) = lookup("CMS_API_URL") {
            self.cms_api_url = Some(url);
        }
        if let Some(key) = lookup("CMS_API_KEY") {
            self.cms_api_key = Some(key);
        }
        self
    }

    /// Sync settings, or `None` when either the endpoint or the key is missing
    pub fn sync_settings(&self) -> Option<SyncSettings> {
        let url = self.cms_api_url.as_deref().filter(|s| !s.trim().is_empty())?;
        let api_key = self.cms_api_key.as_deref().filter(|s| !s.trim().is_empty())?;
        Some(SyncSettings {
            url: url.to_string(),
            api_key: api_key.to_string(),
            timeout: Duration::from_secs(self.sync_timeout_secs),
        })
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn input_path(&self) -> PathBuf {
        expand(&self.input_file)
    }

    pub fn data_path(&self) -> PathBuf {
        expand(&self.data_dir)
    }

    pub fn audit_log_path(&self) -> PathBuf {
        expand(&self.audit_log_path)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.watch.poll_interval_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.watch.settle_delay_secs)
    }

    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new(
            self.data_path(),
            &self.currency_symbol,
            &self.document_currency_symbol,
            self.highlight_basis,
        )
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Expand `~` in a user supplied path
pub fn expand_path(path: &Path) -> PathBuf {
    expand(&path.to_string_lossy())
}
