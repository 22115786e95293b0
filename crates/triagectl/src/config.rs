//! Triage configuration
//!
//! Config file: `--config PATH`, `$TRIAGE_CONFIG`, or
//! `~/.config/triage/config.toml`. Missing files fall back to defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use triage_shared::upload::DEFAULT_MAX_UPLOAD_MB;
use triage_shared::{StatusFilter, DEFAULT_BACKEND_URL};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "TRIAGE_CONFIG";

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the classification service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout; unset means wait indefinitely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

/// Analyze page settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeConfig {
    /// Largest accepted upload in megabytes
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
        }
    }
}

fn default_max_upload_mb() -> u64 {
    DEFAULT_MAX_UPLOAD_MB
}

/// Dashboard settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Status filter applied when no preference is cached
    #[serde(default)]
    pub default_status_filter: StatusFilter,

    /// Quiet period before a typed search is applied
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_status_filter: StatusFilter::All,
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

fn default_search_debounce_ms() -> u64 {
    300
}

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub analyze: AnalyzeConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config PATH`
    Explicit(PathBuf),
    /// `$TRIAGE_CONFIG`
    Environment(PathBuf),
    /// User config directory
    User(PathBuf),
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Explicit(p) => write!(f, "{} (--config)", p.display()),
            ConfigSource::Environment(p) => write!(f, "{} (${})", p.display(), CONFIG_ENV),
            ConfigSource::User(p) => write!(f, "{}", p.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

impl TriageConfig {
    /// Get default user config path: ~/.config/triage/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("triage").join("config.toml"))
    }

    /// Load configuration
    ///
    /// Priority:
    /// 1. Explicit path (must exist)
    /// 2. $TRIAGE_CONFIG (must exist)
    /// 3. User config, if present
    /// 4. Defaults
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            let config = Self::load_from(path)?;
            return Ok((config, ConfigSource::Explicit(path.to_path_buf())));
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            let path = PathBuf::from(path);
            let config = Self::load_from(&path)?;
            return Ok((config, ConfigSource::Environment(path)));
        }

        if let Some(path) = Self::user_config_path() {
            if path.exists() {
                let config = Self::load_from(&path)?;
                return Ok((config, ConfigSource::User(path)));
            }
        }

        Ok((Self::default(), ConfigSource::Defaults))
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: TriageConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Render as TOML for `triagectl config`
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Override the backend URL (from `--backend-url`)
    pub fn with_backend_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.backend.base_url = url;
        }
        self
    }
}
