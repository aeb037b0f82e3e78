//! Configuration management for git-request-list.
//!
//! The configuration is read once at startup and never changes afterwards.
//! YAML is the primary format; files ending in `.toml` are parsed as TOML.
//!
//! Lookup order for the default file:
//!
//! - `~/.config/git-request-list/config.yml` (platform config dir) when present
//! - `/etc/git-request-list.yml` otherwise
//!
//! # Example
//!
//! ```yaml
//! sort_by: created
//! format: text
//! timezone: Europe/Copenhagen
//! sources:
//!   - api: github
//!     token: ghp_xxx
//!     repositories: ["^org/"]
//!   - api: gitlab
//!     host: https://gitlab.example.com
//!     token: glpat-xxx
//!     skip_wip: true
//! ```

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Error, Result};

/// Config file name inside the user config directory.
const CONFIG_FILE_NAME: &str = "config.yml";

/// Config directory name.
const CONFIG_DIR_NAME: &str = "git-request-list";

/// System-wide fallback config path.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/git-request-list.yml";

// =============================================================================
// Configuration structures
// =============================================================================

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Field to sort the listing by; unrecognized names keep source order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// IANA timezone for rendered timestamps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Upstream accounts to poll, in order
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// Output format of the listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
}

/// One configured upstream account, tagged by its `api` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "api")]
pub enum SourceConfig {
    #[serde(rename = "github")]
    GitHub(GitHubSourceConfig),
    #[serde(rename = "gitlab")]
    GitLab(GitLabSourceConfig),
}

/// GitHub source configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubSourceConfig {
    /// GitHub API base URL (for GitHub Enterprise)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Personal access token; optional when `user` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// List this user's repositories instead of the authenticated user's
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Repository name patterns; empty means all
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<String>,
}

/// GitLab source configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitLabSourceConfig {
    /// GitLab instance URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Private access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Drop merge requests flagged as work in progress
    #[serde(default)]
    pub skip_wip: bool,
    /// Repository name patterns; empty means all
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<String>,
}

impl SourceConfig {
    /// Get the API identifier of this source.
    pub fn api(&self) -> &'static str {
        match self {
            SourceConfig::GitHub(_) => "github",
            SourceConfig::GitLab(_) => "gitlab",
        }
    }

    /// Repository patterns configured for this source.
    pub fn repositories(&self) -> &[String] {
        match self {
            SourceConfig::GitHub(c) => &c.repositories,
            SourceConfig::GitLab(c) => &c.repositories,
        }
    }
}

// =============================================================================
// Config implementation
// =============================================================================

impl Config {
    /// Get the per-user configuration file path.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Get the configuration file used when none is given on the command line.
    pub fn default_path() -> PathBuf {
        match Self::user_config_path() {
            Some(path) if path.exists() => path,
            _ => PathBuf::from(SYSTEM_CONFIG_PATH),
        }
    }

    /// Load and validate configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!(path = ?path, "Loading config");

        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let is_toml = path.extension().is_some_and(|ext| ext == "toml");
        let config = if is_toml {
            Self::from_toml(&contents)?
        } else {
            Self::from_yaml(&contents)?
        };

        config.validate()?;

        info!(path = ?path, sources = config.sources.len(), "Config loaded successfully");
        Ok(config)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(Error::Config("no sources defined".to_string()));
        }
        self.timezone()?;
        Ok(())
    }

    /// Parse the configured timezone, if any.
    pub fn timezone(&self) -> Result<Option<Tz>> {
        self.timezone
            .as_deref()
            .map(|name| {
                name.parse::<Tz>()
                    .map_err(|e| Error::Config(format!("Unknown timezone '{}': {}", name, e)))
            })
            .transpose()
    }
}

// =============================================================================
// Tests
// =============================================================================
