//! Configuration management for Tutor.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::snapshot::Window;

/// Tutor configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where history snapshots come from.
    #[serde(default)]
    pub source: SourceConfig,

    /// Analysis window and branch settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Load config from a TOML file.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns error if the file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to a TOML file.
    ///
    /// # Errors
    /// Returns error if serialization or write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| std::io::Error::other(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// The analysis window this config describes.
    #[must_use]
    pub fn window(&self) -> Window {
        Window {
            since: self.analysis.since,
            until: self.analysis.until,
            branch: None,
        }
    }
}

/// Which backend to fetch history from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// An on-disk repository.
    #[default]
    Local,
    /// A project on a GitLab instance.
    Gitlab,
}

/// History source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Backend kind.
    #[serde(default)]
    pub kind: SourceKind,

    /// Path to the local repository (local source).
    #[serde(default = "default_path")]
    pub path: String,

    /// Base URL of the GitLab instance (gitlab source).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Project identifier, `group/name` or numeric id (gitlab source).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Environment variable holding the API token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Local,
            path: default_path(),
            url: None,
            project: None,
            token_env: default_token_env(),
        }
    }
}

fn default_path() -> String {
    ".".into()
}

fn default_token_env() -> String {
    "GITLAB_TOKEN".into()
}

/// Analysis window and branch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// The branch feature branches are measured against.
    #[serde(default = "default_base_branch")]
    pub base_branch: String,

    /// Earliest commit time to include.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,

    /// Latest commit time to include.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_branch: default_base_branch(),
            since: None,
            until: None,
        }
    }
}

fn default_base_branch() -> String {
    "master".into()
}
