//! Configuration handling for sprintflow

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// Project settings file name, looked up at the repository root
pub const CONFIG_FILE: &str = ".sprintflow.toml";

/// Sprintflow configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Branching model settings
    #[serde(default)]
    pub flow: FlowSettings,

    /// Issue tracker settings
    #[serde(default)]
    pub github: GitHubSettings,
}

/// Branching model settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlowSettings {
    /// Remote every branch is synchronized with
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Integration branch sprints fork from
    #[serde(default = "default_develop_branch")]
    pub develop_branch: String,

    /// Production branch hotfixes fork from
    #[serde(default = "default_production_branch")]
    pub production_branch: String,

    /// Reserved project whose features fork from the develop branch
    #[serde(default = "default_maintenance_project")]
    pub maintenance_project: String,
}

/// Issue tracker settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubSettings {
    /// REST API root
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_develop_branch() -> String {
    "develop".to_string()
}

fn default_production_branch() -> String {
    "master".to_string()
}

fn default_maintenance_project() -> String {
    "maintenance".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            develop_branch: default_develop_branch(),
            production_branch: default_production_branch(),
            maintenance_project: default_maintenance_project(),
        }
    }
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

impl Config {
    /// Load `.sprintflow.toml` from `repo_root`, falling back to defaults
    pub fn load(repo_root: &Path) -> Result<Self, FlowError> {
        let path = repo_root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)?;
        toml::from_str(&raw)
            .map_err(|e| FlowError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }
}
