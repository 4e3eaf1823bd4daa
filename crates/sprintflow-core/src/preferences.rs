//! Persisted preferences
//!
//! A flat string key-value store holding per-directory project/sprint
//! defaults and the cached access token. Last writer wins.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// Key of the cached access token
pub const TOKEN_KEY: &str = "github.token";

/// Environment variable overriding the preferences directory
pub const HOME_ENV: &str = "SPRINTFLOW_HOME";

const PREFERENCES_FILE: &str = "preferences.json";

/// get/set/delete contract of the preferences store
pub trait PreferencesStore {
    fn get(&self, key: &str) -> Result<Option<String>, FlowError>;

    fn set(&self, key: &str, value: &str) -> Result<(), FlowError>;

    fn delete(&self, key: &str) -> Result<(), FlowError>;
}

/// Stored defaults for one working directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub project_name: Option<String>,
    pub sprint_number: Option<String>,
}

fn project_key(workdir: &str) -> String {
    format!("{}:project_name", workdir)
}

fn sprint_key(workdir: &str) -> String {
    format!("{}:sprint_number", workdir)
}

/// Read the stored defaults for `workdir`
pub fn get_config(store: &dyn PreferencesStore, workdir: &str) -> Result<WorkflowConfig, FlowError> {
    Ok(WorkflowConfig {
        project_name: store.get(&project_key(workdir))?,
        sprint_number: store.get(&sprint_key(workdir))?,
    })
}

/// Store defaults for `workdir`
pub fn set_config(
    store: &dyn PreferencesStore,
    workdir: &str,
    project_name: &str,
    sprint_number: &str,
) -> Result<(), FlowError> {
    store.set(&project_key(workdir), project_name)?;
    store.set(&sprint_key(workdir), sprint_number)
}

/// JSON file store, read and rewritten on every access
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in `$SPRINTFLOW_HOME` or the platform config directory
    pub fn open_default() -> Result<Self, FlowError> {
        let dir = match std::env::var_os(HOME_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or_else(|| {
                    FlowError::Preferences("cannot determine config directory".to_string())
                })?
                .join("sprintflow"),
        };
        Ok(Self::new(dir.join(PREFERENCES_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>, FlowError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| {
            FlowError::Preferences(format!("failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), FlowError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| FlowError::Preferences(format!("failed to serialize preferences: {}", e)))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl PreferencesStore for FilePreferences {
    fn get(&self, key: &str) -> Result<Option<String>, FlowError> {
        Ok(self.read()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), FlowError> {
        let mut entries = self.read()?;
        entries.insert(key.to_string(), value.to_string());
        self.write(&entries)
    }

    fn delete(&self, key: &str) -> Result<(), FlowError> {
        let mut entries = self.read()?;
        if entries.remove(key).is_some() {
            self.write(&entries)?;
        }
        Ok(())
    }
}

/// In-memory store
#[derive(Default)]
pub struct MemoryPreferences {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferencesStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>, FlowError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), FlowError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), FlowError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
