//! JSON output envelope for `--json`

use serde::Serialize;
use sprintflow_core::{FlowError, WorkflowConfig};

const SCHEMA_VERSION: &str = "1";

/// Response envelope printed on stdout in JSON mode
#[derive(Debug, Clone, Serialize)]
pub struct JsonResponse<T> {
    pub schema_version: String,
    pub command: String,
    /// "ok", "aborted" or "error"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub issues: Vec<JsonIssue>,
}

impl<T: Serialize> JsonResponse<T> {
    pub fn ok(command: &str, data: T) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            command: command.to_string(),
            status: "ok".to_string(),
            data: Some(data),
            issues: vec![],
        }
    }

    /// Response for a failed (or declined) command
    pub fn error(command: &str, err: &FlowError) -> Self {
        let status = if matches!(err, FlowError::Aborted) {
            "aborted"
        } else {
            "error"
        };
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            command: command.to_string(),
            status: status.to_string(),
            data: None,
            issues: vec![JsonIssue::from(err)],
        }
    }

    /// Print as pretty JSON
    pub fn print(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("error: failed to serialize response: {}", e),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonIssue {
    /// Error code (e.g., "E002")
    pub code: String,
    pub severity: String,
    pub message: String,
}

impl From<&FlowError> for JsonIssue {
    fn from(err: &FlowError) -> Self {
        let severity = match err {
            FlowError::Aborted => "info",
            _ => "error",
        };
        Self {
            code: err.code().to_string(),
            severity: severity.to_string(),
            message: err.to_string(),
        }
    }
}

/// Data for `get-config` / `set-config`
#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub workdir: String,
    pub project_name: Option<String>,
    pub sprint_number: Option<String>,
}

impl ConfigData {
    pub fn new(workdir: &str, config: WorkflowConfig) -> Self {
        Self {
            workdir: workdir.to_string(),
            project_name: config.project_name,
            sprint_number: config.sprint_number,
        }
    }
}

/// Data for `generate-token` / `remove-token`
#[derive(Debug, Clone, Serialize)]
pub struct TokenData {
    pub stored: bool,
}
