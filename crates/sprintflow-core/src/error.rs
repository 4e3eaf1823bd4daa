//! Error types for sprintflow operations

use thiserror::Error;

use crate::git::GitError;
use crate::interaction::InteractionError;

/// Remediation appended to every token error
const TOKEN_REMEDIATION: &str =
    "Please generate a GitHub personal access token by running command: sprintflow generate-token";

/// Core error type for sprintflow operations
#[derive(Error, Debug)]
pub enum FlowError {
    // === User-declined ===
    /// Confirmation refused, empty stash label, or Ctrl+C
    #[error("Operation aborted")]
    Aborted,

    // === Precondition errors ===
    /// The working directory is not inside a git working tree
    #[error("not inside a git working tree")]
    NotAGitRepository,

    /// HEAD is detached where a branch identity is required
    #[error("You are not in any branch (detached HEAD?)")]
    DetachedHead,

    /// Branch name does not follow `{issue_number}-{feature_name}`
    #[error("Your branch name is not in the format: {{issue_number}}-{{feature_name}} (branch: {branch})")]
    InvalidBranchName { branch: String },

    /// The default remote URL could not be split into owner and repo
    #[error("cannot determine owner and repo from remote url: {url}")]
    RemoteUrl { url: String },

    // === Remote authentication ===
    /// No cached access token
    #[error("No token found. {}", TOKEN_REMEDIATION)]
    TokenMissing,

    /// Cached access token rejected by the issue tracker
    #[error("Token is invalid. {}", TOKEN_REMEDIATION)]
    TokenInvalid,

    // === External command failures ===
    /// A git command failed
    #[error(transparent)]
    Git(#[from] GitError),

    /// The issue tracker answered with a non-success status
    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The issue tracker could not be reached
    #[error("HTTP request failed: {0}")]
    Http(String),

    // === Collaborator errors ===
    /// Prompting failed for a reason other than cancellation
    #[error("interaction failed: {0}")]
    Interaction(InteractionError),

    /// The preferences store could not be read or written
    #[error("preferences error: {0}")]
    Preferences(String),

    /// Project settings could not be parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<InteractionError> for FlowError {
    fn from(err: InteractionError) -> Self {
        match err {
            InteractionError::Cancelled => FlowError::Aborted,
            other => FlowError::Interaction(other),
        }
    }
}

impl FlowError {
    /// Get the error code (e.g., "E001")
    pub fn code(&self) -> &'static str {
        match self {
            FlowError::Aborted => "E001",
            FlowError::NotAGitRepository => "E002",
            FlowError::DetachedHead => "E003",
            FlowError::InvalidBranchName { .. } => "E004",
            FlowError::RemoteUrl { .. } => "E005",
            FlowError::TokenMissing => "E006",
            FlowError::TokenInvalid => "E007",
            FlowError::Git(GitError::LocalChangesConflict { .. }) => "E008",
            FlowError::Git(_) => "E009",
            FlowError::Api { .. } => "E010",
            FlowError::Http(_) => "E011",
            FlowError::Interaction(_) => "E012",
            FlowError::Preferences(_) => "E013",
            FlowError::Config(_) => "E014",
            FlowError::Io(_) => "E015",
        }
    }

    /// Get the exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            FlowError::Aborted => 0, // Declining is not a failure

            FlowError::NotAGitRepository
            | FlowError::DetachedHead
            | FlowError::InvalidBranchName { .. }
            | FlowError::RemoteUrl { .. } => 2, // Precondition violated

            FlowError::TokenMissing | FlowError::TokenInvalid => 3,

            FlowError::Git(_) | FlowError::Api { .. } | FlowError::Http(_) => 1,

            FlowError::Interaction(_) => 5,

            FlowError::Preferences(_) | FlowError::Config(_) | FlowError::Io(_) => 4,
        }
    }

    /// True when this is the checkout failure caused by conflicting local changes
    pub fn is_local_changes_conflict(&self) -> bool {
        matches!(self, FlowError::Git(GitError::LocalChangesConflict { .. }))
    }
}
