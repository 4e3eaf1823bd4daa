//! sprintflow-core: branch naming, git plumbing, and the workflow orchestrator
//!
//! This crate holds every decision sprintflow makes. The CLI crate only parses
//! arguments, supplies a terminal prompter, and prints results.

/// Core error types for sprintflow operations
pub mod error;

/// Project settings (`.sprintflow.toml`)
pub mod config;

/// Branch-name derivation and parsing
pub mod branch;

/// Git command runner
pub mod git;

/// Issue-tracker client
pub mod github;

/// User interaction capability
pub mod interaction;

/// Persisted preferences
pub mod preferences;

/// Questions and answer validators
pub mod prompts;

/// Access token lifecycle
pub mod token;

/// Lifecycle operations
pub mod workflow;

// Re-exports for convenience
pub use branch::{BranchName, IssueRef, SprintRef, to_issue_number_and_name, to_slug, to_space_case};
pub use config::{Config, FlowSettings, GitHubSettings};
pub use error::FlowError;
pub use git::{GitCli, GitError, GitRunner};
pub use github::{GitHubClient, IssueTracker, PullRequest, PullRequestSpec};
pub use interaction::{InteractionAdapter, InteractionError, InteractionResult, ProgressHandle};
pub use preferences::{FilePreferences, MemoryPreferences, PreferencesStore, WorkflowConfig};
pub use workflow::{Collaborators, FlowOutcome, Operation, SprintOverride, Workflow};
