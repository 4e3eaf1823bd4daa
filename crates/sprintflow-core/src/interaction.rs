//! User interaction capability
//!
//! The orchestrator never talks to a terminal directly. It asks questions
//! through an [`InteractionAdapter`], which the CLI implements with dialoguer
//! and tests implement with scripted answers.

use thiserror::Error;

/// Pure predicate over an answer string. `Err` carries the message shown to
/// the user before asking again.
pub type Validator = fn(&str) -> Result<(), String>;

/// Errors raised while interacting with the user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InteractionError {
    /// The user pressed Ctrl+C
    #[error("cancelled by user")]
    Cancelled,

    /// Prompting requires a terminal on stdin
    #[error("interactive input required but stdin is not a terminal (pass arguments or --yes)")]
    NonTty,

    /// The prompt was configured with invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Terminal IO failed
    #[error("terminal IO error: {0}")]
    Io(String),
}

/// Result alias for interaction calls
pub type InteractionResult<T> = Result<T, InteractionError>;

/// Handle to a running progress indicator
#[derive(Debug)]
pub struct ProgressHandle {
    id: u64,
    message: String,
}

impl ProgressHandle {
    pub fn new(id: u64, message: &str) -> Self {
        Self {
            id,
            message: message.to_string(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Blocking question/answer and status reporting surface
pub trait InteractionAdapter {
    /// Ask for free text. `default` is returned on empty input when present;
    /// otherwise an empty answer is returned as-is and left to the caller.
    fn ask_text(
        &self,
        prompt: &str,
        default: Option<&str>,
        validator: Option<Validator>,
    ) -> InteractionResult<String>;

    /// Ask a yes/no question
    fn ask_confirm(&self, prompt: &str, default: bool) -> InteractionResult<bool>;

    /// Ask for a secret without echoing it
    fn ask_password(&self, prompt: &str, validator: Option<Validator>) -> InteractionResult<String>;

    /// Start a spinner for a blocking remote call
    fn start_progress(&self, message: &str) -> ProgressHandle;

    /// Stop a spinner started with [`InteractionAdapter::start_progress`]
    fn end_progress(&self, handle: ProgressHandle, success: bool);

    fn print_info(&self, message: &str);

    fn print_warning(&self, message: &str);

    fn print_success(&self, message: &str);
}
