//! Access token lifecycle

use tracing::info;

use crate::error::FlowError;
use crate::github::IssueTracker;
use crate::interaction::InteractionAdapter;
use crate::preferences::{PreferencesStore, TOKEN_KEY};
use crate::prompts::{self, validate_token};

/// Validate a personal access token and cache it.
///
/// `token` skips the hidden prompt when given.
pub fn generate_token(
    prompter: &dyn InteractionAdapter,
    preferences: &dyn PreferencesStore,
    tracker: &dyn IssueTracker,
    token: Option<&str>,
) -> Result<(), FlowError> {
    let token = match token {
        Some(t) if validate_token(t).is_ok() => t.trim().to_string(),
        _ => prompts::ask_token(prompter)?,
    };

    let progress = prompter.start_progress("Validating token");
    let valid = tracker.validate_token(&token);
    prompter.end_progress(progress, matches!(valid, Ok(true)));
    if !valid? {
        return Err(FlowError::TokenInvalid);
    }

    preferences.set(TOKEN_KEY, &token)?;
    info!("token stored");
    prompter.print_success("token generated");
    Ok(())
}

/// Forget the cached token. The token itself stays valid on the tracker.
pub fn remove_token(
    prompter: &dyn InteractionAdapter,
    preferences: &dyn PreferencesStore,
) -> Result<(), FlowError> {
    preferences.delete(TOKEN_KEY)?;
    prompter.print_success("token removed (locally)");
    Ok(())
}
