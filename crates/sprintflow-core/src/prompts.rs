//! The questions sprintflow asks, and their answer validators

use crate::branch::{SprintRef, is_valid_slug, to_slug};
use crate::error::FlowError;
use crate::interaction::InteractionAdapter;
use crate::preferences::{PreferencesStore, WorkflowConfig, get_config, set_config};
use crate::workflow::SprintOverride;

/// Answer that discards local changes instead of stashing them
pub const DISCARD_MARKER: &str = ".";

/// Label used when changes are stashed without asking
pub const DEFAULT_STASH_LABEL: &str = "wip";

/// What to do about a dirty working tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StashDecision {
    /// Nothing to set aside
    Clean,
    /// The user gave no label; the operation ends
    Declined,
    /// Throw local changes away
    Discard,
    /// Stash local changes under this label
    Stash(String),
}

impl StashDecision {
    /// Interpret a raw stash-label answer
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim() {
            "" => StashDecision::Declined,
            DISCARD_MARKER => StashDecision::Discard,
            label => StashDecision::Stash(label.to_string()),
        }
    }
}

pub fn validate_project_name(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("Please enter project name".to_string());
    }
    Ok(())
}

pub fn validate_sprint_number(value: &str) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Please enter sprint number".to_string());
    }
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err("Sprint should be number".to_string());
    }
    Ok(())
}

pub fn validate_issue_number(value: &str) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Please enter issue number".to_string());
    }
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err("Issue should be number".to_string());
    }
    Ok(())
}

pub fn validate_description(value: &str) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Please enter a description".to_string());
    }
    if !is_valid_slug(&to_slug(value)) {
        return Err("Description must not contain consecutive dashes".to_string());
    }
    Ok(())
}

pub fn validate_token(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("Please enter your token".to_string());
    }
    Ok(())
}

/// Ask for project name and sprint number, offering stored defaults
pub fn ask_project_and_sprint(
    prompter: &dyn InteractionAdapter,
    defaults: &WorkflowConfig,
) -> Result<SprintRef, FlowError> {
    let project = prompter.ask_text(
        "project name",
        defaults.project_name.as_deref(),
        Some(validate_project_name),
    )?;
    let sprint = prompter.ask_text(
        "sprint number",
        defaults.sprint_number.as_deref(),
        Some(validate_sprint_number),
    )?;
    Ok(SprintRef::new(project.trim(), sprint.trim()))
}

/// Settle new project/sprint defaults for `workdir` and store them
///
/// Values given in `overrides` are used as the offered defaults; when both
/// are present and valid nothing is asked.
pub fn update_defaults(
    prompter: &dyn InteractionAdapter,
    store: &dyn PreferencesStore,
    workdir: &str,
    overrides: &SprintOverride,
) -> Result<SprintRef, FlowError> {
    let sprint = match overrides.complete() {
        Some(sprint) => sprint,
        None => {
            let stored = get_config(store, workdir)?;
            let defaults = WorkflowConfig {
                project_name: overrides.project.clone().or(stored.project_name),
                sprint_number: overrides.sprint.clone().or(stored.sprint_number),
            };
            ask_project_and_sprint(prompter, &defaults)?
        }
    };
    set_config(store, workdir, &sprint.project, &sprint.sprint)?;
    Ok(sprint)
}

/// Ask for an issue number and a description, returning `(issue, slug)`
fn ask_issue_and_description(
    prompter: &dyn InteractionAdapter,
    description_prompt: &str,
) -> Result<(String, String), FlowError> {
    let issue = prompter.ask_text("issue number", None, Some(validate_issue_number))?;
    let description = prompter.ask_text(description_prompt, None, Some(validate_description))?;
    Ok((issue.trim().to_string(), to_slug(description.trim())))
}

pub fn ask_issue_and_feature(
    prompter: &dyn InteractionAdapter,
) -> Result<(String, String), FlowError> {
    ask_issue_and_description(prompter, "feature")
}

pub fn ask_issue_and_hotfix(
    prompter: &dyn InteractionAdapter,
) -> Result<(String, String), FlowError> {
    ask_issue_and_description(prompter, "hotfix")
}

/// Ask how to set local changes aside
pub fn ask_stash_label(prompter: &dyn InteractionAdapter) -> Result<StashDecision, FlowError> {
    let answer = prompter.ask_text(
        &format!(
            "You have local changes that would be overwritten. Enter a stash label ('{}' discards them, empty aborts)",
            DISCARD_MARKER
        ),
        None,
        None,
    )?;
    Ok(StashDecision::from_answer(&answer))
}

/// Ask for confirmation; declining aborts
pub fn confirm_finishing(prompter: &dyn InteractionAdapter, message: &str) -> Result<(), FlowError> {
    if prompter.ask_confirm(message, false)? {
        Ok(())
    } else {
        Err(FlowError::Aborted)
    }
}

pub fn ask_token(prompter: &dyn InteractionAdapter) -> Result<String, FlowError> {
    let token = prompter.ask_password("Enter your GitHub personal access token", Some(validate_token))?;
    Ok(token.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryPreferences;
    use crate::workflow::fakes::ScriptedPrompter;

    #[test]
    fn test_stash_decision_from_answer() {
        assert_eq!(StashDecision::from_answer(""), StashDecision::Declined);
        assert_eq!(StashDecision::from_answer("   "), StashDecision::Declined);
        assert_eq!(StashDecision::from_answer("."), StashDecision::Discard);
        assert_eq!(
            StashDecision::from_answer(" half done "),
            StashDecision::Stash("half done".to_string())
        );
    }

    #[test]
    fn test_validate_sprint_number() {
        assert!(validate_sprint_number("3").is_ok());
        assert_eq!(validate_sprint_number(""), Err("Please enter sprint number".to_string()));
        assert_eq!(validate_sprint_number("three"), Err("Sprint should be number".to_string()));
    }

    #[test]
    fn test_validate_issue_number() {
        assert!(validate_issue_number("42").is_ok());
        assert!(validate_issue_number("4a").is_err());
        assert!(validate_issue_number(" ").is_err());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("add login page").is_ok());
        assert!(validate_description("").is_err());
        assert!(validate_description("a - b").is_err());
    }

    #[test]
    fn test_validate_project_and_token() {
        assert!(validate_project_name("apollo").is_ok());
        assert!(validate_project_name("").is_err());
        assert!(validate_token("ghp_x").is_ok());
        assert!(validate_token("  ").is_err());
    }

    #[test]
    fn test_ask_project_and_sprint_uses_defaults() {
        let prompter = ScriptedPrompter::new(&["", ""]);
        let defaults = WorkflowConfig {
            project_name: Some("apollo".to_string()),
            sprint_number: Some("3".to_string()),
        };
        let sprint = ask_project_and_sprint(&prompter, &defaults).unwrap();
        assert_eq!(sprint, SprintRef::new("apollo", "3"));
    }

    #[test]
    fn test_ask_issue_and_feature_slugs_description() {
        let prompter = ScriptedPrompter::new(&["12", "add  login page"]);
        let (issue, slug) = ask_issue_and_feature(&prompter).unwrap();
        assert_eq!(issue, "12");
        assert_eq!(slug, "add-login-page");
    }

    #[test]
    fn test_confirm_finishing_declined_aborts() {
        let prompter = ScriptedPrompter::new(&[]).with_confirms(&[false]);
        let result = confirm_finishing(&prompter, "Are you sure?");
        assert!(matches!(result, Err(FlowError::Aborted)));
    }

    #[test]
    fn test_update_defaults_without_prompting() {
        let prompter = ScriptedPrompter::new(&[]);
        let store = MemoryPreferences::new();
        let overrides = SprintOverride::new(Some("apollo"), Some("4"));

        let sprint = update_defaults(&prompter, &store, "/work", &overrides).unwrap();

        assert_eq!(sprint, SprintRef::new("apollo", "4"));
        assert!(prompter.asked().is_empty());
        let stored = get_config(&store, "/work").unwrap();
        assert_eq!(stored.project_name.as_deref(), Some("apollo"));
        assert_eq!(stored.sprint_number.as_deref(), Some("4"));
    }

    #[test]
    fn test_update_defaults_prompts_for_missing_sprint() {
        let prompter = ScriptedPrompter::new(&["", "5"]);
        let store = MemoryPreferences::new();
        set_config(&store, "/work", "apollo", "4").unwrap();

        let sprint =
            update_defaults(&prompter, &store, "/work", &SprintOverride::default()).unwrap();

        assert_eq!(sprint, SprintRef::new("apollo", "5"));
        assert_eq!(prompter.asked(), vec!["project name", "sprint number"]);
        assert_eq!(
            get_config(&store, "/work").unwrap().sprint_number.as_deref(),
            Some("5")
        );
    }
}
