//! Workflow orchestrator
//!
//! Every lifecycle operation runs the same pre-flight (inside a work tree,
//! clean tree or stash/discard, project and sprint resolution) and then a
//! fixed sequence of git and tracker calls. The only automatic recovery is a
//! single retry after a checkout refused because of local changes.

mod finish;
mod start;
pub mod sprint_log;

#[cfg(test)]
pub(crate) mod fakes;

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::branch::{BranchName, SprintRef};
use crate::config::FlowSettings;
use crate::error::FlowError;
use crate::git::{GitRunner, parse_remote_url};
use crate::github::{IssueTracker, PullRequest, PullRequestSpec};
use crate::interaction::InteractionAdapter;
use crate::preferences::{PreferencesStore, TOKEN_KEY, WorkflowConfig, get_config};
use crate::prompts::{
    self, DEFAULT_STASH_LABEL, StashDecision, validate_project_name, validate_sprint_number,
};

/// The six lifecycle operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    StartFeature,
    StartHotfix,
    StartSprint,
    FinishFeature,
    FinishHotfix,
    FinishSprint,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::StartFeature => "start-feature",
            Operation::StartHotfix => "start-hotfix",
            Operation::StartSprint => "start-sprint",
            Operation::FinishFeature => "finish-feature",
            Operation::FinishHotfix => "finish-hotfix",
            Operation::FinishSprint => "finish-sprint",
        };
        f.write_str(name)
    }
}

/// What an operation did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowOutcome {
    pub operation: Operation,
    /// Branch created (start) or finished (finish)
    pub branch: String,
    pub base_branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<PullRequest>,
    /// Branch left checked out
    pub checked_out: String,
}

/// Per-invocation project/sprint override
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SprintOverride {
    pub project: Option<String>,
    pub sprint: Option<String>,
}

impl SprintOverride {
    pub fn new(project: Option<&str>, sprint: Option<&str>) -> Self {
        Self {
            project: project.map(str::to_string),
            sprint: sprint.map(str::to_string),
        }
    }

    /// Both values present and well-formed
    pub fn complete(&self) -> Option<SprintRef> {
        let project = self.project.as_deref()?.trim();
        let sprint = self.sprint.as_deref()?.trim();
        if validate_project_name(project).is_ok() && validate_sprint_number(sprint).is_ok() {
            Some(SprintRef::new(project, sprint))
        } else {
            None
        }
    }
}

/// External collaborators of the orchestrator
pub struct Collaborators<'a> {
    pub git: &'a dyn GitRunner,
    pub prompter: &'a dyn InteractionAdapter,
    pub preferences: &'a dyn PreferencesStore,
    pub tracker: &'a dyn IssueTracker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Retry,
}

/// Drives the lifecycle operations against injected collaborators
pub struct Workflow<'a> {
    git: &'a dyn GitRunner,
    prompter: &'a dyn InteractionAdapter,
    preferences: &'a dyn PreferencesStore,
    tracker: &'a dyn IssueTracker,
    settings: FlowSettings,
    workdir: String,
    assume_yes: bool,
}

impl<'a> Workflow<'a> {
    /// `workdir` keys the stored project/sprint defaults
    pub fn new(collaborators: Collaborators<'a>, settings: FlowSettings, workdir: impl Into<String>) -> Self {
        Self {
            git: collaborators.git,
            prompter: collaborators.prompter,
            preferences: collaborators.preferences,
            tracker: collaborators.tracker,
            settings,
            workdir: workdir.into(),
            assume_yes: false,
        }
    }

    /// Answer confirmations with yes, accept stored defaults, stash as `wip`
    pub fn assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    pub fn settings(&self) -> &FlowSettings {
        &self.settings
    }

    // === Pre-flight ===

    /// Inside a work tree, and local changes dealt with
    fn preflight(&self, operation: Operation) -> Result<(), FlowError> {
        debug!(%operation, "pre-flight");
        if !self.git.is_inside_work_tree() {
            return Err(FlowError::NotAGitRepository);
        }
        self.check_clean()?;
        Ok(())
    }

    fn check_clean(&self) -> Result<StashDecision, FlowError> {
        if self.git.is_clean()? {
            return Ok(StashDecision::Clean);
        }
        self.resolve_dirty_tree()
    }

    /// Ask for a stash label and stash, discard, or abort accordingly
    fn resolve_dirty_tree(&self) -> Result<StashDecision, FlowError> {
        let decision = if self.assume_yes {
            StashDecision::Stash(DEFAULT_STASH_LABEL.to_string())
        } else {
            prompts::ask_stash_label(self.prompter)?
        };

        match &decision {
            StashDecision::Clean => {}
            StashDecision::Declined => return Err(FlowError::Aborted),
            StashDecision::Discard => {
                self.git.discard_changes()?;
                self.prompter.print_info("local changes discarded");
            }
            StashDecision::Stash(label) => {
                self.git.stash(label)?;
                self.prompter
                    .print_info(&format!("local changes stashed as \"{}\"", label));
            }
        }
        info!(?decision, "working tree resolved");
        Ok(decision)
    }

    /// Project and sprint from the override, stored defaults, and the user
    fn resolve_sprint(&self, overrides: &SprintOverride) -> Result<SprintRef, FlowError> {
        if let Some(sprint) = overrides.complete() {
            return Ok(sprint);
        }

        let stored = get_config(self.preferences, &self.workdir)?;
        let defaults = WorkflowConfig {
            project_name: overrides.project.clone().or(stored.project_name),
            sprint_number: overrides.sprint.clone().or(stored.sprint_number),
        };

        if self.assume_yes {
            let candidate = SprintOverride {
                project: defaults.project_name.clone(),
                sprint: defaults.sprint_number.clone(),
            };
            if let Some(sprint) = candidate.complete() {
                return Ok(sprint);
            }
        }

        prompts::ask_project_and_sprint(self.prompter, &defaults)
    }

    fn confirm(&self, message: &str) -> Result<(), FlowError> {
        if self.assume_yes {
            return Ok(());
        }
        prompts::confirm_finishing(self.prompter, message)
    }

    fn require_current_branch(&self) -> Result<String, FlowError> {
        self.git.current_branch()?.ok_or(FlowError::DetachedHead)
    }

    /// Feature branches fork from their sprint, except in the maintenance project
    fn feature_base(&self, sprint: &SprintRef) -> String {
        if sprint.project == self.settings.maintenance_project {
            self.settings.develop_branch.clone()
        } else {
            BranchName::sprint(sprint).to_string()
        }
    }

    // === Version control sequences ===

    fn remote_ref(&self, branch: &str) -> String {
        format!("{}/{}", self.settings.remote, branch)
    }

    /// Check out `branch` and reset it to its remote-tracking ref
    fn sync_to_remote(&self, branch: &str) -> Result<(), FlowError> {
        self.git.checkout(branch)?;
        self.git.reset_hard(&self.remote_ref(branch))?;
        Ok(())
    }

    fn push(&self, branch: &str) -> Result<(), FlowError> {
        self.git.push_upstream(&self.settings.remote, branch)?;
        Ok(())
    }

    /// Run `work`; if a checkout inside it hits conflicting local changes,
    /// resolve the tree and run it exactly once more.
    fn with_conflict_retry<T>(
        &self,
        step: &str,
        mut work: impl FnMut() -> Result<T, FlowError>,
    ) -> Result<T, FlowError> {
        let mut attempt = Attempt::First;
        loop {
            match work() {
                Err(err) if err.is_local_changes_conflict() && attempt == Attempt::First => {
                    warn!(step, "checkout blocked by local changes");
                    self.resolve_dirty_tree()?;
                    attempt = Attempt::Retry;
                }
                result => return result,
            }
        }
    }

    /// Fetch, then move onto `base` at its remote tip
    fn return_to(&self, base: &str) -> Result<(), FlowError> {
        self.git.fetch_all()?;
        self.with_conflict_retry("return to base", || self.sync_to_remote(base))?;
        self.prompter
            .print_success(&format!("switched to branch {}", base));
        Ok(())
    }

    // === Issue tracker ===

    /// Cached token, checked against the tracker before any mutating call
    fn authorize(&self) -> Result<String, FlowError> {
        let token = self
            .preferences
            .get(TOKEN_KEY)?
            .ok_or(FlowError::TokenMissing)?;

        let progress = self.prompter.start_progress("Validating token");
        let valid = self.tracker.validate_token(&token);
        self.prompter
            .end_progress(progress, matches!(valid, Ok(true)));

        if valid? {
            Ok(token)
        } else {
            Err(FlowError::TokenInvalid)
        }
    }

    fn open_pull_request(&self, head: &str, base: &str, body: String) -> Result<PullRequest, FlowError> {
        let url = self.git.remote_url(&self.settings.remote)?;
        let remote = parse_remote_url(&url).ok_or(FlowError::RemoteUrl { url })?;
        let token = self.authorize()?;

        let spec = PullRequestSpec {
            owner: remote.owner,
            repo: remote.repo,
            title: head.to_string(),
            head: head.to_string(),
            base: base.to_string(),
            body,
        };

        let progress = self.prompter.start_progress("Creating pull request");
        let created = self.tracker.create_pull_request(&token, &spec);
        self.prompter.end_progress(progress, created.is_ok());
        let pull_request = created?;

        info!(number = pull_request.number, head, base, "pull request created");
        self.prompter.print_success(&format!(
            "pull request created successfully at {}",
            pull_request.html_url
        ));
        Ok(pull_request)
    }
}
