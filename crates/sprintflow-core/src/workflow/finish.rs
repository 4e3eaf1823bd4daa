//! finish-feature, finish-hotfix and finish-sprint

use tracing::{debug, warn};

use super::sprint_log::closed_issue_lines;
use super::{FlowOutcome, Operation, SprintOverride, Workflow};
use crate::branch::{BranchName, HOTFIX_PREFIX, to_issue_number_and_name};
use crate::error::FlowError;

impl Workflow<'_> {
    /// Push the current feature branch, open a pull request into its sprint,
    /// and return to the sprint branch
    pub fn finish_feature(&self, overrides: &SprintOverride) -> Result<FlowOutcome, FlowError> {
        self.preflight(Operation::FinishFeature)?;
        let branch = self.require_current_branch()?;
        let sprint = self.resolve_sprint(overrides)?;
        let base = self.feature_base(&sprint);
        self.confirm(&format!("Are you sure you finished {} of {}", branch, base))?;

        self.push(&branch)?;
        let issue = to_issue_number_and_name(&branch, Some(&sprint.feature_prefix()))?;
        let pull_request =
            self.open_pull_request(&branch, &base, format!("Closes #{}", issue.issue_number))?;

        self.return_to(&base)?;
        Ok(FlowOutcome {
            operation: Operation::FinishFeature,
            branch,
            base_branch: base.clone(),
            pull_request: Some(pull_request),
            checked_out: base,
        })
    }

    /// Push the current hotfix branch, open a pull request into the
    /// production branch, and return to it
    pub fn finish_hotfix(&self) -> Result<FlowOutcome, FlowError> {
        self.preflight(Operation::FinishHotfix)?;
        let branch = self.require_current_branch()?;
        let issue = to_issue_number_and_name(&branch, Some(HOTFIX_PREFIX))?;
        let base = self.settings.production_branch.clone();
        self.confirm(&format!("Are you sure you finished {} of {}", branch, base))?;

        self.push(&branch)?;
        let pull_request =
            self.open_pull_request(&branch, &base, format!("Closes #{}", issue.issue_number))?;

        self.return_to(&base)?;
        Ok(FlowOutcome {
            operation: Operation::FinishHotfix,
            branch,
            base_branch: base.clone(),
            pull_request: Some(pull_request),
            checked_out: base,
        })
    }

    /// Open a pull request from the sprint branch into develop listing every
    /// issue the sprint closed
    pub fn finish_sprint(&self, overrides: &SprintOverride) -> Result<FlowOutcome, FlowError> {
        self.preflight(Operation::FinishSprint)?;
        let sprint = self.resolve_sprint(overrides)?;
        self.confirm(&format!(
            "Are you sure you finished sprint {} of {}",
            sprint.sprint, sprint.project
        ))?;

        let branch = BranchName::sprint(&sprint).to_string();
        let develop = self.settings.develop_branch.clone();

        self.git.fetch_all()?;
        self.with_conflict_retry("refresh sprint", || {
            self.sync_to_remote(&develop)?;
            self.sync_to_remote(&branch)
        })?;

        let lines = closed_issue_lines(self.git, &develop)?;
        if lines.is_empty() {
            warn!(%branch, "no merged pull requests found on the sprint branch");
            self.prompter.print_warning(&format!(
                "no merged feature branches found on {}, the pull request body is empty",
                branch
            ));
        }
        debug!(count = lines.len(), "issues closed by sprint");
        let pull_request = self.open_pull_request(&branch, &develop, lines.join("\n"))?;

        self.with_conflict_retry("return to develop", || self.sync_to_remote(&develop))?;
        self.prompter
            .print_success(&format!("switched to branch {}", develop));
        Ok(FlowOutcome {
            operation: Operation::FinishSprint,
            branch,
            base_branch: develop.clone(),
            pull_request: Some(pull_request),
            checked_out: develop,
        })
    }
}
