//! start-feature, start-hotfix and start-sprint

use tracing::debug;

use super::{FlowOutcome, Operation, SprintOverride, Workflow};
use crate::branch::{BranchName, parse_issue_branch_arg};
use crate::error::FlowError;
use crate::prompts;

impl Workflow<'_> {
    /// Fork `{project}-sprint-{n}/{issue}-{slug}` from the sprint branch
    pub fn start_feature(
        &self,
        branch_arg: Option<&str>,
        overrides: &SprintOverride,
    ) -> Result<FlowOutcome, FlowError> {
        self.preflight(Operation::StartFeature)?;
        let sprint = self.resolve_sprint(overrides)?;
        let (issue_number, slug) = match branch_arg.and_then(parse_issue_branch_arg) {
            Some(parsed) => parsed,
            None => prompts::ask_issue_and_feature(self.prompter)?,
        };

        let base = self.feature_base(&sprint);
        let target = BranchName::feature(&sprint, &issue_number, &slug).to_string();
        self.start_branch(Operation::StartFeature, "feature", &base, &target)
    }

    /// Fork `hotfix/{issue}-{slug}` from the production branch
    pub fn start_hotfix(&self, branch_arg: Option<&str>) -> Result<FlowOutcome, FlowError> {
        self.preflight(Operation::StartHotfix)?;
        let (issue_number, slug) = match branch_arg.and_then(parse_issue_branch_arg) {
            Some(parsed) => parsed,
            None => prompts::ask_issue_and_hotfix(self.prompter)?,
        };

        let base = self.settings.production_branch.clone();
        let target = BranchName::hotfix(&issue_number, &slug).to_string();
        self.start_branch(Operation::StartHotfix, "hotfix", &base, &target)
    }

    /// Fork `{project}/sprint-{n}` from the develop branch
    pub fn start_sprint(
        &self,
        project: Option<&str>,
        sprint: Option<&str>,
    ) -> Result<FlowOutcome, FlowError> {
        self.preflight(Operation::StartSprint)?;
        let sprint = self.resolve_sprint(&SprintOverride::new(project, sprint))?;

        let base = self.settings.develop_branch.clone();
        let target = BranchName::sprint(&sprint).to_string();
        self.start_branch(Operation::StartSprint, "sprint", &base, &target)
    }

    /// fetch, reset `base` to its remote tip, branch off, push with upstream
    fn start_branch(
        &self,
        operation: Operation,
        kind: &str,
        base: &str,
        target: &str,
    ) -> Result<FlowOutcome, FlowError> {
        debug!(%operation, base, target, "starting branch");
        self.git.fetch_all()?;
        self.with_conflict_retry(kind, || {
            self.sync_to_remote(base)?;
            self.git.create_and_checkout(target)?;
            self.push(target)
        })?;

        self.prompter
            .print_success(&format!("{} branch created successfully: {}", kind, target));
        Ok(FlowOutcome {
            operation,
            branch: target.to_string(),
            base_branch: base.to_string(),
            pull_request: None,
            checked_out: target.to_string(),
        })
    }
}
