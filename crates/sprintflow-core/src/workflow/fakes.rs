//! Test doubles for the workflow collaborators

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use crate::error::FlowError;
use crate::git::{Commit, GitError, GitRunner};
use crate::github::{IssueTracker, PullRequest, PullRequestSpec};
use crate::interaction::{
    InteractionAdapter, InteractionError, InteractionResult, ProgressHandle, Validator,
};

/// Scripted git: records every call, answers from canned state
pub struct FakeGit {
    pub calls: RefCell<Vec<String>>,
    inside: bool,
    clean: Cell<bool>,
    branch: RefCell<Option<String>>,
    conflicts_left: Cell<usize>,
    log: Vec<Commit>,
    containing: HashMap<String, Vec<String>>,
    remote_url: String,
}

impl FakeGit {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            inside: true,
            clean: Cell::new(true),
            branch: RefCell::new(Some("develop".to_string())),
            conflicts_left: Cell::new(0),
            log: Vec::new(),
            containing: HashMap::new(),
            remote_url: "git@github.com:acme/rocket.git".to_string(),
        }
    }

    pub fn outside_repository(mut self) -> Self {
        self.inside = false;
        self
    }

    pub fn dirty(self) -> Self {
        self.clean.set(false);
        self
    }

    pub fn on_branch(self, branch: Option<&str>) -> Self {
        *self.branch.borrow_mut() = branch.map(str::to_string);
        self
    }

    /// Make the next `count` checkouts fail with a local-changes conflict
    pub fn with_checkout_conflicts(self, count: usize) -> Self {
        self.conflicts_left.set(count);
        self
    }

    pub fn with_log(mut self, log: Vec<Commit>) -> Self {
        self.log = log;
        self
    }

    /// Branches `git branch --contains <hash>` reports
    pub fn contained_in(mut self, hash: &str, branches: &[&str]) -> Self {
        self.containing.insert(
            hash.to_string(),
            branches.iter().map(|b| b.to_string()).collect(),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn current(&self) -> Option<String> {
        self.branch.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl GitRunner for FakeGit {
    fn is_inside_work_tree(&self) -> bool {
        self.inside
    }

    fn fetch_all(&self) -> Result<(), GitError> {
        self.record("fetch --all".to_string());
        Ok(())
    }

    fn checkout(&self, branch: &str) -> Result<(), GitError> {
        if self.conflicts_left.get() > 0 {
            self.conflicts_left.set(self.conflicts_left.get() - 1);
            self.clean.set(false);
            self.record(format!("checkout {} (conflict)", branch));
            return Err(GitError::LocalChangesConflict {
                branch: branch.to_string(),
            });
        }
        self.record(format!("checkout {}", branch));
        *self.branch.borrow_mut() = Some(branch.to_string());
        Ok(())
    }

    fn discard_changes(&self) -> Result<(), GitError> {
        self.record("reset --hard HEAD".to_string());
        self.clean.set(true);
        Ok(())
    }

    fn create_and_checkout(&self, branch: &str) -> Result<(), GitError> {
        self.record(format!("checkout -b {}", branch));
        *self.branch.borrow_mut() = Some(branch.to_string());
        Ok(())
    }

    fn reset_hard(&self, reference: &str) -> Result<(), GitError> {
        self.record(format!("reset --hard {}", reference));
        Ok(())
    }

    fn push_upstream(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        self.record(format!("push -u {} {}", remote, branch));
        Ok(())
    }

    fn stash(&self, label: &str) -> Result<(), GitError> {
        self.record(format!("stash push -m {}", label));
        self.clean.set(true);
        Ok(())
    }

    fn is_clean(&self) -> Result<bool, GitError> {
        Ok(self.clean.get())
    }

    fn current_branch(&self) -> Result<Option<String>, GitError> {
        Ok(self.branch.borrow().clone())
    }

    fn log(&self) -> Result<Vec<Commit>, GitError> {
        self.record("log".to_string());
        Ok(self.log.clone())
    }

    fn branches_containing(&self, hash: &str) -> Result<Vec<String>, GitError> {
        self.record(format!("branch --contains {}", hash));
        Ok(self.containing.get(hash).cloned().unwrap_or_default())
    }

    fn remote_url(&self, _remote: &str) -> Result<String, GitError> {
        Ok(self.remote_url.clone())
    }
}

/// Answers questions from queues; an empty queue behaves like a closed stdin
pub struct ScriptedPrompter {
    texts: RefCell<VecDeque<String>>,
    confirms: RefCell<VecDeque<bool>>,
    pub asked: RefCell<Vec<String>>,
    pub messages: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(texts: &[&str]) -> Self {
        Self {
            texts: RefCell::new(texts.iter().map(|s| s.to_string()).collect()),
            confirms: RefCell::new(VecDeque::new()),
            asked: RefCell::new(Vec::new()),
            messages: RefCell::new(Vec::new()),
        }
    }

    pub fn with_confirms(self, confirms: &[bool]) -> Self {
        self.confirms.borrow_mut().extend(confirms.iter().copied());
        self
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    fn answer(&self, prompt: &str, default: Option<&str>, validator: Option<Validator>) -> InteractionResult<String> {
        self.asked.borrow_mut().push(prompt.to_string());
        let raw = self
            .texts
            .borrow_mut()
            .pop_front()
            .ok_or(InteractionError::NonTty)?;
        let answer = match default {
            Some(d) if raw.is_empty() => d.to_string(),
            _ => raw,
        };
        if let Some(validate) = validator {
            validate(&answer).map_err(InteractionError::InvalidInput)?;
        }
        Ok(answer)
    }
}

impl InteractionAdapter for ScriptedPrompter {
    fn ask_text(
        &self,
        prompt: &str,
        default: Option<&str>,
        validator: Option<Validator>,
    ) -> InteractionResult<String> {
        self.answer(prompt, default, validator)
    }

    fn ask_confirm(&self, prompt: &str, _default: bool) -> InteractionResult<bool> {
        self.asked.borrow_mut().push(prompt.to_string());
        self.confirms
            .borrow_mut()
            .pop_front()
            .ok_or(InteractionError::NonTty)
    }

    fn ask_password(&self, prompt: &str, validator: Option<Validator>) -> InteractionResult<String> {
        self.answer(prompt, None, validator)
    }

    fn start_progress(&self, message: &str) -> ProgressHandle {
        ProgressHandle::new(0, message)
    }

    fn end_progress(&self, _handle: ProgressHandle, _success: bool) {}

    fn print_info(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn print_warning(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn print_success(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// Issue tracker that records pull requests instead of sending them
pub struct RecordingTracker {
    token_valid: bool,
    pub created: RefCell<Vec<PullRequestSpec>>,
    pub validated: RefCell<Vec<String>>,
}

impl RecordingTracker {
    pub fn new() -> Self {
        Self {
            token_valid: true,
            created: RefCell::new(Vec::new()),
            validated: RefCell::new(Vec::new()),
        }
    }

    pub fn rejecting_tokens() -> Self {
        Self {
            token_valid: false,
            ..Self::new()
        }
    }

    pub fn created(&self) -> Vec<PullRequestSpec> {
        self.created.borrow().clone()
    }
}

impl IssueTracker for RecordingTracker {
    fn validate_token(&self, token: &str) -> Result<bool, FlowError> {
        self.validated.borrow_mut().push(token.to_string());
        Ok(self.token_valid)
    }

    fn create_pull_request(
        &self,
        _token: &str,
        spec: &PullRequestSpec,
    ) -> Result<PullRequest, FlowError> {
        self.created.borrow_mut().push(spec.clone());
        let number = self.created.borrow().len() as u64;
        Ok(PullRequest {
            number,
            html_url: format!("https://github.com/{}/{}/pull/{}", spec.owner, spec.repo, number),
        })
    }
}
