//! Discover which issues a sprint branch closed
//!
//! Walks the sprint branch log newest to oldest, stopping at the first commit
//! the develop branch already contains. Every merged pull request on the way
//! contributes one `Closes #{issue} - {name}` line.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::branch::to_issue_number_and_name;
use crate::error::FlowError;
use crate::git::{Commit, GitRunner};

static MERGE_PULL_REQUEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Merge pull request #\d+ from (\S+)").expect("valid merge pull request regex")
});

/// Trailing path segment of the merged branch in a merge-pull-request subject
pub fn merged_branch_segment(subject: &str) -> Option<&str> {
    let caps = MERGE_PULL_REQUEST.captures(subject)?;
    let source = caps.get(1)?.as_str();
    source.rsplit('/').next().filter(|s| !s.is_empty())
}

/// `Closes` line for one commit, if it merged a branch this tool created
fn closes_line(commit: &Commit) -> Option<String> {
    let segment = merged_branch_segment(&commit.subject)?;
    match to_issue_number_and_name(segment, None) {
        Ok(issue) => Some(format!("Closes #{} - {}", issue.issue_number, issue.issue_name)),
        Err(_) => {
            warn!(hash = %commit.hash, segment, "skipping merge of a branch without an issue number");
            None
        }
    }
}

/// Collect `Closes` lines for the currently checked-out sprint branch
pub fn closed_issue_lines(git: &dyn GitRunner, develop_branch: &str) -> Result<Vec<String>, FlowError> {
    let mut lines = Vec::new();
    for commit in git.log()? {
        let branches = git.branches_containing(&commit.hash)?;
        if branches.iter().any(|b| b == develop_branch) {
            debug!(hash = %commit.hash, "reached history shared with {}", develop_branch);
            break;
        }
        if let Some(line) = closes_line(&commit) {
            lines.push(line);
        }
    }
    Ok(lines)
}
