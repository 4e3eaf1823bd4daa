//! Branch-name derivation and parsing
//!
//! Canonical shapes:
//! - sprint: `{project}/sprint-{number}`
//! - feature: `{project}-sprint-{number}/{issue}-{slug}`
//! - hotfix: `hotfix/{issue}-{slug}`
//!
//! Merged branches from before the sprint prefix (`{issue}-{slug}`) are only
//! parsed, never created.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::FlowError;

/// Separator used inside slugs
pub const SEPARATOR: char = '-';

/// Prefix of every hotfix branch
pub const HOTFIX_PREFIX: &str = "hotfix/";

static ISSUE_BRANCH_ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-(.+)$").expect("valid issue branch regex"));

/// Issue reference recovered from a branch name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub issue_number: String,
    pub issue_name: String,
}

/// Collapse every run of spaces into a single dash.
///
/// No other character is touched, so `to_slug(to_slug(x)) == to_slug(x)`.
pub fn to_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_was_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                slug.push(SEPARATOR);
            }
            last_was_space = true;
        } else {
            slug.push(c);
            last_was_space = false;
        }
    }
    slug
}

/// Replace dashes with spaces, for display only
pub fn to_space_case(slug: &str) -> String {
    slug.replace(SEPARATOR, " ")
}

/// True if `slug` is non-empty and never repeats the separator
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.contains("--")
}

/// Recover `{issue_number, issue_name}` from a branch this tool created.
///
/// `prefix` is stripped first when the branch carries it. The remainder must
/// be `{digits}-{name}` with a non-empty name.
pub fn to_issue_number_and_name(branch: &str, prefix: Option<&str>) -> Result<IssueRef, FlowError> {
    let remainder = match prefix {
        Some(p) => branch.strip_prefix(p).unwrap_or(branch),
        None => branch,
    };

    let invalid = || FlowError::InvalidBranchName {
        branch: branch.to_string(),
    };

    let (issue_number, rest) = remainder.split_once(SEPARATOR).unwrap_or((remainder, ""));
    if issue_number.is_empty() || !issue_number.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let slug = rest
        .split(SEPARATOR)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string());
    let issue_name = to_space_case(&slug);
    if issue_name.is_empty() {
        return Err(invalid());
    }

    Ok(IssueRef {
        issue_number: issue_number.to_string(),
        issue_name,
    })
}

/// Split a `{digits}-{rest}` command argument into issue number and slug.
///
/// Returns `None` when the argument does not match, in which case the caller
/// falls back to asking.
pub fn parse_issue_branch_arg(arg: &str) -> Option<(String, String)> {
    let caps = ISSUE_BRANCH_ARG.captures(arg.trim())?;
    let slug = to_slug(&caps[2]);
    if !is_valid_slug(&slug) {
        return None;
    }
    Some((caps[1].to_string(), slug))
}

/// Project and sprint a sprint/feature branch belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprintRef {
    pub project: String,
    pub sprint: String,
}

impl SprintRef {
    pub fn new(project: impl Into<String>, sprint: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            sprint: sprint.into(),
        }
    }

    /// Prefix of every feature branch in this sprint
    pub fn feature_prefix(&self) -> String {
        format!("{}-sprint-{}/", self.project, self.sprint)
    }
}

/// A branch name in one of the canonical shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchName {
    Sprint(SprintRef),
    Feature {
        sprint: SprintRef,
        issue_number: String,
        slug: String,
    },
    Hotfix {
        issue_number: String,
        slug: String,
    },
}

impl BranchName {
    pub fn sprint(sprint: &SprintRef) -> Self {
        BranchName::Sprint(sprint.clone())
    }

    pub fn feature(sprint: &SprintRef, issue_number: &str, slug: &str) -> Self {
        BranchName::Feature {
            sprint: sprint.clone(),
            issue_number: issue_number.to_string(),
            slug: slug.to_string(),
        }
    }

    pub fn hotfix(issue_number: &str, slug: &str) -> Self {
        BranchName::Hotfix {
            issue_number: issue_number.to_string(),
            slug: slug.to_string(),
        }
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchName::Sprint(s) => write!(f, "{}/sprint-{}", s.project, s.sprint),
            BranchName::Feature {
                sprint,
                issue_number,
                slug,
            } => write!(f, "{}{}-{}", sprint.feature_prefix(), issue_number, slug),
            BranchName::Hotfix { issue_number, slug } => {
                write!(f, "{}{}-{}", HOTFIX_PREFIX, issue_number, slug)
            }
        }
    }
}
