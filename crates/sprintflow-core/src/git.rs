//! Version-control command runner
//!
//! [`GitRunner`] is the fixed vocabulary of git operations the workflow
//! needs. [`GitCli`] implements it by shelling out to `git -C <root>`.

use std::path::PathBuf;
use std::process::{Command, Output};

use thiserror::Error;
use tracing::debug;

/// Text git prints when a checkout would clobber uncommitted work
pub const LOCAL_CHANGES_CONFLICT: &str =
    "Your local changes to the following files would be overwritten by checkout";

/// Discriminated git failure
#[derive(Error, Debug)]
pub enum GitError {
    /// Checkout refused because local changes would be overwritten
    #[error("checkout of {branch} refused: local changes would be overwritten")]
    LocalChangesConflict { branch: String },

    /// Any other non-zero exit
    #[error("Command '{command}' failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// The git binary could not be started
    #[error("failed to run git: {0}")]
    Unavailable(#[from] std::io::Error),
}

/// One entry of `git log`, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub subject: String,
}

/// `{owner, repo}` of the default remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepo {
    pub owner: String,
    pub repo: String,
}

/// Parse the owner and repository out of a remote URL.
///
/// Works for github, gitlab and bitbucket style URLs:
/// - `https://github.com/owner/repo.git`
/// - `git@github.com:owner/repo.git`
pub fn parse_remote_url(url: &str) -> Option<RemoteRepo> {
    let url = url.trim();
    let path = if url.contains("://") {
        let mut segments = url.trim_end_matches('/').rsplitn(3, '/');
        let repo = segments.next()?;
        let owner = segments.next()?;
        segments.next()?;
        format!("{}/{}", owner, repo)
    } else {
        let (_, path) = url.split_once(':')?;
        path.to_string()
    };

    let (owner, repo) = path.split_once('/')?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }

    Some(RemoteRepo {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

/// The git operations the workflow depends on
pub trait GitRunner {
    /// `git rev-parse --is-inside-work-tree`
    fn is_inside_work_tree(&self) -> bool;

    /// `git fetch --all`
    fn fetch_all(&self) -> Result<(), GitError>;

    /// `git checkout <branch>`; classifies the local-changes conflict
    fn checkout(&self, branch: &str) -> Result<(), GitError>;

    /// `git reset --hard HEAD`: drop staged and unstaged edits to tracked files
    fn discard_changes(&self) -> Result<(), GitError>;

    /// `git checkout -b <branch>`
    fn create_and_checkout(&self, branch: &str) -> Result<(), GitError>;

    /// `git reset --hard <reference>`
    fn reset_hard(&self, reference: &str) -> Result<(), GitError>;

    /// `git push -u <remote> <branch>`
    fn push_upstream(&self, remote: &str, branch: &str) -> Result<(), GitError>;

    /// `git stash push -m <label>`
    fn stash(&self, label: &str) -> Result<(), GitError>;

    /// True when tracked files have no staged or unstaged modifications
    fn is_clean(&self) -> Result<bool, GitError>;

    /// Current branch name, `None` when HEAD is detached
    fn current_branch(&self) -> Result<Option<String>, GitError>;

    /// Commit log of the current branch, newest first
    fn log(&self) -> Result<Vec<Commit>, GitError>;

    /// Local branches containing `hash`
    fn branches_containing(&self, hash: &str) -> Result<Vec<String>, GitError>;

    /// Configured URL of `remote`
    fn remote_url(&self, remote: &str) -> Result<String, GitError>;
}

/// Git CLI wrapper rooted at a working directory
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `git rev-parse --show-toplevel`
    pub fn repository_root(&self) -> Result<PathBuf, GitError> {
        let stdout = self.run(&["rev-parse", "--show-toplevel"])?;
        Ok(PathBuf::from(stdout.trim()))
    }

    fn output(&self, args: &[&str]) -> Result<Output, GitError> {
        debug!(?args, root = %self.root.display(), "git");
        // Conflict detection matches git's English stderr
        Ok(Command::new("git")
            .env("LC_ALL", "C")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()?)
    }

    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(Self::failure(args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn failure(args: &[&str], output: &Output) -> GitError {
        GitError::CommandFailed {
            command: format!("git {}", args.join(" ")),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

impl GitRunner for GitCli {
    fn is_inside_work_tree(&self) -> bool {
        self.run(&["rev-parse", "--is-inside-work-tree"])
            .map(|out| out.trim() == "true")
            .unwrap_or(false)
    }

    fn fetch_all(&self) -> Result<(), GitError> {
        self.run(&["fetch", "--all"]).map(|_| ())
    }

    fn checkout(&self, branch: &str) -> Result<(), GitError> {
        let args = ["checkout", branch];
        let output = self.output(&args)?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains(LOCAL_CHANGES_CONFLICT) {
            return Err(GitError::LocalChangesConflict {
                branch: branch.to_string(),
            });
        }
        Err(Self::failure(&args, &output))
    }

    fn discard_changes(&self) -> Result<(), GitError> {
        self.run(&["reset", "--hard", "HEAD"]).map(|_| ())
    }

    fn create_and_checkout(&self, branch: &str) -> Result<(), GitError> {
        self.run(&["checkout", "-b", branch]).map(|_| ())
    }

    fn reset_hard(&self, reference: &str) -> Result<(), GitError> {
        self.run(&["reset", "--hard", reference]).map(|_| ())
    }

    fn push_upstream(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        self.run(&["push", "-u", remote, branch]).map(|_| ())
    }

    fn stash(&self, label: &str) -> Result<(), GitError> {
        self.run(&["stash", "push", "-m", label]).map(|_| ())
    }

    fn is_clean(&self) -> Result<bool, GitError> {
        let stdout = self.run(&["status", "--porcelain", "--untracked-files=no"])?;
        Ok(stdout.trim().is_empty())
    }

    fn current_branch(&self) -> Result<Option<String>, GitError> {
        let stdout = self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let branch = stdout.trim();
        if branch.is_empty() || branch == "HEAD" {
            Ok(None)
        } else {
            Ok(Some(branch.to_string()))
        }
    }

    fn log(&self) -> Result<Vec<Commit>, GitError> {
        let stdout = self.run(&["log", "--format=%H%x09%s"])?;
        Ok(stdout
            .lines()
            .filter_map(|line| {
                let (hash, subject) = line.split_once('\t').unwrap_or((line, ""));
                if hash.is_empty() {
                    return None;
                }
                Some(Commit {
                    hash: hash.to_string(),
                    subject: subject.to_string(),
                })
            })
            .collect())
    }

    fn branches_containing(&self, hash: &str) -> Result<Vec<String>, GitError> {
        let stdout = self.run(&["branch", "--contains", hash])?;
        Ok(parse_branch_list(&stdout))
    }

    fn remote_url(&self, remote: &str) -> Result<String, GitError> {
        let key = format!("remote.{}.url", remote);
        let stdout = self.run(&["config", "--get", &key])?;
        Ok(stdout.trim().to_string())
    }
}

/// Parse `git branch` output, dropping the `*`/`+` markers
fn parse_branch_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(|line| line.trim_start_matches(['*', '+']).trim())
        .filter(|name| !name.is_empty() && !name.starts_with('('))
        .map(str::to_string)
        .collect()
}
