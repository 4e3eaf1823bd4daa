//! CLI command implementations

pub mod config;
pub mod flow;
pub mod token;

use std::env;

use anyhow::Context;
use serde::Serialize;
use sprintflow_core::{
    Collaborators, Config, FilePreferences, FlowError, GitCli, GitHubClient, GitRunner, Workflow,
};
use tracing::debug;

use crate::interaction::CliAdapter;
use crate::output::JsonResponse;

pub use config::{run_get_config, run_set_config};
pub use flow::{
    run_finish_feature, run_finish_hotfix, run_finish_sprint, run_start_feature, run_start_hotfix,
    run_start_sprint,
};
pub use token::{run_generate_token, run_remove_token};

/// Global flags shared by every command
#[derive(Debug, Clone, Copy, Default)]
pub struct Flags {
    pub json: bool,
    pub quiet: bool,
    pub yes: bool,
}

/// Everything a command needs, opened from the current directory
pub struct Session {
    pub git: GitCli,
    pub config: Config,
    pub preferences: FilePreferences,
    pub tracker: GitHubClient,
    pub prompter: CliAdapter,
    /// Current directory, keys the stored defaults
    pub workdir: String,
}

impl Session {
    pub fn open(flags: Flags) -> anyhow::Result<Self> {
        let cwd = env::current_dir().context("cannot determine the current directory")?;
        let git = GitCli::new(&cwd);

        // Outside a repository the workflow itself reports the error
        let config = if git.is_inside_work_tree() {
            let root = git.repository_root()?;
            Config::load(&root).with_context(|| format!("loading project settings in {}", root.display()))?
        } else {
            Config::default()
        };

        let preferences = FilePreferences::open_default()?;
        let tracker = GitHubClient::new(&config.github.api_url)?;
        debug!(cwd = %cwd.display(), preferences = %preferences.path().display(), "session opened");

        Ok(Self {
            git,
            config,
            preferences,
            tracker,
            prompter: CliAdapter::new(flags.quiet || flags.json),
            workdir: cwd.display().to_string(),
        })
    }

    pub fn workflow(&self, flags: Flags) -> Workflow<'_> {
        let collaborators = Collaborators {
            git: &self.git,
            prompter: &self.prompter,
            preferences: &self.preferences,
            tracker: &self.tracker,
        };
        Workflow::new(collaborators, self.config.flow.clone(), self.workdir.clone())
            .assume_yes(flags.yes)
    }
}

/// Open a session, flattening setup failures into the handler error string
fn open_session(flags: Flags) -> Result<Session, String> {
    Session::open(flags).map_err(|e| format!("{:#}", e))
}

/// Turn a command result into an exit code, printing as the flags ask
///
/// `on_success` prints the human-readable result; JSON mode prints `data`
/// instead.
fn finish<T: Serialize>(
    command: &str,
    result: Result<T, FlowError>,
    flags: Flags,
    on_success: impl FnOnce(&T),
) -> Result<i32, String> {
    match result {
        Ok(data) => {
            if flags.json {
                JsonResponse::ok(command, data).print();
            } else if !flags.quiet {
                on_success(&data);
            }
            Ok(0)
        }
        Err(err) => Ok(report(command, &err, flags)),
    }
}

/// Print an error (or the abort notice) and return its exit code
fn report(command: &str, err: &FlowError, flags: Flags) -> i32 {
    debug!(command, code = err.code(), "command failed");
    if flags.json {
        JsonResponse::<()>::error(command, err).print();
    } else if matches!(err, FlowError::Aborted) {
        if !flags.quiet {
            println!("{}", err);
        }
    } else {
        eprintln!("error: {}", err);
    }
    err.exit_code()
}
