//! CLI argument parsing with clap derive

use clap::{Parser, Subcommand};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// sprintflow - sprint, feature and hotfix branches on top of git
#[derive(Parser)]
#[command(name = "sprintflow")]
#[command(version = VERSION)]
#[command(about = "Sprint, feature and hotfix branching automation on top of git")]
#[command(long_about = "sprintflow creates and finishes sprint, feature and hotfix branches with consistent names.\n\nBranch names:\n  {project}/sprint-{n}                      sprint branch (forks from develop)\n  {project}-sprint-{n}/{issue}-{feature}    feature branch (forks from the sprint)\n  hotfix/{issue}-{description}              hotfix branch (forks from master)\n\nFinishing a branch pushes it and opens a pull request on GitHub.")]
pub struct Cli {
    /// Increase output verbosity (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Answer yes to confirmations, accept stored defaults, stash as "wip"
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a feature branch off the current sprint
    #[command(long_about = "Start a feature branch off the current sprint.\n\nCreates {project}-sprint-{n}/{issue}-{feature} from the remote tip of the sprint branch and pushes it.\nFeatures of the maintenance project fork from develop instead.")]
    StartFeature {
        /// Branch as {issue}-{feature}; asked for when missing or malformed
        branch: Option<String>,

        /// Project name (skips the question together with --sprint)
        #[arg(long)]
        project: Option<String>,

        /// Sprint number
        #[arg(long)]
        sprint: Option<String>,
    },

    /// Start a hotfix branch off master
    StartHotfix {
        /// Branch as {issue}-{description}; asked for when missing or malformed
        branch: Option<String>,
    },

    /// Start a sprint branch off develop
    StartSprint {
        /// Project name
        project: Option<String>,

        /// Sprint number
        sprint: Option<String>,
    },

    /// Push the current feature branch and open a pull request into its sprint
    FinishFeature {
        /// Project name (skips the question together with --sprint)
        #[arg(long)]
        project: Option<String>,

        /// Sprint number
        #[arg(long)]
        sprint: Option<String>,
    },

    /// Push the current hotfix branch and open a pull request into master
    FinishHotfix,

    /// Open a pull request from the sprint branch into develop
    #[command(long_about = "Open a pull request from the sprint branch into develop.\n\nThe pull request body lists \"Closes #{issue} - {name}\" for every feature merged into the sprint since it left develop.")]
    FinishSprint {
        /// Project name (skips the question together with --sprint)
        #[arg(long)]
        project: Option<String>,

        /// Sprint number
        #[arg(long)]
        sprint: Option<String>,
    },

    /// Show the stored project and sprint defaults for this directory
    GetConfig,

    /// Store project and sprint defaults for this directory
    SetConfig {
        /// Project name
        #[arg(long)]
        project: Option<String>,

        /// Sprint number
        #[arg(long)]
        sprint: Option<String>,
    },

    /// Validate and store a GitHub personal access token
    GenerateToken {
        /// Token to store instead of asking for it
        #[arg(long)]
        token: Option<String>,
    },

    /// Remove the stored GitHub token from this machine
    RemoveToken,
}

/// Get the command args for use in the application
pub fn parse() -> Cli {
    Cli::parse()
}
