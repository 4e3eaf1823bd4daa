//! sprintflow CLI - sprint, feature and hotfix branching automation on top of git

mod cli;
mod commands;
mod interaction;
mod output;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use cli::Commands;
use commands::Flags;

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_directives = if verbose {
        "warn,sprintflow=debug,sprintflow_core=debug"
    } else {
        "warn"
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = cli::parse();
    init_tracing(cli.verbose);

    let flags = Flags {
        json: cli.json,
        quiet: cli.quiet,
        yes: cli.yes,
    };

    let result = match cli.command {
        Some(Commands::StartFeature {
            branch,
            project,
            sprint,
        }) => commands::run_start_feature(branch, project, sprint, flags),
        Some(Commands::StartHotfix { branch }) => commands::run_start_hotfix(branch, flags),
        Some(Commands::StartSprint { project, sprint }) => {
            commands::run_start_sprint(project, sprint, flags)
        }
        Some(Commands::FinishFeature { project, sprint }) => {
            commands::run_finish_feature(project, sprint, flags)
        }
        Some(Commands::FinishHotfix) => commands::run_finish_hotfix(flags),
        Some(Commands::FinishSprint { project, sprint }) => {
            commands::run_finish_sprint(project, sprint, flags)
        }
        Some(Commands::GetConfig) => commands::run_get_config(flags),
        Some(Commands::SetConfig { project, sprint }) => {
            commands::run_set_config(project, sprint, flags)
        }
        Some(Commands::GenerateToken { token }) => commands::run_generate_token(token, flags),
        Some(Commands::RemoveToken) => commands::run_remove_token(flags),
        None => {
            // No subcommand - print version info
            if !cli.quiet {
                println!("sprintflow v{}", env!("CARGO_PKG_VERSION"));
                println!("Use --help for usage information");
            }
            Ok(0)
        }
    };

    match result {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}
