//! `get-config` and `set-config`

use sprintflow_core::preferences::get_config;
use sprintflow_core::prompts::update_defaults;
use sprintflow_core::SprintOverride;

use super::{Flags, finish, open_session};
use crate::output::ConfigData;

fn print_config(data: &ConfigData) {
    println!(
        "project name: {}",
        data.project_name.as_deref().unwrap_or("(not set)")
    );
    println!(
        "sprint number: {}",
        data.sprint_number.as_deref().unwrap_or("(not set)")
    );
}

pub fn run_get_config(flags: Flags) -> Result<i32, String> {
    let session = open_session(flags)?;
    let result = get_config(&session.preferences, &session.workdir)
        .map(|config| ConfigData::new(&session.workdir, config));
    finish("get-config", result, flags, print_config)
}

pub fn run_set_config(
    project: Option<String>,
    sprint: Option<String>,
    flags: Flags,
) -> Result<i32, String> {
    let session = open_session(flags)?;
    let overrides = SprintOverride::new(project.as_deref(), sprint.as_deref());
    let result = update_defaults(
        &session.prompter,
        &session.preferences,
        &session.workdir,
        &overrides,
    )
    .and_then(|_| get_config(&session.preferences, &session.workdir))
    .map(|config| ConfigData::new(&session.workdir, config));
    finish("set-config", result, flags, |data| {
        println!("config saved");
        print_config(data);
    })
}
