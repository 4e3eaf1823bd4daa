//! The six branch lifecycle commands

use sprintflow_core::{FlowError, FlowOutcome, SprintOverride, Workflow};

use super::{Flags, finish, open_session};

fn run_flow(
    command: &str,
    flags: Flags,
    operation: impl FnOnce(&Workflow<'_>) -> Result<FlowOutcome, FlowError>,
) -> Result<i32, String> {
    let session = open_session(flags)?;
    let workflow = session.workflow(flags);
    let result = operation(&workflow);
    // Status lines were already printed by the prompter
    finish(command, result, flags, |_| {})
}

pub fn run_start_feature(
    branch: Option<String>,
    project: Option<String>,
    sprint: Option<String>,
    flags: Flags,
) -> Result<i32, String> {
    let overrides = SprintOverride::new(project.as_deref(), sprint.as_deref());
    run_flow("start-feature", flags, |workflow| {
        workflow.start_feature(branch.as_deref(), &overrides)
    })
}

pub fn run_start_hotfix(branch: Option<String>, flags: Flags) -> Result<i32, String> {
    run_flow("start-hotfix", flags, |workflow| {
        workflow.start_hotfix(branch.as_deref())
    })
}

pub fn run_start_sprint(
    project: Option<String>,
    sprint: Option<String>,
    flags: Flags,
) -> Result<i32, String> {
    run_flow("start-sprint", flags, |workflow| {
        workflow.start_sprint(project.as_deref(), sprint.as_deref())
    })
}

pub fn run_finish_feature(
    project: Option<String>,
    sprint: Option<String>,
    flags: Flags,
) -> Result<i32, String> {
    let overrides = SprintOverride::new(project.as_deref(), sprint.as_deref());
    run_flow("finish-feature", flags, |workflow| {
        workflow.finish_feature(&overrides)
    })
}

pub fn run_finish_hotfix(flags: Flags) -> Result<i32, String> {
    run_flow("finish-hotfix", flags, |workflow| workflow.finish_hotfix())
}

pub fn run_finish_sprint(
    project: Option<String>,
    sprint: Option<String>,
    flags: Flags,
) -> Result<i32, String> {
    let overrides = SprintOverride::new(project.as_deref(), sprint.as_deref());
    run_flow("finish-sprint", flags, |workflow| {
        workflow.finish_sprint(&overrides)
    })
}
