//! `generate-token` and `remove-token`

use sprintflow_core::token::{generate_token, remove_token};

use super::{Flags, finish, open_session};
use crate::output::TokenData;

pub fn run_generate_token(token: Option<String>, flags: Flags) -> Result<i32, String> {
    let session = open_session(flags)?;
    let result = generate_token(
        &session.prompter,
        &session.preferences,
        &session.tracker,
        token.as_deref(),
    )
    .map(|()| TokenData { stored: true });
    finish("generate-token", result, flags, |_| {})
}

pub fn run_remove_token(flags: Flags) -> Result<i32, String> {
    let session = open_session(flags)?;
    let result = remove_token(&session.prompter, &session.preferences)
        .map(|()| TokenData { stored: false });
    finish("remove-token", result, flags, |_| {})
}
