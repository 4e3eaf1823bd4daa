//! Terminal interaction
//!
//! `CliAdapter` implements the core `InteractionAdapter` with dialoguer prompts
//! and indicatif spinners.

mod cli_adapter;

pub use cli_adapter::CliAdapter;
