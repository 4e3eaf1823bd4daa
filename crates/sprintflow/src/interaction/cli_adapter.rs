//! dialoguer-backed prompter with indicatif spinners

use std::collections::HashMap;
use std::fmt::Write as FmtWrite;
use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use console::Style;
use dialoguer::theme::Theme;
use dialoguer::{Confirm, Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use sprintflow_core::interaction::{
    InteractionAdapter, InteractionError, InteractionResult, ProgressHandle, Validator,
};

/// Set once Ctrl+C is pressed
static CANCELLED: AtomicBool = AtomicBool::new(false);

fn is_cancelled() -> bool {
    CANCELLED.load(Ordering::SeqCst)
}

/// Install the process-wide Ctrl+C handler (idempotent)
pub fn setup_ctrl_c_handler() {
    static HANDLER_SET: AtomicBool = AtomicBool::new(false);

    if HANDLER_SET.swap(true, Ordering::SeqCst) {
        return;
    }

    if let Err(e) = ctrlc::set_handler(move || {
        CANCELLED.store(true, Ordering::SeqCst);
        eprintln!();
    }) {
        tracing::warn!("could not set Ctrl+C handler: {}", e);
    }
}

/// `? question (default)` prompts
struct FlowTheme {
    prompt_style: Style,
    answer_style: Style,
    hint_style: Style,
    error_style: Style,
}

impl FlowTheme {
    fn new() -> Self {
        Self {
            prompt_style: Style::new().cyan().bold(),
            answer_style: Style::new().cyan(),
            hint_style: Style::new().dim(),
            error_style: Style::new().red(),
        }
    }

    fn question(&self, prompt: &str) -> String {
        self.prompt_style.apply_to(format!("? {}", prompt)).to_string()
    }
}

impl Theme for FlowTheme {
    fn format_prompt(&self, f: &mut dyn FmtWrite, prompt: &str) -> std::fmt::Result {
        write!(f, "{}", self.question(prompt))
    }

    fn format_error(&self, f: &mut dyn FmtWrite, err: &str) -> std::fmt::Result {
        write!(f, "{}", self.error_style.apply_to(format!("  {}", err)))
    }

    fn format_input_prompt(
        &self,
        f: &mut dyn FmtWrite,
        prompt: &str,
        default: Option<&str>,
    ) -> std::fmt::Result {
        match default {
            Some(d) if !d.is_empty() => write!(
                f,
                "{} {} ",
                self.question(prompt),
                self.hint_style.apply_to(format!("({})", d))
            ),
            _ => write!(f, "{} ", self.question(prompt)),
        }
    }

    fn format_input_prompt_selection(
        &self,
        f: &mut dyn FmtWrite,
        prompt: &str,
        sel: &str,
    ) -> std::fmt::Result {
        write!(f, "{} {}", self.question(prompt), self.answer_style.apply_to(sel))
    }

    fn format_password_prompt(&self, f: &mut dyn FmtWrite, prompt: &str) -> std::fmt::Result {
        write!(f, "{} ", self.question(prompt))
    }

    fn format_password_prompt_selection(
        &self,
        f: &mut dyn FmtWrite,
        prompt: &str,
    ) -> std::fmt::Result {
        write!(f, "{} {}", self.question(prompt), self.hint_style.apply_to("[hidden]"))
    }

    fn format_confirm_prompt(
        &self,
        f: &mut dyn FmtWrite,
        prompt: &str,
        default: Option<bool>,
    ) -> std::fmt::Result {
        let hint = match default {
            Some(true) => "(Y/n)",
            Some(false) => "(y/N)",
            None => "(y/n)",
        };
        write!(f, "{} {} ", self.question(prompt), self.hint_style.apply_to(hint))
    }

    fn format_confirm_prompt_selection(
        &self,
        f: &mut dyn FmtWrite,
        prompt: &str,
        selection: Option<bool>,
    ) -> std::fmt::Result {
        let answer = match selection {
            Some(true) => "Yes",
            Some(false) => "No",
            None => "?",
        };
        write!(f, "{} {}", self.question(prompt), self.answer_style.apply_to(answer))
    }
}

/// Terminal prompter
///
/// In quiet mode (`--quiet`, `--json`) nothing is written to stdout; prompts
/// still go to stderr.
pub struct CliAdapter {
    is_tty: bool,
    quiet: bool,
    progress_counter: AtomicU64,
    active_progress: Arc<Mutex<HashMap<u64, ProgressBar>>>,
}

impl CliAdapter {
    pub fn new(quiet: bool) -> Self {
        setup_ctrl_c_handler();
        Self {
            is_tty: std::io::stdin().is_terminal(),
            quiet,
            progress_counter: AtomicU64::new(0),
            active_progress: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[cfg(test)]
    pub fn with_tty(is_tty: bool) -> Self {
        Self {
            is_tty,
            quiet: false,
            progress_counter: AtomicU64::new(0),
            active_progress: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[cfg(test)]
    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    fn ready(&self) -> InteractionResult<()> {
        if !self.is_tty {
            return Err(InteractionError::NonTty);
        }
        if is_cancelled() {
            return Err(InteractionError::Cancelled);
        }
        Ok(())
    }

    fn convert_dialoguer_error(err: dialoguer::Error) -> InteractionError {
        if is_cancelled() {
            InteractionError::Cancelled
        } else {
            InteractionError::Io(err.to_string())
        }
    }
}

impl InteractionAdapter for CliAdapter {
    fn ask_text(
        &self,
        prompt: &str,
        default: Option<&str>,
        validator: Option<Validator>,
    ) -> InteractionResult<String> {
        self.ready()?;

        let theme = FlowTheme::new();
        let mut input: Input<String> = Input::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(d) = default {
            input = input.default(d.to_string()).show_default(!d.is_empty());
        }
        if let Some(validate) = validator {
            input = input.validate_with(move |value: &String| validate(value));
        }

        input.interact_text().map_err(Self::convert_dialoguer_error)
    }

    fn ask_confirm(&self, prompt: &str, default: bool) -> InteractionResult<bool> {
        self.ready()?;

        let theme = FlowTheme::new();
        Confirm::with_theme(&theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(Self::convert_dialoguer_error)
    }

    fn ask_password(&self, prompt: &str, validator: Option<Validator>) -> InteractionResult<String> {
        self.ready()?;

        let theme = FlowTheme::new();
        let mut password = Password::with_theme(&theme).with_prompt(prompt);
        if let Some(validate) = validator {
            password = password.validate_with(move |value: &String| validate(value));
        }

        password.interact().map_err(Self::convert_dialoguer_error)
    }

    fn start_progress(&self, message: &str) -> ProgressHandle {
        let id = self.progress_counter.fetch_add(1, Ordering::SeqCst);
        if self.quiet {
            return ProgressHandle::new(id, message);
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut progress_map) = self.active_progress.lock() {
            progress_map.insert(id, pb);
        }

        ProgressHandle::new(id, message)
    }

    fn end_progress(&self, handle: ProgressHandle, success: bool) {
        let Ok(mut progress_map) = self.active_progress.lock() else {
            return;
        };
        if let Some(pb) = progress_map.remove(&handle.id()) {
            pb.finish_and_clear();
            if success {
                eprintln!("{} {}", "✓".green(), handle.message());
            } else {
                eprintln!("{} {}", "✗".red(), handle.message().red());
            }
        }
    }

    fn print_info(&self, message: &str) {
        if self.quiet {
            return;
        }
        println!("{}", message);
        let _ = std::io::stdout().flush();
    }

    fn print_warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        println!("{} {}", "warning:".yellow().bold(), message.yellow());
        let _ = std::io::stdout().flush();
    }

    fn print_success(&self, message: &str) {
        if self.quiet {
            return;
        }
        println!("{}", message.green());
        let _ = std::io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn non_empty(value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err("required".to_string())
        } else {
            Ok(())
        }
    }

    #[test]
    fn test_with_tty_override() {
        assert!(CliAdapter::with_tty(true).is_tty());
        assert!(!CliAdapter::with_tty(false).is_tty());
    }

    #[test]
    fn test_non_tty_text_is_an_error() {
        let adapter = CliAdapter::with_tty(false);
        let result = adapter.ask_text("project name", Some("apollo"), Some(non_empty));
        assert!(matches!(result, Err(InteractionError::NonTty)));
    }

    #[test]
    fn test_non_tty_confirm_is_an_error() {
        let adapter = CliAdapter::with_tty(false);
        let result = adapter.ask_confirm("Are you sure?", false);
        assert!(matches!(result, Err(InteractionError::NonTty)));
    }

    #[test]
    fn test_non_tty_password_is_an_error() {
        let adapter = CliAdapter::with_tty(false);
        let result = adapter.ask_password("token", None);
        assert!(matches!(result, Err(InteractionError::NonTty)));
    }

    #[test]
    fn test_progress_ids_are_distinct() {
        let adapter = CliAdapter::with_tty(false);
        let first = adapter.start_progress("first");
        let second = adapter.start_progress("second");
        assert_ne!(first.id(), second.id());
        assert_eq!(second.message(), "second");
        adapter.end_progress(first, true);
        adapter.end_progress(second, false);
    }

    #[test]
    fn test_quiet_adapter_prints_nothing_and_tracks_no_spinners() {
        let adapter = CliAdapter {
            quiet: true,
            ..CliAdapter::with_tty(false)
        };
        let handle = adapter.start_progress("quiet");
        assert!(adapter.active_progress.lock().unwrap().is_empty());
        adapter.end_progress(handle, true);
        adapter.print_info("info");
        adapter.print_warning("warning");
        adapter.print_success("success");
    }
}
