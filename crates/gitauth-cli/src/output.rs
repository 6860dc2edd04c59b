//! Terminal output formatting utilities.

use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;

static VERBOSE_MODE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally. Call once at startup.
pub fn set_verbose(verbose: bool) {
    VERBOSE_MODE.store(verbose, Ordering::Relaxed);
}

fn is_verbose() -> bool {
    VERBOSE_MODE.load(Ordering::Relaxed)
}

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message (always prints to stderr).
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a warning message (always prints to stderr).
pub fn warn(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print an info message.
pub fn info(msg: &str) {
    println!("{} {}", "→".blue(), msg);
}

/// Print a detail line without prefix.
///
/// Use for indented detail lines that accompany info or warn messages.
pub fn detail(msg: &str) {
    println!("{msg}");
}

/// Print a diagnostic line, shown only with `--verbose`.
pub fn debug(msg: &str) {
    if is_verbose() {
        println!("{}", msg.dimmed());
    }
}

/// Print a horizontal line.
pub fn hr() {
    println!("{}", "─".repeat(50).dimmed());
}

/// Format an identity for display.
#[must_use]
pub fn identity(name: &str, email: &str) -> String {
    format!("{} {}", name.green(), format!("<{email}>").blue())
}

/// Truncate a subject line for table display.
#[must_use]
pub fn truncate_subject(subject: &str, max: usize) -> String {
    console::truncate_str(subject, max, "...").into_owned()
}
