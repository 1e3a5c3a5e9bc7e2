//! Severity-prefixed console messages
//!
//! Everything the operator reads goes through here so the prefixes stay
//! consistent: `[INFO]`, `[WARN]`, `[FATAL]` and `[OK]`.

use console::Style;
use miette::Diagnostic;

use crate::error::BastionError;

/// Message severity, rendered as a coloured prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Fatal,
}

impl Severity {
    pub fn prefix(self) -> &'static str {
        match self {
            Severity::Info => "[INFO]",
            Severity::Success => "[OK]",
            Severity::Warning => "[WARN]",
            Severity::Fatal => "[FATAL]",
        }
    }

    fn style(self) -> Style {
        match self {
            Severity::Info => Style::new().blue().bold(),
            Severity::Success => Style::new().green().bold(),
            Severity::Warning => Style::new().yellow().bold(),
            Severity::Fatal => Style::new().red().bold(),
        }
    }
}

fn emit(severity: Severity, message: &str) {
    eprintln!("{} {message}", severity.style().apply_to(severity.prefix()));
}

pub fn info(message: impl AsRef<str>) {
    emit(Severity::Info, message.as_ref());
}

pub fn success(message: impl AsRef<str>) {
    emit(Severity::Success, message.as_ref());
}

pub fn warn(message: impl AsRef<str>) {
    emit(Severity::Warning, message.as_ref());
}

pub fn fatal(message: impl AsRef<str>) {
    emit(Severity::Fatal, message.as_ref());
}

/// Print a fatal error together with its diagnostic help, if any
pub fn fatal_error(err: &BastionError) {
    fatal(err.to_string());
    if let Some(help) = err.help() {
        eprintln!("        {}", Style::new().dim().apply_to(help));
    }
}

/// Print the exact command line about to be executed
pub fn command(command_line: impl AsRef<str>) {
    println!("{}", Style::new().cyan().apply_to(command_line.as_ref()));
}
