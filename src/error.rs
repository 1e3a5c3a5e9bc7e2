//! Error types and handling for bastion-connect
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for bastion-connect operations
#[derive(Error, Diagnostic, Debug)]
pub enum BastionError {
    // Environment errors
    #[error("Unsupported environment: {reason}")]
    #[diagnostic(
        code(bastion::env::unsupported),
        help("Run bastion-connect from an interactive Windows terminal")
    )]
    UnsupportedEnvironment { reason: String },

    // Dependency errors
    #[error("'{program}' is not installed or cannot be executed")]
    #[diagnostic(
        code(bastion::deps::cli_missing),
        help("Install the Azure CLI: https://learn.microsoft.com/cli/azure/install-azure-cli")
    )]
    CliNotInstalled { program: String },

    #[error("Extension '{name}' is {installed}, but version {required} or newer is required")]
    #[diagnostic(
        code(bastion::deps::extension_outdated),
        help("Update it manually with 'az extension update --name {name}' and try again")
    )]
    ExtensionBelowMinimum {
        name: String,
        installed: String,
        required: String,
    },

    #[error("Command '{command}' failed: {reason}")]
    #[diagnostic(code(bastion::az::command_failed))]
    CommandFailed { command: String, reason: String },

    // Parsing errors
    #[error("Invalid version '{input}'")]
    #[diagnostic(
        code(bastion::version::invalid),
        help("Versions look like 1.2.3")
    )]
    InvalidVersion { input: String },

    #[error("Failed to parse JSON output: {message}")]
    #[diagnostic(code(bastion::json::parse_failed))]
    Json { message: String },

    // Network errors
    #[error("HTTP request failed: {message}")]
    #[diagnostic(code(bastion::http::request_failed))]
    Http { message: String },

    #[error("Download from {url} failed with status {status}")]
    #[diagnostic(code(bastion::http::bad_status))]
    DownloadFailed { url: String, status: u16 },

    // Terminal and file system errors
    #[error("Prompt failed: {message}")]
    #[diagnostic(code(bastion::terminal::prompt_failed))]
    Prompt { message: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(bastion::fs::io_error))]
    Io { message: String },
}

impl From<std::io::Error> for BastionError {
    fn from(err: std::io::Error) -> Self {
        BastionError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BastionError {
    fn from(err: serde_json::Error) -> Self {
        BastionError::Json {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for BastionError {
    fn from(err: reqwest::Error) -> Self {
        BastionError::Http {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for BastionError {
    fn from(err: inquire::InquireError) -> Self {
        BastionError::Prompt {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, BastionError>;
