//! CLI error types for structured error handling.
//!
//! Typed errors map to specific exit codes. Core `LibraryError`s that reach
//! `main` are mapped here as well, so a non-interactive command fails with
//! the same code whichever layer produced the error.

use std::fmt;

use library_core::LibraryError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, data directory, record)
    NotFound { message: String, hint: String },

    /// Invalid user input
    InvalidInput(String),

    /// `check` found inconsistencies
    IntegrityFailed(usize),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => write!(f, "{}\n{}", message, hint),
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::IntegrityFailed(count) => write!(
                f,
                "Integrity check failed: {} issue{} found",
                count,
                if *count == 1 { "" } else { "s" }
            ),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::IntegrityFailed(_) => exit_codes::INTEGRITY_FAILED,
        }
    }
}

/// Exit code for a core error.
pub fn library_exit_code(err: &LibraryError) -> i32 {
    match err {
        LibraryError::NotFound(_) => exit_codes::NOT_FOUND,
        LibraryError::Validation(_) => exit_codes::INVALID_INPUT,
        LibraryError::Conflict(_)
        | LibraryError::Unavailable(_)
        | LibraryError::InvalidState(_) => exit_codes::REFUSED,
        LibraryError::Storage(_) => exit_codes::FAILURE,
    }
}

/// Exit code for any error that reached `main`.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return cli.exit_code();
    }
    if let Some(library) = err.downcast_ref::<LibraryError>() {
        return library_exit_code(library);
    }
    exit_codes::FAILURE
}

/// Print the error to stderr and exit with the mapped code.
pub fn exit_with(err: &anyhow::Error) -> ! {
    eprintln!("Error: {:#}", err);
    std::process::exit(exit_code(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_codes() {
        assert_eq!(CliError::not_found("x", "y").exit_code(), 3);
        assert_eq!(CliError::invalid_input("x").exit_code(), 4);
        assert_eq!(CliError::IntegrityFailed(2).exit_code(), 6);
    }

    #[test]
    fn test_library_errors_map_through_anyhow() {
        let err = anyhow::Error::new(LibraryError::Unavailable("book 1".to_string()));
        assert_eq!(exit_code(&err), exit_codes::REFUSED);

        let err = anyhow::Error::new(LibraryError::NotFound("member 2".to_string()));
        assert_eq!(exit_code(&err), exit_codes::NOT_FOUND);

        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_code(&err), exit_codes::FAILURE);
    }

    #[test]
    fn test_context_does_not_hide_library_error() {
        let err = anyhow::Error::new(LibraryError::Validation("bad".to_string()))
            .context("Failed to add book");
        assert_eq!(exit_code(&err), exit_codes::INVALID_INPUT);
    }

    #[test]
    fn test_integrity_message_pluralizes() {
        assert_eq!(
            CliError::IntegrityFailed(1).to_string(),
            "Integrity check failed: 1 issue found"
        );
    }
}
