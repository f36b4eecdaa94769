//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure, including storage errors.
    pub const FAILURE: i32 = 1;

    /// Book, member, loan or config not found.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Request refused by a library rule (conflict, no free copies, already returned).
    pub const REFUSED: i32 = 5;

    /// Integrity check found inconsistencies.
    pub const INTEGRITY_FAILED: i32 = 6;
}

/// Frequent-borrower threshold used when the config does not set one.
pub const DEFAULT_FREQUENT_BORROWER_THRESHOLD: u32 = 3;

/// Date format accepted on the command line and shown in output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
