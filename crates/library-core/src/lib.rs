//! # Library Core
//!
//! Core library for Library - a single-user, CLI-first tracker for a small
//! lending library's books, members and loans.
//!
//! This crate provides the domain model, record stores and business rules
//! independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **storage**: Record store trait, JSON Lines file store, in-memory store
//! - **catalog**: Book add/update/delete/list and copy tracking
//! - **directory**: Member lifecycle and borrow tallies
//! - **loans**: Borrow and return workflow
//! - **report**: Read-only summaries and integrity checks
//! - **library**: Session that owns the three stores

pub mod catalog;
pub mod directory;
pub mod error;
pub mod fs;
pub mod library;
pub mod loans;
pub mod report;
pub mod storage;

pub use catalog::Catalog;
pub use directory::Directory;
pub use error::{LibraryError, Result};
pub use library::Library;
pub use loans::{LoanManager, LoanPolicy, DEFAULT_LOAN_PERIOD_DAYS};
pub use report::{IntegrityIssue, InventoryRow, InventorySummary, LoanView, Reports};
pub use storage::{
    Book, BookFilter, BookUpdate, FileStore, Loan, LoanFilter, LoanState, LoanStatus, Member,
    MemberFilter, MemberStatus, MemberUpdate, MemoryStore, NewBook, NewMember, Record,
    RecordStore,
};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
