//! Storage layer for library records.
//!
//! This module provides the `RecordStore` trait and its two backends:
//!
//! - `FileStore`: one JSON Lines file per collection, replaced atomically
//! - `MemoryStore`: in-process collection for tests and scratch sessions

mod file;
mod memory;
pub mod traits;
pub mod types;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{next_id, not_found, Record, RecordStore};
pub use types::{
    Book, BookFilter, BookId, BookStatus, BookUpdate, BorrowId, Loan, LoanFilter, LoanState,
    LoanStatus, Member, MemberFilter, MemberId, MemberStatus, MemberUpdate, NewBook, NewMember,
};
