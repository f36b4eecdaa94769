//! A library session: the three stores plus the lending policy.
//!
//! `Library` hands out short-lived views (`Catalog`, `Directory`,
//! `LoanManager`, `Reports`) that borrow the stores they need.

use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::directory::Directory;
use crate::error::Result;
use crate::loans::{LoanManager, LoanPolicy};
use crate::report::Reports;
use crate::storage::{Book, FileStore, Loan, Member, MemoryStore, RecordStore};

pub struct Library {
    books: Box<dyn RecordStore<Book>>,
    members: Box<dyn RecordStore<Member>>,
    loans: Box<dyn RecordStore<Loan>>,
    policy: LoanPolicy,
    data_dir: Option<PathBuf>,
}

impl Library {
    pub fn new(
        books: Box<dyn RecordStore<Book>>,
        members: Box<dyn RecordStore<Member>>,
        loans: Box<dyn RecordStore<Loan>>,
        policy: LoanPolicy,
    ) -> Self {
        Self {
            books,
            members,
            loans,
            policy,
            data_dir: None,
        }
    }

    /// Open the JSON Lines collections in `data_dir`, creating the directory
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Storage` if the directory cannot be created.
    pub fn open(data_dir: &Path, policy: LoanPolicy) -> Result<Self> {
        let mut library = Self::new(
            Box::new(FileStore::<Book>::open(data_dir)?),
            Box::new(FileStore::<Member>::open(data_dir)?),
            Box::new(FileStore::<Loan>::open(data_dir)?),
            policy,
        );
        library.data_dir = Some(data_dir.to_path_buf());
        tracing::debug!(data_dir = %data_dir.display(), "library opened");
        Ok(library)
    }

    /// A library with nothing persisted.
    pub fn in_memory(policy: LoanPolicy) -> Self {
        Self::new(
            Box::new(MemoryStore::<Book>::new()),
            Box::new(MemoryStore::<Member>::new()),
            Box::new(MemoryStore::<Loan>::new()),
            policy,
        )
    }

    pub fn policy(&self) -> LoanPolicy {
        self.policy
    }

    /// Where the collections live, for file-backed sessions.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn catalog(&mut self) -> Catalog<'_> {
        Catalog::new(self.books.as_mut(), self.loans.as_ref())
    }

    pub fn directory(&mut self) -> Directory<'_> {
        Directory::new(self.members.as_mut(), self.loans.as_ref())
    }

    pub fn loans(&mut self) -> LoanManager<'_> {
        LoanManager::new(
            self.books.as_mut(),
            self.members.as_mut(),
            self.loans.as_mut(),
            self.policy,
        )
    }

    pub fn reports(&self) -> Reports<'_> {
        Reports::new(
            self.books.as_ref(),
            self.members.as_ref(),
            self.loans.as_ref(),
        )
    }
}
