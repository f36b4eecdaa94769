//! Read-only reports over the three collections.
//!
//! Nothing here writes. The only failures are store read errors.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;
use crate::storage::{
    Book, BookId, BorrowId, Loan, LoanFilter, LoanState, LoanStatus, Member, MemberId, Record,
    RecordStore,
};

/// Library-wide counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub total_titles: usize,
    pub total_copies: u64,
    pub borrowed_now: u64,
    pub available_now: u64,
    /// Titles with at least one copy on the shelf
    pub available_titles: usize,
    pub unavailable_titles: usize,
    pub total_members: usize,
    pub active_members: usize,
    pub open_loans: usize,
}

/// A loan joined with the book title and member name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanView {
    #[serde(flatten)]
    pub loan: Loan,
    pub book_title: String,
    pub member_name: String,
    pub state: LoanState,
    pub days_overdue: i64,
}

/// A book together with who currently holds its copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRow {
    #[serde(flatten)]
    pub book: Book,
    pub available: u32,
    pub borrowers: Vec<String>,
}

/// An inconsistency between the collections.
///
/// Borrow and return write several files in sequence without rollback, so a
/// crash between writes shows up here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum IntegrityIssue {
    BorrowedExceedsCopies {
        book_id: BookId,
        borrowed: u32,
        copies: u32,
    },
    BorrowedMismatch {
        book_id: BookId,
        borrowed: u32,
        open_loans: u32,
    },
    MissingBook {
        borrow_id: BorrowId,
        book_id: BookId,
    },
    MissingMember {
        borrow_id: BorrowId,
        member_id: MemberId,
    },
    OpenLoanHasReturnDate {
        borrow_id: BorrowId,
    },
    ReturnedLoanWithoutReturnDate {
        borrow_id: BorrowId,
    },
    DuplicateKey {
        collection: &'static str,
        key: u32,
    },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::BorrowedExceedsCopies {
                book_id,
                borrowed,
                copies,
            } => write!(
                f,
                "book {} has {} copies out but only {} owned",
                book_id, borrowed, copies
            ),
            IntegrityIssue::BorrowedMismatch {
                book_id,
                borrowed,
                open_loans,
            } => write!(
                f,
                "book {} records {} copies out but has {} open loans",
                book_id, borrowed, open_loans
            ),
            IntegrityIssue::MissingBook { borrow_id, book_id } => {
                write!(f, "loan {} references missing book {}", borrow_id, book_id)
            }
            IntegrityIssue::MissingMember {
                borrow_id,
                member_id,
            } => write!(
                f,
                "loan {} references missing member {}",
                borrow_id, member_id
            ),
            IntegrityIssue::OpenLoanHasReturnDate { borrow_id } => {
                write!(f, "loan {} is open but has a return date", borrow_id)
            }
            IntegrityIssue::ReturnedLoanWithoutReturnDate { borrow_id } => {
                write!(f, "loan {} is returned but has no return date", borrow_id)
            }
            IntegrityIssue::DuplicateKey { collection, key } => {
                write!(f, "{} contains key {} more than once", collection, key)
            }
        }
    }
}

/// Read-only aggregation over the book, member and loan stores.
pub struct Reports<'a> {
    books: &'a dyn RecordStore<Book>,
    members: &'a dyn RecordStore<Member>,
    loans: &'a dyn RecordStore<Loan>,
}

impl<'a> Reports<'a> {
    pub fn new(
        books: &'a dyn RecordStore<Book>,
        members: &'a dyn RecordStore<Member>,
        loans: &'a dyn RecordStore<Loan>,
    ) -> Self {
        Self {
            books,
            members,
            loans,
        }
    }

    pub fn summary(&self) -> Result<InventorySummary> {
        let books = self.books.load()?;
        let members = self.members.load()?;
        let loans = self.loans.load()?;

        let mut summary = InventorySummary {
            total_titles: books.len(),
            total_members: members.len(),
            active_members: members.iter().filter(|m| m.is_active()).count(),
            open_loans: loans.iter().filter(|l| l.is_open()).count(),
            ..InventorySummary::default()
        };
        for book in &books {
            summary.total_copies += u64::from(book.copies);
            summary.borrowed_now += u64::from(book.borrowed);
            summary.available_now += u64::from(book.available());
            if book.available() > 0 {
                summary.available_titles += 1;
            } else {
                summary.unavailable_titles += 1;
            }
        }
        Ok(summary)
    }

    /// Open loans, oldest first, with their state on `today`.
    pub fn active_loans(&self, today: NaiveDate) -> Result<Vec<LoanView>> {
        self.loans(&LoanFilter::new().open_only(), today)
    }

    /// Loans matching the filter, joined with titles and names.
    ///
    /// A loan pointing at a deleted record shows `Book <id>` / `Member <id>`.
    pub fn loans(&self, filter: &LoanFilter, today: NaiveDate) -> Result<Vec<LoanView>> {
        let titles: HashMap<BookId, String> = self
            .books
            .load()?
            .into_iter()
            .map(|b| (b.book_id, b.title))
            .collect();
        let names: HashMap<MemberId, String> = self
            .members
            .load()?
            .into_iter()
            .map(|m| (m.member_id, m.name))
            .collect();

        Ok(self
            .loans
            .load()?
            .into_iter()
            .filter(|loan| filter.matches(loan))
            .map(|loan| LoanView {
                book_title: titles
                    .get(&loan.book_id)
                    .cloned()
                    .unwrap_or_else(|| format!("Book {}", loan.book_id)),
                member_name: names
                    .get(&loan.member_id)
                    .cloned()
                    .unwrap_or_else(|| format!("Member {}", loan.member_id)),
                state: loan.state_on(today),
                days_overdue: loan.days_overdue(today),
                loan,
            })
            .collect())
    }

    /// Open loans past their due date on `today`.
    pub fn overdue_loans(&self, today: NaiveDate) -> Result<Vec<LoanView>> {
        Ok(self
            .active_loans(today)?
            .into_iter()
            .filter(|active| active.state == LoanState::Overdue)
            .collect())
    }

    /// Members whose lifetime borrows exceed `threshold`, most borrows first.
    pub fn frequent_borrowers(&self, threshold: u32) -> Result<Vec<Member>> {
        let mut members: Vec<Member> = self
            .members
            .load()?
            .into_iter()
            .filter(|m| m.total_borrows > threshold)
            .collect();
        members.sort_by(|a, b| b.total_borrows.cmp(&a.total_borrows));
        Ok(members)
    }

    /// Every book with the names of members currently holding a copy.
    pub fn inventory(&self) -> Result<Vec<InventoryRow>> {
        let names: HashMap<MemberId, String> = self
            .members
            .load()?
            .into_iter()
            .map(|m| (m.member_id, m.name))
            .collect();
        let loans = self.loans.load()?;

        Ok(self
            .books
            .load()?
            .into_iter()
            .map(|book| {
                let borrowers = loans
                    .iter()
                    .filter(|loan| loan.is_open() && loan.book_id == book.book_id)
                    .map(|loan| {
                        names
                            .get(&loan.member_id)
                            .cloned()
                            .unwrap_or_else(|| format!("Member {}", loan.member_id))
                    })
                    .collect();
                InventoryRow {
                    available: book.available(),
                    borrowers,
                    book,
                }
            })
            .collect())
    }

    /// Cross-check the collections against each other.
    pub fn integrity(&self) -> Result<Vec<IntegrityIssue>> {
        let books = self.books.load()?;
        let members = self.members.load()?;
        let loans = self.loans.load()?;
        let mut issues = Vec::new();

        duplicate_keys(Book::COLLECTION, books.iter().map(|b| b.book_id), &mut issues);
        duplicate_keys(
            Member::COLLECTION,
            members.iter().map(|m| m.member_id),
            &mut issues,
        );
        duplicate_keys(Loan::COLLECTION, loans.iter().map(|l| l.borrow_id), &mut issues);

        let mut open_per_book: HashMap<BookId, u32> = HashMap::new();
        for loan in &loans {
            match (loan.status, loan.return_date) {
                (LoanStatus::Open, Some(_)) => issues.push(IntegrityIssue::OpenLoanHasReturnDate {
                    borrow_id: loan.borrow_id,
                }),
                (LoanStatus::Returned, None) => {
                    issues.push(IntegrityIssue::ReturnedLoanWithoutReturnDate {
                        borrow_id: loan.borrow_id,
                    })
                }
                _ => {}
            }
            // Returned loans may outlive their book or member.
            if !loan.is_open() {
                continue;
            }
            *open_per_book.entry(loan.book_id).or_default() += 1;
            if !books.iter().any(|b| b.book_id == loan.book_id) {
                issues.push(IntegrityIssue::MissingBook {
                    borrow_id: loan.borrow_id,
                    book_id: loan.book_id,
                });
            }
            if !members.iter().any(|m| m.member_id == loan.member_id) {
                issues.push(IntegrityIssue::MissingMember {
                    borrow_id: loan.borrow_id,
                    member_id: loan.member_id,
                });
            }
        }

        for book in &books {
            if book.borrowed > book.copies {
                issues.push(IntegrityIssue::BorrowedExceedsCopies {
                    book_id: book.book_id,
                    borrowed: book.borrowed,
                    copies: book.copies,
                });
            }
            let open_loans = open_per_book.get(&book.book_id).copied().unwrap_or(0);
            if open_loans != book.borrowed {
                issues.push(IntegrityIssue::BorrowedMismatch {
                    book_id: book.book_id,
                    borrowed: book.borrowed,
                    open_loans,
                });
            }
        }

        Ok(issues)
    }
}

fn duplicate_keys(
    collection: &'static str,
    keys: impl Iterator<Item = u32>,
    issues: &mut Vec<IntegrityIssue>,
) {
    let mut seen: HashMap<u32, usize> = HashMap::new();
    for key in keys {
        let count = seen.entry(key).or_default();
        *count += 1;
        if *count == 2 {
            issues.push(IntegrityIssue::DuplicateKey { collection, key });
        }
    }
}
