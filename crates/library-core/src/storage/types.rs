//! Core data types for the storage layer.
//!
//! Books, members and loans are the three persisted record kinds. Derived
//! values (a book's availability, a loan's overdue state) are computed on
//! demand and never written to disk.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::traits::Record;

/// Key of a book record.
pub type BookId = u32;
/// Key of a member record.
pub type MemberId = u32;
/// Key of a loan record.
pub type BorrowId = u32;

/// A catalogued title and its copy counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique key, chosen by the librarian
    pub book_id: BookId,

    pub title: String,

    pub author: String,

    /// Publication year (0 when unknown)
    pub year: i32,

    /// Total copies owned
    pub copies: u32,

    /// Copies currently out on loan; never exceeds `copies`
    pub borrowed: u32,
}

impl Book {
    /// Copies on the shelf right now.
    pub fn available(&self) -> u32 {
        self.copies.saturating_sub(self.borrowed)
    }

    /// Derived availability.
    pub fn status(&self) -> BookStatus {
        if self.borrowed < self.copies {
            BookStatus::Available
        } else {
            BookStatus::Unavailable
        }
    }
}

impl Record for Book {
    type Key = BookId;
    const KIND: &'static str = "book";
    const COLLECTION: &'static str = "books";

    fn key(&self) -> BookId {
        self.book_id
    }
}

/// Derived availability of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    Available,
    Unavailable,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered borrower.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: MemberId,

    pub name: String,

    pub email: String,

    pub phone: String,

    /// Inactive members keep their history but cannot borrow
    pub status: MemberStatus,

    /// Lifetime borrow counter; only ever increases
    pub total_borrows: u32,
}

impl Member {
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }
}

impl Record for Member {
    type Key = MemberId;
    const KIND: &'static str = "member";
    const COLLECTION: &'static str = "members";

    fn key(&self) -> MemberId {
        self.member_id
    }
}

/// Whether a member may borrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    #[default]
    Active,
    Inactive,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(MemberStatus::Active),
            "inactive" => Ok(MemberStatus::Inactive),
            other => Err(format!(
                "unknown member status '{}' (expected active or inactive)",
                other
            )),
        }
    }
}

/// One borrow/return transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub borrow_id: BorrowId,

    pub book_id: BookId,

    pub member_id: MemberId,

    pub loan_date: NaiveDate,

    /// `loan_date` plus the loan period in force when the loan was opened
    pub due_date: NaiveDate,

    /// Set exactly when `status` is `Returned`
    pub return_date: Option<NaiveDate>,

    pub status: LoanStatus,
}

impl Loan {
    pub fn is_open(&self) -> bool {
        self.status == LoanStatus::Open
    }

    /// Lifecycle state as seen on `today`.
    ///
    /// Overdue is never stored; an open loan becomes overdue the day after
    /// its due date.
    pub fn state_on(&self, today: NaiveDate) -> LoanState {
        match self.status {
            LoanStatus::Returned => LoanState::Returned,
            LoanStatus::Open if today > self.due_date => LoanState::Overdue,
            LoanStatus::Open => LoanState::Open,
        }
    }

    /// Whole days past the due date on `today`, zero if not overdue.
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        match self.state_on(today) {
            LoanState::Overdue => (today - self.due_date).num_days(),
            _ => 0,
        }
    }
}

impl Record for Loan {
    type Key = BorrowId;
    const KIND: &'static str = "loan";
    const COLLECTION: &'static str = "loans";

    fn key(&self) -> BorrowId {
        self.borrow_id
    }
}

/// Stored loan status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Open,
    Returned,
}

/// Loan state including the computed overdue view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanState {
    Open,
    Overdue,
    Returned,
}

impl LoanState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanState::Open => "open",
            LoanState::Overdue => "overdue",
            LoanState::Returned => "returned",
        }
    }
}

impl fmt::Display for LoanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder for adding a book.
///
/// `copies` is signed so that a negative count from user input reaches
/// validation instead of failing to parse.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub copies: i64,
}

impl NewBook {
    pub fn new(book_id: BookId, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            book_id,
            title: title.into(),
            author: author.into(),
            year: 0,
            copies: 1,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn with_copies(mut self, copies: i64) -> Self {
        self.copies = copies;
        self
    }
}

/// Partial update for a book. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
    pub copies: Option<i64>,
}

impl BookUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn copies(mut self, copies: i64) -> Self {
        self.copies = Some(copies);
        self
    }
}

/// Builder for registering a member.
#[derive(Debug, Clone, Default)]
pub struct NewMember {
    /// Explicit key; `None` allocates the next free id
    pub member_id: Option<MemberId>,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl NewMember {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, member_id: MemberId) -> Self {
        self.member_id = Some(member_id);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }
}

/// Partial update for a member. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<MemberStatus>,
}

impl MemberUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn status(mut self, status: MemberStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Filter for listing books.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    /// Case-insensitive title substring
    pub title: Option<String>,

    /// Case-insensitive author substring
    pub author: Option<String>,

    /// Only books with at least one free copy
    pub available_only: bool,
}

impl BookFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn available_only(mut self) -> Self {
        self.available_only = true;
        self
    }

    pub fn matches(&self, book: &Book) -> bool {
        contains_ci(&book.title, self.title.as_deref())
            && contains_ci(&book.author, self.author.as_deref())
            && (!self.available_only || book.available() > 0)
    }
}

/// Filter for listing members.
#[derive(Debug, Clone, Default)]
pub struct MemberFilter {
    /// Case-insensitive name substring
    pub name: Option<String>,

    pub status: Option<MemberStatus>,
}

impl MemberFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn status(mut self, status: MemberStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, member: &Member) -> bool {
        contains_ci(&member.name, self.name.as_deref())
            && self.status.map_or(true, |status| member.status == status)
    }
}

/// Filter for listing loans.
#[derive(Debug, Clone, Default)]
pub struct LoanFilter {
    pub book_id: Option<BookId>,
    pub member_id: Option<MemberId>,
    pub open_only: bool,
}

impl LoanFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn book(mut self, book_id: BookId) -> Self {
        self.book_id = Some(book_id);
        self
    }

    pub fn member(mut self, member_id: MemberId) -> Self {
        self.member_id = Some(member_id);
        self
    }

    pub fn open_only(mut self) -> Self {
        self.open_only = true;
        self
    }

    pub fn matches(&self, loan: &Loan) -> bool {
        self.book_id.map_or(true, |id| loan.book_id == id)
            && self.member_id.map_or(true, |id| loan.member_id == id)
            && (!self.open_only || loan.is_open())
    }
}

fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack
            .to_lowercase()
            .contains(&needle.trim().to_lowercase()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn book(copies: u32, borrowed: u32) -> Book {
        Book {
            book_id: 1,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            year: 1965,
            copies,
            borrowed,
        }
    }

    fn open_loan(due: &str) -> Loan {
        Loan {
            borrow_id: 1,
            book_id: 1,
            member_id: 1,
            loan_date: date("2024-01-01"),
            due_date: date(due),
            return_date: None,
            status: LoanStatus::Open,
        }
    }

    #[test]
    fn test_book_status_is_derived_from_counts() {
        assert_eq!(book(2, 1).status(), BookStatus::Available);
        assert_eq!(book(2, 2).status(), BookStatus::Unavailable);
        assert_eq!(book(0, 0).status(), BookStatus::Unavailable);
        assert_eq!(book(2, 1).available(), 1);
    }

    #[test]
    fn test_book_status_is_not_serialized() {
        let json = serde_json::to_value(book(1, 0)).unwrap();
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_loan_state_overdue_after_due_date() {
        let loan = open_loan("2024-01-15");
        assert_eq!(loan.state_on(date("2024-01-15")), LoanState::Open);
        assert_eq!(loan.state_on(date("2024-01-16")), LoanState::Overdue);
        assert_eq!(loan.days_overdue(date("2024-01-20")), 5);
        assert_eq!(loan.days_overdue(date("2024-01-10")), 0);
    }

    #[test]
    fn test_returned_loan_is_never_overdue() {
        let mut loan = open_loan("2024-01-15");
        loan.status = LoanStatus::Returned;
        loan.return_date = Some(date("2024-02-01"));
        assert_eq!(loan.state_on(date("2024-03-01")), LoanState::Returned);
    }

    #[test]
    fn test_member_status_from_str() {
        assert_eq!("Active".parse::<MemberStatus>(), Ok(MemberStatus::Active));
        assert_eq!(" inactive ".parse::<MemberStatus>(), Ok(MemberStatus::Inactive));
        assert!("blocked".parse::<MemberStatus>().is_err());
    }

    #[test]
    fn test_book_filter() {
        let b = book(1, 1);
        assert!(BookFilter::new().title("dun").matches(&b));
        assert!(BookFilter::new().author("HERBERT").matches(&b));
        assert!(!BookFilter::new().available_only().matches(&b));
        assert!(!BookFilter::new().title("emma").matches(&b));
    }

    #[test]
    fn test_loan_filter() {
        let loan = open_loan("2024-01-15");
        assert!(LoanFilter::new().book(1).member(1).open_only().matches(&loan));
        assert!(!LoanFilter::new().member(2).matches(&loan));
    }

    #[test]
    fn test_new_book_builder_defaults() {
        let new = NewBook::new(7, "Emma", "Jane Austen").with_year(1815);
        assert_eq!(new.copies, 1);
        assert_eq!(new.year, 1815);
    }
}
