//! Borrow and return workflow.
//!
//! A loan is opened by `borrow_book` and closed by `return_book`. Both touch
//! more than one store and write them one after another:
//!
//! - borrow: loans, then books, then members
//! - return: loans, then books
//!
//! Every check runs before the first write, so a rejected request changes
//! nothing. If a later write fails, the earlier ones stay on disk; there is no
//! rollback. `Reports::integrity` detects the resulting inconsistencies.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{LibraryError, Result};
use crate::storage::{
    next_id, not_found, Book, BookId, BorrowId, Loan, LoanFilter, LoanStatus, Member, MemberId,
    RecordStore,
};

/// Default loan period in days.
pub const DEFAULT_LOAN_PERIOD_DAYS: u32 = 14;

/// Lending rules applied when a loan is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPolicy {
    pub loan_period_days: u32,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: DEFAULT_LOAN_PERIOD_DAYS,
        }
    }
}

impl LoanPolicy {
    pub fn new(loan_period_days: u32) -> Self {
        Self { loan_period_days }
    }

    /// Due date for a loan opened on `loan_date`.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if the date would overflow the
    /// calendar.
    pub fn due_date(&self, loan_date: NaiveDate) -> Result<NaiveDate> {
        loan_date
            .checked_add_days(Days::new(u64::from(self.loan_period_days)))
            .ok_or_else(|| {
                LibraryError::Validation(format!("loan date {} is out of range", loan_date))
            })
    }
}

/// Opens and closes loans, keeping book and member counters in step.
pub struct LoanManager<'a> {
    books: &'a mut dyn RecordStore<Book>,
    members: &'a mut dyn RecordStore<Member>,
    loans: &'a mut dyn RecordStore<Loan>,
    policy: LoanPolicy,
}

impl<'a> LoanManager<'a> {
    pub fn new(
        books: &'a mut dyn RecordStore<Book>,
        members: &'a mut dyn RecordStore<Member>,
        loans: &'a mut dyn RecordStore<Loan>,
        policy: LoanPolicy,
    ) -> Self {
        Self {
            books,
            members,
            loans,
            policy,
        }
    }

    /// Lend one copy of a book to a member.
    ///
    /// On success the new loan is open and due `loan_period_days` after
    /// `loan_date`, the book has one more copy out and the member's lifetime
    /// borrow count is incremented.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the book or member does not exist
    /// - `Unavailable` if every copy is already out
    /// - `Conflict` if the member is inactive
    pub fn borrow_book(
        &mut self,
        book_id: BookId,
        member_id: MemberId,
        loan_date: NaiveDate,
    ) -> Result<Loan> {
        let mut book = self.books.find(book_id)?;
        let mut member = self.members.find(member_id)?;

        if book.borrowed >= book.copies {
            return Err(LibraryError::Unavailable(format!(
                "book {} has no free copies ({} of {} out)",
                book_id, book.borrowed, book.copies
            )));
        }
        if !member.is_active() {
            return Err(LibraryError::Conflict(format!(
                "member {} is inactive",
                member_id
            )));
        }

        let due_date = self.policy.due_date(loan_date)?;
        let mut loans = self.loans.load()?;
        let loan = Loan {
            borrow_id: next_id(&loans),
            book_id,
            member_id,
            loan_date,
            due_date,
            return_date: None,
            status: LoanStatus::Open,
        };
        loans.push(loan.clone());

        book.borrowed += 1;
        member.total_borrows = member.total_borrows.saturating_add(1);

        self.loans.save(&loans)?;
        self.books.upsert(book)?;
        self.members.upsert(member)?;

        tracing::info!(
            borrow_id = loan.borrow_id,
            book_id,
            member_id,
            due_date = %loan.due_date,
            "loan opened"
        );
        Ok(loan)
    }

    /// Close an open loan.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the loan does not exist
    /// - `InvalidState` if it was already returned
    /// - `Validation` if `return_date` is before the loan date
    pub fn return_book(&mut self, borrow_id: BorrowId, return_date: NaiveDate) -> Result<Loan> {
        let mut loans = self.loans.load()?;
        let loan = loans
            .iter_mut()
            .find(|loan| loan.borrow_id == borrow_id)
            .ok_or_else(|| not_found::<Loan>(borrow_id))?;

        if loan.status == LoanStatus::Returned {
            let returned = loan
                .return_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "an unknown date".to_string());
            return Err(LibraryError::InvalidState(format!(
                "loan {} was already returned on {}",
                borrow_id, returned
            )));
        }
        if return_date < loan.loan_date {
            return Err(LibraryError::Validation(format!(
                "return date {} is before loan date {}",
                return_date, loan.loan_date
            )));
        }

        loan.return_date = Some(return_date);
        loan.status = LoanStatus::Returned;
        let closed = loan.clone();

        let book = match self.books.find(closed.book_id) {
            Ok(book) => Some(book),
            Err(LibraryError::NotFound(_)) => None,
            Err(err) => return Err(err),
        };

        self.loans.save(&loans)?;
        match book {
            Some(mut book) => {
                book.borrowed = book.borrowed.saturating_sub(1);
                self.books.upsert(book)?;
            }
            None => tracing::warn!(
                borrow_id,
                book_id = closed.book_id,
                "returned loan references a missing book; copy count not adjusted"
            ),
        }

        tracing::info!(borrow_id, return_date = %return_date, "loan closed");
        Ok(closed)
    }

    pub fn get_loan(&self, borrow_id: BorrowId) -> Result<Loan> {
        self.loans.find(borrow_id)
    }

    /// Loans matching the filter, oldest first.
    pub fn list_loans(&self, filter: &LoanFilter) -> Result<Vec<Loan>> {
        Ok(self
            .loans
            .load()?
            .into_iter()
            .filter(|loan| filter.matches(loan))
            .collect())
    }

    pub fn policy(&self) -> LoanPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemberStatus, MemoryStore};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    struct Fixture {
        books: MemoryStore<Book>,
        members: MemoryStore<Member>,
        loans: MemoryStore<Loan>,
    }

    impl Fixture {
        fn new(copies: u32, status: MemberStatus) -> Self {
            Self {
                books: MemoryStore::with_records(vec![Book {
                    book_id: 1,
                    title: "Dune".to_string(),
                    author: "Frank Herbert".to_string(),
                    year: 1965,
                    copies,
                    borrowed: 0,
                }]),
                members: MemoryStore::with_records(vec![Member {
                    member_id: 1,
                    name: "Ada".to_string(),
                    email: "ada@example.org".to_string(),
                    phone: String::new(),
                    status,
                    total_borrows: 0,
                }]),
                loans: MemoryStore::new(),
            }
        }

        fn manager(&mut self) -> LoanManager<'_> {
            LoanManager::new(
                &mut self.books,
                &mut self.members,
                &mut self.loans,
                LoanPolicy::default(),
            )
        }

        fn total_saves(&self) -> usize {
            self.books.save_count() + self.members.save_count() + self.loans.save_count()
        }
    }

    #[test]
    fn test_borrow_opens_loan_due_in_fourteen_days() {
        let mut fx = Fixture::new(2, MemberStatus::Active);

        let loan = fx.manager().borrow_book(1, 1, date("2024-01-01")).unwrap();

        assert_eq!(loan.borrow_id, 1);
        assert_eq!(loan.status, LoanStatus::Open);
        assert_eq!(loan.due_date, date("2024-01-15"));
        assert_eq!(loan.return_date, None);
        assert_eq!(fx.books.find(1).unwrap().borrowed, 1);
        assert_eq!(fx.members.find(1).unwrap().total_borrows, 1);
        assert_eq!(fx.loans.load().unwrap(), vec![loan]);
    }

    #[test]
    fn test_borrow_ids_increase() {
        let mut fx = Fixture::new(3, MemberStatus::Active);
        let first = fx.manager().borrow_book(1, 1, date("2024-01-01")).unwrap();
        let second = fx.manager().borrow_book(1, 1, date("2024-01-02")).unwrap();
        assert_eq!((first.borrow_id, second.borrow_id), (1, 2));
    }

    #[test]
    fn test_borrow_missing_book_or_member_is_not_found() {
        let mut fx = Fixture::new(1, MemberStatus::Active);
        assert!(matches!(
            fx.manager().borrow_book(9, 1, date("2024-01-01")),
            Err(LibraryError::NotFound(_))
        ));
        assert!(matches!(
            fx.manager().borrow_book(1, 9, date("2024-01-01")),
            Err(LibraryError::NotFound(_))
        ));
        assert_eq!(fx.total_saves(), 0);
    }

    #[test]
    fn test_borrow_with_no_free_copies_is_unavailable_and_writes_nothing() {
        let mut fx = Fixture::new(1, MemberStatus::Active);
        fx.manager().borrow_book(1, 1, date("2024-01-01")).unwrap();
        let books = fx.books.load().unwrap();
        let members = fx.members.load().unwrap();
        let loans = fx.loans.load().unwrap();
        let saves = fx.total_saves();

        let err = fx.manager().borrow_book(1, 1, date("2024-01-02")).unwrap_err();

        assert!(matches!(err, LibraryError::Unavailable(_)));
        assert_eq!(fx.books.load().unwrap(), books);
        assert_eq!(fx.members.load().unwrap(), members);
        assert_eq!(fx.loans.load().unwrap(), loans);
        assert_eq!(fx.total_saves(), saves);
    }

    #[test]
    fn test_borrow_by_inactive_member_is_conflict() {
        let mut fx = Fixture::new(1, MemberStatus::Inactive);
        let err = fx.manager().borrow_book(1, 1, date("2024-01-01")).unwrap_err();
        assert!(matches!(err, LibraryError::Conflict(_)));
        assert_eq!(fx.total_saves(), 0);
    }

    #[test]
    fn test_return_restores_borrowed_count() {
        let mut fx = Fixture::new(2, MemberStatus::Active);
        let before = fx.books.find(1).unwrap().borrowed;
        let loan = fx.manager().borrow_book(1, 1, date("2024-01-01")).unwrap();

        let closed = fx
            .manager()
            .return_book(loan.borrow_id, date("2024-01-10"))
            .unwrap();

        assert_eq!(closed.status, LoanStatus::Returned);
        assert_eq!(closed.return_date, Some(date("2024-01-10")));
        assert_eq!(fx.books.find(1).unwrap().borrowed, before);
        assert_eq!(fx.members.find(1).unwrap().total_borrows, 1);
    }

    #[test]
    fn test_return_unknown_loan_is_not_found() {
        let mut fx = Fixture::new(1, MemberStatus::Active);
        let err = fx.manager().return_book(42, date("2024-01-01")).unwrap_err();
        assert!(matches!(err, LibraryError::NotFound(ref m) if m == "loan 42"));
    }

    #[test]
    fn test_return_twice_is_invalid_state() {
        let mut fx = Fixture::new(1, MemberStatus::Active);
        let loan = fx.manager().borrow_book(1, 1, date("2024-01-01")).unwrap();
        fx.manager().return_book(loan.borrow_id, date("2024-01-02")).unwrap();

        let err = fx
            .manager()
            .return_book(loan.borrow_id, date("2024-01-03"))
            .unwrap_err();

        assert!(matches!(err, LibraryError::InvalidState(_)));
        assert_eq!(fx.books.find(1).unwrap().borrowed, 0);
    }

    #[test]
    fn test_return_before_loan_date_is_validation_error() {
        let mut fx = Fixture::new(1, MemberStatus::Active);
        let loan = fx.manager().borrow_book(1, 1, date("2024-01-05")).unwrap();
        let err = fx
            .manager()
            .return_book(loan.borrow_id, date("2024-01-04"))
            .unwrap_err();
        assert!(matches!(err, LibraryError::Validation(_)));
        assert!(fx.loans.find(loan.borrow_id).unwrap().is_open());
    }

    #[test]
    fn test_return_when_book_was_removed_still_closes_loan() {
        let mut fx = Fixture::new(1, MemberStatus::Active);
        let loan = fx.manager().borrow_book(1, 1, date("2024-01-01")).unwrap();
        fx.books = MemoryStore::new();

        let closed = fx
            .manager()
            .return_book(loan.borrow_id, date("2024-01-02"))
            .unwrap();

        assert_eq!(closed.status, LoanStatus::Returned);
        assert_eq!(fx.books.save_count(), 0);
    }

    #[test]
    fn test_custom_loan_period() {
        let policy = LoanPolicy::new(7);
        assert_eq!(policy.due_date(date("2024-02-25")).unwrap(), date("2024-03-03"));
    }

    #[test]
    fn test_borrowed_never_exceeds_copies() {
        let mut fx = Fixture::new(2, MemberStatus::Active);
        let mut open = Vec::new();
        for day in 1..=6 {
            let on = date(&format!("2024-03-{:02}", day));
            match fx.manager().borrow_book(1, 1, on) {
                Ok(loan) => open.push(loan.borrow_id),
                Err(LibraryError::Unavailable(_)) => {
                    let id = open.remove(0);
                    fx.manager().return_book(id, on).unwrap();
                }
                Err(other) => panic!("unexpected error: {other:?}"),
            }
            let book = fx.books.find(1).unwrap();
            assert!(book.borrowed <= book.copies);
            assert_eq!(book.borrowed as usize, open.len());
        }
    }

    #[test]
    fn test_list_open_loans_for_member() {
        let mut fx = Fixture::new(2, MemberStatus::Active);
        let first = fx.manager().borrow_book(1, 1, date("2024-01-01")).unwrap();
        fx.manager().borrow_book(1, 1, date("2024-01-02")).unwrap();
        fx.manager().return_book(first.borrow_id, date("2024-01-03")).unwrap();

        let open = fx
            .manager()
            .list_loans(&LoanFilter::new().member(1).open_only())
            .unwrap();

        assert_eq!(open.len(), 1);
        assert_eq!(open[0].borrow_id, 2);
    }
}
