//! Book catalog: adding, editing, removing and listing books.

use crate::error::{LibraryError, Result};
use crate::storage::{Book, BookFilter, BookId, BookUpdate, Loan, NewBook, RecordStore};

/// Business rules over the book store.
///
/// Borrowing and returning adjust `Book::borrowed` through the loan manager;
/// the catalog only guards the invariant `borrowed <= copies` on edits.
pub struct Catalog<'a> {
    books: &'a mut dyn RecordStore<Book>,
    loans: &'a dyn RecordStore<Loan>,
}

impl<'a> Catalog<'a> {
    pub fn new(books: &'a mut dyn RecordStore<Book>, loans: &'a dyn RecordStore<Loan>) -> Self {
        Self { books, loans }
    }

    /// Add a book with no copies out.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if the id is taken, the title is
    /// blank, or `copies` is negative.
    pub fn add_book(&mut self, new: NewBook) -> Result<Book> {
        let title = required_text("title", &new.title)?;
        let copies = copies_from(new.copies)?;

        let mut books = self.books.load()?;
        if books.iter().any(|book| book.book_id == new.book_id) {
            return Err(LibraryError::Validation(format!(
                "book {} already exists",
                new.book_id
            )));
        }

        let book = Book {
            book_id: new.book_id,
            title,
            author: new.author.trim().to_string(),
            year: new.year,
            copies,
            borrowed: 0,
        };
        books.push(book.clone());
        self.books.save(&books)?;

        tracing::info!(book_id = book.book_id, copies = book.copies, "book added");
        Ok(book)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the book does not exist
    /// - `Validation` for a blank title or negative copies
    /// - `Conflict` if `copies` would drop below the copies currently out
    pub fn update_book(&mut self, book_id: BookId, update: BookUpdate) -> Result<Book> {
        let mut book = self.books.find(book_id)?;

        if let Some(title) = update.title {
            book.title = required_text("title", &title)?;
        }
        if let Some(author) = update.author {
            book.author = author.trim().to_string();
        }
        if let Some(year) = update.year {
            book.year = year;
        }
        if let Some(copies) = update.copies {
            let copies = copies_from(copies)?;
            if copies < book.borrowed {
                return Err(LibraryError::Conflict(format!(
                    "book {} has {} copies out; cannot reduce copies to {}",
                    book_id, book.borrowed, copies
                )));
            }
            book.copies = copies;
        }

        self.books.upsert(book.clone())?;
        tracing::info!(book_id, "book updated");
        Ok(book)
    }

    /// Remove a book that has no copies out.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the book does not exist, or `Conflict` if any copy
    /// is borrowed or an open loan still references it.
    pub fn delete_book(&mut self, book_id: BookId) -> Result<Book> {
        let book = self.books.find(book_id)?;
        if book.borrowed > 0 {
            return Err(LibraryError::Conflict(format!(
                "book {} has {} copies out on loan",
                book_id, book.borrowed
            )));
        }
        if self
            .loans
            .load()?
            .iter()
            .any(|loan| loan.is_open() && loan.book_id == book_id)
        {
            return Err(LibraryError::Conflict(format!(
                "book {} is referenced by an open loan",
                book_id
            )));
        }

        let removed = self.books.delete(book_id)?;
        tracing::info!(book_id, "book deleted");
        Ok(removed)
    }

    pub fn get_book(&self, book_id: BookId) -> Result<Book> {
        self.books.find(book_id)
    }

    /// Books matching the filter, in insertion order.
    pub fn list_books(&self, filter: &BookFilter) -> Result<Vec<Book>> {
        Ok(self
            .books
            .load()?
            .into_iter()
            .filter(|book| filter.matches(book))
            .collect())
    }

    /// Whether a book exists, without failing on a missing key.
    pub fn contains(&self, book_id: BookId) -> Result<bool> {
        self.books.contains(book_id)
    }
}

pub(crate) fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LibraryError::Validation(format!("{} must not be blank", field)));
    }
    Ok(trimmed.to_string())
}

fn copies_from(value: i64) -> Result<u32> {
    if value < 0 {
        return Err(LibraryError::Validation(format!(
            "copies must be zero or greater (got {})",
            value
        )));
    }
    u32::try_from(value)
        .map_err(|_| LibraryError::Validation(format!("copies is too large: {}", value)))
}
