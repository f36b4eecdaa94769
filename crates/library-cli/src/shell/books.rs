use library_core::{BookFilter, BookUpdate, NewBook};

use super::Shell;
use crate::output::books_table;
use crate::ui::{badge, hint, receipt, Badge};

const BOOKS_MENU: [&str; 5] = ["Add", "View", "Update", "Delete", "Back"];

impl Shell<'_> {
    pub(super) fn books_menu(&mut self) -> anyhow::Result<()> {
        loop {
            let result = match self.prompter.select("Books", &BOOKS_MENU)? {
                0 => self.add_books(),
                1 => self.view_books(),
                2 => self.update_book(),
                3 => self.delete_book(),
                _ => return Ok(()),
            };
            self.recover(result)?;
        }
    }

    fn add_books(&mut self) -> anyhow::Result<()> {
        let count: usize = self.ask_number("How many books to add?")?;
        for n in 1..=count {
            if count > 1 {
                self.say(&format!("Book {} of {}", n, count))?;
            }
            let result = self.add_one_book();
            self.recover(result)?;
        }
        Ok(())
    }

    fn add_one_book(&mut self) -> anyhow::Result<()> {
        let book_id = loop {
            let id: u32 = self.ask_number("Book ID")?;
            if !self.library.catalog().contains(id)? {
                break id;
            }
            self.say(&format!("Book {} already exists. Choose another ID.", id))?;
        };
        let title = self.ask_text("Title")?;
        let author = self.ask_text("Author")?;
        let year: i32 = self.ask_optional_number("Year (blank if unknown)")?.unwrap_or(0);
        let copies: i64 = self.ask_optional_number("Copies [1]")?.unwrap_or(1);

        let book = self.library.catalog().add_book(
            NewBook::new(book_id, title, author)
                .with_year(year)
                .with_copies(copies),
        )?;
        self.ok(&format!("Added book {}: {}", book.book_id, book.title))
    }

    fn view_books(&mut self) -> anyhow::Result<()> {
        let books = self.library.catalog().list_books(&BookFilter::new())?;
        if books.is_empty() {
            return self.say("No books.");
        }
        let table = books_table(&self.ui, &books);
        self.say(&table)
    }

    fn update_book(&mut self) -> anyhow::Result<()> {
        let book_id: u32 = self.ask_number("Book ID to update")?;
        let book = self.library.catalog().get_book(book_id)?;

        let line = hint(&self.ui, "Leave blank to keep current.");
        self.say(&line)?;
        let mut update = BookUpdate::new();
        if let Some(title) = self.ask_change("Title", &book.title)? {
            update = update.title(title);
        }
        if let Some(author) = self.ask_change("Author", &book.author)? {
            update = update.author(author);
        }
        if let Some(year) = self.ask_optional_number(&format!("Year [{}]", book.year))? {
            update = update.year(year);
        }
        if let Some(copies) = self.ask_optional_number(&format!("Copies [{}]", book.copies))? {
            update = update.copies(copies);
        }

        let book = self.library.catalog().update_book(book_id, update)?;
        let text = receipt(
            &self.ui,
            "Updated book",
            &[
                ("Book ID", book.book_id.to_string()),
                ("Title", book.title.clone()),
                ("Copies", book.copies.to_string()),
                ("Status", book.status().to_string()),
            ],
        );
        self.say(&text)
    }

    fn delete_book(&mut self) -> anyhow::Result<()> {
        let book_id: u32 = self.ask_number("Book ID to delete")?;
        let book = self.library.catalog().get_book(book_id)?;
        if !self
            .prompter
            .confirm(&format!("Delete \"{}\"?", book.title), false)?
        {
            let line = badge(&self.ui, Badge::Warn, "Cancelled.");
            return self.say(&line);
        }
        self.library.catalog().delete_book(book_id)?;
        self.ok(&format!("Deleted book {}", book_id))
    }
}
