//! Interactive menu shell.
//!
//! The shell drives a `Library` session from a `Prompter` and writes to any
//! `Write` sink. Core errors are shown and the menu carries on; anything else
//! (a closed terminal, a failed write) ends the session.

mod books;
mod loans;
mod members;
mod reports;

use std::io::Write;
use std::str::FromStr;

use chrono::NaiveDate;
use library_core::{Library, LibraryError};

use crate::constants::DEFAULT_FREQUENT_BORROWER_THRESHOLD;
use crate::ui::prompt::Prompter;
use crate::ui::render::error_message;
use crate::ui::{badge, Badge, UiContext};

const MAIN_MENU: [&str; 5] = [
    "Manage books",
    "Manage members",
    "Borrow / return",
    "Reports",
    "Exit",
];

pub struct Shell<'a> {
    library: &'a mut Library,
    ui: UiContext,
    prompter: &'a mut dyn Prompter,
    out: &'a mut dyn Write,
    clock: Box<dyn Fn() -> NaiveDate + 'a>,
    threshold: u32,
}

impl<'a> Shell<'a> {
    /// `clock` is read for every action, so a long session keeps dates current.
    pub fn new(
        library: &'a mut Library,
        ui: UiContext,
        prompter: &'a mut dyn Prompter,
        out: &'a mut dyn Write,
        clock: impl Fn() -> NaiveDate + 'a,
    ) -> Self {
        Self {
            library,
            ui,
            prompter,
            out,
            clock: Box::new(clock),
            threshold: DEFAULT_FREQUENT_BORROWER_THRESHOLD,
        }
    }

    /// Frequent borrowers in the report have more than `threshold` borrows.
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Run the main menu until the user picks Exit.
    pub fn run(&mut self) -> anyhow::Result<()> {
        tracing::debug!("shell started");
        loop {
            match self.prompter.select("Library", &MAIN_MENU)? {
                0 => self.books_menu()?,
                1 => self.members_menu()?,
                2 => self.loans_menu()?,
                3 => {
                    let result = self.show_report();
                    self.recover(result)?;
                }
                _ => {
                    self.say("Goodbye.")?;
                    return Ok(());
                }
            }
        }
    }

    fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Show a core error and keep going; propagate everything else.
    fn recover(&mut self, result: anyhow::Result<()>) -> anyhow::Result<()> {
        let err = match result {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };
        match err.downcast_ref::<LibraryError>() {
            Some(library_err) => {
                tracing::debug!(kind = library_err.kind(), "menu action failed");
                let message = error_message(&self.ui, &library_err.to_string(), None);
                self.say(&message)
            }
            None => Err(err),
        }
    }

    fn say(&mut self, text: &str) -> anyhow::Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    fn ok(&mut self, text: &str) -> anyhow::Result<()> {
        let line = badge(&self.ui, Badge::Ok, text);
        self.say(&line)
    }

    fn ask_text(&mut self, prompt: &str) -> anyhow::Result<String> {
        Ok(self.prompter.text(prompt)?.trim().to_string())
    }

    /// Re-asks until the answer parses.
    fn ask_number<T: FromStr>(&mut self, prompt: &str) -> anyhow::Result<T> {
        loop {
            let answer = self.ask_text(prompt)?;
            match answer.parse::<T>() {
                Ok(value) => return Ok(value),
                Err(_) => self.say("Please enter a valid number.")?,
            }
        }
    }

    /// Like `ask_number`, but a blank answer is `None`.
    fn ask_optional_number<T: FromStr>(&mut self, prompt: &str) -> anyhow::Result<Option<T>> {
        loop {
            let answer = self.ask_text(prompt)?;
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => self.say("Please enter a valid number.")?,
            }
        }
    }

    /// Blank keeps the current value.
    fn ask_change(&mut self, label: &str, current: &str) -> anyhow::Result<Option<String>> {
        let answer = self.ask_text(&format!("{} [{}]", label, current))?;
        Ok(if answer.is_empty() { None } else { Some(answer) })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use library_core::{LoanPolicy, NewBook, NewMember};

    use crate::ui::prompt::ScriptedPrompter;
    use crate::ui::render::tests::plain_ctx;

    pub(crate) fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Book 1 "Dune" (one copy), members Ada (1) and Grace (2).
    pub(crate) fn sample_library() -> Library {
        let mut library = Library::in_memory(LoanPolicy::default());
        library
            .catalog()
            .add_book(NewBook::new(1, "Dune", "Frank Herbert").with_year(1965))
            .unwrap();
        library.directory().add_member(NewMember::new("Ada")).unwrap();
        library.directory().add_member(NewMember::new("Grace")).unwrap();
        library
    }

    /// Run the shell on 2024-01-01 and return what it printed.
    pub(crate) fn run_script(library: &mut Library, answers: &[&str]) -> String {
        let mut prompter = ScriptedPrompter::new(answers);
        let mut out: Vec<u8> = Vec::new();
        Shell::new(library, plain_ctx(), &mut prompter, &mut out, || {
            date("2024-01-01")
        })
        .run()
        .unwrap();
        assert_eq!(prompter.remaining(), 0, "unused answers");
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_exit_ends_session() {
        let mut library = sample_library();
        let out = run_script(&mut library, &["Exit"]);
        assert_eq!(out, "Goodbye.\n");
    }

    #[test]
    fn test_closed_prompt_propagates() {
        let mut library = sample_library();
        let mut prompter = ScriptedPrompter::new(&["Manage books"]);
        let mut out: Vec<u8> = Vec::new();

        let result = Shell::new(
            &mut library,
            plain_ctx(),
            &mut prompter,
            &mut out,
            || date("2024-01-01"),
        )
        .run();

        assert!(result.is_err());
    }

    #[test]
    fn test_report_from_menu_uses_threshold() {
        let mut library = sample_library();
        library.loans().borrow_book(1, 1, date("2024-01-01")).unwrap();
        let mut prompter = ScriptedPrompter::new(&["Reports", "Exit"]);
        let mut out: Vec<u8> = Vec::new();

        Shell::new(
            &mut library,
            plain_ctx(),
            &mut prompter,
            &mut out,
            || date("2024-01-20"),
        )
        .with_threshold(0)
        .run()
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("library report"));
        assert!(out.contains("overdue_loans=1"));
        assert!(out.contains("1\tAda\t1"));
    }
}
