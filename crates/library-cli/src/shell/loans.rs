use library_core::LoanFilter;

use super::Shell;
use crate::output::loans_table;
use crate::ui::format::{count_noun, format_date, format_optional_date};
use crate::ui::receipt;

const LOANS_MENU: [&str; 4] = ["Borrow", "Return", "View loans", "Back"];

impl Shell<'_> {
    pub(super) fn loans_menu(&mut self) -> anyhow::Result<()> {
        loop {
            let result = match self.prompter.select("Borrow / return", &LOANS_MENU)? {
                0 => self.borrow(),
                1 => self.give_back(),
                2 => self.view_loans(),
                _ => return Ok(()),
            };
            self.recover(result)?;
        }
    }

    fn borrow(&mut self) -> anyhow::Result<()> {
        let book_id: u32 = self.ask_number("Book ID")?;
        let member_id: u32 = self.ask_number("Member ID")?;

        let today = self.today();
        let loan = self.library.loans().borrow_book(book_id, member_id, today)?;
        let text = receipt(
            &self.ui,
            "Borrowed",
            &[
                ("Borrow ID", loan.borrow_id.to_string()),
                ("Book ID", loan.book_id.to_string()),
                ("Member ID", loan.member_id.to_string()),
                ("Due date", format_date(loan.due_date)),
            ],
        );
        self.say(&text)
    }

    fn give_back(&mut self) -> anyhow::Result<()> {
        let borrow_id: u32 = self.ask_number("Borrow ID")?;
        let today = self.today();
        let loan = self.library.loans().return_book(borrow_id, today)?;

        let mut items = vec![
            ("Borrow ID", loan.borrow_id.to_string()),
            ("Returned", format_optional_date(loan.return_date)),
        ];
        let late = (today - loan.due_date).num_days();
        if late > 0 {
            items.push(("Late by", count_noun(late as usize, "day")));
        }
        let text = receipt(&self.ui, "Returned", &items);
        self.say(&text)
    }

    fn view_loans(&mut self) -> anyhow::Result<()> {
        let today = self.today();
        let loans = self.library.reports().loans(&LoanFilter::new(), today)?;
        if loans.is_empty() {
            return self.say("No loans.");
        }
        let table = loans_table(&self.ui, &loans);
        self.say(&table)
    }
}
