use library_core::{MemberFilter, MemberStatus, MemberUpdate, NewMember};

use super::Shell;
use crate::output::members_table;
use crate::ui::{badge, hint, receipt, Badge};

const MEMBERS_MENU: [&str; 5] = ["Add", "View", "Update", "Delete", "Back"];

impl Shell<'_> {
    pub(super) fn members_menu(&mut self) -> anyhow::Result<()> {
        loop {
            let result = match self.prompter.select("Members", &MEMBERS_MENU)? {
                0 => self.add_members(),
                1 => self.view_members(),
                2 => self.update_member(),
                3 => self.delete_member(),
                _ => return Ok(()),
            };
            self.recover(result)?;
        }
    }

    fn add_members(&mut self) -> anyhow::Result<()> {
        let count: usize = self.ask_number("How many members to add?")?;
        for n in 1..=count {
            if count > 1 {
                self.say(&format!("Member {} of {}", n, count))?;
            }
            let result = self.add_one_member();
            self.recover(result)?;
        }
        Ok(())
    }

    fn add_one_member(&mut self) -> anyhow::Result<()> {
        let name = self.ask_text("Name")?;
        let email = self.ask_text("Email")?;
        let phone = self.ask_text("Phone")?;

        let member = self.library.directory().add_member(
            NewMember::new(name)
                .with_email(email)
                .with_phone(phone),
        )?;
        self.ok(&format!("Added member id {}", member.member_id))
    }

    fn view_members(&mut self) -> anyhow::Result<()> {
        let members = self.library.directory().list_members(&MemberFilter::new())?;
        if members.is_empty() {
            return self.say("No members.");
        }
        let table = members_table(&self.ui, &members);
        self.say(&table)
    }

    fn update_member(&mut self) -> anyhow::Result<()> {
        let member_id: u32 = self.ask_number("Member ID to update")?;
        let member = self.library.directory().get_member(member_id)?;

        let line = hint(&self.ui, "Leave blank to keep current.");
        self.say(&line)?;
        let mut update = MemberUpdate::new();
        if let Some(name) = self.ask_change("Name", &member.name)? {
            update = update.name(name);
        }
        if let Some(email) = self.ask_change("Email", &member.email)? {
            update = update.email(email);
        }
        if let Some(phone) = self.ask_change("Phone", &member.phone)? {
            update = update.phone(phone);
        }
        if let Some(status) = self.ask_status(member.status)? {
            update = update.status(status);
        }

        let member = self.library.directory().update_member(member_id, update)?;
        let text = receipt(
            &self.ui,
            "Updated member",
            &[
                ("Member ID", member.member_id.to_string()),
                ("Name", member.name.clone()),
                ("Status", member.status.to_string()),
            ],
        );
        self.say(&text)
    }

    fn ask_status(&mut self, current: MemberStatus) -> anyhow::Result<Option<MemberStatus>> {
        let prompt = format!("Status (active/inactive) [{}]", current);
        loop {
            let answer = self.ask_text(&prompt)?;
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse::<MemberStatus>() {
                Ok(status) => return Ok(Some(status)),
                Err(_) => self.say("Please enter active or inactive.")?,
            }
        }
    }

    fn delete_member(&mut self) -> anyhow::Result<()> {
        let member_id: u32 = self.ask_number("Member ID to delete")?;
        let member = self.library.directory().get_member(member_id)?;
        if !self
            .prompter
            .confirm(&format!("Delete member \"{}\"?", member.name), false)?
        {
            let line = badge(&self.ui, Badge::Warn, "Cancelled.");
            return self.say(&line);
        }
        self.library.directory().delete_member(member_id)?;
        self.ok(&format!("Deleted member {}", member_id))
    }
}

#[cfg(test)]
mod tests {
    use library_core::{Library, LoanPolicy, MemberStatus};

    use super::super::tests::{date, run_script, sample_library};

    #[test]
    fn test_add_members_allocates_ids() {
        let mut library = sample_library();
        let out = run_script(
            &mut library,
            &[
                "Manage members", "Add", "2",
                "Katherine", "kj@example.org", "",
                "  ", "", "",
                "Back", "Exit",
            ],
        );

        assert!(out.contains("Member 1 of 2"));
        assert!(out.contains("[OK] Added member id 3"));
        assert!(out.contains("error=Validation error: name must not be blank"));
        let katherine = library.directory().get_member(3).unwrap();
        assert_eq!(katherine.email, "kj@example.org");
    }

    #[test]
    fn test_update_member_status_reasks_until_valid() {
        let mut library = sample_library();
        let out = run_script(
            &mut library,
            &[
                "Manage members", "Update", "1", "", "", "", "paused", "Inactive",
                "Back", "Exit",
            ],
        );

        assert!(out.contains("Please enter active or inactive."));
        assert!(out.contains("status=inactive"));
        let ada = library.directory().get_member(1).unwrap();
        assert_eq!(ada.status, MemberStatus::Inactive);
        assert_eq!(ada.name, "Ada");
    }

    #[test]
    fn test_delete_member_with_open_loan_is_refused() {
        let mut library = sample_library();
        library.loans().borrow_book(1, 2, date("2024-01-01")).unwrap();

        let out = run_script(
            &mut library,
            &["Manage members", "Delete", "2", "y", "View", "Back", "Exit"],
        );

        assert!(out.contains("error=Conflict: member 2 has 1 open loan"));
        assert!(out.contains("Grace"));
    }

    #[test]
    fn test_view_members_when_empty() {
        let mut library = Library::in_memory(LoanPolicy::default());
        let out = run_script(&mut library, &["Manage members", "View", "Back", "Exit"]);
        assert_eq!(out, "No members.\nGoodbye.\n");
    }
}
