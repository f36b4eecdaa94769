//! Member directory: registering, editing, removing and listing members.

use crate::catalog::required_text;
use crate::error::{LibraryError, Result};
use crate::storage::{
    next_id, Loan, Member, MemberFilter, MemberId, MemberStatus, MemberUpdate, NewMember,
    RecordStore,
};

/// Business rules over the member store.
pub struct Directory<'a> {
    members: &'a mut dyn RecordStore<Member>,
    loans: &'a dyn RecordStore<Loan>,
}

impl<'a> Directory<'a> {
    pub fn new(members: &'a mut dyn RecordStore<Member>, loans: &'a dyn RecordStore<Loan>) -> Self {
        Self { members, loans }
    }

    /// Register an active member with no borrows.
    ///
    /// Without an explicit id the next id is allocated past every member id
    /// seen so far, including deleted members that still appear on loans.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if the name is blank, or an explicit
    /// id is taken or still referenced by a loan.
    pub fn add_member(&mut self, new: NewMember) -> Result<Member> {
        let name = required_text("name", &new.name)?;

        let mut members = self.members.load()?;
        let loans = self.loans.load()?;
        let member_id = match new.member_id {
            Some(id) if members.iter().any(|m| m.member_id == id) => {
                return Err(LibraryError::Validation(format!(
                    "member {} already exists",
                    id
                )));
            }
            Some(id) if loans.iter().any(|loan| loan.member_id == id) => {
                return Err(LibraryError::Validation(format!(
                    "member id {} belongs to a deleted member's loan history",
                    id
                )));
            }
            Some(id) => id,
            None => {
                let past_loans = loans
                    .iter()
                    .map(|loan| loan.member_id.saturating_add(1))
                    .max()
                    .unwrap_or(1);
                next_id(&members).max(past_loans)
            }
        };

        let member = Member {
            member_id,
            name,
            email: new.email.trim().to_string(),
            phone: new.phone.trim().to_string(),
            status: MemberStatus::Active,
            total_borrows: 0,
        };
        members.push(member.clone());
        self.members.save(&members)?;

        tracing::info!(member_id, "member added");
        Ok(member)
    }

    /// Apply a partial update. `total_borrows` is never touched here.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the member does not exist, or `Validation` for a
    /// blank name.
    pub fn update_member(&mut self, member_id: MemberId, update: MemberUpdate) -> Result<Member> {
        let mut member = self.members.find(member_id)?;

        if let Some(name) = update.name {
            member.name = required_text("name", &name)?;
        }
        if let Some(email) = update.email {
            member.email = email.trim().to_string();
        }
        if let Some(phone) = update.phone {
            member.phone = phone.trim().to_string();
        }
        if let Some(status) = update.status {
            member.status = status;
        }

        self.members.upsert(member.clone())?;
        tracing::info!(member_id, status = %member.status, "member updated");
        Ok(member)
    }

    /// Remove a member with no open loans.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the member does not exist, or `Conflict` while the
    /// member holds an open loan.
    pub fn delete_member(&mut self, member_id: MemberId) -> Result<Member> {
        self.members.find(member_id)?;

        let open = self
            .loans
            .load()?
            .iter()
            .filter(|loan| loan.is_open() && loan.member_id == member_id)
            .count();
        if open > 0 {
            return Err(LibraryError::Conflict(format!(
                "member {} has {} open loan{}",
                member_id,
                open,
                if open == 1 { "" } else { "s" }
            )));
        }

        let removed = self.members.delete(member_id)?;
        tracing::info!(member_id, "member deleted");
        Ok(removed)
    }

    pub fn get_member(&self, member_id: MemberId) -> Result<Member> {
        self.members.find(member_id)
    }

    /// Members matching the filter, in insertion order.
    pub fn list_members(&self, filter: &MemberFilter) -> Result<Vec<Member>> {
        Ok(self
            .members
            .load()?
            .into_iter()
            .filter(|member| filter.matches(member))
            .collect())
    }
}
