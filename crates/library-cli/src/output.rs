//! Output formatting helpers shared by commands and the shell.

use library_core::{Book, LoanView, Member};

use crate::ui::format::{format_date, format_optional_date, or_dash};
use crate::ui::render::{table, Column};
use crate::ui::UiContext;

/// Convert a book to JSON, including the derived fields.
pub fn book_json(book: &Book) -> serde_json::Value {
    serde_json::json!({
        "book_id": book.book_id,
        "title": book.title,
        "author": book.author,
        "year": book.year,
        "copies": book.copies,
        "borrowed": book.borrowed,
        "available": book.available(),
        "status": book.status().as_str(),
    })
}

pub fn member_json(member: &Member) -> serde_json::Value {
    serde_json::json!({
        "member_id": member.member_id,
        "name": member.name,
        "email": member.email,
        "phone": member.phone,
        "status": member.status.as_str(),
        "total_borrows": member.total_borrows,
    })
}

pub fn loan_json(view: &LoanView) -> serde_json::Value {
    serde_json::json!({
        "borrow_id": view.loan.borrow_id,
        "book_id": view.loan.book_id,
        "book_title": view.book_title,
        "member_id": view.loan.member_id,
        "member_name": view.member_name,
        "loan_date": format_date(view.loan.loan_date),
        "due_date": format_date(view.loan.due_date),
        "return_date": view.loan.return_date.map(format_date),
        "state": view.state.as_str(),
        "days_overdue": view.days_overdue,
    })
}

pub fn books_table(ctx: &UiContext, books: &[Book]) -> String {
    let columns = [
        Column::new("ID"),
        Column::with_max_width("Title", 40),
        Column::with_max_width("Author", 24),
        Column::new("Year"),
        Column::new("Copies"),
        Column::new("Borrowed"),
        Column::new("Status"),
    ];
    let rows: Vec<Vec<String>> = books
        .iter()
        .map(|book| {
            vec![
                book.book_id.to_string(),
                book.title.clone(),
                or_dash(&book.author),
                book.year.to_string(),
                book.copies.to_string(),
                book.borrowed.to_string(),
                book.status().to_string(),
            ]
        })
        .collect();
    table(ctx, &columns, &rows)
}

pub fn members_table(ctx: &UiContext, members: &[Member]) -> String {
    let columns = [
        Column::new("ID"),
        Column::with_max_width("Name", 30),
        Column::with_max_width("Email", 30),
        Column::new("Phone"),
        Column::new("Status"),
        Column::new("Borrows"),
    ];
    let rows: Vec<Vec<String>> = members
        .iter()
        .map(|member| {
            vec![
                member.member_id.to_string(),
                member.name.clone(),
                or_dash(&member.email),
                or_dash(&member.phone),
                member.status.to_string(),
                member.total_borrows.to_string(),
            ]
        })
        .collect();
    table(ctx, &columns, &rows)
}

pub fn loans_table(ctx: &UiContext, loans: &[LoanView]) -> String {
    let columns = [
        Column::new("Borrow ID"),
        Column::with_max_width("Book", 30),
        Column::with_max_width("Member", 24),
        Column::new("Loaned"),
        Column::new("Due"),
        Column::new("Returned"),
        Column::new("State"),
    ];
    let rows: Vec<Vec<String>> = loans
        .iter()
        .map(|view| {
            let state = if view.days_overdue > 0 {
                format!("{} ({}d)", view.state, view.days_overdue)
            } else {
                view.state.to_string()
            };
            vec![
                view.loan.borrow_id.to_string(),
                view.book_title.clone(),
                view.member_name.clone(),
                format_date(view.loan.loan_date),
                format_date(view.loan.due_date),
                format_optional_date(view.loan.return_date),
                state,
            ]
        })
        .collect();
    table(ctx, &columns, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use library_core::{Loan, LoanState, LoanStatus, MemberStatus};

    use crate::ui::render::tests::plain_ctx;

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

    #[test]
    fn test_book_json_has_derived_fields() {
        let value = book_json(&book(2, 2));
        assert_eq!(value["available"], 0);
        assert_eq!(value["status"], "unavailable");
    }

    #[test]
    fn test_member_json_status() {
        let member = Member {
            member_id: 4,
            name: "Ada".to_string(),
            email: String::new(),
            phone: String::new(),
            status: MemberStatus::Inactive,
            total_borrows: 9,
        };
        assert_eq!(member_json(&member)["status"], "inactive");
    }

    #[test]
    fn test_loan_json_open_has_null_return_date() {
        let view = LoanView {
            loan: Loan {
                borrow_id: 2,
                book_id: 1,
                member_id: 1,
                loan_date: date("2024-01-01"),
                due_date: date("2024-01-15"),
                return_date: None,
                status: LoanStatus::Open,
            },
            book_title: "Dune".to_string(),
            member_name: "Ada".to_string(),
            state: LoanState::Overdue,
            days_overdue: 3,
        };

        let value = loan_json(&view);

        assert!(value["return_date"].is_null());
        assert_eq!(value["due_date"], "2024-01-15");
        assert_eq!(value["state"], "overdue");

        let rendered = loans_table(&plain_ctx(), &[view]);
        assert!(rendered.contains("overdue (3d)"));
    }

    #[test]
    fn test_books_table_plain_rows() {
        let rendered = books_table(&plain_ctx(), &[book(2, 1)]);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "id\ttitle\tauthor\tyear\tcopies\tborrowed\tstatus");
        assert_eq!(lines[1], "1\tDune\tFrank Herbert\t1965\t2\t1\tavailable");
    }
}
