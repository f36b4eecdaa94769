use std::fs;

use chrono::NaiveDate;
use library_core::{
    Book, FileStore, LibraryError, Loan, LoanStatus, Member, MemberStatus, RecordStore,
};
use tempfile::tempdir;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

#[test]
fn test_books_round_trip_in_order() {
    let dir = tempdir().expect("tempdir");
    let mut store = FileStore::<Book>::open(dir.path()).expect("open should succeed");
    let books = vec![
        Book {
            book_id: 30,
            title: "Ulysses".to_string(),
            author: "James Joyce".to_string(),
            year: 1922,
            copies: 1,
            borrowed: 1,
        },
        Book {
            book_id: 4,
            title: "Dune, \"special\" edition".to_string(),
            author: String::new(),
            year: -50,
            copies: 0,
            borrowed: 0,
        },
    ];

    store.save(&books).expect("save should succeed");

    let reopened = FileStore::<Book>::open(dir.path()).expect("reopen should succeed");
    assert_eq!(reopened.load().expect("load should succeed"), books);
}

#[test]
fn test_loans_round_trip_with_and_without_return_date() {
    let dir = tempdir().expect("tempdir");
    let mut store = FileStore::<Loan>::open(dir.path()).expect("open should succeed");
    let loans = vec![
        Loan {
            borrow_id: 1,
            book_id: 1,
            member_id: 1,
            loan_date: date("2024-01-01"),
            due_date: date("2024-01-15"),
            return_date: Some(date("2024-01-09")),
            status: LoanStatus::Returned,
        },
        Loan {
            borrow_id: 2,
            book_id: 1,
            member_id: 2,
            loan_date: date("2024-02-28"),
            due_date: date("2024-03-13"),
            return_date: None,
            status: LoanStatus::Open,
        },
    ];

    store.save(&loans).expect("save should succeed");

    assert_eq!(store.load().expect("load should succeed"), loans);
    let raw = fs::read_to_string(store.path()).expect("read should succeed");
    assert!(raw.contains("\"loan_date\":\"2024-02-28\""));
    assert!(raw.contains("\"return_date\":null"));
    assert!(raw.contains("\"status\":\"returned\""));
}

#[test]
fn test_upsert_keeps_position_and_delete_removes() {
    let dir = tempdir().expect("tempdir");
    let mut store = FileStore::<Member>::open(dir.path()).expect("open should succeed");
    let member = |id: u32, name: &str| Member {
        member_id: id,
        name: name.to_string(),
        email: String::new(),
        phone: String::new(),
        status: MemberStatus::Active,
        total_borrows: 0,
    };
    store
        .save(&[member(1, "Ada"), member(2, "Grace"), member(3, "Alan")])
        .expect("save should succeed");

    let mut renamed = member(2, "Grace Hopper");
    renamed.status = MemberStatus::Inactive;
    store.upsert(renamed).expect("upsert should succeed");
    store.delete(1).expect("delete should succeed");

    let names: Vec<_> = store
        .load()
        .expect("load should succeed")
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["Grace Hopper", "Alan"]);
    assert!(matches!(store.delete(1), Err(LibraryError::NotFound(_))));
}

#[test]
fn test_save_leaves_no_temp_files() {
    let dir = tempdir().expect("tempdir");
    let mut store = FileStore::<Book>::open(dir.path()).expect("open should succeed");
    store.save(&[]).expect("first save should succeed");
    store.save(&[]).expect("second save should succeed");

    let entries: Vec<_> = fs::read_dir(dir.path())
        .expect("read_dir should succeed")
        .map(|entry| entry.expect("entry").file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("books.jsonl")]);
}
