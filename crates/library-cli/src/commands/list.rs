use library_core::{BookFilter, LoanFilter, MemberFilter, MemberStatus};

use super::output_format;
use crate::app::AppContext;
use crate::cli::{ListArgs, ListTarget};
use crate::output::{book_json, books_table, loan_json, loans_table, member_json, members_table};
use crate::ui::format::count_noun;
use crate::ui::{badge, header, print, Badge, UiContext};

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let format = output_format(args.json, args.format.as_deref())?;
    let ui = ctx.ui(args.json, format)?;
    let mut library = ctx.open_existing_library()?;

    let (json, rendered, count, noun) = match args.target {
        ListTarget::Books => {
            let mut filter = BookFilter::new();
            if args.open {
                filter = filter.available_only();
            }
            let books = library.catalog().list_books(&filter)?;
            (
                serde_json::Value::Array(books.iter().map(book_json).collect()),
                books_table(&ui, &books),
                books.len(),
                "book",
            )
        }
        ListTarget::Members => {
            let mut filter = MemberFilter::new();
            if args.open {
                filter = filter.status(MemberStatus::Active);
            }
            let members = library.directory().list_members(&filter)?;
            (
                serde_json::Value::Array(members.iter().map(member_json).collect()),
                members_table(&ui, &members),
                members.len(),
                "member",
            )
        }
        ListTarget::Loans => {
            let mut filter = LoanFilter::new();
            if args.open {
                filter = filter.open_only();
            }
            let loans = library.reports().loans(&filter, ctx.today())?;
            (
                serde_json::Value::Array(loans.iter().map(loan_json).collect()),
                loans_table(&ui, &loans),
                loans.len(),
                "loan",
            )
        }
    };

    if ui.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    if count == 0 {
        if !ctx.quiet() {
            print(&ui, &badge(&ui, Badge::Info, &format!("No {}s.", noun)));
        }
        return Ok(());
    }

    print_title(&ui, ctx.quiet(), target_name(args.target), &count_noun(count, noun));
    print(&ui, &rendered);
    Ok(())
}

fn print_title(ui: &UiContext, quiet: bool, command: &str, context: &str) {
    if quiet || !ui.mode.is_pretty() {
        return;
    }
    print(ui, &header(ui, command, Some(context)));
}

fn target_name(target: ListTarget) -> &'static str {
    match target {
        ListTarget::Books => "books",
        ListTarget::Members => "members",
        ListTarget::Loans => "loans",
    }
}
