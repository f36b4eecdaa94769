use chrono::NaiveDate;
use library_core::{InventoryRow, InventorySummary, Library, LoanState, LoanView, Member};

use super::output_format;
use crate::app::AppContext;
use crate::cli::ReportArgs;
use crate::errors::CliError;
use crate::output::{book_json, loan_json, loans_table, member_json};
use crate::ui::format::{count_noun, format_date, parse_date};
use crate::ui::render::{simple_table, table};
use crate::ui::theme::{styled, styles};
use crate::ui::{divider, header, kv, Column, UiContext};

/// Everything the summary report shows, gathered in one pass.
pub struct SummaryReport {
    pub as_of: NaiveDate,
    pub threshold: u32,
    pub summary: InventorySummary,
    pub inventory: Vec<InventoryRow>,
    pub active_loans: Vec<LoanView>,
    pub frequent_borrowers: Vec<Member>,
}

impl SummaryReport {
    pub fn build(
        library: &Library,
        as_of: NaiveDate,
        threshold: u32,
    ) -> library_core::Result<Self> {
        let reports = library.reports();
        Ok(Self {
            as_of,
            threshold,
            summary: reports.summary()?,
            inventory: reports.inventory()?,
            active_loans: reports.active_loans(as_of)?,
            frequent_borrowers: reports.frequent_borrowers(threshold)?,
        })
    }

    pub fn overdue_count(&self) -> usize {
        self.active_loans
            .iter()
            .filter(|view| view.state == LoanState::Overdue)
            .count()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let inventory: Vec<_> = self
            .inventory
            .iter()
            .map(|row| {
                let mut value = book_json(&row.book);
                value["borrowers"] = serde_json::json!(row.borrowers);
                value
            })
            .collect();
        serde_json::json!({
            "as_of": format_date(self.as_of),
            "summary": self.summary,
            "overdue_loans": self.overdue_count(),
            "inventory": inventory,
            "active_loans": self.active_loans.iter().map(loan_json).collect::<Vec<_>>(),
            "frequent_borrower_threshold": self.threshold,
            "frequent_borrowers": self
                .frequent_borrowers
                .iter()
                .map(member_json)
                .collect::<Vec<_>>(),
        })
    }

    pub fn render(&self, ctx: &UiContext) -> String {
        let as_of = format!("as of {}", format_date(self.as_of));
        let mut out = vec![header(ctx, "report", Some(&as_of)), divider(ctx)];

        out.push(section(ctx, "Inventory"));
        if self.inventory.is_empty() {
            out.push("No books.".to_string());
        } else {
            out.push(self.inventory_table(ctx));
        }

        out.push(section(ctx, "Inventory summary"));
        let s = &self.summary;
        out.push(kv(ctx, "Total titles", &s.total_titles.to_string()));
        out.push(kv(ctx, "Total copies", &s.total_copies.to_string()));
        out.push(kv(ctx, "Borrowed now", &s.borrowed_now.to_string()));
        out.push(kv(ctx, "Available now", &s.available_now.to_string()));
        out.push(kv(
            ctx,
            "Titles unavailable",
            &s.unavailable_titles.to_string(),
        ));
        out.push(kv(
            ctx,
            "Members",
            &format!("{} ({} active)", s.total_members, s.active_members),
        ));
        out.push(kv(ctx, "Open loans", &s.open_loans.to_string()));
        out.push(kv(ctx, "Overdue loans", &self.overdue_count().to_string()));

        out.push(section(ctx, "Active loans"));
        if self.active_loans.is_empty() {
            out.push("No active loans.".to_string());
        } else {
            out.push(loans_table(ctx, &self.active_loans));
        }

        out.push(section(
            ctx,
            &format!(
                "Frequent borrowers (more than {})",
                count_noun(self.threshold as usize, "borrow")
            ),
        ));
        if self.frequent_borrowers.is_empty() {
            out.push("None.".to_string());
        } else {
            let columns = [Column::new("ID"), Column::new("Name"), Column::new("Borrows")];
            let rows: Vec<Vec<String>> = self
                .frequent_borrowers
                .iter()
                .map(|m| {
                    vec![
                        m.member_id.to_string(),
                        m.name.clone(),
                        m.total_borrows.to_string(),
                    ]
                })
                .collect();
            out.push(simple_table(ctx, &columns, &rows));
        }

        out.join("\n")
    }

    fn inventory_table(&self, ctx: &UiContext) -> String {
        let columns = [
            Column::new("ID"),
            Column::with_max_width("Title", 30),
            Column::with_max_width("Author", 20),
            Column::new("Year"),
            Column::new("Copies"),
            Column::new("Borrowed"),
            Column::with_max_width("Borrowers", 30),
            Column::new("Status"),
            Column::new("Avail"),
        ];
        let rows: Vec<Vec<String>> = self
            .inventory
            .iter()
            .map(|row| {
                let borrowers = if row.borrowers.is_empty() {
                    "-".to_string()
                } else {
                    row.borrowers.join(", ")
                };
                vec![
                    row.book.book_id.to_string(),
                    row.book.title.clone(),
                    row.book.author.clone(),
                    row.book.year.to_string(),
                    row.book.copies.to_string(),
                    row.book.borrowed.to_string(),
                    borrowers,
                    row.book.status().to_string(),
                    row.available.to_string(),
                ]
            })
            .collect();
        table(ctx, &columns, &rows)
    }
}

fn section(ctx: &UiContext, title: &str) -> String {
    if ctx.mode.is_pretty() {
        format!("\n{}", styled(title, styles::bold(), ctx.color))
    } else {
        format!("# {}", title.to_lowercase())
    }
}

pub fn handle_report(ctx: &AppContext, args: &ReportArgs) -> anyhow::Result<()> {
    let format = output_format(args.json, args.format.as_deref())?;
    let as_of = match args.as_of.as_deref() {
        Some(value) => parse_date(value).map_err(|e| CliError::invalid_input(e.to_string()))?,
        None => ctx.today(),
    };
    let threshold = ctx.threshold(args.threshold)?;
    let ui = ctx.ui(args.json, format)?;

    let library = ctx.open_existing_library()?;
    let report = SummaryReport::build(&library, as_of, threshold)?;

    if ui.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        println!("{}", report.render(&ui));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use library_core::{LoanPolicy, NewBook, NewMember};

    use crate::ui::render::tests::plain_ctx;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> Library {
        let mut library = Library::in_memory(LoanPolicy::default());
        library
            .catalog()
            .add_book(NewBook::new(1, "Dune", "Frank Herbert").with_copies(2))
            .unwrap();
        library
            .catalog()
            .add_book(NewBook::new(2, "Emma", "Jane Austen"))
            .unwrap();
        library.directory().add_member(NewMember::new("Ada")).unwrap();
        library.directory().add_member(NewMember::new("Grace")).unwrap();
        library.loans().borrow_book(1, 1, date("2024-01-01")).unwrap();
        library.loans().borrow_book(2, 1, date("2024-01-10")).unwrap();
        library.loans().borrow_book(1, 2, date("2024-01-10")).unwrap();
        library
    }

    #[test]
    fn test_report_counts_and_overdue() {
        let library = sample();
        let report = SummaryReport::build(&library, date("2024-01-20"), 1).unwrap();

        assert_eq!(report.summary.borrowed_now, 3);
        assert_eq!(report.summary.available_now, 0);
        assert_eq!(report.overdue_count(), 1);
        assert_eq!(report.frequent_borrowers.len(), 1);
        assert_eq!(report.frequent_borrowers[0].name, "Ada");
        assert_eq!(report.inventory[0].borrowers, vec!["Ada", "Grace"]);
    }

    #[test]
    fn test_report_json_shape() {
        let library = sample();
        let value = SummaryReport::build(&library, date("2024-01-20"), 1)
            .unwrap()
            .to_json();

        assert_eq!(value["as_of"], "2024-01-20");
        assert_eq!(value["summary"]["open_loans"], 3);
        assert_eq!(value["overdue_loans"], 1);
        assert_eq!(value["inventory"][0]["borrowers"][1], "Grace");
        assert_eq!(value["active_loans"][0]["state"], "overdue");
        assert_eq!(value["frequent_borrowers"][0]["member_id"], 1);
    }

    #[test]
    fn test_report_plain_render() {
        let library = sample();
        let out = SummaryReport::build(&library, date("2024-01-20"), 5)
            .unwrap()
            .render(&plain_ctx());

        assert!(out.starts_with("library report"));
        assert!(out.contains("total_copies=3"));
        assert!(out.contains("overdue_loans=1"));
        assert!(out.contains("# frequent borrowers (more than 5 borrows)\nNone."));
    }
}
