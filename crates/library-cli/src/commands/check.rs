use crate::app::AppContext;
use crate::cli::CheckArgs;
use crate::errors::CliError;
use crate::ui::{badge, hint, print, Badge};

pub fn handle_check(ctx: &AppContext, args: &CheckArgs) -> anyhow::Result<()> {
    let ui = ctx.ui(args.json, None)?;
    let library = ctx.open_existing_library()?;
    let issues = library.reports().integrity()?;

    if ui.mode.is_json() {
        let value = serde_json::json!({
            "ok": issues.is_empty(),
            "issues": issues,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if issues.is_empty() {
        if !ctx.quiet() {
            print(&ui, &badge(&ui, Badge::Ok, "Integrity check: OK"));
        }
    } else {
        eprintln!("{}", badge(&ui, Badge::Err, "Integrity check: FAILED"));
        for issue in &issues {
            eprintln!("- {}", issue);
        }
        eprintln!(
            "{}",
            hint(&ui, "Restore the data directory from a backup, or correct the files by hand.")
        );
    }

    if issues.is_empty() {
        Ok(())
    } else {
        tracing::warn!(issues = issues.len(), "integrity check failed");
        Err(CliError::IntegrityFailed(issues.len()).into())
    }
}
