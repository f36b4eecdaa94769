use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{write_config, LibraryConfig};
use crate::errors::CliError;
use crate::ui::{header, hint, print, receipt};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {}\nHint: pass --force to overwrite it",
            config_path.display()
        ))
        .into());
    }

    let existing = ctx.config()?;
    let period_days = args.loan_period_days.unwrap_or(existing.loans.period_days);
    if period_days == 0 {
        return Err(CliError::invalid_input("Loan period must be at least one day").into());
    }

    let data_dir = ctx.data_dir()?;
    let mut config = LibraryConfig::new(data_dir.clone(), period_days);
    config.reports = existing.reports.clone();
    config.ui = existing.ui.clone();
    write_config(&config_path, &config)?;

    // Opening creates the directory; the record files appear on first write.
    ctx.open_library()?;
    tracing::info!(
        config = %config_path.display(),
        data_dir = %data_dir.display(),
        "library initialised"
    );

    if ctx.quiet() {
        return Ok(());
    }
    let ui = ctx.ui(false, None)?;
    if ui.mode.is_pretty() {
        print(&ui, &header(&ui, "init", None));
    }
    print(
        &ui,
        &receipt(
            &ui,
            "Library ready",
            &[
                ("Config", config_path.display().to_string()),
                ("Data dir", data_dir.display().to_string()),
                ("Loan period days", period_days.to_string()),
            ],
        ),
    );
    if ui.mode.is_pretty() {
        print(&ui, &hint(&ui, "Run `library` to open the menu."));
    }
    Ok(())
}
