//! Application context for the Library CLI.
//!
//! Bundles the parsed arguments with the lazily-loaded config file so
//! handlers take one parameter instead of several.

use std::path::PathBuf;

use chrono::NaiveDate;
use once_cell::unsync::OnceCell;

use library_core::{Library, LoanPolicy};

use crate::cli::Cli;
use crate::config::{read_config, LibraryConfig};
use crate::errors::CliError;
use crate::ui::UiContext;

use super::resolver::{missing_library_message, resolve_config_path, resolve_data_dir};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<LibraryConfig>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// The config file, loaded on first use. A missing file means defaults.
    pub fn config(&self) -> anyhow::Result<&LibraryConfig> {
        self.config.get_or_try_init(|| {
            let path = resolve_config_path()?;
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                read_config(&path)
            } else {
                Ok(LibraryConfig::default())
            }
        })
    }

    pub fn data_dir(&self) -> anyhow::Result<PathBuf> {
        resolve_data_dir(self.cli.data_dir.as_deref(), self.config()?)
    }

    pub fn loan_policy(&self) -> anyhow::Result<LoanPolicy> {
        Ok(LoanPolicy::new(self.config()?.loans.period_days))
    }

    /// `--threshold` if given, otherwise the configured one.
    pub fn threshold(&self, flag: Option<u32>) -> anyhow::Result<u32> {
        match flag {
            Some(value) => Ok(value),
            None => Ok(self.config()?.reports.frequent_borrower_threshold),
        }
    }

    /// Open the library, creating the data directory on first use.
    pub fn open_library(&self) -> anyhow::Result<Library> {
        let data_dir = self.data_dir()?;
        Ok(Library::open(&data_dir, self.loan_policy()?)?)
    }

    /// Open a library that must already exist.
    pub fn open_existing_library(&self) -> anyhow::Result<Library> {
        let data_dir = self.data_dir()?;
        if !data_dir.is_dir() {
            return Err(CliError::not_found(
                missing_library_message(&data_dir),
                "Hint: pass --data-dir or set LIBRARY_DATA_DIR",
            )
            .into());
        }
        Ok(Library::open(&data_dir, self.loan_policy()?)?)
    }

    pub fn ui(&self, json: bool, format: Option<&str>) -> anyhow::Result<UiContext> {
        let ascii = self.cli.ascii || self.config()?.ui.ascii;
        Ok(UiContext::from_env(json, format, self.cli.no_color, ascii))
    }

    pub fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}
