use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use library_core::VERSION;

/// Library - a command-line tracker for a small lending library
#[derive(Parser)]
#[command(name = "library")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding books.jsonl, members.jsonl and loans.jsonl
    #[arg(short, long, global = true, env = "LIBRARY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols and table borders
    #[arg(long, global = true)]
    pub ascii: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the config file and create the data directory
    Init(InitArgs),

    /// Start the interactive menu (default)
    Shell,

    /// Print books, members or loans
    List(ListArgs),

    /// Print the summary report
    Report(ReportArgs),

    /// Check the record files for inconsistencies
    Check(CheckArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Loan period in days written to the config
    #[arg(long, value_name = "DAYS")]
    pub loan_period_days: Option<u32>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Collections that `list` can print
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ListTarget {
    Books,
    Members,
    Loans,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// What to list
    #[arg(value_enum, value_name = "WHAT")]
    pub target: ListTarget,

    /// Only open loans, available books or active members
    #[arg(long)]
    pub open: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `report` command
#[derive(Args)]
pub struct ReportArgs {
    /// Date used to decide which loans are overdue (YYYY-MM-DD, default today)
    #[arg(long, value_name = "DATE")]
    pub as_of: Option<String>,

    /// Frequent borrowers have more than this many lifetime borrows
    #[arg(long, value_name = "N")]
    pub threshold: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `check` command
#[derive(Args)]
pub struct CheckArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Route `tracing` events to stderr, filtered by `-v` and `RUST_LOG`.
    pub fn setup_logging(&self) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match (self.quiet, self.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, 2) => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(!self.no_color)
            .with_line_number(false);

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init();
    }
}
