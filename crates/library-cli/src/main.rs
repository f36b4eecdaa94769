//! Library CLI - a command-line tracker for a small lending library
//!
//! With no subcommand the binary opens the interactive menu; the
//! subcommands cover scripting and setup.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod output;
mod shell;
mod ui;

use clap::Parser;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    cli.setup_logging();
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        tracing::debug!(error = %e, "command failed");
        errors::exit_with(&e);
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        None | Some(Commands::Shell) => commands::handle_shell(ctx),
        Some(Commands::Init(args)) => commands::handle_init(ctx, args),
        Some(Commands::List(args)) => commands::handle_list(ctx, args),
        Some(Commands::Report(args)) => commands::handle_report(ctx, args),
        Some(Commands::Check(args)) => commands::handle_check(ctx, args),
        Some(Commands::Completions { shell }) => commands::handle_completions(*shell),
    }
}
