//! UI primitives for the Library CLI.
//!
//! This module provides:
//! - **Context**: Terminal detection (width, color, unicode, stdin)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badge tokens and owo-colors styles
//! - **Render**: Tables, headers, receipts, hints
//! - **Format**: String utilities (truncate, dates)
//! - **Prompt**: The `Prompter` seam used by the interactive shell
//!
//! # Usage
//!
//! ```ignore
//! use crate::ui::{UiContext, Badge};
//! use crate::ui::render::{header, table, hint};
//!
//! let ctx = UiContext::from_env(args.json, args.format.as_deref(), cli.no_color, cli.ascii);
//!
//! if ctx.mode.is_json() {
//!     // Handle JSON output separately
//!     return Ok(());
//! }
//!
//! println!("{}", header(&ctx, "list", Some("books")));
//! println!("{}", table(&ctx, &columns, &rows));
//! println!("{}", hint(&ctx, "library shell"));
//! ```

mod context;
pub mod format;
mod mode;
pub mod prompt;
pub mod render;
pub mod theme;

pub use context::{stdin_is_interactive, UiContext};
pub use mode::parse_format;
pub use theme::Badge;

pub use render::{badge, divider, header, hint, kv, print, receipt, table, Column};
