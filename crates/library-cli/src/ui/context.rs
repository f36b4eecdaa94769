//! Terminal detection for the renderers.

use std::io::IsTerminal;

use super::mode::OutputMode;

const FALLBACK_WIDTH: usize = 80;

/// How output should look for this run.
#[derive(Debug, Clone)]
pub struct UiContext {
    pub color: bool,
    /// Off with `--ascii` or `[ui] ascii = true`
    pub unicode: bool,
    /// Columns available to tables
    pub width: usize,
    pub mode: OutputMode,
}

/// Facts about the terminal, read once from the process environment.
#[derive(Debug, Clone, Copy)]
struct Terminal {
    stdout_tty: bool,
    dumb: bool,
    no_color: bool,
    width: usize,
}

impl Terminal {
    fn detect() -> Self {
        Self {
            stdout_tty: std::io::stdout().is_terminal(),
            dumb: std::env::var("TERM").is_ok_and(|term| term == "dumb"),
            no_color: std::env::var_os("NO_COLOR").is_some(),
            width: columns(),
        }
    }
}

impl UiContext {
    /// Combine the output flags with what the terminal supports.
    pub fn from_env(json: bool, format: Option<&str>, no_color: bool, ascii: bool) -> Self {
        Self::for_terminal(Terminal::detect(), json, format, no_color, ascii)
    }

    fn for_terminal(
        term: Terminal,
        json: bool,
        format: Option<&str>,
        no_color: bool,
        ascii: bool,
    ) -> Self {
        let mode = OutputMode::resolve(json, format, term.stdout_tty, term.dumb);
        Self {
            color: mode.is_pretty() && !no_color && !term.no_color,
            unicode: !ascii,
            width: term.width,
            mode,
        }
    }
}

/// Menus read answers from stdin, so it must be a terminal.
pub fn stdin_is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

/// `COLUMNS` when set, otherwise the stdout window size.
fn columns() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|width| *width > 0)
        .or_else(window_columns)
        .unwrap_or(FALLBACK_WIDTH)
}

#[cfg(unix)]
fn window_columns() -> Option<usize> {
    let mut size = std::mem::MaybeUninit::<libc::winsize>::uninit();
    // SAFETY: TIOCGWINSZ fills the winsize we pass and nothing else
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, size.as_mut_ptr()) };
    if rc != 0 {
        return None;
    }
    // SAFETY: ioctl succeeded, so the struct is initialised
    let size = unsafe { size.assume_init() };
    (size.ws_col > 0).then_some(usize::from(size.ws_col))
}

#[cfg(not(unix))]
fn window_columns() -> Option<usize> {
    None
}
