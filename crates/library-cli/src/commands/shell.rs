use crate::app::AppContext;
use crate::errors::CliError;
use crate::shell::Shell;
use crate::ui::prompt::DialoguerPrompter;
use crate::ui::stdin_is_interactive;

pub fn handle_shell(ctx: &AppContext) -> anyhow::Result<()> {
    if !stdin_is_interactive() {
        return Err(CliError::invalid_input(
            "The interactive menu needs a terminal\nHint: use `library list`, `library report` or `library check` in scripts",
        )
        .into());
    }

    let ui = ctx.ui(false, None)?;
    let mut library = ctx.open_library()?;
    let threshold = ctx.threshold(None)?;
    let mut prompter = DialoguerPrompter::new();
    let mut stdout = std::io::stdout();

    let result = Shell::new(&mut library, ui, &mut prompter, &mut stdout, || ctx.today())
        .with_threshold(threshold)
        .run();
    result
}
