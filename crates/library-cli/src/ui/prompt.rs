//! Prompt primitives for the interactive shell.
//!
//! The shell talks to a `Prompter` rather than to dialoguer directly so its
//! menus can be driven from a script in tests.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

/// Source of answers for interactive prompts.
pub trait Prompter {
    /// Pick one of `items`, returning its index.
    fn select(&mut self, title: &str, items: &[&str]) -> anyhow::Result<usize>;

    /// Free text. An empty answer is allowed and returned as-is.
    fn text(&mut self, prompt: &str) -> anyhow::Result<String>;

    fn confirm(&mut self, prompt: &str, default: bool) -> anyhow::Result<bool>;
}

/// Terminal prompts via dialoguer.
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn select(&mut self, title: &str, items: &[&str]) -> anyhow::Result<usize> {
        Select::with_theme(&self.theme)
            .with_prompt(title)
            .items(items)
            .default(0)
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read selection: {}", e))
    }

    fn text(&mut self, prompt: &str) -> anyhow::Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| anyhow::anyhow!("Failed to read input: {}", e))
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> anyhow::Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))
    }
}

/// Answers replayed from a list, for tests.
///
/// `select` answers are item labels (matched case-insensitively), `confirm`
/// answers are "y" or "n". Running out of answers is an error, which ends the
/// shell the same way a closed terminal would.
#[cfg(test)]
pub struct ScriptedPrompter {
    answers: std::collections::VecDeque<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: &str) -> anyhow::Result<String> {
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("script exhausted at prompt: {}", prompt))
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn select(&mut self, title: &str, items: &[&str]) -> anyhow::Result<usize> {
        let answer = self.next(title)?;
        items
            .iter()
            .position(|item| item.eq_ignore_ascii_case(&answer))
            .ok_or_else(|| anyhow::anyhow!("{:?} is not an option of {:?}", answer, title))
    }

    fn text(&mut self, prompt: &str) -> anyhow::Result<String> {
        self.next(prompt)
    }

    fn confirm(&mut self, prompt: &str, _default: bool) -> anyhow::Result<bool> {
        Ok(self.next(prompt)?.eq_ignore_ascii_case("y"))
    }
}
