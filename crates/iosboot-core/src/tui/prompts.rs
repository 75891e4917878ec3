//! Charm-style terminal prompts using cliclack

use crate::prompt::Prompter;
use anyhow::Result;

/// Prompts on the terminal; used only for interactive sessions
#[derive(Debug, Default)]
pub struct ClackPrompter {
    started: bool,
}

impl ClackPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the prompt session with a title line
    pub fn intro(&mut self, title: &str) -> Result<()> {
        cliclack::intro(title)?;
        self.started = true;
        Ok(())
    }

    pub fn outro(&mut self, message: &str) -> Result<()> {
        if self.started {
            cliclack::outro(message)?;
            self.started = false;
        }
        Ok(())
    }
}

impl Drop for ClackPrompter {
    fn drop(&mut self) {
        // An interrupted prompt leaves the cursor hidden
        let _ = console::Term::stderr().show_cursor();
    }
}

impl Prompter for ClackPrompter {
    fn text(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = cliclack::input(prompt).required(false);
        if let Some(default) = default {
            input = input.placeholder(default).default_input(default);
        }
        let answer: String = input.interact()?;
        Ok(answer)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        let answer = cliclack::confirm(prompt).initial_value(default).interact()?;
        Ok(answer)
    }

    fn choose(&mut self, prompt: &str, items: &[(&str, &str)], default: usize) -> Result<usize> {
        let mut select = cliclack::select(prompt);
        for (idx, (value, label)) in items.iter().enumerate() {
            select = select.item(idx, *label, *value);
        }
        let selected: usize = select.initial_value(default).interact()?;
        Ok(selected)
    }

    fn report_invalid(&mut self, message: &str) -> Result<()> {
        cliclack::log::error(message)?;
        Ok(())
    }

    fn is_interactive(&self) -> bool {
        true
    }
}
