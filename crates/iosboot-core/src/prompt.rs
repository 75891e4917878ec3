//! Line-oriented prompting behind a trait so flows can run without a terminal
//!
//! The terminal implementation lives in [`crate::tui`]; [`AutoPrompter`] answers
//! every question with its default, and [`ScriptedPrompter`] replays canned
//! answers for tests.

use crate::error::{BootstrapError, ValidationError};
use anyhow::Result;
use std::collections::VecDeque;
use std::fmt::Display;
use std::io::IsTerminal;

/// Source of answers for interactive questions
pub trait Prompter {
    /// Read one line of input; an empty string means "keep the default"
    fn text(&mut self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Ask a yes/no question
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;

    /// Pick one of `items` (value, label); returns the selected index
    fn choose(&mut self, prompt: &str, items: &[(&str, &str)], default: usize) -> Result<usize>;

    /// Tell the user why the last answer was rejected
    fn report_invalid(&mut self, message: &str) -> Result<()>;

    /// Whether a human is answering
    fn is_interactive(&self) -> bool;

    /// Upper bound on re-asks for one question (`None` = unbounded)
    fn max_attempts(&self) -> Option<usize> {
        None
    }
}

/// Whether the current process may prompt
///
/// Prompts need a terminal on stdin, no `CI` variable, and neither `--yes`
/// nor `--force`.
pub fn session_is_interactive(yes: bool, force: bool) -> bool {
    !yes && !force && std::env::var_os("CI").is_none() && std::io::stdin().is_terminal()
}

/// Ask for a value until it parses, or return the default on empty input
///
/// Non-interactive prompters return the default immediately; with no default
/// the missing value is fatal.
pub fn ask_parsed<T, F>(
    prompter: &mut dyn Prompter,
    prompt: &str,
    flag: &'static str,
    default: Option<T>,
    parse: F,
) -> Result<T>
where
    T: Clone + Display,
    F: Fn(&str) -> Result<T, ValidationError>,
{
    if !prompter.is_interactive() {
        return default.ok_or_else(|| BootstrapError::MissingValue { flag }.into());
    }

    let default_text = default.as_ref().map(|d| d.to_string());
    let mut attempts = 0;
    loop {
        attempts += 1;
        let raw = prompter.text(prompt, default_text.as_deref())?;
        let raw = raw.trim();

        if raw.is_empty() {
            if let Some(value) = &default {
                return Ok(value.clone());
            }
            prompter.report_invalid("A value is required")?;
        } else {
            match parse(raw) {
                Ok(value) => return Ok(value),
                Err(e) => prompter.report_invalid(&e.to_string())?,
            }
        }

        if let Some(max) = prompter.max_attempts() {
            if attempts >= max {
                return Err(BootstrapError::PromptExhausted {
                    field: flag,
                    attempts,
                }
                .into());
            }
        }
    }
}

/// Answers every question with its default
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoPrompter;

impl Prompter for AutoPrompter {
    fn text(&mut self, _prompt: &str, _default: Option<&str>) -> Result<String> {
        Ok(String::new())
    }

    fn confirm(&mut self, _prompt: &str, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn choose(&mut self, _prompt: &str, _items: &[(&str, &str)], default: usize) -> Result<usize> {
        Ok(default)
    }

    fn report_invalid(&mut self, message: &str) -> Result<()> {
        tracing::warn!("{}", message);
        Ok(())
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Replays a fixed list of answers, recording every question asked
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
    pub rejections: Vec<String>,
    attempts: usize,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
            rejections: Vec::new(),
            attempts: 3,
        }
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    fn next_answer(&mut self, prompt: &str) -> Result<String> {
        self.asked.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No scripted answer for prompt: {}", prompt))
    }
}

impl Prompter for ScriptedPrompter {
    fn text(&mut self, prompt: &str, _default: Option<&str>) -> Result<String> {
        self.next_answer(prompt)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        let answer = self.next_answer(prompt)?;
        Ok(match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => default,
        })
    }

    fn choose(&mut self, prompt: &str, items: &[(&str, &str)], default: usize) -> Result<usize> {
        let answer = self.next_answer(prompt)?;
        let answer = answer.trim();
        Ok(items
            .iter()
            .position(|(value, _)| *value == answer)
            .unwrap_or(default))
    }

    fn report_invalid(&mut self, message: &str) -> Result<()> {
        self.rejections.push(message.to_string());
        Ok(())
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn max_attempts(&self) -> Option<usize> {
        Some(self.attempts)
    }
}
