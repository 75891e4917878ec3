//! In-memory [`CommandRunner`] for tests

use super::tool::{CommandOutput, CommandRunner, ToolCommand};
use std::cell::RefCell;
use std::collections::HashSet;
use std::io;

/// Records every command and answers from canned responses
///
/// Responses match on a prefix of `program args...`; the most recently
/// registered match wins. Unmatched commands succeed with empty output.
#[derive(Debug, Default)]
pub struct FakeRunner {
    installed: RefCell<HashSet<String>>,
    responses: RefCell<Vec<(Vec<String>, CommandOutput)>>,
    calls: RefCell<Vec<ToolCommand>>,
}

impl FakeRunner {
    pub fn with_tools(tools: &[&str]) -> Self {
        let runner = Self::default();
        runner
            .installed
            .borrow_mut()
            .extend(tools.iter().map(|t| t.to_string()));
        runner
    }

    pub fn respond(&self, prefix: &[&str], output: CommandOutput) {
        self.responses
            .borrow_mut()
            .push((prefix.iter().map(|s| s.to_string()).collect(), output));
    }

    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.borrow().clone()
    }

    /// Number of recorded commands starting with `prefix`
    pub fn count(&self, prefix: &[&str]) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| starts_with(call, prefix))
            .count()
    }
}

fn starts_with(command: &ToolCommand, prefix: &[&str]) -> bool {
    let words = std::iter::once(&command.program).chain(command.args.iter());
    prefix.len() <= command.args.len() + 1
        && words.zip(prefix.iter()).all(|(word, expected)| word == expected)
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &ToolCommand) -> io::Result<CommandOutput> {
        self.calls.borrow_mut().push(command.clone());
        if !self.installed.borrow().contains(&command.program) {
            return Err(io::Error::new(io::ErrorKind::NotFound, command.program.clone()));
        }

        let responses = self.responses.borrow();
        let matched = responses
            .iter()
            .rev()
            .find(|(prefix, _)| {
                let prefix: Vec<&str> = prefix.iter().map(String::as_str).collect();
                starts_with(command, &prefix)
            })
            .map(|(_, output)| output.clone());
        Ok(matched.unwrap_or_else(|| CommandOutput::ok("")))
    }

    fn is_installed(&self, program: &str) -> bool {
        self.installed.borrow().contains(program)
    }
}
