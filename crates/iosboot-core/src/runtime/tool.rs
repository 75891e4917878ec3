//! External tool invocation
//!
//! Every external command goes through a [`CommandRunner`] so that flows can
//! be exercised without the real tools. [`ToolInvoker`] adds the failure
//! policy: a non-zero exit prints the tool's own diagnostic and becomes a
//! [`BootstrapError::ToolFailed`] carrying troubleshooting hints.

use crate::error::BootstrapError;
use crate::ui;
use anyhow::Result;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Description of an external command-line tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    /// Name of the tool binary (e.g., "xcodegen")
    pub name: &'static str,
    /// Display name for user-facing messages
    pub display_name: &'static str,
    /// Command that installs the tool
    pub install_hint: &'static str,
    /// Arguments printing the tool's version
    pub version_args: &'static [&'static str],
    /// Troubleshooting lines shown when the tool fails
    pub hints: &'static [&'static str],
}

pub const XCODEGEN: ToolSpec = ToolSpec {
    name: "xcodegen",
    display_name: "XcodeGen",
    install_hint: "brew install xcodegen",
    version_args: &["--version"],
    hints: &[
        "Check project.yml for YAML syntax errors",
        "Verify that every target's source paths exist",
        "See https://github.com/yonaskolb/XcodeGen/blob/master/Docs/ProjectSpec.md",
    ],
};

pub const SWIFTLINT: ToolSpec = ToolSpec {
    name: "swiftlint",
    display_name: "SwiftLint",
    install_hint: "brew install swiftlint",
    version_args: &["version"],
    hints: &[
        "Run `swiftlint lint` to list every violation",
        "Autocorrect what can be fixed with `iosboot lint --fix`",
        "Adjust rules in .swiftlint.yml",
    ],
};

pub const SWIFT_FORMAT: ToolSpec = ToolSpec {
    name: "swift-format",
    display_name: "swift-format",
    install_hint: "brew install swift-format",
    version_args: &["--version"],
    hints: &[
        "Reformat the sources with `iosboot lint --fix`",
        "Check that .swift-format is valid JSON",
    ],
};

pub const XCRUN: ToolSpec = ToolSpec {
    name: "xcrun",
    display_name: "Xcode command line tools",
    install_hint: "xcode-select --install",
    version_args: &["--version"],
    hints: &[
        "Check the selected developer directory with `xcode-select -p`",
        "Open Xcode once to finish installing simulator runtimes",
    ],
};

pub const XCODEBUILD: ToolSpec = ToolSpec {
    name: "xcodebuild",
    display_name: "xcodebuild",
    install_hint: "Install Xcode, then run: sudo xcode-select -s /Applications/Xcode.app",
    version_args: &["-version"],
    hints: &[
        "Open the project in Xcode to inspect the failure",
        "Check the simulator destination in simulators.yml",
        "Delete DerivedData and try again",
    ],
};

pub const GIT: ToolSpec = ToolSpec {
    name: "git",
    display_name: "Git",
    install_hint: "xcode-select --install",
    version_args: &["--version"],
    hints: &[
        "Check that user.name and user.email are configured",
        "Run `git status` to inspect the repository",
    ],
};

pub const GH: ToolSpec = ToolSpec {
    name: "gh",
    display_name: "GitHub CLI",
    install_hint: "brew install gh",
    version_args: &["--version"],
    hints: &[
        "Authenticate with `gh auth login`",
        "Check that the repository name is not already taken",
    ],
};

pub const BREW: ToolSpec = ToolSpec {
    name: "brew",
    display_name: "Homebrew",
    install_hint: "/bin/bash -c \"$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)\"",
    version_args: &["--version"],
    hints: &["Run `brew doctor`", "Update Homebrew with `brew update`"],
};

/// Every tool known to the bootstrapper
pub const ALL_TOOLS: &[ToolSpec] = &[XCODEGEN, SWIFTLINT, SWIFT_FORMAT, XCRUN, XCODEBUILD, GIT, GH, BREW];

/// A fully specified external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl ToolCommand {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// `program arg1 arg2 ...` for display
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Executes external commands
pub trait CommandRunner {
    /// Run to completion, capturing stdout and stderr
    fn run(&self, command: &ToolCommand) -> io::Result<CommandOutput>;

    /// Check if the program is available in PATH
    fn is_installed(&self, program: &str) -> bool;
}

/// Runs commands with `std::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ToolCommand) -> io::Result<CommandOutput> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(dir) = &command.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &command.env {
            cmd.env(key, value);
        }

        let output = cmd.output()?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn is_installed(&self, program: &str) -> bool {
        Command::new("which")
            .arg(program)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

/// Runs tools in a working directory with the failure policy applied
pub struct ToolInvoker<'a> {
    runner: &'a dyn CommandRunner,
    cwd: PathBuf,
    env: Vec<(String, String)>,
}

impl<'a> ToolInvoker<'a> {
    pub fn new(runner: &'a dyn CommandRunner, cwd: &Path) -> Self {
        Self {
            runner,
            cwd: cwd.to_path_buf(),
            env: Vec::new(),
        }
    }

    /// Add an environment variable to every command
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn is_installed(&self, tool: &ToolSpec) -> bool {
        self.runner.is_installed(tool.name)
    }

    /// Fail with install instructions if the tool is missing
    pub fn require(&self, tool: &ToolSpec) -> Result<(), BootstrapError> {
        if self.is_installed(tool) {
            Ok(())
        } else {
            Err(BootstrapError::MissingTool {
                tool: tool.display_name,
                install_hint: tool.install_hint,
            })
        }
    }

    /// Get the installed tool version (first output line)
    pub fn version(&self, tool: &ToolSpec) -> Option<String> {
        let output = self.probe(tool, tool.version_args).ok()?;
        if !output.success() {
            return None;
        }
        let text = if output.stdout.trim().is_empty() {
            &output.stderr
        } else {
            &output.stdout
        };
        text.lines().next().map(|line| line.trim().to_string())
    }

    /// Run and return the output whatever the exit code
    pub fn probe<S: AsRef<str>>(&self, tool: &ToolSpec, args: &[S]) -> Result<CommandOutput> {
        let command = self.command(tool, args);
        tracing::debug!(command = %command.display(), "running");
        self.runner.run(&command).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                anyhow::Error::from(BootstrapError::MissingTool {
                    tool: tool.display_name,
                    install_hint: tool.install_hint,
                })
            } else {
                anyhow::Error::new(e).context(format!("Failed to run {}", command.display()))
            }
        })
    }

    /// Run and require a zero exit code, without printing on success
    pub fn capture<S: AsRef<str>>(&self, tool: &ToolSpec, args: &[S]) -> Result<CommandOutput> {
        let output = self.probe(tool, args)?;
        if output.success() {
            return Ok(output);
        }

        let code = output.code.unwrap_or(-1);
        ui::error(format!("{} exited with code {}", self.command(tool, args).display(), code));
        let diagnostic = if output.stderr.trim().is_empty() {
            &output.stdout
        } else {
            &output.stderr
        };
        for line in diagnostic.lines().filter(|l| !l.trim().is_empty()) {
            eprintln!("    {}", line);
        }

        Err(BootstrapError::ToolFailed {
            tool: tool.display_name,
            code,
            hints: tool.hints,
        }
        .into())
    }

    /// Run, require success and print a confirmation line
    pub fn run<S: AsRef<str>>(
        &self,
        tool: &ToolSpec,
        args: &[S],
        success_message: &str,
    ) -> Result<CommandOutput> {
        let output = self.capture(tool, args)?;
        ui::success(success_message);
        Ok(output)
    }

    fn command<S: AsRef<str>>(&self, tool: &ToolSpec, args: &[S]) -> ToolCommand {
        ToolCommand {
            program: tool.name.to_string(),
            args: args.iter().map(|a| a.as_ref().to_string()).collect(),
            cwd: Some(self.cwd.clone()),
            env: self.env.clone(),
        }
    }
}
