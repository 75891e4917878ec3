//! Command-line surface

use clap::{Args as ClapArgs, Parser, Subcommand};
use iosboot_core::config::{BundleIdRoot, DottedVersion, LanguageCode, ProjectName};
use iosboot_core::workflows::{CiOptions, LintOptions, SetupOptions, SimulatorOptions, SyncOptions};
use iosboot_core::{
    session_is_interactive, BootstrapError, ConfigDraft, Role, TemplateSource, TestFramework,
    Visibility,
};
use std::ffi::OsStr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "iosboot")]
#[command(about = "Bootstrap iOS application projects")]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Arguments available on every subcommand
#[derive(ClapArgs, Debug, Clone)]
pub struct GlobalArgs {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also set by a non-empty NO_COLOR)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

impl GlobalArgs {
    /// `--no-color`, or `NO_COLOR` set to any non-empty value
    pub fn color_disabled(&self) -> bool {
        no_color_requested(self.no_color, std::env::var_os("NO_COLOR").as_deref())
    }
}

fn no_color_requested(flag: bool, env: Option<&OsStr>) -> bool {
    flag || env.is_some_and(|value| !value.is_empty())
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bootstrap a project: templates, structure, generation, simulators, git
    Setup(SetupArgs),
    /// Generate, lint, check formatting and run tests non-interactively
    Ci(CiArgs),
    /// Validate and persist simulator bindings
    Simulator(SimulatorArgs),
    /// Re-render configuration templates for an existing project
    SyncTemplates(SyncArgs),
    /// Run SwiftLint and swift-format
    Lint(LintArgs),
    /// Check that the external tools are installed
    Doctor(DoctorArgs),
}

#[derive(ClapArgs, Debug, Default)]
pub struct SetupArgs {
    /// Application name (letters and digits, starting with a letter)
    #[arg(long = "project-name", value_name = "NAME")]
    pub project_name: Option<ProjectName>,

    /// Reverse-domain prefix for bundle identifiers
    #[arg(long = "bundle-id-root", value_name = "DOMAIN")]
    pub bundle_id_root: Option<BundleIdRoot>,

    /// Minimum iOS version, e.g. 17.0
    #[arg(long = "deployment-target", value_name = "VERSION", value_parser = parse_deployment_target)]
    pub deployment_target: Option<DottedVersion>,

    /// Swift language version, e.g. 5.9
    #[arg(long = "swift-version", value_name = "VERSION", value_parser = parse_swift_version)]
    pub swift_version: Option<DottedVersion>,

    /// Framework for the starter unit tests
    #[arg(long = "test-framework", value_enum)]
    pub test_framework: Option<TestFramework>,

    /// Localization source language (ISO 639-1)
    #[arg(long = "source-language", value_name = "CODE")]
    pub source_language: Option<LanguageCode>,

    /// Publish as a public repository
    #[arg(long, conflicts_with = "private")]
    pub public: bool,

    /// Publish as a private repository
    #[arg(long)]
    pub private: bool,

    /// Overwrite existing files without asking
    #[arg(short, long)]
    pub force: bool,

    /// Accept defaults for every unset value (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    /// Don't install missing tools with Homebrew
    #[arg(long = "skip-deps")]
    pub skip_deps: bool,

    /// Don't run the project generator
    #[arg(long = "skip-generate")]
    pub skip_generate: bool,

    /// Don't configure simulator bindings
    #[arg(long = "skip-simulators")]
    pub skip_simulators: bool,

    /// Install the git pre-commit hook
    #[arg(long = "git-hooks", conflicts_with = "no_git_hooks")]
    pub git_hooks: bool,

    /// Skip the git pre-commit hook
    #[arg(long = "no-git-hooks")]
    pub no_git_hooks: bool,

    /// Create an initial commit
    #[arg(long = "commit", conflicts_with = "no_commit")]
    pub commit: bool,

    /// Skip the initial commit
    #[arg(long = "no-commit")]
    pub no_commit: bool,

    /// Create a GitHub repository with the gh CLI and push to it
    #[arg(long)]
    pub github: bool,

    /// Simulator device for unit tests
    #[arg(long = "test-device", value_name = "DEVICE")]
    pub test_device: Option<String>,

    /// Simulator device for UI tests
    #[arg(long = "ui-test-device", value_name = "DEVICE")]
    pub ui_test_device: Option<String>,

    /// Local directory to use for templates instead of the built-in ones
    #[arg(long = "template-dir", env = "IOSBOOT_TEMPLATE_DIR")]
    pub template_dir: Option<PathBuf>,

    /// Project directory (defaults to the current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,
}

fn parse_deployment_target(s: &str) -> Result<DottedVersion, String> {
    DottedVersion::parse_field("deployment target", s).map_err(|e| e.to_string())
}

fn parse_swift_version(s: &str) -> Result<DottedVersion, String> {
    DottedVersion::parse_field("swift version", s).map_err(|e| e.to_string())
}

fn directory_or_cwd(directory: Option<PathBuf>) -> PathBuf {
    directory.unwrap_or_else(|| PathBuf::from("."))
}

impl SetupArgs {
    /// Whether prompts may be shown for unset values
    pub fn interactive(&self) -> bool {
        session_is_interactive(self.yes, self.force)
    }

    pub fn into_options(self) -> Result<SetupOptions, BootstrapError> {
        let mut draft = ConfigDraft {
            project_name: self.project_name,
            bundle_id_root: self.bundle_id_root,
            deployment_target: self.deployment_target,
            swift_version: self.swift_version,
            test_framework: self.test_framework,
            source_language: self.source_language,
            force: self.force,
            ..Default::default()
        };
        if self.public {
            draft.set_visibility(Visibility::Public)?;
        }
        if self.private {
            draft.set_visibility(Visibility::Private)?;
        }
        if self.git_hooks {
            draft.set_git_hooks(true)?;
        }
        if self.no_git_hooks {
            draft.set_git_hooks(false)?;
        }
        if self.commit {
            draft.set_initial_commit(true)?;
        }
        if self.no_commit {
            draft.set_initial_commit(false)?;
        }

        Ok(SetupOptions {
            draft,
            directory: directory_or_cwd(self.directory),
            template_source: TemplateSource::from_flag_or_env(self.template_dir),
            skip_deps: self.skip_deps,
            skip_generate: self.skip_generate,
            skip_simulators: self.skip_simulators,
            github: self.github,
            test_device: self.test_device,
            ui_test_device: self.ui_test_device,
        })
    }
}

#[derive(ClapArgs, Debug)]
pub struct CiArgs {
    /// Skip SwiftLint and swift-format
    #[arg(long = "skip-lint")]
    pub skip_lint: bool,

    /// Skip xcodebuild test
    #[arg(long = "skip-tests")]
    pub skip_tests: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,
}

impl From<CiArgs> for CiOptions {
    fn from(args: CiArgs) -> Self {
        CiOptions {
            directory: directory_or_cwd(args.directory),
            skip_lint: args.skip_lint,
            skip_tests: args.skip_tests,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct SimulatorArgs {
    /// Role to configure; both when omitted
    #[arg(long, value_enum)]
    pub role: Option<Role>,

    /// Simulator device type name, e.g. "iPhone 15"
    #[arg(long, value_name = "DEVICE")]
    pub device: Option<String>,

    /// OS version (defaults to the project's deployment target)
    #[arg(long, value_name = "VERSION")]
    pub os: Option<String>,

    /// Simulator architecture (defaults to the host's)
    #[arg(long, value_name = "ARCH")]
    pub arch: Option<String>,

    /// Write without asking for confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,
}

impl From<SimulatorArgs> for SimulatorOptions {
    fn from(args: SimulatorArgs) -> Self {
        SimulatorOptions {
            directory: directory_or_cwd(args.directory),
            role: args.role,
            device: args.device,
            os: args.os,
            arch: args.arch,
            force: args.force,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct SyncArgs {
    /// Local directory to use for templates instead of the built-in ones
    #[arg(long = "template-dir", env = "IOSBOOT_TEMPLATE_DIR")]
    pub template_dir: Option<PathBuf>,

    /// Overwrite existing files without asking
    #[arg(short, long)]
    pub force: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,
}

impl From<SyncArgs> for SyncOptions {
    fn from(args: SyncArgs) -> Self {
        SyncOptions {
            directory: directory_or_cwd(args.directory),
            template_source: TemplateSource::from_flag_or_env(args.template_dir),
            force: args.force,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct LintArgs {
    /// Apply corrections instead of only reporting
    #[arg(long)]
    pub fix: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,
}

impl From<LintArgs> for LintOptions {
    fn from(args: LintArgs) -> Self {
        LintOptions {
            directory: directory_or_cwd(args.directory),
            fix: args.fix,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct DoctorArgs {
    /// Directory to run the checks from
    #[arg(short, long)]
    pub directory: Option<PathBuf>,
}

impl DoctorArgs {
    pub fn directory(&self) -> PathBuf {
        directory_or_cwd(self.directory.clone())
    }
}
