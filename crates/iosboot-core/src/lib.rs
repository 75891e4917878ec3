//! iosboot Core - Bootstrapping pipeline for iOS application projects
//!
//! This library holds everything behind the `iosboot` binary: configuration
//! resolution, template rendering, project layout, external tool invocation,
//! simulator bindings and the orchestrators that chain them.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Components** - `config`, `templates`, `scaffold`, `runtime`,
//!   `simulator`, `git`, each usable on its own
//! - **Layer 2: Orchestration** - `pipeline` and `workflows`, one entry point per subcommand
//! - **Layer 3: Terminal UI** - Optional cliclack-based prompter (feature-gated)
//!
//! External commands go through [`runtime::CommandRunner`] and questions
//! through [`prompt::Prompter`], so every flow runs in tests without Xcode
//! or a terminal.
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompter
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use iosboot_core::prompt::AutoPrompter;
//! use iosboot_core::runtime::SystemRunner;
//! use iosboot_core::workflows::{run_setup, SetupOptions};
//!
//! let mut options = SetupOptions::new("MyApp".into());
//! options.draft.project_name = Some("MyApp".parse()?);
//! let report = run_setup(options, &SystemRunner, &mut AutoPrompter)?;
//! report.into_result()?;
//! ```

pub mod config;
pub mod error;
pub mod git;
pub mod pipeline;
pub mod project_spec;
pub mod prompt;
pub mod runtime;
pub mod scaffold;
pub mod simulator;
pub mod templates;
pub mod ui;
pub mod workflows;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{ConfigDraft, ProjectConfig, TestFramework, Visibility};
pub use error::{BootstrapError, ValidationError};
pub use pipeline::PipelineReport;
pub use prompt::{session_is_interactive, AutoPrompter, Prompter};
pub use runtime::{CommandRunner, SystemRunner};
pub use simulator::{BindingOutcome, Role};
pub use templates::TemplateSource;

#[cfg(feature = "tui")]
pub use tui::ClackPrompter;
