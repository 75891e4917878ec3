//! Orchestrators behind each `iosboot` subcommand
//!
//! Multi-step flows run through [`crate::pipeline::Pipeline`] and return a
//! [`crate::pipeline::PipelineReport`]; single-purpose commands return their
//! component's outcome directly.

pub mod ci;
pub mod doctor;
pub mod lint;
pub mod setup;
pub mod simulator;
pub mod sync;

pub use ci::{run_ci, CiOptions, CI_ENV};
pub use doctor::run_doctor;
pub use lint::{run_lint, LintOptions};
pub use setup::{run_setup, SetupOptions};
pub use simulator::{run_simulator, SimulatorOptions};
pub use sync::{run_sync, SyncOptions};

use crate::project_spec::ProjectDescription;
use anyhow::{Context, Result};
use std::path::Path;

/// Names derived from an existing project's description
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProjectLayout {
    pub name: String,
}

impl ProjectLayout {
    pub fn load(dir: &Path) -> Result<Self> {
        let spec = ProjectDescription::load(dir)?.with_context(|| {
            format!("No project.yml in {}; run `iosboot setup` first", dir.display())
        })?;
        let name = spec.name().context("project.yml has no name")?.to_string();
        Ok(Self { name })
    }

    /// Source, unit-test and UI-test directories
    pub fn source_dirs(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            format!("{}Tests", self.name),
            format!("{}UITests", self.name),
        ]
    }

    pub fn xcodeproj(&self) -> String {
        format!("{}.xcodeproj", self.name)
    }
}
