//! Prerequisite report

use crate::runtime::tool::{ALL_TOOLS, GIT, XCODEBUILD, XCRUN};
use crate::runtime::{detect_tools, require_tools, CommandRunner, ToolInvoker, ToolSpec, ToolStatus};
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// Tools without which no project can be bootstrapped
pub const REQUIRED_TOOLS: &[ToolSpec] = &[XCRUN, XCODEBUILD, GIT];

/// Print every known tool with its version, failing if a required one is missing
pub fn run_doctor(directory: &Path, runner: &dyn CommandRunner) -> Result<Vec<ToolStatus>> {
    let invoker = ToolInvoker::new(runner, directory);
    let statuses = detect_tools(&invoker, ALL_TOOLS);

    for status in &statuses {
        let required = REQUIRED_TOOLS.iter().any(|t| t.name == status.tool.name);
        let line = match (&status.version, status.available) {
            (Some(version), true) => format!("{} {:<26} {}", "ok".green(), status.name(), version),
            (None, true) => format!("{} {}", "ok".green(), status.name()),
            (_, false) if required => format!(
                "{} {:<26} install with: {}",
                "missing".red(),
                status.name(),
                status.tool.install_hint
            ),
            (_, false) => format!(
                "{} {:<26} optional, install with: {}",
                "missing".yellow(),
                status.name(),
                status.tool.install_hint
            ),
        };
        println!("  {}", line);
    }

    require_tools(&statuses, REQUIRED_TOOLS)?;
    Ok(statuses)
}
