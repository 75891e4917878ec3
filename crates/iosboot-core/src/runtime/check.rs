//! Prerequisite detection for the external tools

use super::tool::{ToolInvoker, ToolSpec};
use crate::error::BootstrapError;
use anyhow::Result;

/// Tool detection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub tool: ToolSpec,
    pub version: Option<String>,
    pub available: bool,
}

impl ToolStatus {
    pub fn name(&self) -> &'static str {
        self.tool.display_name
    }
}

/// Detect every tool once, in order
pub fn detect_tools(invoker: &ToolInvoker<'_>, tools: &[ToolSpec]) -> Vec<ToolStatus> {
    let mut results: Vec<ToolStatus> = Vec::new();

    for tool in tools {
        if results.iter().any(|r| r.tool.name == tool.name) {
            continue;
        }

        let available = invoker.is_installed(tool);
        results.push(ToolStatus {
            tool: *tool,
            version: if available { invoker.version(tool) } else { None },
            available,
        });
    }

    results
}

/// Fail unless every tool in `required` was detected
///
/// A single missing tool yields [`BootstrapError::MissingTool`]; several are
/// listed together with their install commands.
pub fn require_tools(statuses: &[ToolStatus], required: &[ToolSpec]) -> Result<()> {
    let missing: Vec<&ToolSpec> = statuses
        .iter()
        .filter(|s| !s.available && required.iter().any(|r| r.name == s.tool.name))
        .map(|s| &s.tool)
        .collect();

    match missing.as_slice() {
        [] => Ok(()),
        [tool] => Err(BootstrapError::MissingTool {
            tool: tool.display_name,
            install_hint: tool.install_hint,
        }
        .into()),
        _ => anyhow::bail!(
            "Missing required tools:\n{}",
            missing
                .iter()
                .map(|t| format!("  - {} (install with: {})", t.display_name, t.install_hint))
                .collect::<Vec<_>>()
                .join("\n")
        ),
    }
}

/// Check tools; tools in `advisory` get availability reported but don't cause failure
pub fn check_tools(
    invoker: &ToolInvoker<'_>,
    required: &[ToolSpec],
    advisory: &[ToolSpec],
) -> Result<Vec<ToolStatus>> {
    let all: Vec<ToolSpec> = required.iter().chain(advisory.iter()).copied().collect();
    let statuses = detect_tools(invoker, &all);
    require_tools(&statuses, required)?;
    Ok(statuses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::testing::FakeRunner;
    use crate::runtime::tool::{CommandOutput, GH, GIT, XCODEGEN, XCRUN};
    use std::path::Path;

    #[test]
    fn test_all_present() {
        let runner = FakeRunner::with_tools(&["git", "xcodegen"]);
        runner.respond(&["xcodegen", "--version"], CommandOutput::ok("Version: 2.40.1\n"));
        let invoker = ToolInvoker::new(&runner, Path::new("."));

        let statuses = check_tools(&invoker, &[GIT, XCODEGEN], &[]).unwrap();
        assert_eq!(statuses.len(), 2);
        assert!(statuses.iter().all(|s| s.available));
        assert_eq!(statuses[1].version.as_deref(), Some("Version: 2.40.1"));
    }

    #[test]
    fn test_advisory_tools_do_not_fail() {
        let runner = FakeRunner::with_tools(&["git"]);
        let invoker = ToolInvoker::new(&runner, Path::new("."));

        let statuses = check_tools(&invoker, &[GIT], &[GH]).unwrap();
        assert!(!statuses[1].available);
        assert_eq!(statuses[1].name(), "GitHub CLI");
    }

    #[test]
    fn test_duplicates_detected_once() {
        let runner = FakeRunner::with_tools(&["git"]);
        let invoker = ToolInvoker::new(&runner, Path::new("."));

        let statuses = detect_tools(&invoker, &[GIT, GIT, GH]);
        assert_eq!(statuses.len(), 2);
        assert_eq!(runner.count(&["git", "--version"]), 1);
    }

    #[test]
    fn test_single_missing_tool_is_typed() {
        let runner = FakeRunner::with_tools(&[]);
        let invoker = ToolInvoker::new(&runner, Path::new("."));

        let err = check_tools(&invoker, &[XCRUN], &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BootstrapError>(),
            Some(BootstrapError::MissingTool { .. })
        ));
    }

    #[test]
    fn test_multiple_missing_tools_are_listed() {
        let runner = FakeRunner::with_tools(&[]);
        let invoker = ToolInvoker::new(&runner, Path::new("."));

        let err = check_tools(&invoker, &[XCRUN, XCODEGEN], &[]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("xcode-select --install"));
        assert!(msg.contains("brew install xcodegen"));
    }
}
