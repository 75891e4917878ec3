//! Template descriptors: which template renders to which destination

use crate::config::{ProjectConfig, TestFramework};
use std::path::PathBuf;

/// What to do when the destination already exists (and force is off)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Ask before replacing
    PromptIfExists,
    /// Replace unconditionally
    AlwaysRegenerate,
    /// Leave an existing file alone without asking
    KeepExisting,
}

/// A template paired with its destination, relative to the project root
///
/// The destination may itself contain placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDescriptor {
    pub template: String,
    pub destination: String,
    pub policy: OverwritePolicy,
}

impl TemplateDescriptor {
    pub fn new(template: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            destination: destination.into(),
            policy: OverwritePolicy::PromptIfExists,
        }
    }

    pub fn always(mut self) -> Self {
        self.policy = OverwritePolicy::AlwaysRegenerate;
        self
    }

    pub fn keep_existing(mut self) -> Self {
        self.policy = OverwritePolicy::KeepExisting;
        self
    }
}

/// Project description consumed by the project generator
pub const PROJECT_SPEC: &str = "project.yml";

/// Template for the git pre-commit hook
pub const PRE_COMMIT_HOOK: &str = "pre-commit";

/// Built-in destination names for templates whose file name differs
const RENAMES: &[(&str, &str)] = &[
    ("swiftlint.yml", ".swiftlint.yml"),
    ("swift-format.json", ".swift-format"),
    ("gitignore", ".gitignore"),
    ("ci.yml", ".github/workflows/ci.yml"),
];

/// Templates that are not plain configuration files
const NOT_CONFIG: &[&str] = &[PROJECT_SPEC, PRE_COMMIT_HOOK];
const STARTER_PREFIX: &str = "starter/";

/// Destination for a configuration template name
pub fn destination_for(template: &str) -> String {
    RENAMES
        .iter()
        .find(|(name, _)| *name == template)
        .map(|(_, dest)| dest.to_string())
        .unwrap_or_else(|| template.to_string())
}

fn config_descriptor(template: &str) -> TemplateDescriptor {
    let descriptor = TemplateDescriptor::new(template, destination_for(template));
    if template == "README.md" {
        descriptor.always()
    } else {
        descriptor
    }
}

/// Descriptors rendered by `setup`: the project description plus configuration files
pub fn setup_descriptors() -> Vec<TemplateDescriptor> {
    let mut descriptors = vec![TemplateDescriptor::new(PROJECT_SPEC, PROJECT_SPEC)];
    descriptors.extend(
        ["README.md", "swiftlint.yml", "swift-format.json", "gitignore", "ci.yml"]
            .iter()
            .map(|t| config_descriptor(t)),
    );
    descriptors
}

/// Descriptors for `sync-templates`, derived from a source's template list
///
/// Starter sources, the hook and the project description are excluded: they
/// belong to the structure builder, the git step and the generator.
pub fn sync_descriptors(template_names: &[String]) -> Vec<TemplateDescriptor> {
    template_names
        .iter()
        .filter(|name| !name.starts_with(STARTER_PREFIX) && !NOT_CONFIG.contains(&name.as_str()))
        .map(|name| config_descriptor(name))
        .collect()
}

/// Starter source files written by the structure builder
pub fn starter_descriptors(config: &ProjectConfig) -> Vec<TemplateDescriptor> {
    let unit_test = match config.test_framework {
        TestFramework::XCTest => "starter/UnitTests-xctest.swift",
        TestFramework::SwiftTesting => "starter/UnitTests-swift-testing.swift",
    };

    vec![
        TemplateDescriptor::new(
            "starter/App.swift",
            "{{PROJECT_NAME}}/Sources/App/{{PROJECT_NAME}}App.swift",
        ),
        TemplateDescriptor::new(
            "starter/ContentView.swift",
            "{{PROJECT_NAME}}/Sources/Views/ContentView.swift",
        ),
        TemplateDescriptor::new(
            "starter/ContentViewModel.swift",
            "{{PROJECT_NAME}}/Sources/ViewModels/ContentViewModel.swift",
        ),
        TemplateDescriptor::new(unit_test, "{{PROJECT_NAME}}Tests/{{PROJECT_NAME}}Tests.swift"),
        TemplateDescriptor::new(
            "starter/UITests.swift",
            "{{PROJECT_NAME}}UITests/{{PROJECT_NAME}}UITests.swift",
        ),
        TemplateDescriptor::new("starter/Info.plist", "{{PROJECT_NAME}}/Info.plist"),
    ]
    .into_iter()
    .map(TemplateDescriptor::keep_existing)
    .collect()
}

/// Resolve a descriptor destination against the project root
pub fn resolve_destination(root: &std::path::Path, rendered: &str) -> PathBuf {
    rendered
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}
