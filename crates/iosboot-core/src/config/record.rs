//! The resolved configuration record for one bootstrap run

use super::validate::{BundleIdRoot, DottedVersion, LanguageCode, ProjectName};
use crate::error::ValidationError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Test framework used for the starter unit tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestFramework {
    #[default]
    #[value(name = "xctest")]
    #[serde(rename = "xctest")]
    XCTest,
    SwiftTesting,
}

impl TestFramework {
    pub fn display_name(&self) -> &'static str {
        match self {
            TestFramework::XCTest => "XCTest",
            TestFramework::SwiftTesting => "Swift Testing",
        }
    }

    /// Module imported by the starter unit test
    pub fn module(&self) -> &'static str {
        match self {
            TestFramework::XCTest => "XCTest",
            TestFramework::SwiftTesting => "Testing",
        }
    }
}

impl fmt::Display for TestFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Repository visibility when publishing to GitHub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    /// Matching `gh repo create` flag
    pub fn gh_flag(&self) -> &'static str {
        match self {
            Visibility::Public => "--public",
            Visibility::Private => "--private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved project parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub project_name: ProjectName,
    pub bundle_id_root: BundleIdRoot,
    pub deployment_target: DottedVersion,
    pub swift_version: DottedVersion,
    pub test_framework: TestFramework,
    pub source_language: LanguageCode,
    pub visibility: Visibility,
    pub force: bool,
    pub git_hooks: bool,
    pub initial_commit: bool,
}

impl ProjectConfig {
    /// `<root>.<lowercased name>`
    pub fn bundle_id(&self) -> String {
        format!("{}.{}", self.bundle_id_root, self.project_name.to_lowercase())
    }

    pub fn tests_target(&self) -> String {
        format!("{}Tests", self.project_name)
    }

    pub fn ui_tests_target(&self) -> String {
        format!("{}UITests", self.project_name)
    }

    /// Re-check every format rule on the assembled record
    ///
    /// Values arriving through prompts pass through the same parsers, so this
    /// only fails when a record was assembled by hand.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.project_name.as_str().parse::<ProjectName>()?;
        self.bundle_id_root.as_str().parse::<BundleIdRoot>()?;
        DottedVersion::parse_field("deployment target", self.deployment_target.as_str())?;
        DottedVersion::parse_field("swift version", self.swift_version.as_str())?;
        self.source_language.as_str().parse::<LanguageCode>()?;
        Ok(())
    }

    /// Placeholder table used by the template renderer
    pub fn placeholders(&self) -> Vec<(&'static str, String)> {
        vec![
            ("PROJECT_NAME", self.project_name.to_string()),
            ("PROJECT_NAME_LOWER", self.project_name.to_lowercase()),
            ("BUNDLE_ID_ROOT", self.bundle_id_root.to_string()),
            ("BUNDLE_ID", self.bundle_id()),
            ("DEPLOYMENT_TARGET", self.deployment_target.to_string()),
            ("SWIFT_VERSION", self.swift_version.to_string()),
            ("TEST_FRAMEWORK", self.test_framework.display_name().to_string()),
            ("SOURCE_LANGUAGE", self.source_language.to_string()),
            ("VISIBILITY", self.visibility.to_string()),
        ]
    }
}

#[cfg(test)]
pub(crate) fn sample_config() -> ProjectConfig {
    ProjectConfig {
        project_name: "DemoApp".parse().unwrap(),
        bundle_id_root: "com.example".parse().unwrap(),
        deployment_target: "17.0".parse().unwrap(),
        swift_version: "5.9".parse().unwrap(),
        test_framework: TestFramework::XCTest,
        source_language: "en".parse().unwrap(),
        visibility: Visibility::Public,
        force: true,
        git_hooks: false,
        initial_commit: false,
    }
}
