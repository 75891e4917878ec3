//! Turning parsed flags plus prompts into a [`ProjectConfig`]

use super::defaults::Defaults;
use super::record::{ProjectConfig, TestFramework, Visibility};
use super::validate::{BundleIdRoot, DottedVersion, LanguageCode, ProjectName};
use crate::error::BootstrapError;
use crate::prompt::{ask_parsed, Prompter};
use anyhow::Result;

/// Configuration fields as given on the command line, before prompting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDraft {
    pub project_name: Option<ProjectName>,
    pub bundle_id_root: Option<BundleIdRoot>,
    pub deployment_target: Option<DottedVersion>,
    pub swift_version: Option<DottedVersion>,
    pub test_framework: Option<TestFramework>,
    pub source_language: Option<LanguageCode>,
    pub visibility: Option<Visibility>,
    pub force: bool,
    pub git_hooks: Option<bool>,
    pub initial_commit: Option<bool>,
}

impl ConfigDraft {
    /// Set visibility; a different value already set is a conflict
    pub fn set_visibility(&mut self, visibility: Visibility) -> Result<(), BootstrapError> {
        match self.visibility {
            Some(existing) if existing != visibility => Err(BootstrapError::Conflict {
                first: "--public",
                second: "--private",
            }),
            _ => {
                self.visibility = Some(visibility);
                Ok(())
            }
        }
    }

    /// Set the test framework; a different value already set is a conflict
    pub fn set_test_framework(&mut self, framework: TestFramework) -> Result<(), BootstrapError> {
        match self.test_framework {
            Some(existing) if existing != framework => Err(BootstrapError::Conflict {
                first: "--test-framework xctest",
                second: "--test-framework swift-testing",
            }),
            _ => {
                self.test_framework = Some(framework);
                Ok(())
            }
        }
    }

    pub fn set_git_hooks(&mut self, enabled: bool) -> Result<(), BootstrapError> {
        match self.git_hooks {
            Some(existing) if existing != enabled => Err(BootstrapError::Conflict {
                first: "--git-hooks",
                second: "--no-git-hooks",
            }),
            _ => {
                self.git_hooks = Some(enabled);
                Ok(())
            }
        }
    }

    pub fn set_initial_commit(&mut self, enabled: bool) -> Result<(), BootstrapError> {
        match self.initial_commit {
            Some(existing) if existing != enabled => Err(BootstrapError::Conflict {
                first: "--commit",
                second: "--no-commit",
            }),
            _ => {
                self.initial_commit = Some(enabled);
                Ok(())
            }
        }
    }

    /// Whether no field was supplied at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Fill every unset field from prompts or defaults and validate the result
pub fn resolve_config(
    draft: ConfigDraft,
    defaults: &Defaults,
    prompter: &mut dyn Prompter,
) -> Result<ProjectConfig> {
    if draft.is_empty() {
        tracing::debug!("empty command line, resolving every field interactively");
    }

    let project_name = match draft.project_name {
        Some(name) => name,
        None => ask_parsed(prompter, "Project name", "--project-name", None, |s| {
            s.parse::<ProjectName>()
        })?,
    };

    let bundle_id_root = match draft.bundle_id_root {
        Some(root) => root,
        None => {
            let default: BundleIdRoot = defaults.bundle_id_root().parse()?;
            ask_parsed(
                prompter,
                "Bundle identifier root",
                "--bundle-id-root",
                Some(default),
                |s| s.parse::<BundleIdRoot>(),
            )?
        }
    };

    let deployment_target = match draft.deployment_target {
        Some(v) => v,
        None => ask_version(
            prompter,
            "iOS deployment target",
            "--deployment-target",
            "deployment target",
            defaults.deployment_target(),
        )?,
    };

    let swift_version = match draft.swift_version {
        Some(v) => v,
        None => ask_version(
            prompter,
            "Swift version",
            "--swift-version",
            "swift version",
            defaults.swift_version(),
        )?,
    };

    let test_framework = match draft.test_framework {
        Some(f) => f,
        None => {
            let default = defaults.test_framework.unwrap_or_default();
            let items = [
                ("xctest", TestFramework::XCTest.display_name()),
                ("swift-testing", TestFramework::SwiftTesting.display_name()),
            ];
            let initial = if default == TestFramework::XCTest { 0 } else { 1 };
            match prompter.choose("Test framework", &items, initial)? {
                0 => TestFramework::XCTest,
                _ => TestFramework::SwiftTesting,
            }
        }
    };

    let source_language = match draft.source_language {
        Some(code) => code,
        None => {
            let default: LanguageCode = defaults.source_language().parse()?;
            ask_parsed(
                prompter,
                "Source language (ISO 639-1)",
                "--source-language",
                Some(default),
                |s| s.parse::<LanguageCode>(),
            )?
        }
    };

    let visibility = match draft.visibility {
        Some(v) => v,
        None => {
            let default = defaults.visibility.unwrap_or_default();
            let items = [("public", "Public"), ("private", "Private")];
            let initial = if default == Visibility::Public { 0 } else { 1 };
            match prompter.choose("Repository visibility", &items, initial)? {
                0 => Visibility::Public,
                _ => Visibility::Private,
            }
        }
    };

    let git_hooks = match draft.git_hooks {
        Some(enabled) => enabled,
        None => prompter.confirm("Install git pre-commit hook?", defaults.git_hooks.unwrap_or(true))?,
    };

    let initial_commit = match draft.initial_commit {
        Some(enabled) => enabled,
        None => prompter.confirm("Create an initial commit?", defaults.commit.unwrap_or(true))?,
    };

    let config = ProjectConfig {
        project_name,
        bundle_id_root,
        deployment_target,
        swift_version,
        test_framework,
        source_language,
        visibility,
        force: draft.force,
        git_hooks,
        initial_commit,
    };
    config.validate()?;

    tracing::info!(
        project = %config.project_name,
        bundle_id = %config.bundle_id(),
        deployment_target = %config.deployment_target,
        "configuration resolved"
    );
    Ok(config)
}

fn ask_version(
    prompter: &mut dyn Prompter,
    prompt: &str,
    flag: &'static str,
    field: &'static str,
    default: &str,
) -> Result<DottedVersion> {
    let default = DottedVersion::parse_field(field, default)?;
    ask_parsed(prompter, prompt, flag, Some(default), |s| {
        DottedVersion::parse_field(field, s)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{AutoPrompter, ScriptedPrompter};

    fn scenario_one_draft() -> ConfigDraft {
        let mut draft = ConfigDraft {
            project_name: Some("DemoApp".parse().unwrap()),
            deployment_target: Some("17.0".parse().unwrap()),
            swift_version: Some("5.9".parse().unwrap()),
            force: true,
            ..Default::default()
        };
        draft.set_visibility(Visibility::Public).unwrap();
        draft
    }

    #[test]
    fn test_conflicting_visibility_is_an_error() {
        let mut draft = ConfigDraft::default();
        draft.set_visibility(Visibility::Public).unwrap();
        let err = draft.set_visibility(Visibility::Private).unwrap_err();
        assert!(matches!(err, BootstrapError::Conflict { .. }));
        assert_eq!(draft.visibility, Some(Visibility::Public));
    }

    #[test]
    fn test_repeating_same_visibility_is_fine() {
        let mut draft = ConfigDraft::default();
        draft.set_visibility(Visibility::Private).unwrap();
        assert!(draft.set_visibility(Visibility::Private).is_ok());
    }

    #[test]
    fn test_conflicting_toggles() {
        let mut draft = ConfigDraft::default();
        draft.set_git_hooks(false).unwrap();
        assert!(draft.set_git_hooks(true).is_err());
        draft.set_initial_commit(true).unwrap();
        assert!(draft.set_initial_commit(false).is_err());
        draft.set_test_framework(TestFramework::XCTest).unwrap();
        assert!(draft.set_test_framework(TestFramework::SwiftTesting).is_err());
    }

    #[test]
    fn test_scenario_one_resolves_without_prompts() {
        let config =
            resolve_config(scenario_one_draft(), &Defaults::default(), &mut AutoPrompter).unwrap();

        assert_eq!(config.project_name.as_str(), "DemoApp");
        assert_eq!(config.deployment_target.as_str(), "17.0");
        assert_eq!(config.swift_version.as_str(), "5.9");
        assert_eq!(config.visibility, Visibility::Public);
        assert!(config.force);
        assert_eq!(config.bundle_id_root.as_str(), "com.example");
        assert_eq!(config.test_framework, TestFramework::XCTest);
    }

    #[test]
    fn test_non_interactive_requires_project_name() {
        let err = resolve_config(ConfigDraft::default(), &Defaults::default(), &mut AutoPrompter)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BootstrapError>(),
            Some(BootstrapError::MissingValue {
                flag: "--project-name"
            })
        ));
    }

    #[test]
    fn test_all_interactive_session() {
        let mut prompter = ScriptedPrompter::new([
            "Weather",       // project name
            "io.acme",       // bundle id root
            "16",            // rejected deployment target
            "16.4",          // deployment target
            "",              // swift version default
            "swift-testing", // framework
            "de",            // language
            "private",       // visibility
            "n",             // hooks
            "y",             // commit
        ]);

        let config =
            resolve_config(ConfigDraft::default(), &Defaults::default(), &mut prompter).unwrap();

        assert_eq!(config.project_name.as_str(), "Weather");
        assert_eq!(config.bundle_id_root.as_str(), "io.acme");
        assert_eq!(config.deployment_target.as_str(), "16.4");
        assert_eq!(config.swift_version.as_str(), "5.9");
        assert_eq!(config.test_framework, TestFramework::SwiftTesting);
        assert_eq!(config.source_language.as_str(), "de");
        assert_eq!(config.visibility, Visibility::Private);
        assert!(!config.git_hooks);
        assert!(config.initial_commit);
        assert_eq!(prompter.rejections.len(), 1);
    }

    #[test]
    fn test_invalid_defaults_file_value_is_fatal() {
        let defaults = Defaults {
            deployment_target: Some("seventeen".to_string()),
            ..Default::default()
        };
        let draft = ConfigDraft {
            project_name: Some("DemoApp".parse().unwrap()),
            ..Default::default()
        };
        let err = resolve_config(draft, &defaults, &mut AutoPrompter).unwrap_err();
        assert!(err.to_string().contains("seventeen"));
    }
}
