//! Reading and patching the XcodeGen project description (`project.yml`)
//!
//! The document is kept as a [`serde_yaml::Value`] so unknown keys and key
//! order survive a patch.

use crate::error::BootstrapError;
use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

pub use crate::templates::manifest::PROJECT_SPEC as FILE_NAME;

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDescription {
    path: PathBuf,
    doc: Value,
}

impl ProjectDescription {
    /// Load `project.yml` from the project root; `None` when absent
    pub fn load(root: &Path) -> Result<Option<Self>> {
        let path = root.join(FILE_NAME);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(path, &content).map(Some)
    }

    pub fn parse(path: PathBuf, content: &str) -> Result<Self> {
        let malformed = |reason: String| BootstrapError::MalformedDocument {
            path: path.clone(),
            reason,
        };

        let doc: Value = serde_yaml::from_str(content).map_err(|e| malformed(e.to_string()))?;
        let Value::Mapping(root) = &doc else {
            return Err(malformed("top level is not a mapping".to_string()).into());
        };
        if !matches!(root.get("name"), Some(Value::String(_))) {
            return Err(malformed("missing string field 'name'".to_string()).into());
        }
        if let Some(targets) = root.get("targets") {
            if !targets.is_mapping() {
                return Err(malformed("'targets' is not a mapping".to_string()).into());
            }
        }

        let spec = Self { path, doc };
        let ambiguous = spec
            .version_scalars()
            .into_iter()
            .find(|(_, value)| matches!(value, Value::Number(n) if n.is_f64()))
            .map(|(field, value)| {
                format!(
                    "unquoted version {} in '{}' is ambiguous; quote it, e.g. \"17.10\"",
                    yaml_number(value),
                    field
                )
            });
        if let Some(reason) = ambiguous {
            return Err(BootstrapError::MalformedDocument {
                path: spec.path,
                reason,
            }
            .into());
        }
        Ok(spec)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> Option<&str> {
        self.doc.get("name").and_then(Value::as_str)
    }

    pub fn bundle_id_prefix(&self) -> Option<&str> {
        self.doc
            .get("options")
            .and_then(|o| o.get("bundleIdPrefix"))
            .and_then(Value::as_str)
    }

    pub fn swift_version(&self) -> Option<String> {
        self.doc
            .get("settings")
            .and_then(|s| s.get("base"))
            .and_then(|b| b.get("SWIFT_VERSION"))
            .and_then(version_text)
    }

    /// iOS deployment target from `options`, else from the main target
    pub fn deployment_target(&self) -> Option<String> {
        let from_options = self
            .doc
            .get("options")
            .and_then(|o| o.get("deploymentTarget"))
            .and_then(|d| d.get("iOS"))
            .and_then(version_text);

        from_options.or_else(|| {
            let target = self.doc.get("targets")?.get(self.name()?)?;
            match target.get("deploymentTarget")? {
                Value::Mapping(per_platform) => per_platform.get("iOS").and_then(version_text),
                other => version_text(other),
            }
        })
    }

    /// Every scalar read as a version, with its dotted path
    fn version_scalars(&self) -> Vec<(String, &Value)> {
        let mut scalars = Vec::new();
        if let Some(ios) = self
            .doc
            .get("options")
            .and_then(|o| o.get("deploymentTarget"))
            .and_then(|d| d.get("iOS"))
        {
            scalars.push(("options.deploymentTarget.iOS".to_string(), ios));
        }
        if let Some(swift) = self
            .doc
            .get("settings")
            .and_then(|s| s.get("base"))
            .and_then(|b| b.get("SWIFT_VERSION"))
        {
            scalars.push(("settings.base.SWIFT_VERSION".to_string(), swift));
        }
        if let Some(targets) = self.doc.get("targets").and_then(Value::as_mapping) {
            for (name, target) in targets {
                let name = name.as_str().unwrap_or("?");
                match target.get("deploymentTarget") {
                    Some(Value::Mapping(per_platform)) => {
                        if let Some(ios) = per_platform.get("iOS") {
                            scalars.push((format!("targets.{}.deploymentTarget.iOS", name), ios));
                        }
                    }
                    Some(other) => scalars.push((format!("targets.{}.deploymentTarget", name), other)),
                    None => {}
                }
            }
        }
        scalars
    }

    /// Target names in document order
    pub fn targets(&self) -> Vec<String> {
        self.doc
            .get("targets")
            .and_then(Value::as_mapping)
            .map(|m| {
                m.keys()
                    .filter_map(|k| k.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Set `options.deploymentTarget.iOS`, creating intermediate mappings
    pub fn set_deployment_target(&mut self, version: &str) -> Result<()> {
        let path = self.path.clone();
        let malformed = |reason: &str| BootstrapError::MalformedDocument {
            path: path.clone(),
            reason: reason.to_string(),
        };

        let root = self
            .doc
            .as_mapping_mut()
            .ok_or_else(|| malformed("top level is not a mapping"))?;
        let options = child_mapping(root, "options").ok_or_else(|| malformed("'options' is not a mapping"))?;
        let targets = child_mapping(options, "deploymentTarget")
            .ok_or_else(|| malformed("'options.deploymentTarget' is not a mapping"))?;
        targets.insert(Value::from("iOS"), Value::from(version));
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let content =
            serde_yaml::to_string(&self.doc).context("Failed to serialize project description")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

fn child_mapping<'a>(parent: &'a mut Mapping, key: &str) -> Option<&'a mut Mapping> {
    if !parent.contains_key(key) {
        parent.insert(Value::from(key), Value::Mapping(Mapping::new()));
    }
    parent.get_mut(key).and_then(Value::as_mapping_mut)
}

/// A bare major version such as `iOS: 17` reads as `17.0`
///
/// Unquoted decimals are rejected by [`ProjectDescription::parse`], since
/// YAML has already turned `17.10` into `17.1`.
fn version_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if !n.is_f64() => Some(format!("{}.0", n)),
        _ => None,
    }
}

fn yaml_number(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = "\
name: DemoApp
options:
  bundleIdPrefix: com.example
  deploymentTarget:
    iOS: \"16.4\"
settings:
  base:
    SWIFT_VERSION: \"5.9\"
targets:
  DemoApp:
    type: application
  DemoAppTests:
    type: bundle.unit-test
";

    fn parse(content: &str) -> Result<ProjectDescription> {
        ProjectDescription::parse(PathBuf::from("project.yml"), content)
    }

    #[test]
    fn test_reads_fields() {
        let spec = parse(SPEC).unwrap();
        assert_eq!(spec.name(), Some("DemoApp"));
        assert_eq!(spec.bundle_id_prefix(), Some("com.example"));
        assert_eq!(spec.deployment_target().as_deref(), Some("16.4"));
        assert_eq!(spec.swift_version().as_deref(), Some("5.9"));
        assert_eq!(spec.targets(), vec!["DemoApp", "DemoAppTests"]);
    }

    #[test]
    fn test_unquoted_major_version() {
        let spec = parse("name: A\noptions:\n  deploymentTarget:\n    iOS: 17\n").unwrap();
        assert_eq!(spec.deployment_target().as_deref(), Some("17.0"));
    }

    #[test]
    fn test_unquoted_decimal_version_is_malformed() {
        for content in [
            "name: A\noptions:\n  deploymentTarget:\n    iOS: 17.10\n",
            "name: A\nsettings:\n  base:\n    SWIFT_VERSION: 5.10\n",
            "name: A\ntargets:\n  A:\n    deploymentTarget: 16.4\n",
        ] {
            let err = parse(content).unwrap_err();
            match err.downcast_ref::<BootstrapError>() {
                Some(BootstrapError::MalformedDocument { reason, .. }) => {
                    assert!(reason.contains("quote"), "reason: {}", reason);
                }
                other => panic!("unexpected error for {:?}: {:?}", content, other),
            }
        }
    }

    #[test]
    fn test_target_level_deployment_target() {
        let spec = parse("name: A\ntargets:\n  A:\n    deploymentTarget: \"15.0\"\n").unwrap();
        assert_eq!(spec.deployment_target().as_deref(), Some("15.0"));
    }

    #[test]
    fn test_missing_deployment_target() {
        let spec = parse("name: A\ntargets:\n  A:\n    type: application\n").unwrap();
        assert!(spec.deployment_target().is_none());
    }

    #[test]
    fn test_malformed_documents() {
        assert!(parse("- a\n- b\n").is_err());
        assert!(parse("options: {}\n").is_err());
        assert!(parse("name: A\ntargets: [A]\n").is_err());
        assert!(parse("name: [unclosed\n").is_err());
    }

    #[test]
    fn test_patch_preserves_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FILE_NAME), SPEC).unwrap();

        let mut spec = ProjectDescription::load(dir.path()).unwrap().unwrap();
        spec.set_deployment_target("17.2").unwrap();
        spec.save().unwrap();

        let reloaded = ProjectDescription::load(dir.path()).unwrap().unwrap();
        assert_eq!(reloaded.deployment_target().as_deref(), Some("17.2"));
        assert_eq!(reloaded.bundle_id_prefix(), Some("com.example"));
        assert_eq!(reloaded.targets(), vec!["DemoApp", "DemoAppTests"]);
    }

    #[test]
    fn test_patch_creates_options() {
        let mut spec = parse("name: A\n").unwrap();
        spec.set_deployment_target("16.0").unwrap();
        assert_eq!(spec.deployment_target().as_deref(), Some("16.0"));
    }

    #[test]
    fn test_absent_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ProjectDescription::load(dir.path()).unwrap().is_none());
    }
}
