//! Persisted simulator bindings (`simulators.yml`)

use crate::config::defaults::DEFAULT_DEVICE;
use crate::error::BootstrapError;
use crate::templates::write_file;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const BINDINGS_FILE: &str = "simulators.yml";

pub const PLACEHOLDER_OS: &str = "latest";
pub const PLACEHOLDER_ARCH: &str = "arm64";

/// Test role a simulator is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum Role {
    Tests,
    UiTests,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Tests, Role::UiTests];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tests => "tests",
            Role::UiTests => "ui-tests",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Binding {
    pub device: String,
    #[serde(deserialize_with = "scalar_string")]
    pub os: String,
    pub arch: String,
}

impl Binding {
    pub fn new(device: impl Into<String>, os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            os: os.into(),
            arch: arch.into(),
        }
    }

    pub fn placeholder() -> Self {
        Self::new(DEFAULT_DEVICE, PLACEHOLDER_OS, PLACEHOLDER_ARCH)
    }

    /// `xcodebuild -destination` argument
    pub fn destination(&self) -> String {
        format!(
            "platform=iOS Simulator,name={},OS={},arch={}",
            self.device, self.os, self.arch
        )
    }

    /// `(field, before, after)` for every field that differs
    pub fn diff<'a>(&'a self, other: &'a Binding) -> Vec<(&'static str, &'a str, &'a str)> {
        [
            ("device", &self.device, &other.device),
            ("os", &self.os, &other.os),
            ("arch", &self.arch, &other.arch),
        ]
        .into_iter()
        .filter(|(_, before, after)| before != after)
        .map(|(field, before, after)| (field, before.as_str(), after.as_str()))
        .collect()
    }
}

/// An unquoted `os: 17` reads as a YAML integer
///
/// Unquoted decimals are refused: `17.10` has already become `17.1`.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) if n.is_f64() => Err(serde::de::Error::custom(format!(
            "unquoted version {} is ambiguous; quote it, e.g. os: \"17.10\"",
            n
        ))),
        serde_yaml::Value::Number(n) => Ok(format!("{}.0", n)),
        other => Err(serde::de::Error::custom(format!(
            "expected a string, found {:?}",
            other
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Roles {
    tests: Binding,
    #[serde(rename = "ui-tests")]
    ui_tests: Binding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    simulators: Roles,
}

/// The bindings document for one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorBindings {
    path: PathBuf,
    doc: Document,
    persisted: bool,
}

impl SimulatorBindings {
    pub fn path_in(root: &Path) -> PathBuf {
        root.join(BINDINGS_FILE)
    }

    /// Load the document, or placeholders for both roles if it doesn't exist yet
    ///
    /// A document with missing or extra roles or fields is rejected, never repaired.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path_in(root);
        if !path.exists() {
            return Ok(Self {
                path,
                doc: Document {
                    simulators: Roles {
                        tests: Binding::placeholder(),
                        ui_tests: Binding::placeholder(),
                    },
                },
                persisted: false,
            });
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let doc: Document = serde_yaml::from_str(&content).map_err(|e| {
            BootstrapError::MalformedDocument {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            path,
            doc,
            persisted: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the document exists on disk
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub fn get(&self, role: Role) -> &Binding {
        match role {
            Role::Tests => &self.doc.simulators.tests,
            Role::UiTests => &self.doc.simulators.ui_tests,
        }
    }

    pub fn set(&mut self, role: Role, binding: Binding) {
        match role {
            Role::Tests => self.doc.simulators.tests = binding,
            Role::UiTests => self.doc.simulators.ui_tests = binding,
        }
    }

    pub fn save(&mut self) -> Result<()> {
        let content =
            serde_yaml::to_string(&self.doc).context("Failed to serialize simulator bindings")?;
        write_file(&self.path, &content)?;
        self.persisted = true;
        Ok(())
    }
}
