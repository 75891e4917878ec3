//! Project-level defaults from an optional `iosboot.yaml`

use super::record::{TestFramework, Visibility};
use crate::error::BootstrapError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up in the project directory
pub const DEFAULTS_FILE: &str = "iosboot.yaml";

pub const DEFAULT_BUNDLE_ID_ROOT: &str = "com.example";
pub const DEFAULT_DEPLOYMENT_TARGET: &str = "17.0";
pub const DEFAULT_SWIFT_VERSION: &str = "5.9";
pub const DEFAULT_SOURCE_LANGUAGE: &str = "en";
pub const DEFAULT_DEVICE: &str = "iPhone 15";

/// Fallback values used when a flag is not given
///
/// Every field is optional; missing fields fall back to the built-in
/// constants above.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    #[serde(default)]
    pub bundle_id_root: Option<String>,

    #[serde(default)]
    pub deployment_target: Option<String>,

    #[serde(default)]
    pub swift_version: Option<String>,

    #[serde(default)]
    pub test_framework: Option<TestFramework>,

    #[serde(default)]
    pub source_language: Option<String>,

    #[serde(default)]
    pub visibility: Option<Visibility>,

    #[serde(default)]
    pub git_hooks: Option<bool>,

    #[serde(default)]
    pub commit: Option<bool>,

    #[serde(default)]
    pub test_device: Option<String>,

    #[serde(default)]
    pub ui_test_device: Option<String>,
}

impl Defaults {
    /// Load `iosboot.yaml` from `dir`; an absent file yields empty defaults
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(DEFAULTS_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no defaults file");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|e| {
            BootstrapError::MalformedDocument {
                path,
                reason: e.to_string(),
            }
            .into()
        })
    }

    pub fn bundle_id_root(&self) -> &str {
        self.bundle_id_root.as_deref().unwrap_or(DEFAULT_BUNDLE_ID_ROOT)
    }

    pub fn deployment_target(&self) -> &str {
        self.deployment_target
            .as_deref()
            .unwrap_or(DEFAULT_DEPLOYMENT_TARGET)
    }

    pub fn swift_version(&self) -> &str {
        self.swift_version.as_deref().unwrap_or(DEFAULT_SWIFT_VERSION)
    }

    pub fn source_language(&self) -> &str {
        self.source_language
            .as_deref()
            .unwrap_or(DEFAULT_SOURCE_LANGUAGE)
    }

    pub fn test_device(&self) -> &str {
        self.test_device.as_deref().unwrap_or(DEFAULT_DEVICE)
    }

    pub fn ui_test_device(&self) -> &str {
        self.ui_test_device.as_deref().unwrap_or(DEFAULT_DEVICE)
    }
}
