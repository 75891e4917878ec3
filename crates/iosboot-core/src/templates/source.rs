//! Where template contents come from: built-in assets or a local directory

use super::assets;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Environment variable overriding the template directory
pub const TEMPLATE_DIR_ENV: &str = "IOSBOOT_TEMPLATE_DIR";

/// Template source - either the embedded assets or a local directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Embedded,
    Local(PathBuf),
}

impl TemplateSource {
    /// Pick a source from an explicit flag, then the environment, then the built-ins
    pub fn from_flag_or_env(flag: Option<PathBuf>) -> Self {
        flag.or_else(|| std::env::var_os(TEMPLATE_DIR_ENV).map(PathBuf::from))
            .map(Self::Local)
            .unwrap_or(Self::Embedded)
    }

    /// Load a template by name; `None` when the source has no such template
    pub fn load(&self, name: &str) -> Result<Option<String>> {
        match self {
            TemplateSource::Embedded => Ok(assets::embedded(name).map(str::to_string)),
            TemplateSource::Local(dir) => {
                let path = dir.join(name);
                if !path.is_file() {
                    return Ok(None);
                }
                std::fs::read_to_string(&path)
                    .map(Some)
                    .with_context(|| format!("Failed to read template {}", path.display()))
            }
        }
    }

    /// Names of all templates this source provides, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = match self {
            TemplateSource::Embedded => assets::EMBEDDED
                .iter()
                .map(|(name, _)| name.to_string())
                .collect(),
            TemplateSource::Local(dir) => list_dir(dir)?,
        };
        names.sort();
        Ok(names)
    }

    pub fn describe(&self) -> String {
        match self {
            TemplateSource::Embedded => "built-in templates".to_string(),
            TemplateSource::Local(dir) => format!("local templates from {}", dir.display()),
        }
    }
}

fn list_dir(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        anyhow::bail!("Template directory not found: {}", dir.display());
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .with_context(|| format!("Unexpected path {}", entry.path().display()))?;
        // Template names always use forward slashes
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        names.push(name);
    }
    Ok(names)
}
