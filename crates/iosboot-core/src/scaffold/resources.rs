//! Asset catalog and string catalog

use crate::config::ProjectConfig;
use crate::templates::write_file;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Localization resource document (`Localizable.xcstrings`)
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringCatalog {
    pub source_language: String,
    #[serde(default)]
    pub strings: BTreeMap<String, serde_json::Value>,
    pub version: String,
}

impl StringCatalog {
    pub fn empty(source_language: &str) -> Self {
        Self {
            source_language: source_language.to_string(),
            strings: BTreeMap::new(),
            version: "1.0".to_string(),
        }
    }
}

fn catalog_info() -> serde_json::Value {
    json!({ "author": "xcode", "version": 1 })
}

/// (path relative to the resources directory, JSON document)
fn resource_documents(config: &ProjectConfig) -> Result<Vec<(String, String)>> {
    let root = json!({ "info": catalog_info() });
    let app_icon = json!({
        "images": [
            { "idiom": "universal", "platform": "ios", "size": "1024x1024" }
        ],
        "info": catalog_info(),
    });
    let accent = json!({
        "colors": [ { "idiom": "universal" } ],
        "info": catalog_info(),
    });
    let strings = StringCatalog::empty(config.source_language.as_str());

    Ok(vec![
        ("Assets.xcassets/Contents.json".to_string(), pretty(&root)?),
        (
            "Assets.xcassets/AppIcon.appiconset/Contents.json".to_string(),
            pretty(&app_icon)?,
        ),
        (
            "Assets.xcassets/AccentColor.colorset/Contents.json".to_string(),
            pretty(&accent)?,
        ),
        ("Localizable.xcstrings".to_string(), pretty(&strings)?),
    ])
}

fn pretty<T: Serialize>(value: &T) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value).context("Failed to serialize resource")?;
    text.push('\n');
    Ok(text)
}

/// Resources directory for a project
pub fn resources_dir(root: &Path, config: &ProjectConfig) -> PathBuf {
    root.join(config.project_name.as_str()).join("Resources")
}

/// Write resource documents that do not exist yet (all of them with force)
///
/// Returns the paths written.
pub fn build_resources(root: &Path, config: &ProjectConfig) -> Result<Vec<PathBuf>> {
    let dir = resources_dir(root, config);
    let mut written = Vec::new();

    for (relative, content) in resource_documents(config)? {
        let path = relative
            .split('/')
            .fold(dir.clone(), |path, segment| path.join(segment));
        if path.exists() && !config.force {
            continue;
        }
        write_file(&path, &content)?;
        written.push(path);
    }

    Ok(written)
}
