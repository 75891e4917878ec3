//! Source and test directory layout plus starter files

use crate::config::ProjectConfig;
use crate::prompt::Prompter;
use crate::templates::manifest::starter_descriptors;
use crate::templates::{render_templates, RenderReport, TemplateSource};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Empty file keeping otherwise-empty directories under version control
pub const MARKER_FILE: &str = ".gitkeep";

/// Directories created for every project, relative to the root
pub fn layout(config: &ProjectConfig) -> Vec<String> {
    let name = config.project_name.as_str();
    vec![
        format!("{name}/Sources/App"),
        format!("{name}/Sources/Views"),
        format!("{name}/Sources/ViewModels"),
        format!("{name}/Sources/Models"),
        format!("{name}/Resources"),
        config.tests_target(),
        config.ui_tests_target(),
    ]
}

#[derive(Debug, Default)]
pub struct StructureReport {
    /// Directories that did not exist before
    pub created: Vec<PathBuf>,
    pub files: Vec<RenderReport>,
}

/// Create the directory layout and write starter files
///
/// Existing directories are left alone. Starter files are only written when
/// absent, unless force is set.
pub fn build_structure(
    root: &Path,
    config: &ProjectConfig,
    source: &TemplateSource,
    prompter: &mut dyn Prompter,
) -> Result<StructureReport> {
    let mut report = StructureReport::default();

    for relative in layout(config) {
        let dir = root.join(&relative);
        if !dir.is_dir() {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            report.created.push(dir.clone());
        }

        let marker = dir.join(MARKER_FILE);
        if !marker.exists() {
            std::fs::write(&marker, "")
                .with_context(|| format!("Failed to write file: {}", marker.display()))?;
        }
    }

    report.files = render_templates(root, source, &starter_descriptors(config), config, prompter)?;
    Ok(report)
}
