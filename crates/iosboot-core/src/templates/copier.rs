//! Rendering templates into the project directory

use super::manifest::{resolve_destination, OverwritePolicy, TemplateDescriptor};
use super::source::TemplateSource;
use super::substitute::substitute;
use crate::config::ProjectConfig;
use crate::prompt::Prompter;
use crate::ui;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// What happened to one descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Written,
    /// Destination existed and the user chose not to overwrite it
    Declined,
    /// Destination existed and the descriptor keeps existing files
    Kept,
    /// The source has no such template
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub template: String,
    pub destination: PathBuf,
    pub outcome: RenderOutcome,
}

/// Render every descriptor in order
///
/// Missing templates produce a warning and are skipped; any I/O failure aborts.
pub fn render_templates(
    root: &Path,
    source: &TemplateSource,
    descriptors: &[TemplateDescriptor],
    config: &ProjectConfig,
    prompter: &mut dyn Prompter,
) -> Result<Vec<RenderReport>> {
    let table = config.placeholders();
    let mut reports = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        let destination = resolve_destination(root, &substitute(&descriptor.destination, &table));
        let outcome = render_one(
            source,
            descriptor,
            &destination,
            &table,
            config.force,
            prompter,
        )?;
        tracing::debug!(
            template = %descriptor.template,
            destination = %destination.display(),
            ?outcome,
            "rendered template"
        );
        reports.push(RenderReport {
            template: descriptor.template.clone(),
            destination,
            outcome,
        });
    }

    Ok(reports)
}

fn render_one(
    source: &TemplateSource,
    descriptor: &TemplateDescriptor,
    destination: &Path,
    table: &[(&str, String)],
    force: bool,
    prompter: &mut dyn Prompter,
) -> Result<RenderOutcome> {
    let Some(content) = source.load(&descriptor.template)? else {
        ui::warning(format!(
            "Template '{}' not found in {}, skipping",
            descriptor.template,
            source.describe()
        ));
        return Ok(RenderOutcome::Missing);
    };

    if destination.exists() && !force {
        match descriptor.policy {
            OverwritePolicy::AlwaysRegenerate => {}
            OverwritePolicy::KeepExisting => return Ok(RenderOutcome::Kept),
            OverwritePolicy::PromptIfExists => {
                let overwrite = prompter
                    .confirm(&format!("{} exists. Overwrite?", destination.display()), false)?;
                if !overwrite {
                    ui::info(format!("Keeping existing {}", destination.display()));
                    return Ok(RenderOutcome::Declined);
                }
            }
        }
    }

    write_file(destination, &substitute(&content, table))?;
    Ok(RenderOutcome::Written)
}

/// Write a whole file, creating parent directories
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}
