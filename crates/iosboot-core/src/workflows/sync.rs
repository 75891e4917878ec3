//! Re-render configuration templates for an existing project

use crate::config::{resolve_config, ConfigDraft, Defaults, DottedVersion, ProjectConfig};
use crate::project_spec::ProjectDescription;
use crate::prompt::{AutoPrompter, Prompter};
use crate::templates::manifest::sync_descriptors;
use crate::templates::{render_templates, RenderReport, TemplateSource};
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub directory: PathBuf,
    pub template_source: TemplateSource,
    pub force: bool,
}

/// Rebuild the configuration record from `project.yml` plus defaults
pub fn config_from_project(
    spec: &ProjectDescription,
    defaults: &Defaults,
    force: bool,
) -> Result<ProjectConfig> {
    let name = spec
        .name()
        .context("project.yml has no name")?
        .parse()?;

    let mut draft = ConfigDraft {
        project_name: Some(name),
        force,
        ..Default::default()
    };
    if let Some(prefix) = spec.bundle_id_prefix() {
        draft.bundle_id_root = Some(prefix.parse()?);
    }
    if let Some(target) = spec.deployment_target() {
        draft.deployment_target = Some(DottedVersion::parse_field("deployment target", &target)?);
    }
    if let Some(version) = spec.swift_version() {
        draft.swift_version = Some(DottedVersion::parse_field("swift version", &version)?);
    }

    resolve_config(draft, defaults, &mut AutoPrompter)
}

pub fn run_sync(options: &SyncOptions, prompter: &mut dyn Prompter) -> Result<Vec<RenderReport>> {
    let spec = ProjectDescription::load(&options.directory)?.with_context(|| {
        format!(
            "No project.yml in {}; run `iosboot setup` first",
            options.directory.display()
        )
    })?;
    let defaults = Defaults::load(&options.directory)?;
    let config = config_from_project(&spec, &defaults, options.force)?;

    let descriptors = sync_descriptors(&options.template_source.list()?);
    tracing::info!(
        count = descriptors.len(),
        source = %options.template_source.describe(),
        "syncing templates"
    );
    render_templates(
        &options.directory,
        &options.template_source,
        &descriptors,
        &config,
        prompter,
    )
}
