//! Full project bootstrap

use crate::config::{resolve_config, ConfigDraft, Defaults, ProjectConfig};
use crate::git;
use crate::pipeline::{Pipeline, PipelineReport};
use crate::project_spec::ProjectDescription;
use crate::prompt::Prompter;
use crate::runtime::tool::{BREW, GH, GIT, SWIFTLINT, SWIFT_FORMAT, XCODEBUILD, XCODEGEN, XCRUN};
use crate::runtime::{check_tools, CommandRunner, ToolInvoker, ToolSpec};
use crate::scaffold::{build_resources, build_structure};
use crate::simulator::{BindingRequest, Role, SimulatorResolver};
use crate::templates::manifest::{setup_descriptors, PROJECT_SPEC};
use crate::templates::{render_templates, RenderOutcome, TemplateSource};
use crate::ui;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Tools installed with Homebrew when missing
const DEPENDENCIES: &[ToolSpec] = &[XCODEGEN, SWIFTLINT, SWIFT_FORMAT];

/// Lines of `xcodebuild -list` shown after generation
const LIST_EXCERPT_LINES: usize = 10;

#[derive(Debug, Clone)]
pub struct SetupOptions {
    pub draft: ConfigDraft,
    pub directory: PathBuf,
    pub template_source: TemplateSource,
    pub skip_deps: bool,
    pub skip_generate: bool,
    pub skip_simulators: bool,
    pub github: bool,
    pub test_device: Option<String>,
    pub ui_test_device: Option<String>,
}

impl SetupOptions {
    pub fn new(directory: PathBuf) -> Self {
        Self {
            draft: ConfigDraft::default(),
            directory,
            template_source: TemplateSource::Embedded,
            skip_deps: false,
            skip_generate: false,
            skip_simulators: false,
            github: false,
            test_device: None,
            ui_test_device: None,
        }
    }
}

struct SetupContext<'a> {
    options: SetupOptions,
    defaults: Defaults,
    config: ProjectConfig,
    invoker: ToolInvoker<'a>,
    prompter: &'a mut dyn Prompter,
}

/// Resolve the configuration, then run every setup step
///
/// Configuration errors are returned directly; step failures are reported
/// in the returned [`PipelineReport`].
pub fn run_setup(
    options: SetupOptions,
    runner: &dyn CommandRunner,
    prompter: &mut dyn Prompter,
) -> Result<PipelineReport> {
    std::fs::create_dir_all(&options.directory).with_context(|| {
        format!("Failed to create directory: {}", options.directory.display())
    })?;
    let defaults = Defaults::load(&options.directory)?;
    let config = resolve_config(options.draft.clone(), &defaults, prompter)?;
    ui::info(format!(
        "Bootstrapping {} ({}) in {}",
        config.project_name,
        config.bundle_id(),
        options.directory.display()
    ));

    let pipeline = Pipeline::new()
        .step("Check prerequisites", check_prerequisites)
        .step_if("Install dependencies", !options.skip_deps, install_dependencies)
        .step("Render templates", render_configuration)
        .step("Build project structure", build_project_structure)
        .step("Build resources", build_project_resources)
        .step_if("Generate Xcode project", !options.skip_generate, generate_project)
        .step_if("Configure simulators", !options.skip_simulators, configure_simulators)
        .step("Initialize git repository", init_repository)
        .step_if("Install pre-commit hook", config.git_hooks, install_hook)
        .step_if("Create initial commit", config.initial_commit, commit)
        .step_if("Publish to GitHub", options.github, publish);

    let invoker = ToolInvoker::new(runner, &options.directory);
    let mut ctx = SetupContext {
        options,
        defaults,
        config,
        invoker,
        prompter,
    };
    let report = pipeline.run(&mut ctx);

    if report.is_success() {
        print_next_steps(&ctx.config);
    }
    Ok(report)
}

fn check_prerequisites(ctx: &mut SetupContext<'_>) -> Result<()> {
    let mut required = vec![GIT];
    if !ctx.options.skip_simulators {
        required.push(XCRUN);
    }
    if ctx.options.github {
        required.push(GH);
    }
    let advisory = [XCODEGEN, SWIFTLINT, SWIFT_FORMAT, XCODEBUILD, BREW];

    for status in check_tools(&ctx.invoker, &required, &advisory)? {
        match (&status.version, status.available) {
            (Some(version), true) => tracing::info!(tool = status.name(), %version, "found"),
            (None, true) => tracing::info!(tool = status.name(), "found"),
            (_, false) => tracing::info!(tool = status.name(), "not installed"),
        }
    }
    Ok(())
}

fn install_dependencies(ctx: &mut SetupContext<'_>) -> Result<()> {
    let missing: Vec<&ToolSpec> = DEPENDENCIES
        .iter()
        .filter(|tool| !ctx.invoker.is_installed(tool))
        .collect();
    if missing.is_empty() {
        ui::success("All dependencies are installed");
        return Ok(());
    }

    ctx.invoker.require(&BREW)?;
    for tool in missing {
        ctx.invoker.run(
            &BREW,
            &["install", tool.name],
            &format!("Installed {}", tool.display_name),
        )?;
    }
    Ok(())
}

fn render_configuration(ctx: &mut SetupContext<'_>) -> Result<()> {
    let reports = render_templates(
        &ctx.options.directory,
        &ctx.options.template_source,
        &setup_descriptors(),
        &ctx.config,
        ctx.prompter,
    )?;

    let written = reports
        .iter()
        .filter(|r| r.outcome == RenderOutcome::Written)
        .count();
    ui::success(format!("Rendered {} of {} templates", written, reports.len()));

    let spec_declined = reports
        .iter()
        .any(|r| r.template == PROJECT_SPEC && r.outcome == RenderOutcome::Declined);
    if spec_declined {
        propagate_deployment_target(ctx)?;
    }
    Ok(())
}

/// Keep an existing project description in step with the chosen deployment target
fn propagate_deployment_target(ctx: &mut SetupContext<'_>) -> Result<()> {
    let Some(mut spec) = ProjectDescription::load(&ctx.options.directory)? else {
        return Ok(());
    };
    let target = ctx.config.deployment_target.as_str();
    if spec.deployment_target().as_deref() == Some(target) {
        return Ok(());
    }

    spec.set_deployment_target(target)?;
    spec.save()?;
    ui::info(format!("Updated deployment target in {} to {}", PROJECT_SPEC, target));
    Ok(())
}

fn build_project_structure(ctx: &mut SetupContext<'_>) -> Result<()> {
    let report = build_structure(
        &ctx.options.directory,
        &ctx.config,
        &ctx.options.template_source,
        ctx.prompter,
    )?;
    let written = report
        .files
        .iter()
        .filter(|f| f.outcome == RenderOutcome::Written)
        .count();
    ui::success(format!(
        "Created {} directories and {} starter files",
        report.created.len(),
        written
    ));
    Ok(())
}

fn build_project_resources(ctx: &mut SetupContext<'_>) -> Result<()> {
    let written = build_resources(&ctx.options.directory, &ctx.config)?;
    ui::success(format!("Wrote {} resource files", written.len()));
    Ok(())
}

fn generate_project(ctx: &mut SetupContext<'_>) -> Result<()> {
    ctx.invoker.require(&XCODEGEN)?;
    ctx.invoker.run(
        &XCODEGEN,
        &["generate", "--spec", PROJECT_SPEC],
        "Generated Xcode project",
    )?;

    if !ctx.invoker.is_installed(&XCODEBUILD) {
        ui::warning("xcodebuild not found, skipping project listing");
        return Ok(());
    }
    let project = format!("{}.xcodeproj", ctx.config.project_name);
    let listing = ctx.invoker.capture(&XCODEBUILD, &["-list", "-project", project.as_str()])?;
    ui::excerpt(&listing.stdout, LIST_EXCERPT_LINES);
    Ok(())
}

fn configure_simulators(ctx: &mut SetupContext<'_>) -> Result<()> {
    let tests_device = ctx
        .options
        .test_device
        .clone()
        .unwrap_or_else(|| ctx.defaults.test_device().to_string());
    let ui_tests_device = ctx
        .options
        .ui_test_device
        .clone()
        .unwrap_or_else(|| ctx.defaults.ui_test_device().to_string());

    let mut resolver = SimulatorResolver::new(&ctx.invoker, &ctx.options.directory);
    for (role, device) in [(Role::Tests, &tests_device), (Role::UiTests, &ui_tests_device)] {
        let request = BindingRequest {
            role,
            device,
            os: None,
            arch: None,
            force: ctx.config.force,
        };
        resolver.resolve(&request, ctx.prompter)?;
    }
    Ok(())
}

fn init_repository(ctx: &mut SetupContext<'_>) -> Result<()> {
    git::ensure_repository(&ctx.invoker)?;
    Ok(())
}

fn install_hook(ctx: &mut SetupContext<'_>) -> Result<()> {
    let outcome = git::install_pre_commit_hook(
        &ctx.invoker,
        &ctx.options.template_source,
        &ctx.config,
        ctx.prompter,
    )?;
    if outcome == RenderOutcome::Declined {
        ui::info("Kept the existing pre-commit hook");
    }
    Ok(())
}

fn commit(ctx: &mut SetupContext<'_>) -> Result<()> {
    git::initial_commit(&ctx.invoker)?;
    Ok(())
}

fn publish(ctx: &mut SetupContext<'_>) -> Result<()> {
    git::publish(&ctx.invoker, &ctx.config)
}

fn print_next_steps(config: &ProjectConfig) {
    println!();
    println!("  Next steps");
    println!();
    println!("  1.  open {}.xcodeproj", config.project_name);
    println!("  2.  iosboot ci");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DottedVersion, TestFramework, Visibility};
    use crate::prompt::{AutoPrompter, ScriptedPrompter};
    use crate::runtime::testing::FakeRunner;
    use crate::runtime::CommandOutput;
    use crate::simulator::catalog::fixtures;
    use crate::simulator::{SimulatorBindings, BINDINGS_FILE};
    use std::path::Path;

    fn scenario_options(dir: &Path) -> SetupOptions {
        let mut options = SetupOptions::new(dir.to_path_buf());
        options.draft.project_name = Some("DemoApp".parse().unwrap());
        options.draft.deployment_target = Some("17.0".parse().unwrap());
        options.draft.swift_version = Some("5.9".parse().unwrap());
        options.draft.set_visibility(Visibility::Public).unwrap();
        options.draft.force = true;
        options
    }

    fn full_runner() -> FakeRunner {
        let runner = FakeRunner::with_tools(&[
            "git",
            "xcrun",
            "xcodegen",
            "xcodebuild",
            "swiftlint",
            "swift-format",
            "brew",
            "gh",
        ]);
        runner.respond(
            &["xcrun", "simctl", "list", "devicetypes"],
            CommandOutput::ok(fixtures::DEVICE_TYPES),
        );
        runner.respond(
            &["xcrun", "simctl", "list", "runtimes"],
            CommandOutput::ok(fixtures::RUNTIMES),
        );
        runner.respond(&["git", "rev-parse"], CommandOutput::failed(128, "not a repository"));
        runner.respond(
            &["xcodebuild", "-list"],
            CommandOutput::ok("Information about project \"DemoApp\":\n    Targets:\n        DemoApp\n"),
        );
        runner
    }

    #[test]
    fn test_non_interactive_scenario_runs_every_step() {
        let dir = tempfile::tempdir().unwrap();
        let runner = full_runner();

        let report = run_setup(scenario_options(dir.path()), &runner, &mut AutoPrompter).unwrap();

        assert!(report.is_success(), "failed: {:?}", report.failed);
        assert!(report.skipped.contains(&"Publish to GitHub"));
        for file in [
            "project.yml",
            "README.md",
            ".swiftlint.yml",
            ".swift-format",
            ".gitignore",
            ".github/workflows/ci.yml",
            "DemoApp/Sources/App/DemoAppApp.swift",
            "DemoApp/Resources/Localizable.xcstrings",
            ".git/hooks/pre-commit",
        ] {
            assert!(dir.path().join(file).is_file(), "missing {}", file);
        }

        let spec = ProjectDescription::load(dir.path()).unwrap().unwrap();
        assert_eq!(spec.deployment_target().as_deref(), Some("17.0"));

        let bindings = SimulatorBindings::load(dir.path()).unwrap();
        assert_eq!(bindings.get(Role::Tests).os, "17.0");
        assert_eq!(bindings.get(Role::UiTests).device, "iPhone 15");

        assert_eq!(runner.count(&["xcodegen", "generate", "--spec", "project.yml"]), 1);
        assert_eq!(runner.count(&["git", "init"]), 1);
        assert_eq!(runner.count(&["git", "commit", "-m", "Initial commit"]), 1);
        assert_eq!(runner.count(&["brew", "install"]), 0);
    }

    #[test]
    fn test_forced_setup_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = scenario_options(dir.path());
        options.skip_generate = true;
        options.skip_simulators = true;

        run_setup(options.clone(), &full_runner(), &mut AutoPrompter).unwrap();
        let first = std::fs::read_to_string(dir.path().join("project.yml")).unwrap();
        run_setup(options, &full_runner(), &mut AutoPrompter).unwrap();
        let second = std::fs::read_to_string(dir.path().join("project.yml")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_dependencies_are_installed_with_brew() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::with_tools(&["git", "brew"]);
        runner.respond(&["git", "rev-parse"], CommandOutput::failed(128, "not a repository"));
        let mut options = scenario_options(dir.path());
        options.skip_generate = true;
        options.skip_simulators = true;

        let report = run_setup(options, &runner, &mut AutoPrompter).unwrap();
        assert!(report.is_success(), "failed: {:?}", report.failed);
        assert_eq!(runner.count(&["brew", "install", "xcodegen"]), 1);
        assert_eq!(runner.count(&["brew", "install", "swiftlint"]), 1);
        assert_eq!(runner.count(&["brew", "install", "swift-format"]), 1);
    }

    #[test]
    fn test_tool_failure_stops_the_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let runner = full_runner();
        runner.respond(&["xcodegen", "generate"], CommandOutput::failed(1, "Spec error"));

        let report = run_setup(scenario_options(dir.path()), &runner, &mut AutoPrompter).unwrap();

        let failed = report.failed.as_ref().unwrap();
        assert_eq!(failed.name, "Generate Xcode project");
        assert!(!report.succeeded.contains(&"Configure simulators"));
        assert!(!dir.path().join(BINDINGS_FILE).exists());
        assert_eq!(runner.count(&["git", "init"]), 0);
    }

    #[test]
    fn test_toggles_skip_steps() {
        let dir = tempfile::tempdir().unwrap();
        let runner = full_runner();
        let mut options = scenario_options(dir.path());
        options.skip_deps = true;
        options.skip_generate = true;
        options.skip_simulators = true;
        options.draft.set_git_hooks(false).unwrap();
        options.draft.set_initial_commit(false).unwrap();

        let report = run_setup(options, &runner, &mut AutoPrompter).unwrap();

        assert!(report.is_success());
        assert_eq!(report.skipped.len(), 6);
        assert!(!dir.path().join(".git/hooks/pre-commit").exists());
        assert_eq!(runner.count(&["git", "commit"]), 0);
        assert_eq!(runner.count(&["xcodegen", "generate"]), 0);
    }

    #[test]
    fn test_declined_project_spec_gets_new_deployment_target() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("project.yml"),
            "name: DemoApp\noptions:\n  bundleIdPrefix: org.custom\n  deploymentTarget:\n    iOS: \"15.0\"\n",
        )
        .unwrap();

        let mut options = scenario_options(dir.path());
        options.draft.force = false;
        options.draft.bundle_id_root = Some("com.example".parse().unwrap());
        options.draft.test_framework = Some(TestFramework::SwiftTesting);
        options.draft.source_language = Some("en".parse().unwrap());
        options.draft.set_git_hooks(false).unwrap();
        options.draft.set_initial_commit(false).unwrap();
        options.skip_deps = true;
        options.skip_generate = true;
        options.skip_simulators = true;

        // Decline project.yml; every other destination is new
        let mut prompter = ScriptedPrompter::new(["n"]);
        let report = run_setup(options, &full_runner(), &mut prompter).unwrap();
        assert!(report.is_success(), "failed: {:?}", report.failed);

        let spec = ProjectDescription::load(dir.path()).unwrap().unwrap();
        assert_eq!(spec.deployment_target().as_deref(), Some("17.0"));
        assert_eq!(spec.bundle_id_prefix(), Some("org.custom"));
        assert_eq!(prompter.asked.len(), 1);
    }

    #[test]
    fn test_missing_project_name_fails_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = SetupOptions::new(dir.path().to_path_buf());
        options.draft.deployment_target =
            Some(DottedVersion::parse_field("deployment target", "17.0").unwrap());

        let err = run_setup(options, &full_runner(), &mut AutoPrompter).unwrap_err();
        assert!(err.to_string().contains("--project-name"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
