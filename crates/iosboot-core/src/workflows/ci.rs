//! Non-interactive validation run: generate, lint, format check, test

use crate::pipeline::{Pipeline, PipelineReport};
use crate::runtime::tool::{SWIFTLINT, SWIFT_FORMAT, XCODEBUILD, XCODEGEN, XCRUN};
use crate::runtime::{check_tools, CommandRunner, ToolInvoker};
use crate::simulator::{Role, SimulatorBindings};
use crate::templates::manifest::PROJECT_SPEC;
use crate::ui;
use anyhow::Result;
use std::path::PathBuf;

use super::ProjectLayout;

/// Environment variable marking a CI run for every child process
pub const CI_ENV: &str = "CI";

#[derive(Debug, Clone)]
pub struct CiOptions {
    pub directory: PathBuf,
    pub skip_lint: bool,
    pub skip_tests: bool,
}

struct CiContext<'a> {
    options: CiOptions,
    layout: ProjectLayout,
    invoker: ToolInvoker<'a>,
}

pub fn run_ci(options: CiOptions, runner: &dyn CommandRunner) -> Result<PipelineReport> {
    let layout = ProjectLayout::load(&options.directory)?;
    let invoker = ToolInvoker::new(runner, &options.directory).with_env(CI_ENV, "true");

    let pipeline = Pipeline::new()
        .step("Check tools", check)
        .step("Generate Xcode project", generate)
        .step_if("Lint", !options.skip_lint, lint)
        .step_if("Check formatting", !options.skip_lint, format_check)
        .step_if("Run tests", !options.skip_tests, test);

    let mut ctx = CiContext {
        options,
        layout,
        invoker,
    };
    Ok(pipeline.run(&mut ctx))
}

fn check(ctx: &mut CiContext<'_>) -> Result<()> {
    let mut required = vec![XCODEGEN];
    if !ctx.options.skip_lint {
        required.extend([SWIFTLINT, SWIFT_FORMAT]);
    }
    if !ctx.options.skip_tests {
        required.extend([XCODEBUILD, XCRUN]);
    }
    check_tools(&ctx.invoker, &required, &[])?;
    Ok(())
}

fn generate(ctx: &mut CiContext<'_>) -> Result<()> {
    ctx.invoker.run(
        &XCODEGEN,
        &["generate", "--spec", PROJECT_SPEC],
        "Generated Xcode project",
    )?;
    Ok(())
}

fn lint(ctx: &mut CiContext<'_>) -> Result<()> {
    ctx.invoker.run(&SWIFTLINT, &["lint", "--strict"], "Lint passed")?;
    Ok(())
}

fn format_check(ctx: &mut CiContext<'_>) -> Result<()> {
    let mut args = vec!["lint".to_string(), "--strict".to_string(), "--recursive".to_string()];
    args.extend(ctx.layout.source_dirs());
    ctx.invoker.run(&SWIFT_FORMAT, &args, "Formatting check passed")?;
    Ok(())
}

fn test(ctx: &mut CiContext<'_>) -> Result<()> {
    let bindings = SimulatorBindings::load(&ctx.options.directory)?;
    if !bindings.is_persisted() {
        ui::warning("No simulators.yml found, testing on the default simulator");
    }
    let destination = bindings.get(Role::Tests).destination();
    let project = ctx.layout.xcodeproj();

    let output = ctx.invoker.run(
        &XCODEBUILD,
        &[
            "test",
            "-project",
            project.as_str(),
            "-scheme",
            ctx.layout.name.as_str(),
            "-destination",
            destination.as_str(),
        ],
        "Tests passed",
    )?;
    ui::excerpt(
        &output
            .stdout
            .lines()
            .filter(|l| l.contains("Executed") || l.contains("TEST SUCCEEDED"))
            .collect::<Vec<_>>()
            .join("\n"),
        4,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::testing::FakeRunner;
    use crate::runtime::CommandOutput;
    use crate::simulator::BINDINGS_FILE;

    fn project_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_SPEC), "name: DemoApp\ntargets: {}\n").unwrap();
        std::fs::write(
            dir.path().join(BINDINGS_FILE),
            "simulators:\n  tests: {device: iPhone 15, os: '17.0', arch: arm64}\n  ui-tests: {device: iPhone 15, os: '17.0', arch: arm64}\n",
        )
        .unwrap();
        dir
    }

    fn runner() -> FakeRunner {
        FakeRunner::with_tools(&["xcodegen", "swiftlint", "swift-format", "xcodebuild", "xcrun"])
    }

    fn options(dir: &std::path::Path) -> CiOptions {
        CiOptions {
            directory: dir.to_path_buf(),
            skip_lint: false,
            skip_tests: false,
        }
    }

    #[test]
    fn test_runs_all_stages_with_ci_env() {
        let dir = project_dir();
        let runner = runner();

        let report = run_ci(options(dir.path()), &runner).unwrap();
        assert!(report.is_success(), "failed: {:?}", report.failed);

        let calls = runner.calls();
        assert!(calls
            .iter()
            .all(|c| c.env.contains(&("CI".to_string(), "true".to_string()))));
        assert_eq!(runner.count(&["swiftlint", "lint", "--strict"]), 1);
        assert_eq!(
            runner.count(&[
                "swift-format",
                "lint",
                "--strict",
                "--recursive",
                "DemoApp",
                "DemoAppTests",
                "DemoAppUITests"
            ]),
            1
        );
        assert_eq!(
            runner.count(&[
                "xcodebuild",
                "test",
                "-project",
                "DemoApp.xcodeproj",
                "-scheme",
                "DemoApp",
                "-destination",
                "platform=iOS Simulator,name=iPhone 15,OS=17.0,arch=arm64"
            ]),
            1
        );
    }

    #[test]
    fn test_lint_failure_stops_before_tests() {
        let dir = project_dir();
        let runner = runner();
        runner.respond(&["swiftlint", "lint"], CommandOutput::failed(2, "violation"));

        let report = run_ci(options(dir.path()), &runner).unwrap();
        assert_eq!(report.failed.as_ref().map(|f| f.name), Some("Lint"));
        assert_eq!(runner.count(&["xcodebuild", "test"]), 0);
    }

    #[test]
    fn test_skips() {
        let dir = project_dir();
        let runner = FakeRunner::with_tools(&["xcodegen"]);
        let mut opts = options(dir.path());
        opts.skip_lint = true;
        opts.skip_tests = true;

        let report = run_ci(opts, &runner).unwrap();
        assert!(report.is_success());
        assert_eq!(report.skipped, vec!["Lint", "Check formatting", "Run tests"]);
    }

    #[test]
    fn test_requires_project_description() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_ci(options(dir.path()), &runner()).is_err());
    }
}
