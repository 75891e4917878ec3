//! Lint and format the project sources

use crate::pipeline::{Pipeline, PipelineReport};
use crate::runtime::tool::{SWIFTLINT, SWIFT_FORMAT};
use crate::runtime::{CommandRunner, ToolInvoker};
use anyhow::Result;
use std::path::PathBuf;

use super::ProjectLayout;

#[derive(Debug, Clone)]
pub struct LintOptions {
    pub directory: PathBuf,
    /// Apply corrections instead of only reporting
    pub fix: bool,
}

struct LintContext<'a> {
    fix: bool,
    layout: ProjectLayout,
    invoker: ToolInvoker<'a>,
}

pub fn run_lint(options: &LintOptions, runner: &dyn CommandRunner) -> Result<PipelineReport> {
    let mut ctx = LintContext {
        fix: options.fix,
        layout: ProjectLayout::load(&options.directory)?,
        invoker: ToolInvoker::new(runner, &options.directory),
    };

    let report = Pipeline::new()
        .step("SwiftLint", swiftlint)
        .step("swift-format", swift_format)
        .run(&mut ctx);
    Ok(report)
}

fn swiftlint(ctx: &mut LintContext<'_>) -> Result<()> {
    ctx.invoker.require(&SWIFTLINT)?;
    if ctx.fix {
        ctx.invoker.run(&SWIFTLINT, &["--fix"], "Applied SwiftLint corrections")?;
    }
    ctx.invoker.run(&SWIFTLINT, &["lint"], "Lint passed")?;
    Ok(())
}

fn swift_format(ctx: &mut LintContext<'_>) -> Result<()> {
    ctx.invoker.require(&SWIFT_FORMAT)?;
    let mut args: Vec<String> = if ctx.fix {
        vec!["format".into(), "--in-place".into(), "--recursive".into()]
    } else {
        vec!["lint".into(), "--recursive".into()]
    };
    args.extend(ctx.layout.source_dirs());

    let message = if ctx.fix {
        "Formatted sources"
    } else {
        "Formatting check passed"
    };
    ctx.invoker.run(&SWIFT_FORMAT, &args, message)?;
    Ok(())
}
