//! iosboot CLI - Bootstrap iOS application projects

mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command, SetupArgs};
use iosboot_core::templates::RenderOutcome;
use iosboot_core::workflows::{self, SimulatorOptions, SyncOptions, CI_ENV};
use iosboot_core::{
    session_is_interactive, ui, AutoPrompter, BootstrapError, ClackPrompter, PipelineReport,
    Prompter, SystemRunner,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();

    if args.global.color_disabled() {
        colored::control::set_override(false);
    }
    if let Err(e) = logging::init_logging(&args.global) {
        eprintln!("warning: {e}");
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let runner = SystemRunner;
    tracing::debug!(command = ?args.command, "dispatching");

    match args.command {
        None => setup(SetupArgs::default(), &runner),
        Some(Command::Setup(setup_args)) => setup(setup_args, &runner),
        Some(Command::Ci(ci_args)) => {
            // Child tools and the interactivity check both read CI
            std::env::set_var(CI_ENV, "true");
            finish(workflows::run_ci(ci_args.into(), &runner)?)
        }
        Some(Command::Simulator(sim_args)) => {
            let interactive = session_is_interactive(false, sim_args.force);
            let options: SimulatorOptions = sim_args.into();
            with_prompter(interactive, "iosboot simulator", |prompter| {
                workflows::run_simulator(&options, &runner, prompter).map(|_| ())
            })
        }
        Some(Command::SyncTemplates(sync_args)) => {
            let interactive = session_is_interactive(false, sync_args.force);
            let options: SyncOptions = sync_args.into();
            let reports = with_prompter(interactive, "iosboot sync-templates", |prompter| {
                workflows::run_sync(&options, prompter)
            })?;
            let written = reports
                .iter()
                .filter(|r| r.outcome == RenderOutcome::Written)
                .count();
            ui::success(format!("Rendered {} of {} templates", written, reports.len()));
            Ok(())
        }
        Some(Command::Lint(lint_args)) => finish(workflows::run_lint(&lint_args.into(), &runner)?),
        Some(Command::Doctor(doctor_args)) => {
            workflows::run_doctor(&doctor_args.directory(), &runner)?;
            ui::success("All required tools are installed");
            Ok(())
        }
    }
}

fn setup(args: SetupArgs, runner: &SystemRunner) -> Result<()> {
    let interactive = args.interactive();
    let options = args.into_options()?;
    let report = with_prompter(interactive, "iosboot setup", |prompter| {
        workflows::run_setup(options, runner, prompter)
    })?;
    finish(report)
}

/// Run `f` with a terminal prompter when interactive, defaults otherwise
fn with_prompter<T>(
    interactive: bool,
    title: &str,
    f: impl FnOnce(&mut dyn Prompter) -> Result<T>,
) -> Result<T> {
    tracing::debug!(interactive, "selecting prompter");
    if !interactive {
        return f(&mut AutoPrompter);
    }

    let mut prompter = ClackPrompter::new();
    prompter.intro(title)?;
    let value = f(&mut prompter)?;
    prompter.outro("Done")?;
    Ok(value)
}

fn finish(report: PipelineReport) -> Result<()> {
    report.print_summary();
    report.into_result()
}

fn report_error(err: &anyhow::Error) {
    ui::error(format!("{:#}", err));

    let remediation = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<BootstrapError>())
        .map(BootstrapError::remediation)
        .unwrap_or_default();
    if !remediation.is_empty() {
        ui::remediation(&remediation);
    }
}
