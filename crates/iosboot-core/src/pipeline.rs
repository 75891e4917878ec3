//! Ordered, fail-fast execution of named workflow steps

use crate::ui;
use anyhow::Result;

type StepFn<C> = fn(&mut C) -> Result<()>;

struct Step<C> {
    name: &'static str,
    enabled: bool,
    run: StepFn<C>,
}

/// A list of named steps over a shared context `C`
pub struct Pipeline<C> {
    steps: Vec<Step<C>>,
}

impl<C> Default for Pipeline<C> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<C> Pipeline<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(self, name: &'static str, run: StepFn<C>) -> Self {
        self.step_if(name, true, run)
    }

    /// Add a step that is recorded as skipped when `enabled` is false
    pub fn step_if(mut self, name: &'static str, enabled: bool, run: StepFn<C>) -> Self {
        self.steps.push(Step { name, enabled, run });
        self
    }

    /// Run steps in order until the first failure
    pub fn run(self, ctx: &mut C) -> PipelineReport {
        let mut report = PipelineReport::default();

        for step in self.steps {
            if !step.enabled {
                tracing::debug!(step = step.name, "skipped");
                report.skipped.push(step.name);
                continue;
            }

            ui::step(step.name);
            match (step.run)(ctx) {
                Ok(()) => report.succeeded.push(step.name),
                Err(error) => {
                    tracing::debug!(step = step.name, error = %error, "step failed");
                    report.failed = Some(FailedStep {
                        name: step.name,
                        error,
                    });
                    break;
                }
            }
        }

        report
    }
}

#[derive(Debug)]
pub struct FailedStep {
    pub name: &'static str,
    pub error: anyhow::Error,
}

/// Outcome of one orchestrator run
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub succeeded: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
    pub failed: Option<FailedStep>,
}

impl PipelineReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_none()
    }

    /// Print which steps ran and which were skipped
    pub fn print_summary(&self) {
        println!();
        for name in &self.succeeded {
            println!("  [done]    {}", name);
        }
        for name in &self.skipped {
            println!("  [skipped] {}", name);
        }
        if let Some(failed) = &self.failed {
            println!("  [failed]  {}", failed.name);
        }
    }

    /// The failing step's error, with the step name as context
    pub fn into_result(self) -> Result<()> {
        match self.failed {
            None => Ok(()),
            Some(failed) => Err(failed.error.context(format!("Step '{}' failed", failed.name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Ctx {
        log: Vec<&'static str>,
    }

    fn first(ctx: &mut Ctx) -> Result<()> {
        ctx.log.push("first");
        Ok(())
    }

    fn second(ctx: &mut Ctx) -> Result<()> {
        ctx.log.push("second");
        Ok(())
    }

    fn broken(_ctx: &mut Ctx) -> Result<()> {
        anyhow::bail!("boom")
    }

    #[test]
    fn test_runs_in_order() {
        let mut ctx = Ctx::default();
        let report = Pipeline::new()
            .step("first", first)
            .step("second", second)
            .run(&mut ctx);

        assert!(report.is_success());
        assert_eq!(ctx.log, vec!["first", "second"]);
        assert_eq!(report.succeeded, vec!["first", "second"]);
    }

    #[test]
    fn test_disabled_steps_are_skipped() {
        let mut ctx = Ctx::default();
        let report = Pipeline::new()
            .step_if("first", false, first)
            .step("second", second)
            .run(&mut ctx);

        assert_eq!(ctx.log, vec!["second"]);
        assert_eq!(report.skipped, vec!["first"]);
    }

    #[test]
    fn test_stops_at_first_failure() {
        let mut ctx = Ctx::default();
        let report = Pipeline::new()
            .step("first", first)
            .step("broken", broken)
            .step("second", second)
            .run(&mut ctx);

        assert_eq!(ctx.log, vec!["first"]);
        assert_eq!(report.failed.as_ref().map(|f| f.name), Some("broken"));
        let err = report.into_result().unwrap_err();
        assert!(format!("{:#}", err).contains("boom"));
        assert!(err.to_string().contains("broken"));
    }
}
