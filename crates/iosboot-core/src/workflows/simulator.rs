//! Standalone simulator binding updates

use crate::config::Defaults;
use crate::prompt::Prompter;
use crate::runtime::{CommandRunner, ToolInvoker};
use crate::simulator::{BindingOutcome, BindingRequest, Role, SimulatorResolver};
use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct SimulatorOptions {
    pub directory: PathBuf,
    /// Only this role; both when unset
    pub role: Option<Role>,
    pub device: Option<String>,
    pub os: Option<String>,
    pub arch: Option<String>,
    pub force: bool,
}

pub fn run_simulator(
    options: &SimulatorOptions,
    runner: &dyn CommandRunner,
    prompter: &mut dyn Prompter,
) -> Result<Vec<(Role, BindingOutcome)>> {
    let defaults = Defaults::load(&options.directory)?;
    let invoker = ToolInvoker::new(runner, &options.directory);
    let mut resolver = SimulatorResolver::new(&invoker, &options.directory);

    let roles: Vec<Role> = match options.role {
        Some(role) => vec![role],
        None => Role::ALL.to_vec(),
    };

    let mut outcomes = Vec::with_capacity(roles.len());
    for role in roles {
        let device = match (&options.device, role) {
            (Some(device), _) => device.as_str(),
            (None, Role::Tests) => defaults.test_device(),
            (None, Role::UiTests) => defaults.ui_test_device(),
        };
        let request = BindingRequest {
            role,
            device,
            os: options.os.as_deref(),
            arch: options.arch.as_deref(),
            force: options.force,
        };
        outcomes.push((role, resolver.resolve(&request, prompter)?));
    }

    Ok(outcomes)
}
