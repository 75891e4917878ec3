//! Device validation, OS/arch resolution and idempotent binding writes

use super::binding::{Binding, Role, SimulatorBindings};
use super::catalog::{self, DeviceType};
use super::version::newest;
use crate::error::BootstrapError;
use crate::project_spec::ProjectDescription;
use crate::prompt::Prompter;
use crate::runtime::tool::XCRUN;
use crate::runtime::ToolInvoker;
use crate::ui;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const MAX_SUGGESTIONS: usize = 10;

/// One binding update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingRequest<'a> {
    pub role: Role,
    pub device: &'a str,
    pub os: Option<&'a str>,
    pub arch: Option<&'a str>,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingOutcome {
    /// Persisted binding already matches
    UpToDate,
    /// The user chose to keep the persisted binding
    Declined,
    Written { previous: Binding, current: Binding },
}

/// Simulator architecture for a host processor
pub fn arch_for_host(host: &str) -> &'static str {
    match host {
        "x86_64" => "x86_64",
        _ => "arm64",
    }
}

pub struct SimulatorResolver<'a> {
    invoker: &'a ToolInvoker<'a>,
    root: PathBuf,
    host_arch: String,
    device_types: Option<Vec<DeviceType>>,
}

impl<'a> SimulatorResolver<'a> {
    pub fn new(invoker: &'a ToolInvoker<'a>, root: &Path) -> Self {
        Self {
            invoker,
            root: root.to_path_buf(),
            host_arch: std::env::consts::ARCH.to_string(),
            device_types: None,
        }
    }

    pub fn with_host_arch(mut self, host: &str) -> Self {
        self.host_arch = host.to_string();
        self
    }

    /// Validate, resolve and persist the binding for one role
    pub fn resolve(
        &mut self,
        request: &BindingRequest<'_>,
        prompter: &mut dyn Prompter,
    ) -> Result<BindingOutcome> {
        self.invoker.require(&XCRUN)?;
        self.validate_device(request.device)?;

        let os = match request.os {
            Some(os) => os.to_string(),
            None => self.default_os()?,
        };
        let arch = request
            .arch
            .map(str::to_string)
            .unwrap_or_else(|| arch_for_host(&self.host_arch).to_string());
        let current = Binding::new(request.device, os, arch);

        let mut bindings = SimulatorBindings::load(&self.root)?;
        let previous = bindings.get(request.role).clone();

        if bindings.is_persisted() && previous == current {
            ui::info(format!(
                "Simulator for {} is already up to date ({})",
                request.role, current.device
            ));
            return Ok(BindingOutcome::UpToDate);
        }

        // A role still holding the placeholder has never been configured
        let configured = bindings.is_persisted() && previous != Binding::placeholder();
        if configured && !request.force {
            ui::step(format!("Simulator binding for {} will change:", request.role));
            for (field, before, after) in previous.diff(&current) {
                println!("    {}: {} -> {}", field, before, after);
            }
            let prompt = format!("Update the {} simulator binding?", request.role);
            if !prompter.confirm(&prompt, false)? {
                ui::info(format!("Kept the existing {} simulator binding", request.role));
                return Ok(BindingOutcome::Declined);
            }
        }

        bindings.set(request.role, current.clone());
        bindings.save()?;
        tracing::info!(role = %request.role, destination = %current.destination(), "simulator binding written");
        ui::success(format!(
            "Bound {} to {} (iOS {}, {})",
            request.role, current.device, current.os, current.arch
        ));

        Ok(BindingOutcome::Written { previous, current })
    }

    fn validate_device(&mut self, device: &str) -> Result<()> {
        if self.device_types.is_none() {
            self.device_types = Some(catalog::device_types(self.invoker)?);
        }
        let devices = self.device_types.as_deref().unwrap_or_default();

        if devices.iter().any(|d| d.name == device) {
            return Ok(());
        }
        Err(BootstrapError::UnknownDevice {
            device: device.to_string(),
            suggestions: catalog::suggestions(devices, device, MAX_SUGGESTIONS),
        }
        .into())
    }

    /// Deployment target of the generated project, else the newest runtime
    fn default_os(&self) -> Result<String> {
        if let Some(project) = ProjectDescription::load(&self.root)? {
            if let Some(target) = project.deployment_target() {
                return Ok(target);
            }
        }

        let runtimes = catalog::ios_runtimes(self.invoker)?;
        newest(runtimes.iter().map(|r| r.version.as_str()))
            .map(str::to_string)
            .context("No available iOS simulator runtime; install one from Xcode > Settings > Platforms")
    }
}
