//! Simulator configuration
//!
//! This module provides:
//! - The persisted per-role bindings document (`binding`)
//! - Device types and runtimes from `xcrun simctl` (`catalog`)
//! - Numeric OS version ordering (`version`)
//! - Validation and idempotent binding updates (`resolve`)

pub mod binding;
pub mod catalog;
pub mod resolve;
pub mod version;

pub use binding::{Binding, Role, SimulatorBindings, BINDINGS_FILE};
pub use resolve::{arch_for_host, BindingOutcome, BindingRequest, SimulatorResolver};
