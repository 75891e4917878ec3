//! External tool management
//!
//! This module provides:
//! - The tool table and invocation policy (`tool`)
//! - Prerequisite checks with install suggestions (`check`)

pub mod check;
pub mod tool;

#[cfg(test)]
pub(crate) mod testing;

pub use check::{check_tools, detect_tools, require_tools, ToolStatus};
pub use tool::{CommandOutput, CommandRunner, SystemRunner, ToolCommand, ToolInvoker, ToolSpec};
