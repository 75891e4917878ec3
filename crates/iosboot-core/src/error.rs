//! Error types shared across the bootstrap pipeline
//!
//! Fatal conditions are [`BootstrapError`] values. Soft conditions (a missing
//! template, a declined confirmation, an up-to-date binding) are reported as
//! outcome enums by the component that produces them and never reach here.

use std::path::PathBuf;
use thiserror::Error;

/// Rejected user input: malformed identifier, version or domain string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {field} '{value}': {reason} (example: {example})")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: String,
    pub reason: &'static str,
    pub example: &'static str,
}

impl ValidationError {
    pub fn new(
        field: &'static str,
        value: impl Into<String>,
        reason: &'static str,
        example: &'static str,
    ) -> Self {
        Self {
            field,
            value: value.into(),
            reason,
            example,
        }
    }
}

/// Fatal errors raised by the bootstrap components
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Missing required value for {flag}")]
    MissingValue { flag: &'static str },

    #[error("Conflicting options: {first} and {second} cannot both be set")]
    Conflict {
        first: &'static str,
        second: &'static str,
    },

    #[error("{tool} is not installed")]
    MissingTool {
        tool: &'static str,
        install_hint: &'static str,
    },

    #[error("{tool} failed with exit code {code}")]
    ToolFailed {
        tool: &'static str,
        code: i32,
        hints: &'static [&'static str],
    },

    #[error("Device '{device}' is not a known simulator device type")]
    UnknownDevice {
        device: String,
        suggestions: Vec<String>,
    },

    #[error("Malformed document {}: {reason}", path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    #[error("Interactive input exhausted after {attempts} attempts for {field}")]
    PromptExhausted { field: &'static str, attempts: usize },
}

impl BootstrapError {
    /// Remediation lines printed after the diagnostic
    pub fn remediation(&self) -> Vec<String> {
        match self {
            Self::Validation(e) => vec![format!("Example of a valid {}: {}", e.field, e.example)],
            Self::MissingValue { flag } => vec![
                format!("Pass {} <value> on the command line", flag),
                "or run without --yes/--force in a terminal to be prompted".to_string(),
            ],
            Self::Conflict { first, second } => {
                vec![format!("Choose either {} or {}, not both", first, second)]
            }
            Self::MissingTool { install_hint, .. } => vec![format!("Install it with: {}", install_hint)],
            Self::ToolFailed { hints, .. } => hints.iter().map(|h| h.to_string()).collect(),
            Self::UnknownDevice { suggestions, .. } => {
                if suggestions.is_empty() {
                    vec!["List available devices with: xcrun simctl list devicetypes".to_string()]
                } else {
                    let mut lines = vec!["Available devices of the same family:".to_string()];
                    lines.extend(suggestions.iter().map(|s| format!("  - {}", s)));
                    lines
                }
            }
            Self::MalformedDocument { path, .. } => vec![
                format!("Fix or remove {} and run the command again", path.display()),
            ],
            Self::PromptExhausted { .. } => Vec::new(),
        }
    }
}
