//! Configuration record, format rules, defaults and resolution
//!
//! - `validate`: newtypes enforcing identifier/version/domain syntax
//! - `record`: the resolved [`ProjectConfig`] passed to every component
//! - `defaults`: optional `iosboot.yaml` fallbacks
//! - `resolve`: flags + prompts + defaults -> validated record

pub mod defaults;
pub mod record;
pub mod resolve;
pub mod validate;

pub use defaults::Defaults;
pub use record::{ProjectConfig, TestFramework, Visibility};
pub use resolve::{resolve_config, ConfigDraft};
pub use validate::{BundleIdRoot, DottedVersion, LanguageCode, ProjectName};
