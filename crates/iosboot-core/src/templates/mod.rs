//! Template loading, descriptors and rendering
//!
//! This module provides:
//! - Embedded template assets and local template directories (`source`)
//! - Template descriptors and the built-in descriptor sets (`manifest`)
//! - `{{TOKEN}}` placeholder substitution (`substitute`)
//! - Rendering with the overwrite policy (`copier`)

pub mod assets;
pub mod copier;
pub mod manifest;
pub mod source;
pub mod substitute;

pub use copier::{render_templates, write_file, RenderOutcome, RenderReport};
pub use manifest::{OverwritePolicy, TemplateDescriptor};
pub use source::TemplateSource;
pub use substitute::substitute;
