//! Project directory layout, starter files and resource catalogs

pub mod resources;
pub mod structure;

pub use resources::{build_resources, StringCatalog};
pub use structure::{build_structure, StructureReport};
