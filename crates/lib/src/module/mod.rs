//! Module types and the context they emit actions in.
//!
//! A module is one declaratively described buildable unit. Every module type
//! implements [`Module`]: it exposes its name and declared dependencies, loads
//! its properties from the build file, and turns itself into build actions.
//!
//! # Submodules
//!
//! - [`binary`] - `go_binary`: vendor, build and test actions for a Go command
//! - [`archive`] - `zip_archive`: a zip of resolved sources
//! - [`registry`] - Type name to factory mapping

pub mod archive;
pub mod binary;
pub mod registry;
mod types;

pub use registry::{ModuleFactory, ModuleRegistry, RegistryError};
pub use types::*;
