//! Source input resolution.
//!
//! Modules declare their sources as glob patterns (`srcs`) with optional
//! exclusions (`srcsExclude`). This module expands them against the module
//! directory into an ordered file list and records every path it touched so
//! the generated graph can be regenerated when those paths change.
//!
//! - [`resolve`] - The [`GlobResolver`](resolve::GlobResolver)
//! - [`types`] - Resolved inputs and glob errors

pub mod resolve;
mod types;

pub use resolve::GlobResolver;
pub use types::*;
