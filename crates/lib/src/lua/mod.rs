//! Lua runtime for build files.
//!
//! Build files are plain Lua. Every registered module type is a global
//! function taking a property table, and `subdirs` evaluates nested build
//! files:
//!
//! ```lua
//! subdirs { "cmd/server" }
//!
//! zip_archive {
//!   name = "release.zip",
//!   srcs = { "README.md", "LICENSE" },
//!   deps = { "server" },
//! }
//! ```
//!
//! # Submodules
//!
//! - [`convert`] - Lua values to JSON for property decoding
//! - [`loaders`] - Build file loading with per-file module directories
//! - [`runtime`] - VM setup and global functions

pub mod convert;
pub mod loaders;
pub mod runtime;
