//! strata-lib: declarative build-module compiler
//!
//! This crate turns module blocks declared in `build.lua` files into an
//! [`ActionGraph`](graph::ActionGraph) for a ninja-compatible executor:
//! - `inputs`: glob resolution of module sources
//! - `module`: module types (`go_binary`, `zip_archive`) and their registry
//! - `action`: rule definitions and build actions
//! - `graph`: the action graph and its ninja rendering
//! - `compile`: validation, scheduling and emission of a whole run

pub mod action;
pub mod compile;
pub mod config;
pub mod consts;
pub mod eval;
pub mod graph;
pub mod inputs;
pub mod lua;
pub mod module;
pub mod util;
