//! Rules and build actions.
//!
//! A [`Rule`] is a command template with named parameters, defined once per
//! run in a [`RuleSet`] and shared by every module that emits it. A
//! [`BuildAction`] instantiates a rule: it names outputs, implicit inputs and
//! the argument values that fill the rule's parameters.
//!
//! # Parameters
//!
//! Command templates reference parameters as `$name`:
//! - `workDir` - The module directory the command runs in
//! - `outputPath` - The output, relative to `workDir`
//! - `pkg` - The Go package to build or test
//! - `name` - The module name
//! - `inputFiles` - Space-separated inputs, relative to `workDir`

pub mod rules;
mod types;

pub use rules::{Rule, RuleSet};
pub use types::*;
