use std::collections::BTreeMap;

use thiserror::Error;

use crate::eval::EvalError;
use crate::graph::{ActionGraph, GraphError};
use crate::module::ModuleError;

/// Errors that abort a whole compilation run.
///
/// Problems local to one module are reported through
/// [`Compilation::module_errors`] instead.
#[derive(Debug, Error)]
pub enum CompileError {
  #[error(transparent)]
  Eval(#[from] EvalError),

  #[error("module name '{name}' declared in '{second}' is already declared in '{first}'")]
  DuplicateModuleName { name: String, first: String, second: String },

  #[error("module '{module}' depends on unknown module '{dependency}'")]
  DanglingDependency { module: String, dependency: String },

  #[error("dependency cycle between modules: {}", .0.join(" -> "))]
  DependencyCycle(Vec<String>),

  #[error(transparent)]
  Graph(#[from] GraphError),
}

/// The outcome of a compilation run.
#[derive(Debug, Default)]
pub struct Compilation {
  pub graph: ActionGraph,
  /// Errors by module name. Modules listed here contributed no actions.
  pub module_errors: BTreeMap<String, Vec<ModuleError>>,
  /// Root-relative build files that were evaluated.
  pub build_files: Vec<String>,
  pub module_count: usize,
}

impl Compilation {
  /// Whether every module emitted its actions.
  pub fn is_success(&self) -> bool {
    self.module_errors.is_empty()
  }

  pub fn error_count(&self) -> usize {
    self.module_errors.values().map(Vec::len).sum()
  }

  /// Modules that were skipped because a dependency failed.
  pub fn skipped_modules(&self) -> impl Iterator<Item = &str> {
    self
      .module_errors
      .iter()
      .filter(|(_, errors)| errors.iter().any(|e| matches!(e, ModuleError::DependencyFailed(_))))
      .map(|(name, _)| name.as_str())
  }
}
