//! Build file evaluation.
//!
//! [`evaluate_build_files`] runs the top-level build file (and every file it
//! pulls in through `subdirs`) and returns the declared modules.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use mlua::prelude::*;
use tracing::info;

use crate::config::Config;
use crate::lua::runtime::EvalState;
use crate::lua::{loaders, runtime};
use crate::module::{ModuleDescriptor, ModuleRegistry};

/// Errors that can occur while evaluating build files.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
  /// Syntax errors, runtime errors and rejected module declarations.
  #[error("lua error: {0}")]
  Lua(#[from] LuaError),

  #[error("build file not found: {0}")]
  MissingBuildFile(PathBuf),
}

/// Modules declared by a tree of build files.
#[derive(Debug, Default)]
pub struct ParsedBuild {
  /// Modules in declaration order.
  pub modules: Vec<ModuleDescriptor>,
  /// Root-relative build files, top-level first.
  pub build_files: Vec<String>,
}

/// Evaluate the build file named by `config` with the module types of `registry`.
///
/// # Example
/// ```ignore
/// let config = Config::for_build_file(Path::new("build.lua"))?;
/// let registry = ModuleRegistry::with_builtin(Arc::new(RuleSet::new()));
/// let parsed = evaluate_build_files(&config, &registry)?;
/// println!("Modules: {}", parsed.modules.len());
/// ```
pub fn evaluate_build_files(config: &Config, registry: &ModuleRegistry) -> Result<ParsedBuild, EvalError> {
  let path = config.build_file_path();
  if !path.is_file() {
    return Err(EvalError::MissingBuildFile(path));
  }

  let state = Rc::new(RefCell::new(EvalState::default()));
  state.borrow_mut().build_files.push(config.build_file.clone());

  // Evaluate in a block so lua, and the references its functions hold to
  // `state`, are dropped before unwrapping.
  {
    let lua = runtime::create_runtime(config, registry, state.clone())?;
    loaders::load_build_file(&lua, &path, ".")?;
  }

  let state = Rc::try_unwrap(state)
    .map_err(|_| LuaError::external("evaluation state is still referenced"))?
    .into_inner();

  info!(
    modules = state.modules.len(),
    files = state.build_files.len(),
    "evaluated build files"
  );

  Ok(ParsedBuild {
    modules: state.modules,
    build_files: state.build_files,
  })
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::action::RuleSet;
  use crate::util::testutil::source_tree;

  fn registry() -> ModuleRegistry {
    ModuleRegistry::with_builtin(Arc::new(RuleSet::new()))
  }

  #[test]
  fn evaluates_tree_of_build_files() {
    let tree = source_tree(&[
      ("build.lua", r#"subdirs { "svc" } zip_archive { name = "pkg", deps = { "svc" } }"#),
      ("svc/build.lua", r#"go_binary { name = "svc", srcs = { "*.go" } }"#),
    ]);

    let parsed = evaluate_build_files(&Config::new(tree.path()), &registry()).unwrap();
    let names: Vec<&str> = parsed.modules.iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["svc", "pkg"]);
    assert_eq!(parsed.build_files, vec!["build.lua", "svc/build.lua"]);
  }

  #[test]
  fn missing_top_level_file() {
    let tree = source_tree(&[]);
    let err = evaluate_build_files(&Config::new(tree.path()), &registry()).unwrap_err();
    assert!(matches!(err, EvalError::MissingBuildFile(_)));
  }

  #[test]
  fn syntax_error_is_lua_error() {
    let tree = source_tree(&[("build.lua", "go_binary {")]);
    let err = evaluate_build_files(&Config::new(tree.path()), &registry()).unwrap_err();
    assert!(matches!(err, EvalError::Lua(_)));
  }

  #[test]
  fn custom_build_file_name() {
    let tree = source_tree(&[("BUILD.lua", r#"zip_archive { name = "pkg" }"#)]);
    let config = Config::new(tree.path()).with_build_file("BUILD.lua");
    let parsed = evaluate_build_files(&config, &registry()).unwrap();
    assert_eq!(parsed.modules.len(), 1);
  }
}
