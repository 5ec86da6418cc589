//! Shared helpers for the integration tests.

use std::fs;
use std::path::Path;

use strata_lib::compile::{Compilation, CompileError, Compiler};
use strata_lib::config::Config;
use tempfile::TempDir;

/// Create a project directory from (path, content) pairs.
pub fn project(files: &[(&str, &str)]) -> TempDir {
  let temp = TempDir::new().unwrap();
  for (relative, content) in files {
    let path = temp.path().join(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
  }
  temp
}

/// Evaluate and compile the `build.lua` at the root of `dir`.
pub fn compile(dir: &Path) -> Result<Compilation, CompileError> {
  Compiler::new(Config::new(dir)).compile_file()
}

/// The `svc` Go sources used by most scenarios.
pub const SVC_SOURCES: &[(&str, &str)] = &[
  ("main.go", "package main"),
  ("util.go", "package main"),
  ("util_test.go", "package main"),
  ("go.mod", "module svc"),
];

/// `SVC_SOURCES` plus the given build file.
pub fn svc_project(build: &str) -> TempDir {
  let temp = project(SVC_SOURCES);
  fs::write(temp.path().join("build.lua"), build).unwrap();
  temp
}
