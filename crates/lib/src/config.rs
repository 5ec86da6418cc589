//! Process-wide configuration for a compilation run.
//!
//! A [`Config`] names the project root (where the top-level build file lives),
//! the base output directory every emitted output path is rooted at, and the
//! build file name. The output directory can be overridden through
//! `STRATA_OUTPUT_DIR`.

use std::io;
use std::path::{Path, PathBuf};

use crate::consts::{BUILD_FILE_NAME, DEFAULT_OUTPUT_DIR, NINJA_FILE_NAME, OUTPUT_DIR_ENV};
use crate::util::path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Absolute project root. Module directories are relative to it.
  pub root_dir: PathBuf,
  /// Base output directory, relative to `root_dir` (or absolute).
  pub base_output_dir: String,
  /// Build file name looked up in the root and in every `subdirs` entry.
  pub build_file: String,
}

impl Config {
  /// Create a configuration with default output directory and build file name.
  pub fn new(root_dir: impl Into<PathBuf>) -> Self {
    Self {
      root_dir: root_dir.into(),
      base_output_dir: DEFAULT_OUTPUT_DIR.to_string(),
      build_file: BUILD_FILE_NAME.to_string(),
    }
  }

  /// Like [`Config::new`], but honors `STRATA_OUTPUT_DIR` when it is set and non-empty.
  pub fn from_env(root_dir: impl Into<PathBuf>) -> Self {
    let config = Self::new(root_dir);
    match std::env::var(OUTPUT_DIR_ENV) {
      Ok(dir) if !dir.trim().is_empty() => config.with_output_dir(dir),
      _ => config,
    }
  }

  /// Derive the root and build file name from the path of a top-level build file.
  pub fn for_build_file(build_file: &Path) -> io::Result<Self> {
    let canonical = dunce::canonicalize(build_file)?;
    let root = canonical.parent().map(Path::to_path_buf).unwrap_or_default();
    let file_name = canonical
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| BUILD_FILE_NAME.to_string());
    Ok(Self::from_env(root).with_build_file(file_name))
  }

  pub fn with_output_dir(mut self, dir: impl Into<String>) -> Self {
    self.base_output_dir = path::clean(&dir.into());
    self
  }

  pub fn with_build_file(mut self, name: impl Into<String>) -> Self {
    self.build_file = name.into();
    self
  }

  /// Absolute path of the top-level build file.
  pub fn build_file_path(&self) -> PathBuf {
    self.root_dir.join(&self.build_file)
  }

  /// Root-relative path of the generated ninja file.
  pub fn ninja_file(&self) -> String {
    path::join(&[&self.base_output_dir, NINJA_FILE_NAME])
  }
}
