//! Test utilities for strata-lib.
//!
//! Helpers for laying out throwaway source trees on disk.

use std::path::Path;

use tempfile::TempDir;

/// Create a temporary directory populated with `files` (root-relative path, content).
pub fn source_tree(files: &[(&str, &str)]) -> TempDir {
  let temp = TempDir::new().unwrap();
  write_files(temp.path(), files);
  temp
}

/// Write `files` below `root`, creating parent directories as needed.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
  for (relative, content) in files {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }
}
