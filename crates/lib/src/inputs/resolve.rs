//! Glob expansion against a project root.
//!
//! # Resolution Algorithm
//!
//! For one module:
//! 1. Compile every exclude pattern (module-relative)
//! 2. Expand each include pattern below `<root>/<module dir>`, keeping regular files
//!    (a trailing `**` reaches every file below its directory)
//! 3. Concatenate matches in pattern order, dropping duplicates
//! 4. Remove matches hit by any exclude pattern
//!
//! All patterns are attempted even after a failure so every offending pattern
//! is reported at once. On failure no partial result is returned.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::trace;

use super::types::{GlobError, ResolvedInputs, SRCS_EXCLUDE_PROPERTY, SRCS_PROPERTY};
use crate::util::path;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
  case_sensitive: true,
  require_literal_separator: true,
  require_literal_leading_dot: false,
};

/// Resolves module source patterns against a fixed project root.
#[derive(Debug, Clone)]
pub struct GlobResolver {
  root: PathBuf,
}

impl GlobResolver {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Expand `patterns` minus `excludes` for the module living in `module_dir`.
  ///
  /// `module_dir` is root-relative (`.` for the root). Returned paths are
  /// root-relative and `/`-separated.
  pub fn resolve(
    &self,
    module_dir: &str,
    patterns: &[String],
    excludes: &[String],
  ) -> Result<ResolvedInputs, Vec<GlobError>> {
    let module_dir = path::clean(module_dir);
    let base = if module_dir == "." {
      self.root.clone()
    } else {
      self.root.join(&module_dir)
    };
    let escaped_base = Pattern::escape(&base.to_string_lossy());

    let mut errors = Vec::new();

    let mut exclude_patterns = Vec::with_capacity(excludes.len());
    for exclude in excludes {
      match Pattern::new(&normalize_pattern(exclude)) {
        Ok(p) => exclude_patterns.push(p),
        Err(e) => errors.push(GlobError::Exclude {
          property: SRCS_EXCLUDE_PROPERTY.to_string(),
          pattern: exclude.clone(),
          message: e.to_string(),
        }),
      }
    }

    let mut matched: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut touched: BTreeSet<String> = BTreeSet::new();
    touched.insert(module_dir.clone());

    for pattern in patterns {
      if let Err(message) = validate_pattern(pattern) {
        errors.push(GlobError::Pattern {
          property: SRCS_PROPERTY.to_string(),
          pattern: pattern.clone(),
          message,
        });
        continue;
      }

      let full_pattern = format!("{}/{}", escaped_base, normalize_pattern(pattern));
      let paths = match glob::glob_with(&full_pattern, MATCH_OPTIONS) {
        Ok(paths) => paths,
        Err(e) => {
          errors.push(GlobError::Pattern {
            property: SRCS_PROPERTY.to_string(),
            pattern: pattern.clone(),
            message: e.to_string(),
          });
          continue;
        }
      };

      let mut found = Vec::new();
      for entry in paths {
        match entry {
          Ok(p) if p.is_file() => match root_relative(&self.root, &p) {
            Some(relative) => found.push(relative),
            None => errors.push(GlobError::Walk {
              property: SRCS_PROPERTY.to_string(),
              pattern: pattern.clone(),
              path: p.display().to_string(),
              message: "matched path is outside the project root".to_string(),
            }),
          },
          Ok(_) => {}
          Err(e) => errors.push(GlobError::Walk {
            property: SRCS_PROPERTY.to_string(),
            pattern: pattern.clone(),
            path: e.path().display().to_string(),
            message: e.error().to_string(),
          }),
        }
      }
      found.sort();
      found.dedup();
      trace!(dir = %module_dir, pattern = %pattern, count = found.len(), "expanded pattern");

      for relative in found {
        if let Some((parent, _)) = relative.rsplit_once('/') {
          touched.insert(parent.to_string());
        }
        touched.insert(relative.clone());
        if seen.insert(relative.clone()) {
          matched.push(relative);
        }
      }
    }

    if !errors.is_empty() {
      return Err(errors);
    }

    let files = matched
      .into_iter()
      .filter(|file| {
        let module_relative = path::relative_to(&module_dir, file);
        !exclude_patterns
          .iter()
          .any(|p| p.matches_with(&module_relative, MATCH_OPTIONS))
      })
      .collect();

    Ok(ResolvedInputs {
      files,
      touched: touched.into_iter().collect(),
    })
  }
}

/// Cleaned root-relative slash form of a matched path, `None` when it is not below `root`.
fn root_relative(root: &Path, matched: &Path) -> Option<String> {
  let relative = matched.strip_prefix(root).ok()?;
  Some(path::clean(&path::to_slash(relative)))
}

/// Lexically clean `pattern` and make a trailing `**` match files.
///
/// The glob crate only yields directories for a final `**` component, while
/// `srcs = { "docs/**" }` means every file below `docs`.
fn normalize_pattern(pattern: &str) -> String {
  let cleaned = path::clean(pattern);
  if cleaned == "**" || cleaned.ends_with("/**") {
    format!("{}/*", cleaned)
  } else {
    cleaned
  }
}

/// Reject patterns that cannot be anchored at the module directory.
fn validate_pattern(pattern: &str) -> Result<(), String> {
  if pattern.trim().is_empty() {
    return Err("pattern is empty".to_string());
  }
  if pattern.starts_with('/') || Path::new(pattern).is_absolute() {
    return Err("pattern must be relative to the module directory".to_string());
  }
  Ok(())
}
