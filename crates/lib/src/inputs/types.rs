//! Types produced by glob resolution.

use serde::Serialize;
use thiserror::Error;

use crate::consts::TEST_FILE_SUFFIX;

/// Property holding include patterns.
pub const SRCS_PROPERTY: &str = "srcs";

/// Property holding exclude patterns.
pub const SRCS_EXCLUDE_PROPERTY: &str = "srcsExclude";

/// A pattern that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlobError {
  /// The include pattern is malformed or not module-relative.
  #[error("{property}: cannot resolve files that match pattern {pattern}: {message}")]
  Pattern {
    property: String,
    pattern: String,
    message: String,
  },

  /// The exclude pattern is malformed.
  #[error("{property}: invalid exclude pattern {pattern}: {message}")]
  Exclude {
    property: String,
    pattern: String,
    message: String,
  },

  /// A path could not be read while expanding the pattern.
  #[error("{property}: cannot read {path} while matching {pattern}: {message}")]
  Walk {
    property: String,
    pattern: String,
    path: String,
    message: String,
  },
}

impl GlobError {
  /// The property the offending pattern came from.
  pub fn property(&self) -> &str {
    match self {
      GlobError::Pattern { property, .. } | GlobError::Exclude { property, .. } | GlobError::Walk { property, .. } => {
        property
      }
    }
  }

  /// The offending pattern.
  pub fn pattern(&self) -> &str {
    match self {
      GlobError::Pattern { pattern, .. } | GlobError::Exclude { pattern, .. } | GlobError::Walk { pattern, .. } => {
        pattern
      }
    }
  }
}

/// The concrete inputs of one module.
///
/// `files` is ordered (pattern order, then lexical order within a pattern)
/// and free of duplicates. `touched` lists every path the resolver looked at,
/// excluded matches and scanned directories included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedInputs {
  pub files: Vec<String>,
  pub touched: Vec<String>,
}

impl ResolvedInputs {
  /// Whether `path` follows the test-source naming convention.
  pub fn is_test_file(path: &str) -> bool {
    path.ends_with(TEST_FILE_SUFFIX)
  }

  /// Inputs that are not test sources, in resolution order.
  pub fn build_inputs(&self) -> Vec<String> {
    self.files.iter().filter(|f| !Self::is_test_file(f)).cloned().collect()
  }

  /// Test sources only, in resolution order.
  pub fn test_inputs(&self) -> Vec<String> {
    self.files.iter().filter(|f| Self::is_test_file(f)).cloned().collect()
  }

  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }

  pub fn len(&self) -> usize {
    self.files.len()
  }
}
