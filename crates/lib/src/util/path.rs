//! Slash-separated path helpers for graph paths.
//!
//! Paths inside the action graph are plain strings relative to the project
//! root, always `/`-separated, with `.` standing for the root itself. These
//! helpers keep that form stable across platforms.

use std::path::{Component, Path};

/// Lexically normalize a slash path: drop `.` and empty segments, fold `..`.
///
/// The empty path and the root-relative "nothing" both become `.`.
pub fn clean(path: &str) -> String {
  let absolute = path.starts_with('/');
  let mut parts: Vec<&str> = Vec::new();

  for segment in path.split('/') {
    match segment {
      "" | "." => {}
      ".." => match parts.last() {
        Some(&last) if last != ".." => {
          parts.pop();
        }
        _ if absolute => {}
        _ => parts.push(".."),
      },
      _ => parts.push(segment),
    }
  }

  let joined = parts.join("/");
  match (absolute, joined.is_empty()) {
    (true, _) => format!("/{}", joined),
    (false, true) => ".".to_string(),
    (false, false) => joined,
  }
}

/// Join path segments with `/` and [`clean`] the result.
pub fn join(segments: &[&str]) -> String {
  let joined = segments
    .iter()
    .filter(|s| !s.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join("/");
  clean(&joined)
}

/// Express a root-relative `path` relative to the root-relative directory `base`.
///
/// Absolute paths are returned unchanged.
pub fn relative_to(base: &str, path: &str) -> String {
  let path = clean(path);
  if path.starts_with('/') {
    return path;
  }
  let base = clean(base);
  if base == "." {
    return path;
  }

  let base_parts: Vec<&str> = base.split('/').collect();
  let path_parts: Vec<&str> = if path == "." { Vec::new() } else { path.split('/').collect() };
  let common = base_parts
    .iter()
    .zip(path_parts.iter())
    .take_while(|(a, b)| a == b)
    .count();

  let mut result: Vec<&str> = vec![".."; base_parts.len() - common];
  result.extend(&path_parts[common..]);
  if result.is_empty() { ".".to_string() } else { result.join("/") }
}

/// Whether `path` is `dir` itself or lies below it. Both are cleaned first.
pub fn is_within(path: &str, dir: &str) -> bool {
  let path = clean(path);
  let dir = clean(dir);
  dir == "." || path == dir || path.starts_with(&format!("{}/", dir))
}

/// Render a native relative path as a slash path.
pub fn to_slash(path: &Path) -> String {
  let parts: Vec<String> = path
    .components()
    .filter_map(|c| match c {
      Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
      Component::ParentDir => Some("..".to_string()),
      _ => None,
    })
    .collect();
  if parts.is_empty() { ".".to_string() } else { parts.join("/") }
}
