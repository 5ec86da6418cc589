//! Rendering an [`ActionGraph`] as a ninja file.
//!
//! # Layout
//!
//! ```text
//! # header with the graph hash
//! builddir = out
//!
//! rule <name>            (once per rule in use)
//! build <outputs>: <rule> | <implicit inputs>
//!   description = ...
//!   <arg> = <value>
//!
//! rule regenerate        (when a generator is configured)
//! build out/build.ninja: regenerate | <build files> <tracked inputs>
//!
//! default <non-optional outputs>
//! ```

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::ActionGraph;
use crate::consts::APP_NAME;
use crate::util::hash::{HashError, Hashable};

const REGENERATE_RULE: &str = "regenerate";

#[derive(Debug, Error)]
pub enum NinjaError {
  #[error("failed to hash action graph: {0}")]
  Hash(#[from] HashError),

  #[error("failed to format ninja file: {0}")]
  Format(#[from] std::fmt::Error),

  #[error("failed to write {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// The edge that re-runs the generator when its inputs change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
  /// Full command line, already shell-quoted.
  pub command: String,
  /// Root-relative path of the ninja file being written.
  pub ninja_file: String,
  /// Root-relative build description files.
  pub build_files: Vec<String>,
}

pub struct NinjaWriter<'a> {
  graph: &'a ActionGraph,
  builddir: String,
  generator: Option<Generator>,
}

impl<'a> NinjaWriter<'a> {
  pub fn new(graph: &'a ActionGraph, builddir: impl Into<String>) -> Self {
    Self {
      graph,
      builddir: builddir.into(),
      generator: None,
    }
  }

  pub fn generator(mut self, generator: Generator) -> Self {
    self.generator = Some(generator);
    self
  }

  pub fn render(&self) -> Result<String, NinjaError> {
    let hash = self.graph.compute_hash()?;
    let mut out = String::new();

    writeln!(out, "# Generated by {}. Do not edit.", APP_NAME)?;
    writeln!(out, "# graph: {}", hash)?;
    writeln!(out)?;
    writeln!(out, "builddir = {}", escape_path(&self.builddir))?;

    for rule in self.graph.rules() {
      writeln!(out)?;
      writeln!(out, "rule {}", rule.name)?;
      writeln!(out, "  command = {}", rule.command)?;
      if !rule.description.is_empty() {
        writeln!(out, "  description = {}", rule.description)?;
      }
    }

    for entry in self.graph.actions() {
      let action = &entry.action;
      writeln!(out)?;
      write!(out, "build {}: {}", join_paths(&action.outputs), action.rule.name)?;
      if !action.implicit_inputs.is_empty() {
        write!(out, " | {}", join_paths(&action.implicit_inputs))?;
      }
      writeln!(out)?;
      if !action.description.is_empty() {
        writeln!(out, "  description = {}", escape_value(&action.description))?;
      }
      for (name, value) in &action.args {
        writeln!(out, "  {} = {}", name, escape_value(value))?;
      }
    }

    if let Some(generator) = &self.generator {
      let mut inputs = generator.build_files.clone();
      inputs.extend(
        self
          .graph
          .tracked_inputs()
          .iter()
          .filter(|p| !generator.build_files.contains(p))
          .cloned(),
      );

      writeln!(out)?;
      writeln!(out, "rule {}", REGENERATE_RULE)?;
      writeln!(out, "  command = {}", escape_value(&generator.command))?;
      writeln!(out, "  description = Regenerating {}", escape_value(&generator.ninja_file))?;
      writeln!(out, "  generator = 1")?;
      writeln!(out)?;
      write!(out, "build {}: {}", escape_path(&generator.ninja_file), REGENERATE_RULE)?;
      if !inputs.is_empty() {
        write!(out, " | {}", join_paths(&inputs))?;
      }
      writeln!(out)?;
    }

    let defaults = self.graph.default_outputs();
    if !defaults.is_empty() {
      writeln!(out)?;
      writeln!(out, "default {}", join_paths(&defaults))?;
    }

    Ok(out)
  }

  /// Render and write to `path`, leaving an identical file untouched.
  ///
  /// Returns whether the file was written.
  pub fn write_if_changed(&self, path: &Path) -> Result<bool, NinjaError> {
    let content = self.render()?;
    let io_err = |source: io::Error| NinjaError::Io {
      path: path.to_path_buf(),
      source,
    };

    match fs::read_to_string(path) {
      Ok(existing) if existing == content => {
        debug!(path = %path.display(), "ninja file unchanged");
        return Ok(false);
      }
      Ok(_) => {}
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(e) => return Err(io_err(e)),
    }

    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)?;
    debug!(path = %path.display(), "wrote ninja file");
    Ok(true)
  }
}

fn join_paths<S: AsRef<str>>(paths: &[S]) -> String {
  paths
    .iter()
    .map(|p| escape_path(p.as_ref()))
    .collect::<Vec<_>>()
    .join(" ")
}

/// Escape a path for use in a `build` or `default` line.
pub fn escape_path(path: &str) -> String {
  let mut escaped = String::with_capacity(path.len());
  for c in path.chars() {
    match c {
      '$' | ' ' | ':' => {
        escaped.push('$');
        escaped.push(c);
      }
      _ => escaped.push(c),
    }
  }
  escaped
}

/// Escape a variable value.
pub fn escape_value(value: &str) -> String {
  value.replace('$', "$$")
}
