use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::action::BuildAction;
use crate::config::Config;
use crate::inputs::{GlobError, GlobResolver, ResolvedInputs};
use crate::util::path;

/// The kind of buildable unit a module describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
  Binary,
  Archive,
}

impl fmt::Display for ModuleKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ModuleKind::Binary => write!(f, "binary"),
      ModuleKind::Archive => write!(f, "archive"),
    }
  }
}

/// Errors attached to a single module.
///
/// These never abort the run: the module contributes no actions and its
/// siblings still emit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
  #[error(transparent)]
  Glob(#[from] GlobError),

  /// A property holds a value the module cannot use.
  #[error("{property}: {message}")]
  Property { property: String, message: String },

  /// A declared dependency failed, so this module was not emitted.
  #[error("dependency '{0}' failed, module skipped")]
  DependencyFailed(String),
}

/// Outcome of emitting one module: all of its actions, or all of its errors.
pub type EmitResult = Result<Vec<BuildAction>, Vec<ModuleError>>;

/// Module names become output file names, so they must be a single path segment.
pub fn validate_name(name: &str) -> Result<(), ModuleError> {
  let message = if name.is_empty() {
    "must not be empty"
  } else if name == "." || name == ".." || name.contains(['/', '\\']) {
    "must be a single path segment"
  } else if name.chars().any(|c| c.is_whitespace() || c == '$' || c == ':') {
    "must not contain whitespace, '$' or ':'"
  } else {
    return Ok(());
  };
  Err(ModuleError::Property {
    property: "name".to_string(),
    message: message.to_string(),
  })
}

/// A module type.
///
/// Implementations hold their parsed properties and the rule definitions
/// they were constructed with. Emission is a pure function of the module and
/// its [`ModuleContext`], so modules without a dependency path between them
/// can be emitted concurrently.
pub trait Module: fmt::Debug + Send + Sync {
  /// Unique module name.
  fn name(&self) -> &str;

  fn kind(&self) -> ModuleKind;

  /// Populate the property set from the decoded build file block.
  ///
  /// Unknown properties and ill-typed values are rejected.
  fn load_properties(&mut self, props: serde_json::Value) -> Result<(), serde_json::Error>;

  /// Names of modules that must be emitted before this one.
  fn dependencies(&self) -> &[String];

  fn generate_build_actions(&self, ctx: &ModuleContext<'_>) -> EmitResult;
}

/// A parsed module together with the directory of the build file declaring it.
#[derive(Debug)]
pub struct ModuleDescriptor {
  /// Root-relative module directory (`.` for the root).
  pub dir: String,
  pub module: Box<dyn Module>,
}

impl ModuleDescriptor {
  pub fn new(dir: impl Into<String>, module: Box<dyn Module>) -> Self {
    Self {
      dir: path::clean(&dir.into()),
      module,
    }
  }

  pub fn name(&self) -> &str {
    self.module.name()
  }

  pub fn kind(&self) -> ModuleKind {
    self.module.kind()
  }

  pub fn dependencies(&self) -> &[String] {
    self.module.dependencies()
  }
}

/// What the compiler exposes to a module while it emits actions.
///
/// Paths handed out are root-relative. Every path the glob resolver touches
/// is recorded so the compiler can track it for regeneration.
pub struct ModuleContext<'a> {
  name: &'a str,
  dir: &'a str,
  config: &'a Config,
  resolver: &'a GlobResolver,
  tracked: RefCell<BTreeSet<String>>,
}

impl<'a> ModuleContext<'a> {
  pub fn new(name: &'a str, dir: &'a str, config: &'a Config, resolver: &'a GlobResolver) -> Self {
    Self {
      name,
      dir,
      config,
      resolver,
      tracked: RefCell::new(BTreeSet::new()),
    }
  }

  pub fn module_name(&self) -> &str {
    self.name
  }

  pub fn module_dir(&self) -> &str {
    self.dir
  }

  /// Base output directory every generated artifact lives under.
  pub fn output_root(&self) -> &str {
    &self.config.base_output_dir
  }

  /// A path below the output root, e.g. `output_path(&["bin", "svc"])`.
  pub fn output_path(&self, segments: &[&str]) -> String {
    let mut all = vec![self.output_root()];
    all.extend_from_slice(segments);
    path::join(&all)
  }

  /// A path inside the module directory.
  pub fn module_path(&self, name: &str) -> String {
    path::join(&[self.dir, name])
  }

  /// Express a root-relative path relative to the module directory.
  ///
  /// Commands run after `cd $workDir`, so paths passed as arguments use this form.
  pub fn relative_to_module(&self, path: &str) -> String {
    path::relative_to(self.dir, path)
  }

  /// Whether `path` lies in the base output directory.
  ///
  /// An output directory of `.` shares the root with the sources and contains nothing of its own.
  pub fn is_output(&self, path: &str) -> bool {
    let root = self.output_root();
    root != "." && path::is_within(path, root)
  }

  /// Resolve `srcs` minus `srcs_exclude` for this module.
  ///
  /// Generated files are never inputs, so matches inside the output directory are dropped.
  pub fn glob(&self, srcs: &[String], srcs_exclude: &[String]) -> Result<ResolvedInputs, Vec<ModuleError>> {
    let mut resolved = self
      .resolver
      .resolve(self.dir, srcs, srcs_exclude)
      .map_err(|errors| errors.into_iter().map(ModuleError::from).collect::<Vec<_>>())?;
    resolved.files.retain(|file| !self.is_output(file));
    self
      .tracked
      .borrow_mut()
      .extend(resolved.touched.iter().filter(|p| !self.is_output(p)).cloned());
    Ok(resolved)
  }

  /// Paths touched by glob resolution so far.
  pub fn into_tracked(self) -> BTreeSet<String> {
    self.tracked.into_inner()
  }
}
