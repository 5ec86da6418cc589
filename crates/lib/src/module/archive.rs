//! The `zip_archive` module type.
//!
//! Zips the resolved sources of a module into `<out>/archives/<name>`.
//!
//! ```lua
//! zip_archive {
//!   name = "site.zip",
//!   srcs = { "public/**" },
//!   srcsExclude = { "public/**/*.map" },
//! }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::registry::ModuleFactory;
use super::{EmitResult, Module, ModuleContext, ModuleKind, validate_name};
use crate::action::{BuildAction, RuleSet};

pub const TYPE_NAME: &str = "zip_archive";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ArchiveProperties {
  pub name: String,
  pub srcs: Vec<String>,
  pub srcs_exclude: Vec<String>,
  pub deps: Vec<String>,
}

#[derive(Debug)]
pub struct ZipArchive {
  rules: Arc<RuleSet>,
  props: ArchiveProperties,
}

impl ZipArchive {
  pub fn new(rules: Arc<RuleSet>) -> Self {
    Self::with_properties(rules, ArchiveProperties::default())
  }

  pub fn with_properties(rules: Arc<RuleSet>, props: ArchiveProperties) -> Self {
    Self { rules, props }
  }

  pub fn factory(rules: Arc<RuleSet>) -> ModuleFactory {
    Arc::new(move || Box::new(ZipArchive::new(rules.clone())))
  }

  pub fn properties(&self) -> &ArchiveProperties {
    &self.props
  }
}

impl Module for ZipArchive {
  fn name(&self) -> &str {
    &self.props.name
  }

  fn kind(&self) -> ModuleKind {
    ModuleKind::Archive
  }

  fn load_properties(&mut self, props: serde_json::Value) -> Result<(), serde_json::Error> {
    self.props = serde_json::from_value(props)?;
    Ok(())
  }

  fn dependencies(&self) -> &[String] {
    &self.props.deps
  }

  fn generate_build_actions(&self, ctx: &ModuleContext<'_>) -> EmitResult {
    let name = self.name();
    debug!(module = %name, dir = %ctx.module_dir(), "adding build actions for zip archive module");
    validate_name(name).map_err(|e| vec![e])?;

    let inputs = ctx.glob(&self.props.srcs, &self.props.srcs_exclude)?;
    // Paths handed to zip are module-relative so the archive layout mirrors the module tree.
    let input_files = inputs
      .files
      .iter()
      .map(|file| ctx.relative_to_module(file))
      .collect::<Vec<_>>()
      .join(" ");

    let output_path = ctx.output_path(&["archives", name]);
    let action = BuildAction::new(self.rules.zip_archive.clone())
      .description(format!("Create {} zip archive", name))
      .output(output_path.clone())
      .arg("workDir", ctx.module_dir())
      .arg("outputPath", ctx.relative_to_module(&output_path))
      .arg("inputFiles", input_files);

    Ok(vec![action])
  }
}
