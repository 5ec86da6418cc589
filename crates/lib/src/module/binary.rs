//! The `go_binary` module type.
//!
//! A Go command built from a package, optionally vendored first and
//! optionally tested. Emits up to three actions:
//!
//! 1. `go_vendor` (when `vendorFirst`): materializes `<dir>/vendor` from `<dir>/go.mod`
//! 2. `go_build`: produces `<out>/bin/<name>` from the non-test sources
//! 3. `go_test` (when `testPkg` is set): writes `<out>/reports/<name>.txt`
//!
//! ```lua
//! go_binary {
//!   name = "server",
//!   pkg = "./cmd/server",
//!   testPkg = "./...",
//!   srcs = { "**/*.go", "go.mod", "go.sum" },
//!   srcsExclude = { "testdata/**" },
//!   vendorFirst = true,
//! }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::registry::ModuleFactory;
use super::{EmitResult, Module, ModuleContext, ModuleKind, validate_name};
use crate::action::{BuildAction, RuleSet};

pub const TYPE_NAME: &str = "go_binary";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct BinaryProperties {
  pub name: String,
  /// Package to build; `.` when empty.
  pub pkg: String,
  /// Package pattern to test; no test action when empty.
  pub test_pkg: String,
  pub srcs: Vec<String>,
  pub srcs_exclude: Vec<String>,
  pub vendor_first: bool,
  pub deps: Vec<String>,
}

#[derive(Debug)]
pub struct GoBinary {
  rules: Arc<RuleSet>,
  props: BinaryProperties,
}

impl GoBinary {
  pub fn new(rules: Arc<RuleSet>) -> Self {
    Self::with_properties(rules, BinaryProperties::default())
  }

  pub fn with_properties(rules: Arc<RuleSet>, props: BinaryProperties) -> Self {
    Self { rules, props }
  }

  /// A factory producing fresh `go_binary` modules sharing `rules`.
  pub fn factory(rules: Arc<RuleSet>) -> ModuleFactory {
    Arc::new(move || Box::new(GoBinary::new(rules.clone())))
  }

  pub fn properties(&self) -> &BinaryProperties {
    &self.props
  }

  fn pkg(&self) -> &str {
    if self.props.pkg.is_empty() { "." } else { &self.props.pkg }
  }
}

impl Module for GoBinary {
  fn name(&self) -> &str {
    &self.props.name
  }

  fn kind(&self) -> ModuleKind {
    ModuleKind::Binary
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
    debug!(module = %name, dir = %ctx.module_dir(), "adding build actions for go binary module");
    validate_name(name).map_err(|e| vec![e])?;

    let inputs = ctx.glob(&self.props.srcs, &self.props.srcs_exclude)?;
    let mut build_inputs = inputs.build_inputs();
    let mut test_inputs = inputs.files.clone();

    let mut actions = Vec::with_capacity(3);

    if self.props.vendor_first {
      let vendor_dir = ctx.module_path("vendor");
      actions.push(
        BuildAction::new(self.rules.go_vendor.clone())
          .description(format!("Vendor dependencies of {}", name))
          .output(vendor_dir.clone())
          .implicit_input(ctx.module_path("go.mod"))
          .arg("workDir", ctx.module_dir())
          .arg("name", name)
          .optional(true),
      );
      build_inputs.push(vendor_dir.clone());
      test_inputs.push(vendor_dir);
    }

    let output_path = ctx.output_path(&["bin", name]);
    actions.push(
      BuildAction::new(self.rules.go_build.clone())
        .description(format!("Build {} as Go binary", name))
        .output(output_path.clone())
        .implicit_inputs(build_inputs)
        .arg("workDir", ctx.module_dir())
        .arg("outputPath", ctx.relative_to_module(&output_path))
        .arg("pkg", self.pkg()),
    );

    if !self.props.test_pkg.is_empty() {
      let report_path = ctx.output_path(&["reports", &format!("{}.txt", name)]);
      actions.push(
        BuildAction::new(self.rules.go_test.clone())
          .description(format!("Test {} and save results", name))
          .output(report_path.clone())
          .implicit_inputs(test_inputs)
          .arg("workDir", ctx.module_dir())
          .arg("outputPath", ctx.relative_to_module(&report_path))
          .arg("pkg", self.props.test_pkg.as_str()),
      );
    }

    debug!(module = %name, actions = actions.len(), inputs = inputs.len(), "go binary module emitted");
    Ok(actions)
  }
}
