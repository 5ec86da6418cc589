//! Rule definitions.

use std::sync::Arc;

use serde::Serialize;

/// A command template executed by the build executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
  pub name: String,
  pub command: String,
  pub description: String,
  /// Parameter names the command and description may reference.
  pub params: Vec<String>,
}

impl Rule {
  pub fn new(name: &str, command: &str, description: &str, params: &[&str]) -> Self {
    Self {
      name: name.to_string(),
      command: command.to_string(),
      description: description.to_string(),
      params: params.iter().map(|p| p.to_string()).collect(),
    }
  }

  /// Whether `param` is one of this rule's declared parameters.
  pub fn declares(&self, param: &str) -> bool {
    self.params.iter().any(|p| p == param)
  }
}

/// The rules shared by the built-in module types.
///
/// Constructed once per run and handed to the module factories; every module
/// of a type emits actions against the same `Arc<Rule>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
  pub go_build: Arc<Rule>,
  pub go_vendor: Arc<Rule>,
  pub go_test: Arc<Rule>,
  pub zip_archive: Arc<Rule>,
}

impl RuleSet {
  pub fn new() -> Self {
    Self {
      go_build: Arc::new(Rule::new(
        "go_build",
        "cd $workDir && go build -o $outputPath $pkg",
        "build go command $pkg",
        &["workDir", "outputPath", "pkg"],
      )),
      go_vendor: Arc::new(Rule::new(
        "go_vendor",
        "cd $workDir && go mod vendor",
        "vendor dependencies of $name",
        &["workDir", "name"],
      )),
      go_test: Arc::new(Rule::new(
        "go_test",
        "cd $workDir && go test -v $pkg > $outputPath",
        "test go command $pkg",
        &["workDir", "outputPath", "pkg"],
      )),
      zip_archive: Arc::new(Rule::new(
        "zip_archive",
        "cd $workDir && zip -r $outputPath $inputFiles",
        "zip archive at $outputPath",
        &["workDir", "outputPath", "inputFiles"],
      )),
    }
  }
}

impl Default for RuleSet {
  fn default() -> Self {
    Self::new()
  }
}
