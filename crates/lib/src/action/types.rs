use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::rules::Rule;

/// One schedulable build step.
///
/// Actions are produced by module emitters and appended to the
/// [`ActionGraph`](crate::graph::ActionGraph). Ordering between actions is
/// expressed through paths: an action runs after every action whose output
/// appears among its `implicit_inputs`.
///
/// # Example
///
/// ```ignore
/// let action = BuildAction::new(rules.go_build.clone())
///   .description("Build svc as Go binary")
///   .output("out/bin/svc")
///   .implicit_inputs(["main.go", "util.go"])
///   .arg("workDir", ".")
///   .arg("outputPath", "out/bin/svc")
///   .arg("pkg", ".");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildAction {
  #[serde(serialize_with = "serialize_rule_name")]
  pub rule: Arc<Rule>,
  pub description: String,
  pub outputs: Vec<String>,
  pub implicit_inputs: Vec<String>,
  /// Values for the rule's parameters.
  pub args: BTreeMap<String, String>,
  /// Optional actions only run when something downstream needs their output.
  pub optional: bool,
}

impl BuildAction {
  pub fn new(rule: Arc<Rule>) -> Self {
    Self {
      rule,
      description: String::new(),
      outputs: Vec::new(),
      implicit_inputs: Vec::new(),
      args: BTreeMap::new(),
      optional: false,
    }
  }

  pub fn description(mut self, description: impl Into<String>) -> Self {
    self.description = description.into();
    self
  }

  pub fn output(mut self, path: impl Into<String>) -> Self {
    self.outputs.push(path.into());
    self
  }

  pub fn implicit_input(mut self, path: impl Into<String>) -> Self {
    self.implicit_inputs.push(path.into());
    self
  }

  pub fn implicit_inputs<I, S>(mut self, paths: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.implicit_inputs.extend(paths.into_iter().map(Into::into));
    self
  }

  pub fn arg(mut self, name: &str, value: impl Into<String>) -> Self {
    self.args.insert(name.to_string(), value.into());
    self
  }

  pub fn optional(mut self, optional: bool) -> Self {
    self.optional = optional;
    self
  }

  pub fn rule_name(&self) -> &str {
    &self.rule.name
  }

  /// Whether `path` is one of this action's implicit inputs.
  pub fn depends_on(&self, path: &str) -> bool {
    self.implicit_inputs.iter().any(|p| p == path)
  }
}

fn serialize_rule_name<S: Serializer>(rule: &Arc<Rule>, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.serialize_str(&rule.name)
}
