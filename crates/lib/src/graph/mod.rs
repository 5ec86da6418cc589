//! The action graph handed to the build executor.
//!
//! Actions are appended module by module. Edges are implicit: an action
//! depends on whichever action produces one of its implicit inputs, which is
//! how the executor sequences vendor before build and build before test.
//!
//! # Invariants
//!
//! - Every output path is produced by exactly one action
//! - Every action argument names a parameter of its rule
//! - Rule names are unique; one name always maps to the same definition
//!
//! A batch is validated as a whole before anything is inserted, so a rejected
//! batch leaves the graph unchanged.

pub mod ninja;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;
use tracing::trace;

use crate::action::{BuildAction, Rule};
use crate::util::hash::Hashable;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
  #[error("output '{output}' of module '{module}' is already produced by module '{owner}'")]
  DuplicateOutput {
    output: String,
    module: String,
    owner: String,
  },

  #[error("module '{module}' passes argument '{arg}' which rule '{rule}' does not declare")]
  UndeclaredArgument { module: String, rule: String, arg: String },

  #[error("rule '{0}' is defined more than once with different contents")]
  RuleConflict(String),
}

/// An action together with the module that emitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleAction {
  pub module: String,
  #[serde(flatten)]
  pub action: BuildAction,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ActionGraph {
  rules: BTreeMap<String, Rule>,
  actions: Vec<ModuleAction>,
  /// Output path to index into `actions`.
  #[serde(skip)]
  owners: HashMap<String, usize>,
  tracked_inputs: BTreeSet<String>,
}

impl Hashable for ActionGraph {}

impl ActionGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append every action emitted by `module`, or none of them.
  pub fn append(&mut self, module: &str, actions: Vec<BuildAction>) -> Result<(), GraphError> {
    let mut batch_outputs: HashSet<&str> = HashSet::new();

    for action in &actions {
      let rule = action.rule.as_ref();
      if let Some(existing) = self.rules.get(&rule.name)
        && existing != rule
      {
        return Err(GraphError::RuleConflict(rule.name.clone()));
      }
      if let Some(other) = actions
        .iter()
        .find(|other| other.rule.name == rule.name && other.rule.as_ref() != rule)
      {
        return Err(GraphError::RuleConflict(other.rule.name.clone()));
      }

      if let Some(arg) = action.args.keys().find(|arg| !rule.declares(arg)) {
        return Err(GraphError::UndeclaredArgument {
          module: module.to_string(),
          rule: rule.name.clone(),
          arg: arg.clone(),
        });
      }

      for output in &action.outputs {
        if let Some(&index) = self.owners.get(output) {
          return Err(GraphError::DuplicateOutput {
            output: output.clone(),
            module: module.to_string(),
            owner: self.actions[index].module.clone(),
          });
        }
        if !batch_outputs.insert(output.as_str()) {
          return Err(GraphError::DuplicateOutput {
            output: output.clone(),
            module: module.to_string(),
            owner: module.to_string(),
          });
        }
      }
    }

    for action in actions {
      self
        .rules
        .entry(action.rule.name.clone())
        .or_insert_with(|| action.rule.as_ref().clone());
      let index = self.actions.len();
      for output in &action.outputs {
        self.owners.insert(output.clone(), index);
      }
      trace!(module = %module, rule = %action.rule.name, outputs = ?action.outputs, "appended action");
      self.actions.push(ModuleAction {
        module: module.to_string(),
        action,
      });
    }
    Ok(())
  }

  /// Record paths whose change should regenerate the graph.
  pub fn track_inputs<I>(&mut self, paths: I)
  where
    I: IntoIterator<Item = String>,
  {
    self.tracked_inputs.extend(paths);
  }

  pub fn tracked_inputs(&self) -> &BTreeSet<String> {
    &self.tracked_inputs
  }

  pub fn rules(&self) -> impl Iterator<Item = &Rule> {
    self.rules.values()
  }

  pub fn actions(&self) -> &[ModuleAction] {
    &self.actions
  }

  /// Actions emitted by `module`, in emission order.
  pub fn actions_for<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a BuildAction> + 'a {
    self
      .actions
      .iter()
      .filter(move |a| a.module == module)
      .map(|a| &a.action)
  }

  /// The action producing `output`, if any.
  pub fn producer(&self, output: &str) -> Option<&ModuleAction> {
    self.owners.get(output).map(|&index| &self.actions[index])
  }

  /// Outputs built by default: everything not marked optional.
  pub fn default_outputs(&self) -> Vec<&str> {
    self
      .actions
      .iter()
      .filter(|a| !a.action.optional)
      .flat_map(|a| a.action.outputs.iter().map(String::as_str))
      .collect()
  }

  pub fn len(&self) -> usize {
    self.actions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.actions.is_empty()
  }
}
