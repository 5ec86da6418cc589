//! Mapping from module type names to factories.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::Module;
use super::{archive, binary};
use crate::action::RuleSet;

/// Creates an empty module of one type, ready for `load_properties`.
pub type ModuleFactory = Arc<dyn Fn() -> Box<dyn Module> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
  #[error("module type '{0}' is already registered")]
  DuplicateModuleType(String),
}

/// Known module types, keyed by the name used in build files.
#[derive(Clone, Default)]
pub struct ModuleRegistry {
  factories: BTreeMap<String, ModuleFactory>,
}

impl ModuleRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry holding `go_binary` and `zip_archive`.
  pub fn with_builtin(rules: Arc<RuleSet>) -> Self {
    let mut factories: BTreeMap<String, ModuleFactory> = BTreeMap::new();
    factories.insert(binary::TYPE_NAME.to_string(), binary::GoBinary::factory(rules.clone()));
    factories.insert(archive::TYPE_NAME.to_string(), archive::ZipArchive::factory(rules));
    Self { factories }
  }

  pub fn register(&mut self, type_name: &str, factory: ModuleFactory) -> Result<(), RegistryError> {
    if self.factories.contains_key(type_name) {
      return Err(RegistryError::DuplicateModuleType(type_name.to_string()));
    }
    self.factories.insert(type_name.to_string(), factory);
    Ok(())
  }

  /// A fresh module of `type_name`, or `None` for an unknown type.
  pub fn create(&self, type_name: &str) -> Option<Box<dyn Module>> {
    self.factories.get(type_name).map(|factory| factory())
  }

  pub fn contains(&self, type_name: &str) -> bool {
    self.factories.contains_key(type_name)
  }

  pub fn factory(&self, type_name: &str) -> Option<ModuleFactory> {
    self.factories.get(type_name).cloned()
  }

  /// Registered type names in sorted order.
  pub fn type_names(&self) -> impl Iterator<Item = &str> {
    self.factories.keys().map(String::as_str)
  }
}

impl fmt::Debug for ModuleRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ModuleRegistry")
      .field("types", &self.factories.keys().collect::<Vec<_>>())
      .finish()
  }
}
