//! Turning module descriptors into an action graph.
//!
//! # Pipeline
//!
//! 1. Evaluate the build files into descriptors ([`crate::eval`])
//! 2. Reject duplicate names, unknown dependencies and cycles
//! 3. Group modules into dependency waves ([`ModuleDag::waves`])
//! 4. Emit every module of a wave in parallel
//! 5. Append each wave's results in module-name order
//!
//! Steps 2 and 5 can abort the run. Everything a single module gets wrong is
//! collected per module, and modules depending on it are skipped.

mod dag;
mod types;

pub use dag::ModuleDag;
pub use types::*;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::action::{BuildAction, RuleSet};
use crate::config::Config;
use crate::eval::evaluate_build_files;
use crate::graph::ActionGraph;
use crate::inputs::GlobResolver;
use crate::module::{ModuleContext, ModuleDescriptor, ModuleError, ModuleRegistry};

/// One module's emission result plus the paths its globs touched.
type Emitted = (usize, Result<Vec<BuildAction>, Vec<ModuleError>>, BTreeSet<String>);

#[derive(Debug)]
pub struct Compiler {
  config: Config,
  rules: Arc<RuleSet>,
  registry: ModuleRegistry,
}

impl Compiler {
  /// A compiler with the built-in module types.
  pub fn new(config: Config) -> Self {
    let rules = Arc::new(RuleSet::new());
    let registry = ModuleRegistry::with_builtin(rules.clone());
    Self {
      config,
      rules,
      registry,
    }
  }

  pub fn with_registry(config: Config, rules: Arc<RuleSet>, registry: ModuleRegistry) -> Self {
    Self {
      config,
      rules,
      registry,
    }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn rules(&self) -> &Arc<RuleSet> {
    &self.rules
  }

  pub fn registry(&self) -> &ModuleRegistry {
    &self.registry
  }

  pub fn registry_mut(&mut self) -> &mut ModuleRegistry {
    &mut self.registry
  }

  /// Evaluate the configured build file (and its `subdirs`) and compile the result.
  pub fn compile_file(&self) -> Result<Compilation, CompileError> {
    let parsed = evaluate_build_files(&self.config, &self.registry)?;
    let mut compilation = self.compile(parsed.modules)?;
    compilation.build_files = parsed.build_files;
    Ok(compilation)
  }

  pub fn compile(&self, modules: Vec<ModuleDescriptor>) -> Result<Compilation, CompileError> {
    check_unique_names(&modules)?;
    let dag = ModuleDag::new(&modules)?;
    let waves = dag.waves();
    debug!(modules = modules.len(), waves = waves.len(), "scheduled module emission");

    let resolver = GlobResolver::new(&self.config.root_dir);
    let mut graph = ActionGraph::new();
    let mut module_errors = BTreeMap::new();
    let mut failed: HashSet<String> = HashSet::new();
    let mut tracked: BTreeSet<String> = BTreeSet::new();

    for wave in waves {
      let emitted: Vec<Emitted> = wave
        .par_iter()
        .map(|&index| self.emit(&modules[index], index, &resolver, &failed))
        .collect();

      for (index, result, touched) in emitted {
        let name = modules[index].name();
        match result {
          Ok(actions) => {
            debug!(module = %name, actions = actions.len(), "appending module actions");
            graph.append(name, actions)?;
            tracked.extend(touched);
          }
          Err(errors) => {
            for error in &errors {
              warn!(module = %name, "{}", error);
            }
            failed.insert(name.to_string());
            module_errors.insert(name.to_string(), errors);
          }
        }
      }
    }

    graph.track_inputs(tracked);

    info!(
      modules = modules.len(),
      actions = graph.len(),
      failed = module_errors.len(),
      "compiled action graph"
    );

    Ok(Compilation {
      graph,
      module_errors,
      build_files: Vec::new(),
      module_count: modules.len(),
    })
  }

  fn emit(
    &self,
    descriptor: &ModuleDescriptor,
    index: usize,
    resolver: &GlobResolver,
    failed: &HashSet<String>,
  ) -> Emitted {
    if let Some(dependency) = descriptor.dependencies().iter().find(|d| failed.contains(*d)) {
      return (
        index,
        Err(vec![ModuleError::DependencyFailed(dependency.clone())]),
        BTreeSet::new(),
      );
    }

    let ctx = ModuleContext::new(descriptor.name(), &descriptor.dir, &self.config, resolver);
    let result = descriptor.module.generate_build_actions(&ctx);
    (index, result, ctx.into_tracked())
  }
}

fn check_unique_names(modules: &[ModuleDescriptor]) -> Result<(), CompileError> {
  let mut seen: HashMap<&str, &str> = HashMap::with_capacity(modules.len());
  for module in modules {
    if let Some(first) = seen.insert(module.name(), &module.dir) {
      return Err(CompileError::DuplicateModuleName {
        name: module.name().to_string(),
        first: first.to_string(),
        second: module.dir.clone(),
      });
    }
  }
  Ok(())
}
