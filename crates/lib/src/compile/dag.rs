//! Module dependency graph and emission waves.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use super::types::CompileError;
use crate::module::ModuleDescriptor;

/// Dependency graph over a slice of module descriptors.
///
/// Node weights are indices into that slice; edges run from a dependency to
/// its dependent.
pub struct ModuleDag<'a> {
  graph: DiGraph<usize, ()>,
  modules: &'a [ModuleDescriptor],
}

impl<'a> ModuleDag<'a> {
  /// Build the graph, rejecting unknown dependencies and cycles.
  ///
  /// Module names must already be unique.
  pub fn new(modules: &'a [ModuleDescriptor]) -> Result<Self, CompileError> {
    let mut graph = DiGraph::with_capacity(modules.len(), 0);
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::with_capacity(modules.len());

    for (index, module) in modules.iter().enumerate() {
      nodes.insert(module.name(), graph.add_node(index));
    }

    for (index, module) in modules.iter().enumerate() {
      let dependent = NodeIndex::new(index);
      for dependency in module.dependencies() {
        let Some(&dep) = nodes.get(dependency.as_str()) else {
          return Err(CompileError::DanglingDependency {
            module: module.name().to_string(),
            dependency: dependency.clone(),
          });
        };
        graph.update_edge(dep, dependent, ());
      }
    }

    let dag = Self { graph, modules };
    dag.verify_acyclic()?;
    Ok(dag)
  }

  fn verify_acyclic(&self) -> Result<(), CompileError> {
    let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
      .into_iter()
      .filter(|component| component.len() > 1 || self.graph.contains_edge(component[0], component[0]))
      .map(|component| {
        let mut names: Vec<String> = component
          .iter()
          .map(|&idx| self.modules[self.graph[idx]].name().to_string())
          .collect();
        names.sort();
        if let Some(first) = names.first().cloned() {
          names.push(first);
        }
        names
      })
      .collect();

    cycles.sort();
    match cycles.into_iter().next() {
      Some(cycle) => Err(CompileError::DependencyCycle(cycle)),
      None => Ok(()),
    }
  }

  /// Group modules into waves: every module's dependencies sit in earlier waves.
  ///
  /// Each wave holds slice indices sorted by module name.
  pub fn waves(&self) -> Vec<Vec<usize>> {
    let mut in_degree: Vec<usize> = self
      .graph
      .node_indices()
      .map(|idx| self.graph.neighbors_directed(idx, Direction::Incoming).count())
      .collect();

    let mut ready: Vec<NodeIndex> = self
      .graph
      .node_indices()
      .filter(|idx| in_degree[idx.index()] == 0)
      .collect();
    let mut waves = Vec::new();

    while !ready.is_empty() {
      let mut next = Vec::new();
      for &idx in &ready {
        for dependent in self.graph.neighbors_directed(idx, Direction::Outgoing) {
          let degree = &mut in_degree[dependent.index()];
          *degree = degree.saturating_sub(1);
          if *degree == 0 {
            next.push(dependent);
          }
        }
      }

      let mut wave: Vec<usize> = ready.iter().map(|&idx| self.graph[idx]).collect();
      wave.sort_by(|&a, &b| self.modules[a].name().cmp(self.modules[b].name()));
      waves.push(wave);
      ready = next;
    }

    waves
  }

  /// Direct dependencies of the module at `index`, as slice indices.
  pub fn dependencies(&self, index: usize) -> Vec<usize> {
    self
      .graph
      .neighbors_directed(NodeIndex::new(index), Direction::Incoming)
      .map(|idx| self.graph[idx])
      .collect()
  }

  pub fn module_count(&self) -> usize {
    self.graph.node_count()
  }
}
