//! Dependency graph of service units.
//!
//! [`DependencyGraph`] maps each unit name to the set of names it depends on,
//! and computes a deterministic startup order.
//!
//! ## Rules
//! - Units may be declared in any order; a dependency on a not-yet-declared
//!   unit is accepted at [`add_unit`](DependencyGraph::add_unit) time and
//!   rejected only at [`validate`](DependencyGraph::validate) if it never
//!   appears.
//! - Redeclaring a unit name fails immediately with
//!   [`ConfigError::DuplicateUnit`].
//! - The graph must be acyclic; [`validate`](DependencyGraph::validate)
//!   reports one cycle path on violation.
//! - [`startup_order`](DependencyGraph::startup_order) places every unit after
//!   all of its dependencies; ties between unconstrained units are broken by
//!   declaration order, so the result is reproducible.

use std::collections::HashMap;

use crate::error::ConfigError;

/// Directed acyclic graph of unit names, keyed by declaration order.
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    /// Unit names in declaration order.
    order: Vec<String>,
    /// Unit name → names it depends on (declaration order preserved).
    deps: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a unit and the names it depends on.
    ///
    /// Dependencies may reference units declared later; resolution happens in
    /// [`validate`](Self::validate).
    pub fn add_unit(
        &mut self,
        name: impl Into<String>,
        dependencies: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        if self.deps.contains_key(&name) {
            return Err(ConfigError::DuplicateUnit { name });
        }
        let mut deps: Vec<String> = Vec::new();
        for dep in dependencies {
            let dep = dep.into();
            // Duplicate edges collapse to one.
            if !deps.contains(&dep) {
                deps.push(dep);
            }
        }
        self.order.push(name.clone());
        self.deps.insert(name, deps);
        Ok(())
    }

    /// Returns the declared unit names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Returns the declared dependencies of `name`, if the unit exists.
    pub fn dependencies_of(&self, name: &str) -> Option<&[String]> {
        self.deps.get(name).map(Vec::as_slice)
    }

    /// Checks that every referenced dependency is declared and that the graph
    /// is acyclic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.startup_order().map(|_| ())
    }

    /// Computes a topological startup order (Kahn's algorithm).
    ///
    /// Every unit appears after all of its dependencies. Among units with no
    /// relative constraint, declaration order wins. Fails with
    /// [`ConfigError::UnknownDependency`] for a dangling reference and
    /// [`ConfigError::CyclicDependency`] (with the cycle path) for a cycle.
    pub fn startup_order(&self) -> Result<Vec<String>, ConfigError> {
        let index: HashMap<&str, usize> = self
            .order
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i))
            .collect();

        // Dangling references are a configuration error, not a sort artifact.
        for name in &self.order {
            for dep in &self.deps[name] {
                if !index.contains_key(dep.as_str()) {
                    return Err(ConfigError::UnknownDependency {
                        unit: name.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        let n = self.order.len();
        let mut indegree = vec![0usize; n];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, name) in self.order.iter().enumerate() {
            for dep in &self.deps[name] {
                indegree[i] += 1;
                dependents[index[dep.as_str()]].push(i);
            }
        }

        // Ready set kept sorted by declaration index for deterministic ties.
        let mut ready: Vec<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
        ready.sort_unstable();

        let mut sorted = Vec::with_capacity(n);
        while let Some(i) = take_min(&mut ready) {
            sorted.push(self.order[i].clone());
            for &dep in &dependents[i] {
                indegree[dep] -= 1;
                if indegree[dep] == 0 {
                    ready.push(dep);
                }
            }
        }

        if sorted.len() == n {
            Ok(sorted)
        } else {
            Err(ConfigError::CyclicDependency {
                cycle: self.find_cycle(&indegree, &index),
            })
        }
    }

    /// Extracts one cycle path from the nodes Kahn's algorithm left behind.
    ///
    /// Walks dependency edges inside the residual set until a node repeats,
    /// then returns the closed walk with the first node repeated last.
    fn find_cycle(&self, indegree: &[usize], index: &HashMap<&str, usize>) -> Vec<String> {
        let start = self
            .order
            .iter()
            .enumerate()
            .find(|(i, _)| indegree[*i] > 0)
            .map(|(_, n)| n.as_str())
            .unwrap_or_default();

        let mut path: Vec<&str> = Vec::new();
        let mut current = start;
        loop {
            if let Some(pos) = path.iter().position(|&n| n == current) {
                let mut cycle: Vec<String> = path[pos..].iter().map(|s| s.to_string()).collect();
                cycle.push(current.to_string());
                return cycle;
            }
            path.push(current);
            // Residual nodes always have a residual dependency edge to follow.
            current = self.deps[current]
                .iter()
                .map(String::as_str)
                .find(|d| indegree[index[d]] > 0)
                .unwrap_or(current);
        }
    }
}

/// Pops the smallest element, keeping `ready` unsorted in between.
fn take_min(ready: &mut Vec<usize>) -> Option<usize> {
    let (pos, _) = ready.iter().enumerate().min_by_key(|(_, &v)| v)?;
    Some(ready.swap_remove(pos))
}
