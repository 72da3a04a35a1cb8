//! Prerequisite graph for capability ordering.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{KitupError, Result};

/// Prerequisite relationships between capabilities, in declaration order.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Capability names in declaration order.
    order: Vec<String>,
    /// Map of capability name to its declaration index.
    index: HashMap<String, usize>,
    /// Direct prerequisites of each capability, by declaration index.
    prerequisites: Vec<Vec<usize>>,
    /// Capabilities that directly require each capability.
    dependents: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Create a new dependency graph builder.
    pub fn builder() -> DependencyGraphBuilder {
        DependencyGraphBuilder::new()
    }

    /// Check if a capability exists in the graph.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get the number of capabilities in the graph.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Direct prerequisites of a capability, in declaration order.
    pub fn prerequisites_of(&self, name: &str) -> Vec<&str> {
        self.index
            .get(name)
            .map(|&i| {
                self.prerequisites[i]
                    .iter()
                    .map(|&p| self.order[p].as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns capabilities in topological order (prerequisites first).
    ///
    /// Among capabilities whose prerequisites are all resolved, the one
    /// declared first is emitted first, so the order is reproducible.
    pub fn topological_order(&self) -> Result<Vec<String>> {
        let mut in_degree: Vec<usize> = self.prerequisites.iter().map(|p| p.len()).collect();

        let mut ready: BTreeSet<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &degree)| degree == 0)
            .map(|(i, _)| i)
            .collect();

        let mut result = Vec::with_capacity(self.order.len());

        while let Some(next) = ready.pop_first() {
            result.push(self.order[next].clone());

            for &dependent in &self.dependents[next] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if result.len() != self.order.len() {
            let cycle = self.find_cycle().unwrap_or_else(|| {
                in_degree
                    .iter()
                    .enumerate()
                    .filter(|(_, &d)| d > 0)
                    .map(|(i, _)| self.order[i].clone())
                    .collect()
            });
            return Err(KitupError::CircularDependency {
                cycle: cycle.join(" -> "),
            });
        }

        Ok(result)
    }

    /// Find a cycle in the graph, returning the path if one exists.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Unvisited,
            Visiting,
            Visited,
        }

        fn dfs(
            node: usize,
            graph: &DependencyGraph,
            state: &mut [State],
            path: &mut Vec<usize>,
        ) -> Option<Vec<String>> {
            state[node] = State::Visiting;
            path.push(node);

            for &dep in &graph.prerequisites[node] {
                match state[dep] {
                    State::Visiting => {
                        let start = path.iter().position(|&n| n == dep).unwrap_or(0);
                        let mut cycle: Vec<String> = path[start..]
                            .iter()
                            .map(|&n| graph.order[n].clone())
                            .collect();
                        cycle.push(graph.order[dep].clone());
                        return Some(cycle);
                    }
                    State::Unvisited => {
                        if let Some(cycle) = dfs(dep, graph, state, path) {
                            return Some(cycle);
                        }
                    }
                    State::Visited => {}
                }
            }

            path.pop();
            state[node] = State::Visited;
            None
        }

        let mut state = vec![State::Unvisited; self.order.len()];
        let mut path = Vec::new();

        for node in 0..self.order.len() {
            if state[node] == State::Unvisited {
                if let Some(cycle) = dfs(node, self, &mut state, &mut path) {
                    return Some(cycle);
                }
            }
        }

        None
    }

    /// Get all transitive prerequisites of a capability.
    pub fn transitive_prerequisites(&self, name: &str) -> HashSet<String> {
        let mut result = HashSet::new();
        let Some(&start) = self.index.get(name) else {
            return result;
        };
        let mut to_visit = vec![start];

        while let Some(current) = to_visit.pop() {
            for &dep in &self.prerequisites[current] {
                if result.insert(self.order[dep].clone()) {
                    to_visit.push(dep);
                }
            }
        }

        result
    }
}

/// Builder for constructing a DependencyGraph.
#[derive(Debug, Default)]
pub struct DependencyGraphBuilder {
    nodes: Vec<(String, Vec<String>)>,
}

impl DependencyGraphBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a capability with its prerequisites.
    pub fn add_node(mut self, name: impl Into<String>, prerequisites: Vec<String>) -> Self {
        self.nodes.push((name.into(), prerequisites));
        self
    }

    /// Build the dependency graph.
    ///
    /// Returns an error if a name is declared twice or a prerequisite
    /// references an undeclared capability.
    pub fn build(self) -> Result<DependencyGraph> {
        let mut index = HashMap::new();
        for (i, (name, _)) in self.nodes.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(KitupError::ConfigValidationError {
                    message: format!("Capability '{}' is declared more than once", name),
                });
            }
        }

        let mut prerequisites = vec![Vec::new(); self.nodes.len()];
        let mut dependents = vec![Vec::new(); self.nodes.len()];

        for (i, (name, deps)) in self.nodes.iter().enumerate() {
            for dep in deps {
                let Some(&d) = index.get(dep) else {
                    return Err(KitupError::ConfigValidationError {
                        message: format!(
                            "Capability '{}' requires unknown capability '{}'",
                            name, dep
                        ),
                    });
                };
                if !prerequisites[i].contains(&d) {
                    prerequisites[i].push(d);
                    dependents[d].push(i);
                }
            }
        }

        Ok(DependencyGraph {
            order: self.nodes.into_iter().map(|(name, _)| name).collect(),
            index,
            prerequisites,
            dependents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn builder_creates_empty_graph() {
        let graph = DependencyGraph::builder().build().unwrap();
        assert!(graph.is_empty());
        assert!(graph.topological_order().unwrap().is_empty());
    }

    #[test]
    fn builder_tracks_prerequisites() {
        let graph = DependencyGraph::builder()
            .add_node("python311", vec![])
            .add_node("uv", deps(&["python311"]))
            .build()
            .unwrap();

        assert!(graph.contains("uv"));
        assert_eq!(graph.prerequisites_of("uv"), vec!["python311"]);
        assert!(graph.prerequisites_of("python311").is_empty());
    }

    #[test]
    fn builder_rejects_unknown_prerequisite() {
        let result = DependencyGraph::builder()
            .add_node("uv", deps(&["python311"]))
            .build();

        assert!(matches!(
            result,
            Err(KitupError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn builder_rejects_duplicate_names() {
        let result = DependencyGraph::builder()
            .add_node("git", vec![])
            .add_node("git", vec![])
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn independent_nodes_keep_declaration_order() {
        let graph = DependencyGraph::builder()
            .add_node("zeta", vec![])
            .add_node("alpha", vec![])
            .add_node("mid", vec![])
            .build()
            .unwrap();

        assert_eq!(
            graph.topological_order().unwrap(),
            vec!["zeta", "alpha", "mid"]
        );
    }

    #[test]
    fn prerequisite_declared_later_moves_first() {
        let graph = DependencyGraph::builder()
            .add_node("uv", deps(&["python311"]))
            .add_node("git", vec![])
            .add_node("python311", vec![])
            .build()
            .unwrap();

        assert_eq!(
            graph.topological_order().unwrap(),
            vec!["git", "python311", "uv"]
        );
    }

    #[test]
    fn released_dependent_does_not_jump_earlier_declared_ready_node() {
        // b becomes ready after a; c was declared before b and is already
        // ready, so it comes first.
        let graph = DependencyGraph::builder()
            .add_node("a", vec![])
            .add_node("c", vec![])
            .add_node("b", deps(&["a"]))
            .build()
            .unwrap();

        assert_eq!(graph.topological_order().unwrap(), vec!["a", "c", "b"]);
    }

    #[test]
    fn diamond_dependency() {
        let graph = DependencyGraph::builder()
            .add_node("a", vec![])
            .add_node("b", deps(&["a"]))
            .add_node("c", deps(&["a"]))
            .add_node("d", deps(&["b", "c"]))
            .build()
            .unwrap();

        assert_eq!(
            graph.topological_order().unwrap(),
            vec!["a", "b", "c", "d"]
        );
    }

    #[test]
    fn order_is_stable_across_calls() {
        let graph = DependencyGraph::builder()
            .add_node("brew", vec![])
            .add_node("node", deps(&["brew"]))
            .add_node("git", deps(&["brew"]))
            .add_node("docker", deps(&["brew"]))
            .build()
            .unwrap();

        let first = graph.topological_order().unwrap();
        for _ in 0..10 {
            assert_eq!(graph.topological_order().unwrap(), first);
        }
    }

    #[test]
    fn detects_simple_cycle() {
        let graph = DependencyGraph::builder()
            .add_node("a", deps(&["b"]))
            .add_node("b", deps(&["a"]))
            .build()
            .unwrap();

        let err = graph.topological_order().unwrap_err();
        match err {
            KitupError::CircularDependency { cycle } => {
                assert_eq!(cycle, "a -> b -> a");
            }
            other => panic!("expected CircularDependency, got {:?}", other),
        }
    }

    #[test]
    fn detects_self_cycle() {
        let graph = DependencyGraph::builder()
            .add_node("a", deps(&["a"]))
            .build()
            .unwrap();

        assert_eq!(graph.find_cycle(), Some(deps(&["a", "a"])));
    }

    #[test]
    fn no_cycle_returns_none() {
        let graph = DependencyGraph::builder()
            .add_node("a", vec![])
            .add_node("b", deps(&["a"]))
            .build()
            .unwrap();

        assert!(graph.find_cycle().is_none());
    }

    #[test]
    fn transitive_prerequisites_follow_chain() {
        let graph = DependencyGraph::builder()
            .add_node("brew", vec![])
            .add_node("python311", deps(&["brew"]))
            .add_node("uv", deps(&["python311"]))
            .build()
            .unwrap();

        let all = graph.transitive_prerequisites("uv");
        assert!(all.contains("python311"));
        assert!(all.contains("brew"));
        assert_eq!(all.len(), 2);
        assert!(graph.transitive_prerequisites("missing").is_empty());
    }
}
