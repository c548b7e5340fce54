//! Static reference graph over bean definitions.
//!
//! Used at load time to reject cycles and to order singleton construction so
//! that every bean is built after everything it references.

use std::collections::HashMap;

use crate::error::ConfigError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Dependency edges keyed by bean id, in declaration order.
pub(crate) struct DependencyGraph<'a> {
    nodes: Vec<&'a str>,
    edges: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> DependencyGraph<'a> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: HashMap::new(),
        }
    }

    /// Adds a node with its outgoing edges. Targets must already be canonical ids.
    pub(crate) fn add(&mut self, id: &'a str, deps: Vec<&'a str>) {
        self.nodes.push(id);
        self.edges.insert(id, deps);
    }

    /// Depth-first post-order over all nodes: dependencies come before their
    /// dependents, ties broken by declaration order.
    ///
    /// Fails with the offending path when a cycle is found, e.g.
    /// `a -> b -> c -> a`.
    ///
    /// The walk keeps its own stack, so chain length is bounded by memory,
    /// not by the thread's call stack.
    pub(crate) fn topological_order(&self) -> Result<Vec<&'a str>, ConfigError> {
        let mut marks: HashMap<&'a str, Mark> = self.nodes.iter().map(|&n| (n, Mark::Unvisited)).collect();
        let mut order = Vec::with_capacity(self.nodes.len());
        // (node, index of the next edge to follow); always the current DFS path
        let mut stack: Vec<(&'a str, usize)> = Vec::new();

        for &root in &self.nodes {
            if marks.get(root) != Some(&Mark::Unvisited) {
                continue;
            }
            marks.insert(root, Mark::InProgress);
            stack.push((root, 0));

            while let Some((node, next)) = stack.last_mut() {
                let node = *node;
                let Some(&dep) = self.edges_of(node).get(*next) else {
                    stack.pop();
                    marks.insert(node, Mark::Done);
                    order.push(node);
                    continue;
                };
                *next += 1;

                match marks.get(dep).copied().unwrap_or(Mark::Done) {
                    Mark::Done => {}
                    Mark::InProgress => return Err(cycle_through(&stack, dep)),
                    Mark::Unvisited => {
                        marks.insert(dep, Mark::InProgress);
                        stack.push((dep, 0));
                    }
                }
            }
        }
        Ok(order)
    }

    fn edges_of(&self, node: &str) -> &[&'a str] {
        self.edges.get(node).map(Vec::as_slice).unwrap_or_default()
    }
}

/// The cycle closed by an edge back to `dep`, which is on the current path.
fn cycle_through(path: &[(&str, usize)], dep: &str) -> ConfigError {
    let start = path.iter().position(|&(n, _)| n == dep).unwrap_or(0);
    let mut cycle: Vec<String> = path[start..].iter().map(|(n, _)| n.to_string()).collect();
    cycle.push(dep.to_string());
    ConfigError::Cycle(cycle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_come_first() {
        let mut graph = DependencyGraph::new();
        graph.add("developer", vec!["computer", "desk"]);
        graph.add("computer", vec!["desk"]);
        graph.add("desk", vec![]);

        assert_eq!(graph.topological_order().unwrap(), vec!["desk", "computer", "developer"]);
    }

    #[test]
    fn independent_nodes_keep_declaration_order() {
        let mut graph = DependencyGraph::new();
        graph.add("b", vec![]);
        graph.add("a", vec![]);
        graph.add("c", vec![]);

        assert_eq!(graph.topological_order().unwrap(), vec!["b", "a", "c"]);
    }

    #[test]
    fn cycle_reports_path() {
        let mut graph = DependencyGraph::new();
        graph.add("root", vec!["a"]);
        graph.add("a", vec!["b"]);
        graph.add("b", vec!["c"]);
        graph.add("c", vec!["a"]);

        match graph.topological_order() {
            Err(ConfigError::Cycle(path)) => assert_eq!(path, vec!["a", "b", "c", "a"]),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn long_chain_does_not_exhaust_the_stack() {
        let ids: Vec<String> = (0..50_000).map(|i| format!("n{i}")).collect();
        let mut graph = DependencyGraph::new();
        // Dependent-first, so the whole chain is one walk from the first root
        for i in (0..ids.len()).rev() {
            let deps = if i == 0 { vec![] } else { vec![ids[i - 1].as_str()] };
            graph.add(ids[i].as_str(), deps);
        }

        let order = graph.topological_order().unwrap();
        assert_eq!(order.len(), ids.len());
        assert_eq!(order[0], "n0");
        assert_eq!(order[ids.len() - 1], "n49999");
    }

    #[test]
    fn cycle_at_the_end_of_a_long_chain() {
        let ids: Vec<String> = (0..20_000).map(|i| format!("n{i}")).collect();
        let mut graph = DependencyGraph::new();
        for i in 0..ids.len() {
            let next = (i + 1) % ids.len();
            graph.add(ids[i].as_str(), vec![ids[next].as_str()]);
        }

        match graph.topological_order() {
            Err(ConfigError::Cycle(path)) => {
                assert_eq!(path.len(), ids.len() + 1);
                assert_eq!(path.first(), path.last());
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }
}
