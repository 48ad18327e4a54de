//! Visit-once traversal over an opaque import graph.

use std::collections::HashSet;
use std::hash::Hash;

/// Read-only view of a package import graph.
///
/// Implemented by whatever the resolver hands back; the traversal and
/// projection code only ever go through this trait.
pub trait ImportGraph {
    /// Node identity, used as the visited-set key.
    type Node: Copy + Eq + Hash;

    /// Owning module path of `node`, or `None` if it has no module.
    fn module_of(&self, node: Self::Node) -> Option<&str>;

    /// True if `node` belongs to the main module.
    fn is_main_module(&self, node: Self::Node) -> bool;

    /// Direct imports of `node`. `None` entries are unresolved placeholders.
    fn imports(&self, node: Self::Node) -> &[Option<Self::Node>];
}

/// Calls `visit` exactly once for every node reachable from `roots`.
///
/// Uses a LIFO work list. Imports are pushed without a membership check;
/// the visited set is consulted when a node is popped, which keeps cycles
/// and diamonds from being visited twice.
///
/// Returns the number of distinct nodes visited.
pub fn traverse<G, F>(graph: &G, roots: &[G::Node], mut visit: F) -> usize
where
    G: ImportGraph + ?Sized,
    F: FnMut(G::Node),
{
    let mut seen: HashSet<G::Node> = HashSet::new();
    let mut stack: Vec<G::Node> = roots.iter().rev().copied().collect();

    while let Some(node) = stack.pop() {
        if !seen.insert(node) {
            continue;
        }
        visit(node);
        stack.extend(graph.imports(node).iter().rev().flatten().copied());
    }

    seen.len()
}

/// Collects every node reachable from `roots`, in visit order.
pub fn reachable<G>(graph: &G, roots: &[G::Node]) -> Vec<G::Node>
where
    G: ImportGraph + ?Sized,
{
    let mut nodes = Vec::new();
    traverse(graph, roots, |node| nodes.push(node));
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{ModuleInfo, PackageGraph, PackageId};
    use std::collections::HashMap;

    fn chain(names: &[&str]) -> (PackageGraph, Vec<PackageId>) {
        let mut graph = PackageGraph::new();
        let ids: Vec<_> = names
            .iter()
            .map(|name| graph.add_package(name, Some(ModuleInfo::new(*name))))
            .collect();
        (graph, ids)
    }

    fn visit_counts(graph: &PackageGraph) -> HashMap<PackageId, usize> {
        let mut counts = HashMap::new();
        traverse(graph, graph.roots(), |id| *counts.entry(id).or_insert(0) += 1);
        counts
    }

    #[test]
    fn test_root_without_imports() {
        let (mut graph, ids) = chain(&["a"]);
        graph.add_root(ids[0]);
        let counts = visit_counts(&graph);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&ids[0]], 1);
    }

    #[test]
    fn test_diamond_visited_once() {
        let (mut graph, ids) = chain(&["top", "left", "right", "bottom"]);
        graph.add_import(ids[0], Some(ids[1]));
        graph.add_import(ids[0], Some(ids[2]));
        graph.add_import(ids[1], Some(ids[3]));
        graph.add_import(ids[2], Some(ids[3]));
        graph.add_root(ids[0]);

        let counts = visit_counts(&graph);
        assert_eq!(counts.len(), 4);
        assert!(counts.values().all(|&c| c == 1));
    }

    #[test]
    fn test_cycles_terminate() {
        let (mut graph, ids) = chain(&["a", "b"]);
        graph.add_import(ids[0], Some(ids[1]));
        graph.add_import(ids[1], Some(ids[0]));
        graph.add_import(ids[1], Some(ids[1]));
        graph.add_root(ids[0]);
        graph.add_root(ids[1]);

        let counts = visit_counts(&graph);
        assert_eq!(counts.len(), 2);
        assert!(counts.values().all(|&c| c == 1));
        assert_eq!(traverse(&graph, graph.roots(), |_| {}), 2);
    }

    #[test]
    fn test_placeholders_skipped() {
        let (mut graph, ids) = chain(&["a", "b"]);
        graph.add_import(ids[0], None);
        graph.add_import(ids[0], Some(ids[1]));
        graph.add_root(ids[0]);
        assert_eq!(reachable(&graph, graph.roots()), vec![ids[0], ids[1]]);
    }

    #[test]
    fn test_unreachable_nodes_not_visited() {
        let (mut graph, ids) = chain(&["a", "b", "orphan"]);
        graph.add_import(ids[0], Some(ids[1]));
        graph.add_root(ids[0]);
        let nodes = reachable(&graph, graph.roots());
        assert!(!nodes.contains(&ids[2]));
    }

    #[test]
    fn test_no_roots() {
        let (graph, _) = chain(&["a"]);
        assert_eq!(traverse(&graph, &[], |_| panic!("nothing to visit")), 0);
    }
}
