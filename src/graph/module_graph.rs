//! Module-level dependency graph using petgraph.
//!
//! Package imports are projected onto the modules that own the packages:
//! one node per module, one edge per ordered pair of distinct modules with
//! at least one import between them.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};

use super::traverse::{traverse, ImportGraph};

/// A node in the module graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNode {
    /// Canonical module path (version-independent).
    pub path: String,
}

impl ModuleNode {
    /// Creates a new module node.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// A simple directed graph of module dependencies.
///
/// Edges point from the importing module to the imported one. The graph
/// never holds self-loops, parallel edges or empty module paths.
///
/// # Example
///
/// ```rust
/// use testdeps::graph::ModuleGraph;
///
/// let mut graph = ModuleGraph::new();
/// graph.add_edge("example.com/app", "example.com/lib");
/// graph.add_edge("example.com/app", "example.com/lib");
/// graph.add_edge("example.com/app", "example.com/app");
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    /// The underlying directed graph
    graph: DiGraph<ModuleNode, ()>,
    /// Maps module paths to their node indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
}

impl ModuleGraph {
    /// Creates a new empty module graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new graph with pre-allocated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    /// Projects the packages reachable from `roots` onto their modules.
    ///
    /// Packages without a module are skipped entirely, as are imports that
    /// resolve to no module or stay inside the importer's module.
    ///
    /// # Example
    ///
    /// ```rust
    /// use testdeps::graph::ModuleGraph;
    /// use testdeps::resolver::{ModuleInfo, PackageGraph};
    ///
    /// let mut pkgs = PackageGraph::new();
    /// let app = pkgs.add_package("example.com/app", Some(ModuleInfo::main("example.com/app")));
    /// let util = pkgs.add_package("example.com/app/util", Some(ModuleInfo::main("example.com/app")));
    /// let lib = pkgs.add_package("example.com/lib/v2", Some(ModuleInfo::new("example.com/lib")));
    /// pkgs.add_import(app, Some(util));
    /// pkgs.add_import(util, Some(lib));
    /// pkgs.add_root(app);
    ///
    /// let graph = ModuleGraph::project(&pkgs, pkgs.roots());
    /// assert_eq!(graph.module_paths(), vec!["example.com/app", "example.com/lib"]);
    /// assert!(graph.has_edge("example.com/app", "example.com/lib"));
    /// ```
    pub fn project<G>(packages: &G, roots: &[G::Node]) -> Self
    where
        G: ImportGraph + ?Sized,
    {
        let mut graph = Self::new();
        traverse(packages, roots, |pkg| {
            let Some(from) = packages.module_of(pkg) else {
                return;
            };
            graph.add_module(from);
            for import in packages.imports(pkg).iter().flatten() {
                match packages.module_of(*import) {
                    Some(to) if to != from => {
                        graph.add_edge(from, to);
                    }
                    _ => {}
                }
            }
        });
        graph
    }

    /// Adds a module node, returning its index.
    ///
    /// Returns `None` for an empty path. Existing modules keep their index.
    pub fn add_module(&mut self, path: &str) -> Option<NodeIndex> {
        if path.is_empty() {
            return None;
        }
        if let Some(&idx) = self.node_indices.get(path) {
            return Some(idx);
        }

        let idx = self.graph.add_node(ModuleNode::new(path));
        self.node_indices.insert(path.to_string(), idx);
        Some(idx)
    }

    /// Adds the edge `from -> to`, creating both modules if needed.
    ///
    /// Returns `false` for self-edges and empty paths. Repeated edges are
    /// collapsed into one.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return false;
        }
        let (Some(from_idx), Some(to_idx)) = (self.add_module(from), self.add_module(to)) else {
            return false;
        };

        self.graph.update_edge(from_idx, to_idx, ());
        true
    }

    /// Gets a module node by path.
    pub fn get_node(&self, path: &str) -> Option<&ModuleNode> {
        self.node_indices
            .get(path)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Returns true if the module is in the graph.
    pub fn contains(&self, path: &str) -> bool {
        self.node_indices.contains_key(path)
    }

    /// Returns true if the edge `from -> to` exists.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_indices.get(from), self.node_indices.get(to)) {
            (Some(&a), Some(&b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    /// Modules that `path` depends on directly, sorted.
    pub fn dependencies_of(&self, path: &str) -> Vec<&str> {
        self.neighbors(path, Direction::Outgoing)
    }

    /// Modules that depend on `path` directly, sorted.
    pub fn dependents_of(&self, path: &str) -> Vec<&str> {
        self.neighbors(path, Direction::Incoming)
    }

    fn neighbors(&self, path: &str, direction: Direction) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(path) else {
            return Vec::new();
        };
        let mut names: Vec<&str> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].path.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// All module paths in lexicographic order.
    pub fn module_paths(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.node_indices.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// All edges as `(from, to)` pairs, sorted by source then target.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.graph
            .raw_edges()
            .iter()
            .map(|e| {
                (
                    self.graph[e.source()].path.as_str(),
                    self.graph[e.target()].path.as_str(),
                )
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Returns the number of modules.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true if the graph has no modules.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}
