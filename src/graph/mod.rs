//! Graph module for module-level dependency modeling.
//!
//! - [`traverse`] walks a package import graph, visiting each node once.
//! - [`ModuleGraph::project`] collapses packages onto their owning modules.
//! - [`ModuleUniverse`] and [`test_only`] compute which modules only tests reach.
//!
//! # Example
//!
//! ```rust
//! use testdeps::graph::ModuleGraph;
//!
//! let mut graph = ModuleGraph::new();
//! graph.add_edge("example.com/app", "example.com/lib");
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

mod module_graph;
mod traverse;
mod universe;

pub use module_graph::{ModuleGraph, ModuleNode};
pub use traverse::{reachable, traverse, ImportGraph};
pub use universe::{test_only, ModuleUniverse};
