//! Deterministic rendering of module dependency graphs.
//!
//! [`RenderedGraph`] fixes the presentation: nodes are indexed in
//! lexicographic order of their module paths, edges are sorted by source then
//! target, and every node carries exactly one [`ModuleClass`]. Renderers for
//! Mermaid, Graphviz DOT and JSON only format that structure, so the same
//! module graph always produces byte-identical output.

pub mod dot;
pub mod json;
pub mod mermaid;

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

use crate::analysis::Analysis;
use crate::graph::{ModuleGraph, ModuleUniverse};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderFormat {
    /// Mermaid flowchart
    #[default]
    Mermaid,
    /// Graphviz DOT
    Dot,
    /// JSON - machine-readable, full data
    Json,
}

impl std::str::FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mermaid" | "mmd" => Ok(RenderFormat::Mermaid),
            "dot" | "graphviz" => Ok(RenderFormat::Dot),
            "json" => Ok(RenderFormat::Json),
            _ => Err(format!(
                "Unknown output format: '{}'. Valid formats: mermaid, dot, json",
                s
            )),
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderFormat::Mermaid => write!(f, "mermaid"),
            RenderFormat::Dot => write!(f, "dot"),
            RenderFormat::Json => write!(f, "json"),
        }
    }
}

/// Classification of a module in the rendered graph.
///
/// Variants are declared in precedence order: a module that qualifies for
/// several classes gets the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleClass {
    /// The main (root) module.
    Main,
    /// Reachable only when test sources are loaded.
    TestOnly,
    /// Any other dependency.
    Regular,
}

impl ModuleClass {
    /// Picks the class for a module, main taking precedence over test-only.
    pub fn classify(is_main: bool, is_test_only: bool) -> Self {
        if is_main {
            ModuleClass::Main
        } else if is_test_only {
            ModuleClass::TestOnly
        } else {
            ModuleClass::Regular
        }
    }

    /// Style class name used in diagram output.
    pub fn class_name(&self) -> &'static str {
        match self {
            ModuleClass::Main => "mainmod",
            ModuleClass::TestOnly => "testonly",
            ModuleClass::Regular => "regular",
        }
    }

    /// Fill colour for the class.
    pub fn fill(&self) -> &'static str {
        match self {
            ModuleClass::Main => "#ddeeff",
            ModuleClass::TestOnly => "#ffdddd",
            ModuleClass::Regular => "#f5f5f5",
        }
    }
}

impl fmt::Display for ModuleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleClass::Main => write!(f, "main"),
            ModuleClass::TestOnly => write!(f, "test-only"),
            ModuleClass::Regular => write!(f, "regular"),
        }
    }
}

/// A module with its stable index and class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNode {
    /// Position in lexicographic order of module paths.
    pub index: usize,
    /// Full module path.
    pub module: String,
    /// Classification.
    pub class: ModuleClass,
}

/// An ordered, indexed and classified snapshot of a module graph.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeSet;
/// use testdeps::graph::{ModuleGraph, ModuleUniverse};
/// use testdeps::render::{ModuleClass, RenderedGraph};
///
/// let mut graph = ModuleGraph::new();
/// graph.add_edge("b", "a");
/// graph.add_edge("b", "c");
///
/// let mains: BTreeSet<String> = ["b".to_string()].into();
/// let test_only: ModuleUniverse = ["c"].into_iter().collect();
/// let rendered = RenderedGraph::new(&graph, &mains, &test_only);
///
/// assert_eq!(rendered.edges(), &[(1, 0), (1, 2)]);
/// assert_eq!(rendered.members(ModuleClass::TestOnly), vec![2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedGraph {
    nodes: Vec<RenderedNode>,
    edges: Vec<(usize, usize)>,
}

impl RenderedGraph {
    /// Indexes and classifies `graph`.
    pub fn new(
        graph: &ModuleGraph,
        main_modules: &BTreeSet<String>,
        test_only: &ModuleUniverse,
    ) -> Self {
        let nodes: Vec<RenderedNode> = graph
            .module_paths()
            .into_iter()
            .enumerate()
            .map(|(index, module)| RenderedNode {
                index,
                module: module.to_string(),
                class: ModuleClass::classify(
                    main_modules.contains(module),
                    test_only.contains(module),
                ),
            })
            .collect();

        let indices: HashMap<&str, usize> = nodes
            .iter()
            .map(|node| (node.module.as_str(), node.index))
            .collect();

        // edges() is sorted by (source, target) path, which matches index order
        let edges = graph
            .edges()
            .into_iter()
            .filter_map(|(from, to)| Some((*indices.get(from)?, *indices.get(to)?)))
            .collect();

        Self { nodes, edges }
    }

    /// Builds the rendered graph for an analysis result.
    pub fn from_analysis(analysis: &Analysis) -> Self {
        Self::new(&analysis.graph, &analysis.main_modules, &analysis.test_only)
    }

    /// Nodes in index order.
    pub fn nodes(&self) -> &[RenderedNode] {
        &self.nodes
    }

    /// Edges as index pairs, grouped by source and sorted.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Indices of the nodes in `class`, ascending.
    pub fn members(&self, class: ModuleClass) -> Vec<usize> {
        self.nodes
            .iter()
            .filter(|node| node.class == class)
            .map(|node| node.index)
            .collect()
    }

    /// Number of nodes in `class`.
    pub fn count(&self, class: ModuleClass) -> usize {
        self.nodes.iter().filter(|node| node.class == class).count()
    }
}

/// Trait for renderers.
pub trait Renderer {
    /// Render the graph to the given writer.
    fn render<W: Write>(&self, graph: &RenderedGraph, writer: &mut W) -> io::Result<()>;
}

/// Render a graph in the specified format.
pub fn render<W: Write>(
    format: RenderFormat,
    graph: &RenderedGraph,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        RenderFormat::Mermaid => mermaid::MermaidRenderer.render(graph, writer),
        RenderFormat::Dot => dot::DotRenderer.render(graph, writer),
        RenderFormat::Json => json::JsonRenderer.render(graph, writer),
    }
}

/// Render a graph to a string.
pub fn render_to_string(format: RenderFormat, graph: &RenderedGraph) -> io::Result<String> {
    let mut buffer = Vec::new();
    render(format, graph, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mains(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_format_from_str() {
        assert_eq!("mermaid".parse::<RenderFormat>().unwrap(), RenderFormat::Mermaid);
        assert_eq!("MMD".parse::<RenderFormat>().unwrap(), RenderFormat::Mermaid);
        assert_eq!("dot".parse::<RenderFormat>().unwrap(), RenderFormat::Dot);
        assert_eq!("graphviz".parse::<RenderFormat>().unwrap(), RenderFormat::Dot);
        assert_eq!("json".parse::<RenderFormat>().unwrap(), RenderFormat::Json);
        assert!("svg".parse::<RenderFormat>().is_err());
    }

    #[test]
    fn test_render_format_display() {
        assert_eq!(RenderFormat::Mermaid.to_string(), "mermaid");
        assert_eq!(RenderFormat::Dot.to_string(), "dot");
        assert_eq!(RenderFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_classification_precedence() {
        assert_eq!(ModuleClass::classify(true, true), ModuleClass::Main);
        assert_eq!(ModuleClass::classify(true, false), ModuleClass::Main);
        assert_eq!(ModuleClass::classify(false, true), ModuleClass::TestOnly);
        assert_eq!(ModuleClass::classify(false, false), ModuleClass::Regular);
    }

    #[test]
    fn test_main_module_never_test_only() {
        let mut graph = ModuleGraph::new();
        graph.add_edge("app", "lib");
        let test_only: ModuleUniverse = ["app"].into_iter().collect();
        let rendered = RenderedGraph::new(&graph, &mains(&["app"]), &test_only);
        assert_eq!(rendered.members(ModuleClass::Main), vec![0]);
        assert!(rendered.members(ModuleClass::TestOnly).is_empty());
    }

    #[test]
    fn test_indices_follow_sorted_paths_not_insertion() {
        let mut graph = ModuleGraph::new();
        graph.add_edge("zeta", "alpha");
        graph.add_edge("mid", "zeta");
        graph.add_edge("mid", "alpha");

        let rendered = RenderedGraph::new(&graph, &BTreeSet::new(), &ModuleUniverse::new());
        let names: Vec<&str> = rendered.nodes().iter().map(|n| n.module.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
        assert_eq!(rendered.edges(), &[(1, 0), (1, 2), (2, 0)]);
    }

    #[test]
    fn test_single_main_module() {
        let mut graph = ModuleGraph::new();
        graph.add_module("solo");
        let rendered = RenderedGraph::new(&graph, &mains(&["solo"]), &ModuleUniverse::new());
        assert_eq!(rendered.members(ModuleClass::Main), vec![0]);
        assert_eq!(rendered.count(ModuleClass::Regular), 0);
        assert_eq!(rendered.count(ModuleClass::TestOnly), 0);
    }

    #[test]
    fn test_render_to_string_is_deterministic() {
        let build = |order: &[(&str, &str)]| {
            let mut graph = ModuleGraph::new();
            for (from, to) in order {
                graph.add_edge(from, to);
            }
            RenderedGraph::new(&graph, &mains(&["a"]), &["d"].into_iter().collect())
        };
        let first = build(&[("a", "b"), ("a", "c"), ("c", "d"), ("b", "d")]);
        let second = build(&[("b", "d"), ("c", "d"), ("a", "c"), ("a", "b")]);

        for format in [RenderFormat::Mermaid, RenderFormat::Dot, RenderFormat::Json] {
            assert_eq!(
                render_to_string(format, &first).unwrap(),
                render_to_string(format, &second).unwrap()
            );
        }
    }
}
