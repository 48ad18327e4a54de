//! JSON renderer.
//!
//! Emits the indexed graph in machine-readable form.

use super::{ModuleClass, RenderedGraph, Renderer};
use serde::Serialize;
use std::io::{self, Write};

/// JSON renderer implementation.
pub struct JsonRenderer;

#[derive(Serialize)]
struct JsonNode<'a> {
    index: usize,
    module: &'a str,
    class: ModuleClass,
}

#[derive(Serialize)]
struct JsonEdge {
    from: usize,
    to: usize,
}

#[derive(Serialize)]
struct JsonSummary {
    modules: usize,
    edges: usize,
    main: usize,
    test_only: usize,
    regular: usize,
}

#[derive(Serialize)]
struct JsonGraph<'a> {
    summary: JsonSummary,
    nodes: Vec<JsonNode<'a>>,
    edges: Vec<JsonEdge>,
}

impl Renderer for JsonRenderer {
    fn render<W: Write>(&self, graph: &RenderedGraph, writer: &mut W) -> io::Result<()> {
        let export = JsonGraph {
            summary: JsonSummary {
                modules: graph.nodes().len(),
                edges: graph.edges().len(),
                main: graph.count(ModuleClass::Main),
                test_only: graph.count(ModuleClass::TestOnly),
                regular: graph.count(ModuleClass::Regular),
            },
            nodes: graph
                .nodes()
                .iter()
                .map(|n| JsonNode {
                    index: n.index,
                    module: &n.module,
                    class: n.class,
                })
                .collect(),
            edges: graph
                .edges()
                .iter()
                .map(|&(from, to)| JsonEdge { from, to })
                .collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &export)
            .map_err(io::Error::other)?;
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ModuleGraph, ModuleUniverse};
    use std::collections::BTreeSet;

    #[test]
    fn test_json_output() {
        let mut graph = ModuleGraph::new();
        graph.add_edge("app", "check");
        let mains: BTreeSet<String> = ["app".to_string()].into();
        let test_only: ModuleUniverse = ["check"].into_iter().collect();
        let rendered = RenderedGraph::new(&graph, &mains, &test_only);

        let mut out = Vec::new();
        JsonRenderer.render(&rendered, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["summary"]["modules"], 2);
        assert_eq!(value["summary"]["test_only"], 1);
        assert_eq!(value["nodes"][0]["module"], "app");
        assert_eq!(value["nodes"][0]["class"], "main");
        assert_eq!(value["nodes"][1]["class"], "test_only");
        assert_eq!(value["edges"][0]["from"], 0);
        assert_eq!(value["edges"][0]["to"], 1);
    }
}
