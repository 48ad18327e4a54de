//! Mermaid flowchart renderer.

use super::{ModuleClass, RenderedGraph, Renderer};
use std::io::{self, Write};

/// Mermaid renderer implementation.
///
/// Only test-only modules are styled; main and regular modules render plain.
pub struct MermaidRenderer;

impl MermaidRenderer {
    /// Escape a label for use inside a double-quoted Mermaid node label.
    fn escape_label(value: &str) -> String {
        value.replace('"', "#quot;")
    }
}

impl Renderer for MermaidRenderer {
    fn render<W: Write>(&self, graph: &RenderedGraph, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "graph LR")?;

        for node in graph.nodes() {
            writeln!(
                writer,
                "    N{}[\"{}\"]",
                node.index,
                Self::escape_label(&node.module)
            )?;
        }

        for (from, to) in graph.edges() {
            writeln!(writer, "    N{} --> N{}", from, to)?;
        }

        let class = ModuleClass::TestOnly;
        let members = graph.members(class);
        if !members.is_empty() {
            writeln!(
                writer,
                "    classDef {} fill:{},stroke:#333,stroke-width:1px;",
                class.class_name(),
                class.fill()
            )?;
            let refs: Vec<String> = members.iter().map(|i| format!("N{}", i)).collect();
            writeln!(writer, "    class {} {};", refs.join(","), class.class_name())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ModuleGraph, ModuleUniverse};
    use std::collections::BTreeSet;

    fn render(graph: &RenderedGraph) -> String {
        let mut out = Vec::new();
        MermaidRenderer.render(graph, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_scenario_output() {
        let mut graph = ModuleGraph::new();
        graph.add_edge("example.com/app", "example.com/lib");
        graph.add_edge("example.com/app", "example.com/testtool");

        let mains: BTreeSet<String> = ["example.com/app".to_string()].into();
        let test_only: ModuleUniverse = ["example.com/testtool"].into_iter().collect();
        let out = render(&RenderedGraph::new(&graph, &mains, &test_only));

        let expected = "\
graph LR
    N0[\"example.com/app\"]
    N1[\"example.com/lib\"]
    N2[\"example.com/testtool\"]
    N0 --> N1
    N0 --> N2
    classDef testonly fill:#ffdddd,stroke:#333,stroke-width:1px;
    class N2 testonly;
";
        assert_eq!(out, expected);
        assert_eq!(out.lines().filter(|l| l.trim_start().starts_with("class ")).count(), 1);
    }

    #[test]
    fn test_single_node_without_edges() {
        let mut graph = ModuleGraph::new();
        graph.add_module("example.com/solo");
        let mains: BTreeSet<String> = ["example.com/solo".to_string()].into();
        let out = render(&RenderedGraph::new(&graph, &mains, &ModuleUniverse::new()));

        assert_eq!(out.lines().filter(|l| l.contains("[\"")).count(), 1);
        assert!(!out.contains("-->"));
        assert!(!out.contains("classDef"));
        assert!(!out.contains("class "));
    }

    #[test]
    fn test_class_members_listed_ascending() {
        let mut graph = ModuleGraph::new();
        graph.add_edge("c", "a");
        graph.add_edge("c", "b");
        let test_only: ModuleUniverse = ["b", "a"].into_iter().collect();
        let out = render(&RenderedGraph::new(&graph, &BTreeSet::new(), &test_only));
        assert!(out.contains("    class N0,N1 testonly;\n"));
        assert!(!out.contains("regular"));
    }

    #[test]
    fn test_main_module_left_out_of_test_only_group() {
        let mut graph = ModuleGraph::new();
        graph.add_edge("app", "check");
        let mains: BTreeSet<String> = ["app".to_string()].into();
        let test_only: ModuleUniverse = ["app", "check"].into_iter().collect();
        let out = render(&RenderedGraph::new(&graph, &mains, &test_only));
        assert!(out.contains("    class N1 testonly;\n"));
        assert!(!out.contains("mainmod"));
    }

    #[test]
    fn test_escape_label() {
        assert_eq!(MermaidRenderer::escape_label("a\"b"), "a#quot;b");
    }
}
