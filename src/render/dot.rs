//! Graphviz DOT renderer.

use super::{RenderedGraph, Renderer};
use std::io::{self, Write};

/// DOT renderer implementation.
pub struct DotRenderer;

impl DotRenderer {
    /// Escape a value for a double-quoted DOT string.
    fn escape(value: &str) -> String {
        value.replace('\\', "\\\\").replace('"', "\\\"")
    }
}

impl Renderer for DotRenderer {
    fn render<W: Write>(&self, graph: &RenderedGraph, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "digraph modules {{")?;
        writeln!(writer, "    rankdir=LR;")?;
        writeln!(writer, "    node [shape=box, style=filled, color=\"#333333\"];")?;

        for node in graph.nodes() {
            writeln!(
                writer,
                "    N{} [label=\"{}\", fillcolor=\"{}\", class=\"{}\"];",
                node.index,
                Self::escape(&node.module),
                node.class.fill(),
                node.class.class_name()
            )?;
        }

        for (from, to) in graph.edges() {
            writeln!(writer, "    N{} -> N{};", from, to)?;
        }

        writeln!(writer, "}}")?;
        Ok(())
    }
}
