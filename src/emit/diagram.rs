//! TikZ tree markup for the enclosure hierarchy.
//!
//! Output has two parts: a preamble of `\definecolor` lines and a single
//! `\node ... child{...} ;` statement. Nodes folded by the depth cutoff do
//! not appear; their drawn descendants hang off the nearest drawn ancestor.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::overlay::DisplayColor;

/// One explicit node of the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramNode {
    /// TikZ color name, unique per diagram.
    pub color_name: String,
    /// Fill color.
    pub color: DisplayColor,
    /// Node scale (visual weight).
    pub scale: f64,
    /// Pattern overlay, if any.
    pub pattern: Option<String>,
    /// Drawn descendants attached to this node.
    pub children: Vec<DiagramNode>,
}

/// Rendered diagram markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramMarkup {
    /// `\definecolor` lines, one per node.
    pub preamble: String,
    /// The tree statement.
    pub tree: String,
    /// Number of explicit nodes.
    pub node_count: usize,
}

impl DiagramMarkup {
    /// Render `root` and its drawn descendants with the given node style.
    pub fn render(root: &DiagramNode, style: &str) -> Self {
        let mut markup = Self::default();
        markup.tree.push('\\');
        write_node(root, style, &mut markup);
        markup.tree.push_str(" ;");
        markup
    }
}

fn write_node(node: &DiagramNode, style: &str, out: &mut DiagramMarkup) {
    // Writing into a String never fails.
    let _ = writeln!(
        out.preamble,
        "\\definecolor{{{}}}{{RGB}}{{{}}}",
        node.color_name, node.color
    );
    let _ = write!(out.tree, "node [{},{}, scale={:.4}", style, node.color_name, node.scale);
    if let Some(pattern) = &node.pattern {
        let _ = write!(out.tree, ", pattern={pattern}");
    }
    out.tree.push_str("] {}");
    out.node_count += 1;

    for child in &node.children {
        out.tree.push_str(" child{");
        write_node(child, style, out);
        out.tree.push('}');
    }
}
