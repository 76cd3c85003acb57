use std::io::Write;

use crate::error::Result;
use crate::geometry::Bounds;
use crate::tree::{GridNode, LayoutNode, LayoutTree};

use super::{LayoutEmitter, format_ratios};

/// Indented plain-text dump of the tree, for debugging.
#[derive(Debug, Clone, Copy)]
pub struct OutlineEmitter {
    pub indent: usize,
}

impl Default for OutlineEmitter {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl OutlineEmitter {
    fn grid(&self, grid: &GridNode, level: usize, out: &mut dyn Write) -> Result<()> {
        writeln!(
            out,
            "{:pad$}grid {} {} heights={} widths={}",
            "",
            grid.label,
            corners(&grid.bounds),
            format_ratios(&grid.height_ratios),
            format_ratios(&grid.width_ratios),
            pad = level * self.indent
        )?;
        for child in &grid.children {
            match child {
                LayoutNode::Grid(inner) => self.grid(inner, level + 1, out)?,
                LayoutNode::Leaf(leaf) => writeln!(
                    out,
                    "{:pad$}leaf {} {}",
                    "",
                    leaf.label,
                    corners(&leaf.bounds),
                    pad = (level + 1) * self.indent
                )?,
            }
        }
        Ok(())
    }
}

fn corners(bounds: &Bounds) -> String {
    format!(
        "({},{})-({},{})",
        bounds.top, bounds.left, bounds.bottom, bounds.right
    )
}

impl LayoutEmitter for OutlineEmitter {
    fn emit(&self, tree: &LayoutTree, out: &mut dyn Write) -> Result<()> {
        self.grid(&tree.root, 0, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_outline() {
        let tree = LayoutTree::parse("aac\nbbc").unwrap();
        let text = OutlineEmitter::default().emit_to_string(&tree).unwrap();
        let expected = "\
grid abc (0,0)-(1,2) heights=[2] widths=[2, 1]
  grid ab (0,0)-(1,1) heights=[1, 1] widths=[2]
    leaf a (0,0)-(0,1)
    leaf b (1,0)-(1,1)
  leaf c (0,2)-(1,2)
";
        assert_eq!(text, expected);
    }
}
