use serde::Serialize;

use crate::error::{LayoutError, Result};
use crate::geometry::{Axis, Bounds};
use crate::grid::Region;

/// A node of the layout tree: a named region or a grid of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutNode {
    Leaf(Leaf),
    Grid(GridNode),
}

impl LayoutNode {
    pub fn label(&self) -> &str {
        match self {
            LayoutNode::Leaf(leaf) => &leaf.label,
            LayoutNode::Grid(grid) => &grid.label,
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            LayoutNode::Leaf(leaf) => leaf.bounds,
            LayoutNode::Grid(grid) => grid.bounds,
        }
    }

    pub fn width(&self) -> usize {
        self.bounds().width()
    }

    pub fn height(&self) -> usize {
        self.bounds().height()
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, LayoutNode::Leaf(_))
    }

    pub fn as_grid(&self) -> Option<&GridNode> {
        match self {
            LayoutNode::Grid(grid) => Some(grid),
            LayoutNode::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            LayoutNode::Leaf(leaf) => Some(leaf),
            LayoutNode::Grid(_) => None,
        }
    }

    pub(crate) fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Leaf>) {
        match self {
            LayoutNode::Leaf(leaf) => out.push(leaf),
            LayoutNode::Grid(grid) => grid.collect_leaves(out),
        }
    }

    pub(crate) fn depth(&self) -> usize {
        match self {
            LayoutNode::Leaf(_) => 0,
            LayoutNode::Grid(grid) => grid.depth(),
        }
    }
}

/// One labelled region of the art.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leaf {
    pub label: String,
    pub bounds: Bounds,
}

impl From<Region> for Leaf {
    fn from(region: Region) -> Self {
        Self {
            label: region.label.to_string(),
            bounds: region.bounds,
        }
    }
}

/// A uniform grid of `height_ratios.len()` rows by `width_ratios.len()`
/// columns. Ratios are the row heights and column widths in art cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridNode {
    /// Concatenated labels of every leaf underneath; identification only.
    pub label: String,
    pub bounds: Bounds,
    pub height_ratios: Vec<usize>,
    pub width_ratios: Vec<usize>,
    pub children: Vec<LayoutNode>,
}

impl From<Region> for GridNode {
    /// 1×1 grid wrapping a single leaf.
    fn from(region: Region) -> Self {
        let bounds = region.bounds;
        Self {
            label: region.label.to_string(),
            bounds,
            height_ratios: vec![bounds.height()],
            width_ratios: vec![bounds.width()],
            children: vec![LayoutNode::Leaf(region.into())],
        }
    }
}

impl GridNode {
    pub fn rows(&self) -> usize {
        self.height_ratios.len()
    }

    pub fn cols(&self) -> usize {
        self.width_ratios.len()
    }

    pub fn width(&self) -> usize {
        self.bounds.width()
    }

    pub fn height(&self) -> usize {
        self.bounds.height()
    }

    /// Axis along which `other` can be appended as a new row or column.
    ///
    /// Stacking needs identical column ratios, side-by-side placement
    /// needs identical row ratios.
    pub fn expand_axis(&self, other: &GridNode) -> Option<Axis> {
        match self.bounds.alignment(&other.bounds)? {
            Axis::Vertical if self.width_ratios == other.width_ratios => Some(Axis::Vertical),
            Axis::Horizontal if self.height_ratios == other.height_ratios => {
                Some(Axis::Horizontal)
            }
            _ => None,
        }
    }

    pub fn can_expand(&self, other: &GridNode) -> bool {
        self.expand_axis(other).is_some()
    }

    pub fn can_merge(&self, other: &GridNode) -> bool {
        self.bounds.alignment(&other.bounds).is_some()
    }

    /// Grow this grid by the rows or columns of `other`, without nesting.
    ///
    /// Children and ratios are concatenated in grid order, whichever side
    /// `other` lies on.
    pub fn expand(self, other: GridNode) -> Result<GridNode> {
        let Some(axis) = self.expand_axis(&other) else {
            return Err(incompatible("expand", &self, &other));
        };
        let (first, second) = positional(self, other);

        let (height_ratios, width_ratios) = match axis {
            Axis::Vertical => (
                concat(&first.height_ratios, &second.height_ratios),
                first.width_ratios,
            ),
            Axis::Horizontal => (
                first.height_ratios,
                concat(&first.width_ratios, &second.width_ratios),
            ),
        };

        let mut children = first.children;
        children.extend(second.children);

        Ok(GridNode {
            label: first.label + &second.label,
            bounds: first.bounds.union(&second.bounds),
            height_ratios,
            width_ratios,
            children,
        })
    }

    /// Join two adjacent nodes into a new two-cell grid, one level deeper.
    /// The upper or left node becomes the first cell.
    pub fn merge(self, other: GridNode) -> Result<GridNode> {
        let Some(axis) = self.bounds.alignment(&other.bounds) else {
            return Err(incompatible("merge", &self, &other));
        };
        let (first, second) = positional(self, other);

        let (height_ratios, width_ratios) = match axis {
            Axis::Vertical => (vec![first.height(), second.height()], vec![first.width()]),
            Axis::Horizontal => (vec![first.height()], vec![first.width(), second.width()]),
        };

        Ok(GridNode {
            label: format!("{}{}", first.label, second.label),
            bounds: first.bounds.union(&second.bounds),
            height_ratios,
            width_ratios,
            children: vec![first.into_cell(), second.into_cell()],
        })
    }

    /// Node to place as a cell of an enclosing grid. A 1×1 wrapper around a
    /// leaf is unwrapped to the leaf itself.
    pub fn into_cell(mut self) -> LayoutNode {
        if self.children.len() == 1 && self.children[0].is_leaf() {
            if let Some(child) = self.children.pop() {
                return child;
            }
        }
        LayoutNode::Grid(self)
    }

    pub(crate) fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Leaf>) {
        for child in &self.children {
            child.collect_leaves(out);
        }
    }

    /// Number of grid levels, counting this one.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(LayoutNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Number of grid nodes in this subtree, counting this one.
    pub fn grid_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .filter_map(LayoutNode::as_grid)
            .map(GridNode::grid_count)
            .sum::<usize>()
    }
}

/// Order two adjacent nodes by (top, left) so ratio lists stay positional.
fn positional(a: GridNode, b: GridNode) -> (GridNode, GridNode) {
    if (b.bounds.top, b.bounds.left) < (a.bounds.top, a.bounds.left) {
        (b, a)
    } else {
        (a, b)
    }
}

fn concat(first: &[usize], second: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(first.len() + second.len());
    out.extend_from_slice(first);
    out.extend_from_slice(second);
    out
}

fn incompatible(operation: &'static str, first: &GridNode, second: &GridNode) -> LayoutError {
    LayoutError::IncompatibleNodes {
        operation,
        first: first.label.clone(),
        second: second.label.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(label: char, top: usize, left: usize, bottom: usize, right: usize) -> GridNode {
        Region {
            label,
            bounds: Bounds::new(top, left, bottom, right),
        }
        .into()
    }

    #[test]
    fn region_wraps_into_single_cell_grid() {
        let node = wrap('a', 0, 0, 1, 2);
        assert_eq!(node.height_ratios, vec![2]);
        assert_eq!(node.width_ratios, vec![3]);
        assert_eq!(node.children.len(), 1);
        assert!(node.children[0].is_leaf());
    }

    #[test]
    fn expand_side_by_side_appends_column() {
        let a = wrap('a', 0, 0, 1, 0);
        let b = wrap('b', 0, 1, 1, 1);
        assert_eq!(a.expand_axis(&b), Some(Axis::Horizontal));

        let grid = a.expand(b).unwrap();
        assert_eq!(grid.label, "ab");
        assert_eq!(grid.bounds, Bounds::new(0, 0, 1, 1));
        assert_eq!(grid.height_ratios, vec![2]);
        assert_eq!(grid.width_ratios, vec![1, 1]);
        assert!(grid.children.iter().all(LayoutNode::is_leaf));
        assert_eq!(grid.depth(), 1);
    }

    #[test]
    fn expand_requires_matching_cross_ratios() {
        let a = wrap('a', 0, 0, 0, 1);
        let b = wrap('b', 1, 0, 1, 1);
        let stacked = a.expand(b).unwrap();
        assert_eq!(stacked.height_ratios, vec![1, 1]);
        assert_eq!(stacked.width_ratios, vec![2]);

        let c = wrap('c', 0, 2, 1, 2);
        assert!(stacked.can_merge(&c));
        assert!(!stacked.can_expand(&c));
        let err = stacked.expand(c).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::IncompatibleNodes {
                operation: "expand",
                ..
            }
        ));
    }

    #[test]
    fn merge_nests_and_unwraps_leaf_cells() {
        let ab = wrap('a', 0, 0, 0, 1).expand(wrap('b', 1, 0, 1, 1)).unwrap();
        let c = wrap('c', 0, 2, 1, 2);

        let root = ab.merge(c).unwrap();
        assert_eq!(root.label, "abc");
        assert_eq!(root.height_ratios, vec![2]);
        assert_eq!(root.width_ratios, vec![2, 1]);
        assert!(root.children[0].as_grid().is_some());
        assert_eq!(root.children[1].as_leaf().map(|l| l.label.as_str()), Some("c"));
        assert_eq!(root.depth(), 2);
        assert_eq!(root.grid_count(), 2);
    }

    #[test]
    fn merge_rejects_non_adjacent_nodes() {
        let a = wrap('a', 0, 0, 0, 0);
        let b = wrap('b', 1, 1, 1, 1);
        assert!(!a.can_merge(&b));
        assert!(matches!(
            a.merge(b),
            Err(LayoutError::IncompatibleNodes {
                operation: "merge",
                ..
            })
        ));
    }

    #[test]
    fn ratios_follow_position_not_operand_order() {
        let b = wrap('b', 1, 2, 2, 2);
        let ed = wrap('e', 1, 0, 1, 1).expand(wrap('d', 2, 0, 2, 1)).unwrap();
        let merged = b.merge(ed).unwrap();
        assert_eq!(merged.width_ratios, vec![2, 1]);
        assert_eq!(merged.children[0].label(), "ed");
        assert_eq!(merged.children[1].label(), "b");

        let c_aa = wrap('a', 0, 1, 0, 2).expand(wrap('c', 0, 0, 0, 0)).unwrap();
        assert_eq!(c_aa.width_ratios, vec![1, 2]);
        assert_eq!(c_aa.children[0].label(), "c");

        // Equal widths as lists, but the column boundaries differ.
        assert!(!c_aa.can_expand(&merged));
        assert!(c_aa.can_merge(&merged));

        let stacked = wrap('y', 1, 0, 1, 0).expand(wrap('x', 0, 0, 0, 0)).unwrap();
        assert_eq!(stacked.label, "xy");
        assert_eq!(stacked.height_ratios, vec![1, 1]);
    }

    #[test]
    fn into_cell_keeps_real_grids() {
        let ab = wrap('a', 0, 0, 0, 0).expand(wrap('b', 0, 1, 0, 1)).unwrap();
        assert!(matches!(ab.into_cell(), LayoutNode::Grid(_)));
        assert!(wrap('z', 0, 0, 0, 0).into_cell().is_leaf());
    }
}
