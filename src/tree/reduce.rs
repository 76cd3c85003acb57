use std::fmt;

use crate::error::{LayoutError, Result};
use crate::grid::Region;

use super::node::GridNode;

/// The two ways of joining a pair of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// Append a row or column to an existing uniform grid.
    Expand,
    /// Nest two nodes inside a new two-cell grid.
    Merge,
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reduction::Expand => f.write_str("expand"),
            Reduction::Merge => f.write_str("merge"),
        }
    }
}

/// Result of a single reduction.
#[derive(Debug, Clone)]
pub struct Step {
    pub set: WorkingSet,
    pub applied: Reduction,
}

/// Disjoint nodes that together tile the art.
///
/// Each step consumes the set and returns a new one with two nodes replaced
/// by their union, appended at the end. Pairs are scanned as ordered
/// `(i, j)` with `i` outer, so the outcome is fully determined by the
/// initial order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingSet {
    nodes: Vec<GridNode>,
}

impl WorkingSet {
    pub fn new(nodes: Vec<GridNode>) -> Self {
        Self { nodes }
    }

    pub fn from_regions(regions: impl IntoIterator<Item = Region>) -> Self {
        Self::new(regions.into_iter().map(GridNode::from).collect())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[GridNode] {
        &self.nodes
    }

    /// First pair admitting `op`, in enumeration order.
    pub fn find(&self, op: Reduction) -> Option<(usize, usize)> {
        let applicable = |a: &GridNode, b: &GridNode| match op {
            Reduction::Expand => a.can_expand(b),
            Reduction::Merge => a.can_merge(b),
        };

        for (i, a) in self.nodes.iter().enumerate() {
            for (j, b) in self.nodes.iter().enumerate() {
                if i != j && applicable(a, b) {
                    return Some((i, j));
                }
            }
        }
        None
    }

    /// Apply one reduction: an expansion if any pair allows it, otherwise a
    /// merge. Fails with [`LayoutError::UnmergeableLayout`] when more than
    /// one node remains and no pair is adjacent.
    pub fn step(self) -> Result<Step> {
        let found = [Reduction::Expand, Reduction::Merge]
            .into_iter()
            .find_map(|op| self.find(op).map(|pair| (op, pair)));

        match found {
            Some((op, pair)) => Ok(Step {
                set: self.apply(op, pair)?,
                applied: op,
            }),
            None => Err(LayoutError::UnmergeableLayout {
                remaining: self.labels(),
            }),
        }
    }

    /// Reduce until a single node remains and return it.
    pub fn reduce(mut self) -> Result<GridNode> {
        while self.len() > 1 {
            self = self.step()?.set;
        }
        self.into_root()
    }

    /// The single remaining node.
    pub fn into_root(mut self) -> Result<GridNode> {
        match self.nodes.len() {
            0 => Err(LayoutError::EmptyGrid),
            1 => self.nodes.pop().ok_or(LayoutError::EmptyGrid),
            _ => Err(LayoutError::UnmergeableLayout {
                remaining: self.labels(),
            }),
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.nodes.iter().map(|node| node.label.clone()).collect()
    }

    fn apply(mut self, op: Reduction, (i, j): (usize, usize)) -> Result<WorkingSet> {
        let (a, b) = if i < j {
            let b = self.nodes.remove(j);
            (self.nodes.remove(i), b)
        } else {
            let a = self.nodes.remove(i);
            (a, self.nodes.remove(j))
        };

        let joined = match op {
            Reduction::Expand => a.expand(b)?,
            Reduction::Merge => a.merge(b)?,
        };
        self.nodes.push(joined);
        Ok(self)
    }
}

/// Build the unnormalized tree for a set of extracted regions.
pub fn build_tree(regions: impl IntoIterator<Item = Region>) -> Result<GridNode> {
    WorkingSet::from_regions(regions).reduce()
}
