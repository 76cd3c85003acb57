//! Layout tree construction.
//!
//! Regions are wrapped into 1×1 grids and joined pairwise until one grid
//! covers the whole art. Joining prefers `expand` (append a row or column
//! to a grid with matching proportions) and only falls back to `merge`
//! (nest two nodes in a new two-cell grid) once no expansion is left.
//! The finished root is then normalized into reading order.

mod node;
mod normalize;
mod reduce;

pub use node::{GridNode, LayoutNode, Leaf};
pub use reduce::{Reduction, Step, WorkingSet, build_tree};

use serde::Serialize;

use crate::error::Result;
use crate::geometry::Bounds;
use crate::grid::CellGrid;

/// Finished layout: a single grid covering the entire art.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutTree {
    pub root: GridNode,
}

impl LayoutTree {
    pub fn new(root: GridNode) -> Self {
        Self { root }
    }

    /// Parse, extract, reduce and normalize in one go.
    pub fn parse(art: &str) -> Result<Self> {
        Self::from_grid(&CellGrid::parse(art)?)
    }

    pub fn from_grid(grid: &CellGrid) -> Result<Self> {
        let mut tree = Self::new(build_tree(grid.regions()?)?);
        tree.root.normalize()?;
        Ok(tree)
    }

    pub fn bounds(&self) -> Bounds {
        self.root.bounds
    }

    /// Height of the art in cells.
    pub fn rows(&self) -> usize {
        self.root.height()
    }

    /// Width of the art in cells.
    pub fn cols(&self) -> usize {
        self.root.width()
    }

    /// Leaves in depth-first child order.
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut out = Vec::new();
        self.root.collect_leaves(&mut out);
        out
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn grid_count(&self) -> usize {
        self.root.grid_count()
    }

    /// Content hash of the tree, stable across runs.
    pub fn fingerprint(&self) -> Result<blake3::Hash> {
        let bytes = serde_json::to_vec(self)?;
        Ok(blake3::hash(&bytes))
    }

    /// Normalize in place, returning whether anything moved.
    pub fn normalize(&mut self) -> Result<bool> {
        let before = self.fingerprint()?;
        self.root.normalize()?;
        Ok(self.fingerprint()? != before)
    }
}
