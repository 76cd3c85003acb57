use std::fmt;

use serde::Serialize;

/// Direction along which two nodes are joined.
///
/// `Vertical` stacks nodes on top of each other (they share columns),
/// `Horizontal` places them side by side (they share rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Vertical => f.write_str("height"),
            Axis::Horizontal => f.write_str("width"),
        }
    }
}

/// Inclusive cell box inside the art grid, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Bounds {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl Bounds {
    pub const fn new(top: usize, left: usize, bottom: usize, right: usize) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Box anchored at (row, col) covering a single cell.
    pub const fn cell(row: usize, col: usize) -> Self {
        Self::new(row, col, row, col)
    }

    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Grow the box so it also covers `(row, col)`.
    pub fn include(&mut self, row: usize, col: usize) {
        self.top = self.top.min(row);
        self.bottom = self.bottom.max(row);
        self.left = self.left.min(col);
        self.right = self.right.max(col);
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            self.top.min(other.top),
            self.left.min(other.left),
            self.bottom.max(other.bottom),
            self.right.max(other.right),
        )
    }

    /// Same column extent and touching rows, in either order.
    pub fn aligned_vertically(&self, other: &Bounds) -> bool {
        self.left == other.left
            && self.right == other.right
            && (self.bottom + 1 == other.top || other.bottom + 1 == self.top)
    }

    /// Same row extent and touching columns, in either order.
    pub fn aligned_horizontally(&self, other: &Bounds) -> bool {
        self.top == other.top
            && self.bottom == other.bottom
            && (self.right + 1 == other.left || other.right + 1 == self.left)
    }

    /// Axis along which the two boxes can be joined, if any.
    pub fn alignment(&self, other: &Bounds) -> Option<Axis> {
        if self.aligned_vertically(other) {
            Some(Axis::Vertical)
        } else if self.aligned_horizontally(other) {
            Some(Axis::Horizontal)
        } else {
            None
        }
    }
}
