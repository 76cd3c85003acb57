use std::collections::HashMap;

use crate::error::{LayoutError, Result};
use crate::geometry::Bounds;

/// Single-character region name as it appears in the art.
pub type Label = char;

/// Rectangular matrix of labels, rows top-to-bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    cells: Vec<Vec<Label>>,
}

impl CellGrid {
    /// Parse ascii-art into a grid.
    ///
    /// Every line is trimmed and blank lines are skipped, so art may be
    /// indented or surrounded by empty lines. Remaining rows must all have
    /// the same length and contain only ASCII letters and digits.
    pub fn parse(art: &str) -> Result<Self> {
        let cells: Vec<Vec<Label>> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().collect())
            .collect();

        let Some(first) = cells.first() else {
            return Err(LayoutError::EmptyGrid);
        };
        let expected = first.len();

        for (row, line) in cells.iter().enumerate() {
            if line.len() != expected {
                return Err(LayoutError::IrregularGrid {
                    row,
                    expected,
                    found: line.len(),
                });
            }
            if let Some((col, &found)) = line
                .iter()
                .enumerate()
                .find(|(_, ch)| !ch.is_ascii_alphanumeric())
            {
                return Err(LayoutError::InvalidCharacter { row, col, found });
            }
        }

        Ok(Self { cells })
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells[0].len()
    }

    /// Box covering the whole grid.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(0, 0, self.rows() - 1, self.cols() - 1)
    }

    pub fn label_at(&self, row: usize, col: usize) -> Option<Label> {
        self.cells.get(row).and_then(|line| line.get(col)).copied()
    }

    /// Distinct labels in order of first appearance (reading order).
    pub fn labels(&self) -> Vec<Label> {
        let mut seen = Vec::new();
        for &label in self.cells.iter().flatten() {
            if !seen.contains(&label) {
                seen.push(label);
            }
        }
        seen
    }

    /// Bounding box of every cell carrying `label`.
    ///
    /// Fails with [`LayoutError::DisconnectedRegion`] when the cells do not
    /// fill the box exactly. Returns `None` for a label absent from the grid.
    pub fn region(&self, label: Label) -> Result<Option<Region>> {
        let mut bounds: Option<Bounds> = None;
        let mut count = 0;

        for (row, line) in self.cells.iter().enumerate() {
            for (col, &cell) in line.iter().enumerate() {
                if cell != label {
                    continue;
                }
                count += 1;
                match bounds.as_mut() {
                    Some(b) => b.include(row, col),
                    None => bounds = Some(Bounds::cell(row, col)),
                }
            }
        }

        let Some(bounds) = bounds else {
            return Ok(None);
        };
        Region::checked(label, bounds, count).map(Some)
    }

    /// Extract one region per distinct label, in reading order of first
    /// appearance. Single pass over the grid.
    pub fn regions(&self) -> Result<Vec<Region>> {
        let mut order: Vec<(Label, Bounds, usize)> = Vec::new();
        let mut index: HashMap<Label, usize> = HashMap::new();

        for (row, line) in self.cells.iter().enumerate() {
            for (col, &label) in line.iter().enumerate() {
                match index.get(&label) {
                    Some(&slot) => {
                        let entry = &mut order[slot];
                        entry.1.include(row, col);
                        entry.2 += 1;
                    }
                    None => {
                        index.insert(label, order.len());
                        order.push((label, Bounds::cell(row, col), 1));
                    }
                }
            }
        }

        order
            .into_iter()
            .map(|(label, bounds, count)| Region::checked(label, bounds, count))
            .collect()
    }
}

/// A filled rectangle of cells sharing one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub label: Label,
    pub bounds: Bounds,
}

impl Region {
    fn checked(label: Label, bounds: Bounds, cells: usize) -> Result<Self> {
        let area = bounds.area();
        if cells != area {
            return Err(LayoutError::DisconnectedRegion { label, cells, area });
        }
        Ok(Self { label, bounds })
    }
}
