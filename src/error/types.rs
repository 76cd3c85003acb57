use thiserror::Error;

use crate::geometry::Axis;

/// Unified result type for the autolayout crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced while turning ascii-art into a layout tree.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout art contains no cells")]
    EmptyGrid,
    #[error("invalid character `{found}` at row {row}, column {col}: only [A-Za-z0-9] allowed")]
    InvalidCharacter { row: usize, col: usize, found: char },
    #[error("row {row} has {found} cells, expected {expected}")]
    IrregularGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("region `{label}` is disconnected: {cells} cells inside a bounding box of {area}")]
    DisconnectedRegion {
        label: char,
        cells: usize,
        area: usize,
    },
    #[error(
        "layout cannot be expressed as nested grids; unresolved regions: {}",
        remaining.join(", ")
    )]
    UnmergeableLayout { remaining: Vec<String> },
    #[error("cannot {operation} `{first}` with `{second}`")]
    IncompatibleNodes {
        operation: &'static str,
        first: String,
        second: String,
    },
    #[error("inconsistent {axis} ratios for `{label}`: expected {expected:?}, rebuilt {rebuilt:?}")]
    InternalConsistency {
        label: String,
        axis: Axis,
        expected: Vec<usize>,
        rebuilt: Vec<usize>,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
