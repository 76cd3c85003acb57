//! Ascii-art to nested grid layouts.
//!
//! Each distinct character of the art names a rectangular region. The
//! regions are joined into a tree of uniform grids with per-row and
//! per-column size ratios, which emitters can then turn into plotting code
//! or any other description.
//!
//! ```
//! let tree = autolayout::build_layout("aac\nbbc")?;
//! assert_eq!(tree.root.width_ratios, vec![2, 1]);
//! # Ok::<(), autolayout::LayoutError>(())
//! ```

pub mod audit;
pub mod builder;
pub mod emit;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod logging;
pub mod metrics;
pub mod tree;

pub use audit::{
    BuildAudit, BuildAuditEvent, BuildAuditEventBuilder, BuildAuditStage, NullBuildAudit,
    RecordingAudit,
};
pub use builder::{BuildConfig, LayoutBuilder, build_layout};
pub use emit::{FigureConfig, GridSpecEmitter, JsonEmitter, LayoutEmitter, OutlineEmitter};
pub use error::{LayoutError, Result};
pub use geometry::{Axis, Bounds};
pub use grid::{CellGrid, Label, Region};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, NullSink,
};
pub use metrics::{BuildMetrics, MetricSnapshot};
pub use tree::{GridNode, LayoutNode, LayoutTree, Leaf, Reduction, Step, WorkingSet, build_tree};
