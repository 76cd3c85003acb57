//! Grid reader and region extraction.
//!
//! The art is parsed once into a rectangular [`CellGrid`]; each distinct
//! label is then measured into a [`Region`] that must exactly fill its
//! bounding box.

mod core;

pub use core::{CellGrid, Label, Region};
