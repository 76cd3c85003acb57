//! Emitters turn a finished [`LayoutTree`] into a concrete artifact.
//!
//! Construction never depends on an emitter; these are thin walkers over
//! the public tree and can be swapped for any other consumer.

mod gridspec;
mod json;
mod outline;

pub use gridspec::{FigureConfig, GridSpecEmitter};
pub use json::JsonEmitter;
pub use outline::OutlineEmitter;

use std::io::Write;

use crate::error::Result;
use crate::tree::LayoutTree;

pub trait LayoutEmitter {
    fn emit(&self, tree: &LayoutTree, out: &mut dyn Write) -> Result<()>;

    fn emit_to_string(&self, tree: &LayoutTree) -> Result<String> {
        let mut buf = Vec::new();
        self.emit(tree, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn format_ratios(ratios: &[usize]) -> String {
    let parts: Vec<String> = ratios.iter().map(usize::to_string).collect();
    format!("[{}]", parts.join(", "))
}
