use std::io::Write;

use crate::error::Result;
use crate::tree::LayoutTree;

use super::LayoutEmitter;

/// Serializes the tree as JSON, one document per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter {
    pub pretty: bool,
}

impl JsonEmitter {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl LayoutEmitter for JsonEmitter {
    fn emit(&self, tree: &LayoutTree, out: &mut dyn Write) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, tree)?;
        } else {
            serde_json::to_writer(&mut *out, tree)?;
        }
        writeln!(out)?;
        Ok(())
    }
}
