use crate::error::{LayoutError, Result};
use crate::geometry::Axis;

use super::node::{GridNode, LayoutNode};

impl GridNode {
    /// Sort children into reading order (top, then left) at every level and
    /// rebuild the ratio lists to follow that order.
    ///
    /// Sorting only permutes the ratios, so the rebuilt lists must hold the
    /// same values as before; anything else is reported as
    /// [`LayoutError::InternalConsistency`].
    pub fn normalize(&mut self) -> Result<()> {
        self.children.sort_by_key(|child| {
            let bounds = child.bounds();
            (bounds.top, bounds.left)
        });

        let Some(first_top) = self.children.first().map(|child| child.bounds().top) else {
            return Ok(());
        };

        let mut heights = Vec::with_capacity(self.height_ratios.len());
        let mut widths = Vec::with_capacity(self.width_ratios.len());
        let mut last_top = None;

        for child in &mut self.children {
            let bounds = child.bounds();
            if last_top != Some(bounds.top) {
                last_top = Some(bounds.top);
                heights.push(bounds.height());
            }
            if bounds.top == first_top {
                widths.push(bounds.width());
            }
            if let LayoutNode::Grid(grid) = child {
                grid.normalize()?;
            }
        }

        check_permutation(&self.label, Axis::Horizontal, &self.width_ratios, &widths)?;
        check_permutation(&self.label, Axis::Vertical, &self.height_ratios, &heights)?;

        self.width_ratios = widths;
        self.height_ratios = heights;
        Ok(())
    }
}

fn check_permutation(label: &str, axis: Axis, expected: &[usize], rebuilt: &[usize]) -> Result<()> {
    let mut lhs = expected.to_vec();
    let mut rhs = rebuilt.to_vec();
    lhs.sort_unstable();
    rhs.sort_unstable();
    if lhs != rhs {
        return Err(LayoutError::InternalConsistency {
            label: label.to_string(),
            axis,
            expected: expected.to_vec(),
            rebuilt: rebuilt.to_vec(),
        });
    }
    Ok(())
}
