//! Property tests for the tiling invariant of built layouts.
//!
//! Every layout that builds successfully must satisfy, at every grid level:
//!
//! 1. Ratio lists sum to the grid's height and width.
//! 2. There is one child per (row, column) cell.
//! 3. Child `k` occupies exactly the cell at row `k / cols`, column `k % cols`
//!    as laid out by the ratios.
//! 4. The leaves are exactly the distinct labels of the art.
//!
//! Failures are only ever the two layout-shape errors.

use std::collections::BTreeSet;

use autolayout::{Bounds, GridNode, LayoutError, LayoutNode, LayoutTree};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn tiling_violation(grid: &GridNode) -> Option<String> {
    if grid.height_ratios.iter().sum::<usize>() != grid.height()
        || grid.width_ratios.iter().sum::<usize>() != grid.width()
    {
        return Some(format!("ratios of `{}` do not sum to its size", grid.label));
    }
    if grid.children.len() != grid.rows() * grid.cols() {
        return Some(format!("`{}` has the wrong number of children", grid.label));
    }

    let mut cells = Vec::with_capacity(grid.children.len());
    let mut top = grid.bounds.top;
    for &h in &grid.height_ratios {
        let mut left = grid.bounds.left;
        for &w in &grid.width_ratios {
            cells.push(Bounds::new(top, left, top + h - 1, left + w - 1));
            left += w;
        }
        top += h;
    }
    let actual: Vec<Bounds> = grid.children.iter().map(LayoutNode::bounds).collect();
    if actual != cells {
        return Some(format!(
            "children of `{}` sit at {actual:?}, ratios describe {cells:?}",
            grid.label
        ));
    }

    grid.children
        .iter()
        .filter_map(LayoutNode::as_grid)
        .find_map(tiling_violation)
}

fn render(rows: &[Vec<char>]) -> String {
    rows.iter()
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Small label grids, often disconnected.
fn raw_art_strategy() -> impl Strategy<Value = String> {
    (1usize..=4, 1usize..=4).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(
            prop::collection::vec(prop::sample::select(vec!['a', 'b', 'c', 'd']), cols),
            rows,
        )
        .prop_map(|grid| render(&grid))
    })
}

/// A 3x3 label grid with each row and column stretched 1-3 times, so that
/// ratios other than 1 show up.
fn stretched_art_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(
            prop::collection::vec(prop::sample::select(vec!['a', 'b', 'c', 'd', 'e']), 3),
            3,
        ),
        prop::collection::vec(1usize..=3, 3),
        prop::collection::vec(1usize..=3, 3),
    )
        .prop_map(|(base, row_reps, col_reps)| {
            let mut rows = Vec::new();
            for (row, &reps) in base.iter().zip(&row_reps) {
                let stretched: Vec<char> = row
                    .iter()
                    .zip(&col_reps)
                    .flat_map(|(&label, &n)| std::iter::repeat_n(label, n))
                    .collect();
                rows.extend(std::iter::repeat_n(stretched, reps));
            }
            render(&rows)
        })
}

fn check_art(art: &str) -> Result<(), TestCaseError> {
    match LayoutTree::parse(art) {
        Ok(tree) => {
            if let Some(violation) = tiling_violation(&tree.root) {
                return Err(TestCaseError::fail(format!("{violation}\nart:\n{art}")));
            }
            let expected: BTreeSet<String> = art
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .map(String::from)
                .collect();
            let leaves: BTreeSet<String> =
                tree.leaves().iter().map(|leaf| leaf.label.clone()).collect();
            prop_assert_eq!(leaves, expected, "leaf set differs for art:\n{}", art);
        }
        Err(err) => prop_assert!(
            matches!(
                err,
                LayoutError::DisconnectedRegion { .. } | LayoutError::UnmergeableLayout { .. }
            ),
            "unexpected error {:?} for art:\n{}",
            err,
            art
        ),
    }
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Arbitrary small grids tile or fail cleanly
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn raw_grids_tile_when_built(art in raw_art_strategy()) {
        check_art(&art)?;
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Stretched grids keep non-unit ratios positional
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn stretched_grids_tile_when_built(art in stretched_art_strategy()) {
        check_art(&art)?;
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Grids of distinct labels always build
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn all_distinct_labels_always_build(rows in 1usize..=4, cols in 1usize..=4) {
        let alphabet: Vec<char> = ('a'..='p').collect();
        let art = render(
            &(0..rows)
                .map(|r| (0..cols).map(|c| alphabet[r * cols + c]).collect())
                .collect::<Vec<_>>(),
        );
        let tree = LayoutTree::parse(&art);
        prop_assert!(tree.is_ok(), "uniform grid failed to build:\n{}", art);
        check_art(&art)?;
    }
}
