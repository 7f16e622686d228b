//! Collapsing rows/columns that are always spanned together.
//!
//! After a merge, a band of adjacent rows can end up crossed only by cells
//! that cover the whole band. Such a band carries no structure of its own and
//! is folded back into a single row (columns likewise), keeping the integer
//! grid minimal.

use crate::config::LayoutConfig;
use crate::error::{GridError, Result};
use crate::grid::GridModel;
use crate::types::{Axis, AxisRange};

/// Collapse reducible bands until none is left, columns checked first.
pub fn condense(mut grid: GridModel, config: &LayoutConfig) -> Result<GridModel> {
    for _ in 0..config.max_condense_passes {
        let next = [Axis::Columns, Axis::Rows]
            .into_iter()
            .find_map(|axis| find_band(&grid, axis).map(|band| (axis, band)));
        let Some((axis, band)) = next else {
            return Ok(grid);
        };
        grid = collapse(grid, axis, band)?;
    }

    tracing::warn!(
        passes = config.max_condense_passes,
        "condense pass limit reached"
    );
    Ok(grid)
}

/// First band (scanning from index 0) that every crossing cell fully covers
/// and that is wider than one index.
pub fn find_band(grid: &GridModel, axis: Axis) -> Option<AxisRange> {
    grid.intersecting(axis).into_iter().find_map(|group| {
        let mut cells = group.into_iter();
        let first = cells.next()?.range(axis);
        let shared = cells.try_fold(first, |acc, cell| acc.intersection(&cell.range(axis)))?;
        (shared.span > 1).then_some(shared)
    })
}

fn collapse(grid: GridModel, axis: Axis, band: AxisRange) -> Result<GridModel> {
    let reduce = band.span - 1;
    let remap = |edge: u32| -> Result<u32> {
        if edge <= band.start {
            Ok(edge)
        } else if edge >= band.end() {
            Ok(edge - reduce)
        } else {
            Err(GridError::Inconsistent(format!(
                "edge {edge} lies inside collapsing {axis} band {}..{}",
                band.start,
                band.end()
            )))
        }
    };

    let count = grid.count(axis) - reduce;
    let (rows, cols) = match axis {
        Axis::Rows => (count, grid.cols()),
        Axis::Columns => (grid.rows(), count),
    };
    let next_id = grid.next_id();

    let mut cells = grid.into_cells();
    for cell in &mut cells {
        let range = cell.range(axis);
        let start = remap(range.start)?;
        let end = remap(range.end())?;
        cell.set_range(axis, AxisRange::new(start, end - start));
    }

    tracing::debug!(%axis, start = band.start, span = band.span, "collapsed band");
    GridModel::from_cells(rows, cols, cells, next_id)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::{Cell, CellId, Extent};

    /// 2x3 grid whose middle column was merged top to bottom in two halves
    /// that line up: columns 1 and 2 always travel together.
    fn paired_columns() -> GridModel {
        let left = Cell {
            row_span: 2,
            ..Cell::new(CellId(0), 0, 0, Extent::new(0.0, 0.0, 0.5, 1.0))
        };
        let top = Cell {
            column_span: 2,
            ..Cell::new(CellId(1), 0, 1, Extent::new(0.5, 0.0, 0.5, 0.5))
        };
        let bottom = Cell {
            column_span: 2,
            ..Cell::new(CellId(2), 1, 1, Extent::new(0.5, 0.5, 0.5, 0.5))
        };
        GridModel::from_cells(2, 3, vec![left, top, bottom], 3).unwrap()
    }

    #[test]
    fn test_find_band() {
        let grid = paired_columns();
        assert_eq!(
            find_band(&grid, Axis::Columns),
            Some(AxisRange::new(1, 2))
        );
        assert_eq!(find_band(&grid, Axis::Rows), None);
    }

    #[test]
    fn test_condense_collapses_band() {
        let grid = condense(paired_columns(), &LayoutConfig::default()).unwrap();
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.rows(), 2);
        let top = grid.cell(CellId(1)).unwrap();
        assert_eq!((top.column, top.column_span), (1, 1));
        // Normalized geometry is untouched.
        assert_eq!(top.extent, Extent::new(0.5, 0.0, 0.5, 0.5));
    }

    #[test]
    fn test_condense_reaches_fixed_point_on_both_axes() {
        // One cell covering a whole 3x2 grid collapses to 1x1.
        let all = Cell {
            row_span: 3,
            column_span: 2,
            ..Cell::new(CellId(0), 0, 0, Extent::new(0.0, 0.0, 1.0, 1.0))
        };
        let grid = GridModel::from_cells(3, 2, vec![all], 1).unwrap();
        let grid = condense(grid, &LayoutConfig::default()).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (1, 1));
        assert!(!grid.cell(CellId(0)).unwrap().is_group());
    }

    #[test]
    fn test_uniform_grid_is_already_minimal() {
        let grid = GridModel::new(3, 4).unwrap();
        let grid = condense(grid, &LayoutConfig::default()).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (3, 4));
    }
}
