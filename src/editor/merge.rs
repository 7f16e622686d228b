//! Fusing a rectangular range of cells into one spanning cell.

use crate::config::LayoutConfig;
use crate::error::{GridError, Result};
use crate::grid::GridModel;
use crate::layout::solve_edges;
use crate::types::{Axis, Extent, GridRect};

use super::condense::condense;

/// Merge the `row_span x col_span` range anchored at `(start_row, start_col)`.
///
/// The range must line up with cell boundaries. The anchor cell keeps its id
/// and presentation and takes over the range; every other covered cell is
/// dropped. Width and height are summed band by band from the solved edges,
/// so non-uniform rows/columns are measured correctly.
pub fn merge(
    grid: &GridModel,
    start_row: u32,
    start_col: u32,
    row_span: u32,
    col_span: u32,
    config: &LayoutConfig,
) -> Result<GridModel> {
    let range = validate_range(grid, start_row, start_col, row_span, col_span)?;

    let col_edges = solve_edges(grid, Axis::Columns);
    if !col_edges.success {
        return Err(GridError::Unresolved(Axis::Columns));
    }
    let row_edges = solve_edges(grid, Axis::Rows);
    if !row_edges.success {
        return Err(GridError::Unresolved(Axis::Rows));
    }

    let width = col_edges
        .range_size(range.range(Axis::Columns))
        .ok_or(GridError::Unresolved(Axis::Columns))?;
    let height = row_edges
        .range_size(range.range(Axis::Rows))
        .ok_or(GridError::Unresolved(Axis::Rows))?;
    let left = col_edges
        .edge(start_col)
        .ok_or(GridError::Unresolved(Axis::Columns))?;
    let top = row_edges
        .edge(start_row)
        .ok_or(GridError::Unresolved(Axis::Rows))?;

    let anchor = grid
        .id_at(start_row, start_col)
        .ok_or(GridError::OutOfBounds {
            row: start_row,
            col: start_col,
            row_span,
            col_span,
            rows: grid.rows(),
            cols: grid.cols(),
        })?;

    let (rows, cols, next_id) = (grid.rows(), grid.cols(), grid.next_id());
    let mut cells = grid.clone().into_cells();
    cells.retain(|cell| cell.id == anchor || !range.contains(&cell.integer_extent()));
    for cell in cells.iter_mut().filter(|cell| cell.id == anchor) {
        cell.row = start_row;
        cell.column = start_col;
        cell.row_span = row_span;
        cell.column_span = col_span;
        cell.extent = Extent::new(left, top, width, height);
    }

    tracing::info!(
        start_row,
        start_col,
        row_span,
        col_span,
        %anchor,
        "merged range"
    );
    let merged = GridModel::from_cells(rows, cols, cells, next_id)?;
    condense(merged, config)
}

/// Bounds and alignment checks shared by merge callers.
pub fn validate_range(
    grid: &GridModel,
    start_row: u32,
    start_col: u32,
    row_span: u32,
    col_span: u32,
) -> Result<GridRect> {
    if row_span == 0 || col_span == 0 {
        return Err(GridError::InvalidSpan { row_span, col_span });
    }
    let fits = start_row
        .checked_add(row_span)
        .is_some_and(|end| end <= grid.rows())
        && start_col
            .checked_add(col_span)
            .is_some_and(|end| end <= grid.cols());
    if !fits {
        return Err(GridError::OutOfBounds {
            row: start_row,
            col: start_col,
            row_span,
            col_span,
            rows: grid.rows(),
            cols: grid.cols(),
        });
    }

    let range = GridRect::new(start_col, start_row, col_span, row_span);
    if let Some(cut) = grid
        .unique_cells()
        .into_iter()
        .find(|cell| {
            let rect = cell.integer_extent();
            rect.intersects(&range) && !range.contains(&rect)
        })
    {
        return Err(GridError::RangeSplitsCell(cut.id));
    }
    Ok(range)
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
    use crate::types::CellId;

    #[test]
    fn test_merge_keeps_anchor_identity() {
        let grid = GridModel::new(3, 3).unwrap();
        let anchor = grid.id_at(1, 1).unwrap();
        let merged = merge(&grid, 1, 1, 2, 2, &LayoutConfig::default()).unwrap();
        assert_eq!(merged.id_at(2, 2), Some(anchor));
        assert_eq!(merged.len(), 6);
        let cell = merged.cell(anchor).unwrap();
        assert!((cell.extent.left - 1.0 / 3.0).abs() < 1e-9);
        assert!((cell.extent.width - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_merge_rejects_partial_cover() {
        let grid = GridModel::new(3, 3).unwrap();
        let grid = merge(&grid, 0, 0, 2, 2, &LayoutConfig::default()).unwrap();
        assert!(matches!(
            merge(&grid, 1, 1, 2, 2, &LayoutConfig::default()),
            Err(GridError::RangeSplitsCell(CellId(0)))
        ));
    }

    #[test]
    fn test_merge_bounds() {
        let grid = GridModel::new(2, 2).unwrap();
        assert!(matches!(
            merge(&grid, 1, 1, 2, 1, &LayoutConfig::default()),
            Err(GridError::OutOfBounds { .. })
        ));
        assert!(matches!(
            merge(&grid, 0, 0, 0, 1, &LayoutConfig::default()),
            Err(GridError::InvalidSpan { .. })
        ));
    }
}
