//! Condense tests: folding bands that are always spanned together.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{assert_close, assert_tiles, cell, layout, model};
use gridlayout::editor::{condense, find_band};
use gridlayout::{Axis, AxisRange, CellId, GridModel, LayoutConfig};

/// 2x4 grid where every cell covers two columns: both column pairs fold.
fn double_columns() -> GridModel {
    model(
        2,
        4,
        vec![
            cell(0, (0, 0), (1, 2), (0.0, 0.0, 0.3, 0.5)),
            cell(1, (0, 2), (1, 2), (0.3, 0.0, 0.7, 0.5)),
            cell(2, (1, 0), (1, 2), (0.0, 0.5, 0.3, 0.5)),
            cell(3, (1, 2), (1, 2), (0.3, 0.5, 0.7, 0.5)),
        ],
    )
}

#[test]
fn test_find_band_scans_from_the_start() {
    let grid = double_columns();
    assert_eq!(find_band(&grid, Axis::Columns), Some(AxisRange::new(0, 2)));
    assert_eq!(find_band(&grid, Axis::Rows), None);
}

#[test]
fn test_condense_runs_to_fixed_point() {
    let grid = condense(double_columns(), &LayoutConfig::default()).unwrap();
    assert_eq!((grid.rows(), grid.cols()), (2, 2));
    assert_tiles(&grid);
    assert_eq!(find_band(&grid, Axis::Columns), None);

    // Normalized geometry is not touched, only integer placement.
    let right = grid.cell(CellId(1)).unwrap();
    assert_eq!((right.column, right.column_span), (1, 1));
    assert_close(right.extent.width, 0.7);
}

#[test]
fn test_pass_limit_bounds_work() {
    let config = LayoutConfig {
        max_condense_passes: 1,
        ..LayoutConfig::default()
    };
    let grid = condense(double_columns(), &config).unwrap();
    assert_eq!(grid.cols(), 3);

    let config = LayoutConfig {
        max_condense_passes: 0,
        ..LayoutConfig::default()
    };
    let grid = condense(double_columns(), &config).unwrap();
    assert_eq!(grid.cols(), 4);
}

#[test]
fn test_merge_of_full_columns_folds_them() {
    let mut layout = layout(3, 3);
    layout.merge(0, 0, 3, 2).unwrap();

    assert_eq!((layout.rows(), layout.cols()), (3, 2));
    assert_eq!(layout.unique_elements().len(), 4);
    let merged = layout.cell(CellId(0)).unwrap();
    assert_eq!((merged.column_span, merged.row_span), (1, 3));
    assert_close(merged.extent.width, 2.0 / 3.0);
    assert_close(layout.column_edge_positions().edges[1], 2.0 / 3.0);
}

#[test]
fn test_edited_grids_stay_minimal() {
    let mut layout = layout(4, 4);
    layout.merge(0, 0, 2, 2).unwrap();
    layout.merge(2, 2, 2, 2).unwrap();
    let id = layout.cell_at(0, 3).unwrap().id;
    layout.slice_vertically(id, 3).unwrap();
    layout.merge(0, 2, 4, 1).unwrap_or_default();

    let grid = layout.grid();
    assert_tiles(grid);
    assert_eq!(find_band(grid, Axis::Columns), None);
    assert_eq!(find_band(grid, Axis::Rows), None);
}
