//! Merge tests: fusing aligned ranges into one spanning cell.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{
    assert_close, assert_normalized, assert_same_grid, assert_tiles, cell, id_at, layout, model,
};
use gridlayout::{Axis, CellId, GridError, GridLayout, GridRect, LayoutConfig};
use test_case::test_case;

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn test_merge_2x2_block_of_4x4() {
    let mut layout = layout(4, 4);
    layout.merge(0, 0, 2, 2).unwrap();

    assert_eq!(layout.unique_elements().len(), 13);
    let merged = layout.cell(CellId(0)).unwrap();
    assert_eq!(merged.integer_extent(), GridRect::new(0, 0, 2, 2));
    assert_close(merged.extent.width, 0.5);
    assert_close(merged.extent.height, 0.5);
    assert_tiles(layout.grid());
}

#[test]
fn test_merge_partial_row_of_3x3() {
    let mut layout = layout(3, 3);
    layout.merge(0, 0, 1, 2).unwrap();

    assert_eq!(layout.unique_elements().len(), 8);
    let merged = layout.cell(CellId(0)).unwrap();
    assert_close(merged.extent.width, 2.0 / 3.0);
    assert_close(merged.extent.height, 1.0 / 3.0);
    assert_eq!((layout.rows(), layout.cols()), (3, 3));
}

// ============================================================================
// Shapes
// ============================================================================

#[test_case(3, 3, (0, 0, 1, 3), 7, (3, 3) ; "full top row")]
#[test_case(3, 3, (1, 1, 2, 2), 6, (3, 3) ; "bottom right block")]
#[test_case(2, 2, (0, 0, 2, 2), 1, (1, 1) ; "whole grid condenses")]
#[test_case(4, 1, (1, 0, 2, 1), 3, (3, 1) ; "row band condenses")]
fn test_merge_shapes(
    rows: u32,
    cols: u32,
    range: (u32, u32, u32, u32),
    cells: usize,
    dims: (u32, u32),
) {
    let (row, col, row_span, col_span) = range;
    let mut layout = layout(rows, cols);
    layout.merge(row, col, row_span, col_span).unwrap();
    assert_eq!(layout.unique_elements().len(), cells);
    assert_eq!((layout.rows(), layout.cols()), dims);
    assert_tiles(layout.grid());
    assert_normalized(&layout.row_edge_positions());
    assert_normalized(&layout.column_edge_positions());
}

#[test]
fn test_merge_keeps_anchor_identity_and_content() {
    let mut layout = layout(3, 3);
    let anchor = id_at(&layout, 1, 1);
    layout
        .set_content(anchor, Some(gridlayout::ContentHandle(42)))
        .unwrap();
    layout.merge(1, 1, 2, 2).unwrap();

    let merged = layout.cell(anchor).unwrap();
    assert_eq!(merged.content, Some(gridlayout::ContentHandle(42)));
    assert_eq!(id_at(&layout, 2, 2), anchor);
    assert_close(merged.extent.left, 1.0 / 3.0);
    assert_close(merged.extent.top, 1.0 / 3.0);
}

#[test]
fn test_merge_measures_non_uniform_columns() {
    // Slicing the top-left cell leaves columns 0.25 / 0.25 / 0.5.
    let mut layout = layout(2, 2);
    layout.slice_horizontally(CellId(0), 2).unwrap();
    assert_eq!(layout.cols(), 3);

    let right = id_at(&layout, 0, 2);
    layout.merge(0, 2, 2, 1).unwrap();
    let merged = layout.cell(right).unwrap();
    assert_close(merged.extent.left, 0.5);
    assert_close(merged.extent.width, 0.5);
    assert_close(merged.extent.height, 1.0);
}

#[test]
fn test_merge_undoes_slice() {
    let mut layout = layout(2, 2);
    layout.slice_horizontally(CellId(0), 2).unwrap();
    let anchor = id_at(&layout, 0, 0);
    layout.merge(0, 0, 1, 2).unwrap();

    assert_eq!((layout.rows(), layout.cols()), (2, 2));
    assert_eq!(layout.unique_elements().len(), 4);
    let merged = layout.cell(anchor).unwrap();
    assert_eq!(merged.integer_extent(), GridRect::new(0, 0, 1, 1));
    assert_close(merged.extent.width, 0.5);
}

#[test]
fn test_nested_merges_collapse_to_one_cell() {
    let mut layout = layout(3, 3);
    layout.merge(0, 0, 2, 2).unwrap();
    layout.merge(0, 0, 3, 3).unwrap();
    assert_eq!((layout.rows(), layout.cols()), (1, 1));
    let only = layout.unique_elements()[0];
    assert_eq!(only.id, CellId(0));
    assert_close(only.extent.width, 1.0);
    assert_close(only.extent.height, 1.0);
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_rejected_merge_leaves_grid_untouched() {
    let mut layout = layout(3, 3);
    layout.merge(0, 0, 2, 2).unwrap();
    let before = layout.grid().clone();
    layout.take_events();

    assert!(matches!(
        layout.merge(1, 1, 2, 2),
        Err(GridError::RangeSplitsCell(CellId(0)))
    ));
    assert!(matches!(
        layout.merge(2, 2, 2, 1),
        Err(GridError::OutOfBounds { .. })
    ));
    assert!(matches!(
        layout.merge(0, 0, 1, 0),
        Err(GridError::InvalidSpan { .. })
    ));
    assert_eq!(layout.grid(), &before);
    assert!(layout.take_events().is_empty());
}

#[test]
fn test_unresolved_merge_leaves_grid_untouched() {
    // Column widths cannot be placed, rows are fine.
    let grid = model(
        1,
        3,
        vec![
            cell(0, (0, 0), (1, 1), (0.0, 0.0, f64::NAN, 1.0)),
            cell(1, (0, 1), (1, 1), (f64::NAN, 0.0, f64::NAN, 1.0)),
            cell(2, (0, 2), (1, 1), (f64::NAN, 0.0, 0.3, 1.0)),
        ],
    );
    let mut layout = GridLayout::from_model(grid, LayoutConfig::default());
    let before = layout.grid().clone();
    layout.take_events();

    let err = layout.merge(0, 0, 1, 2).unwrap_err();
    assert!(matches!(err, GridError::Unresolved(Axis::Columns)));
    assert!(err.is_recoverable());
    assert_same_grid(layout.grid(), &before);
    assert!(layout.take_events().is_empty());
}

#[test]
fn test_merge_selection() {
    let mut layout = layout(3, 3);
    assert!(!layout.can_merge());
    layout.add_to_selection(CellId(4)).unwrap();
    assert!(!layout.can_merge());
    layout.add_to_selection(CellId(8)).unwrap();
    assert!(layout.can_merge());

    layout.merge_selection().unwrap();
    assert_eq!(layout.unique_elements().len(), 6);
    assert!(layout.selected_cells().is_empty());
    assert_eq!(
        layout.cell(CellId(4)).unwrap().integer_extent(),
        GridRect::new(1, 1, 2, 2)
    );
}
