//! Edge solver tests: recovering row/column boundaries from cell extents.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{assert_close, assert_normalized, cell, layout, model};
use gridlayout::{solve_edges, Axis, AxisRange, GridModel};
use test_case::test_case;

#[test_case(1, 1)]
#[test_case(3, 3)]
#[test_case(4, 7)]
#[test_case(10, 2)]
fn test_uniform_grid_edges(rows: u32, cols: u32) {
    let grid = GridModel::new(rows, cols).unwrap();
    for (axis, count) in [(Axis::Rows, rows), (Axis::Columns, cols)] {
        let solution = solve_edges(&grid, axis);
        assert_normalized(&solution);
        assert_eq!(solution.edges.len(), count as usize + 1);
        for (index, edge) in solution.edges.iter().enumerate() {
            assert_close(*edge, index as f64 / f64::from(count));
        }
    }
}

#[test]
fn test_spanning_cells_resolve_by_subtraction() {
    // Rows 0.1 / 0.4 / 0.5. Row 1 is only crossed by two-row cells.
    let grid = model(
        3,
        2,
        vec![
            cell(0, (0, 0), (1, 1), (0.0, 0.0, 0.5, 0.1)),
            cell(1, (0, 1), (2, 1), (0.5, 0.0, 0.5, 0.5)),
            cell(2, (1, 0), (2, 1), (0.0, 0.1, 0.5, 0.9)),
            cell(3, (2, 1), (1, 1), (0.5, 0.5, 0.5, 0.5)),
        ],
    );
    let rows = solve_edges(&grid, Axis::Rows);
    assert_normalized(&rows);
    assert_close(rows.sizes[1], 0.4);
    assert_close(rows.edges[2], 0.5);
}

#[test]
fn test_smallest_contained_span_sizes_its_rows() {
    // Rows 0 and 1 are only crossed by the 3-row cell and the 2-row cell it
    // contains. The right column has no positions, so no edge is seeded
    // between 0 and 3 and nothing else can place boundaries 1 and 2.
    let grid = model(
        3,
        2,
        vec![
            cell(0, (0, 0), (3, 1), (0.0, 0.0, 0.5, 1.0)),
            cell(1, (0, 1), (2, 1), (0.5, f64::NAN, 0.5, 0.6)),
            cell(2, (2, 1), (1, 1), (0.5, f64::NAN, 0.5, 0.4)),
        ],
    );
    let rows = solve_edges(&grid, Axis::Rows);
    assert_normalized(&rows);
    assert_close(rows.sizes[0], 0.3);
    assert_close(rows.sizes[1], 0.3);
    assert_close(rows.sizes[2], 0.4);
    assert_close(rows.edges[1], 0.3);
    assert_close(rows.edges[2], 0.6);
    assert_normalized(&solve_edges(&grid, Axis::Columns));
}

#[test]
fn test_gap_between_known_edges_is_shared() {
    // Only the last column has a usable extent; the first two split what is
    // left of the known boundary at 0.7.
    let grid = model(
        1,
        3,
        vec![
            cell(0, (0, 0), (1, 1), (0.0, 0.0, f64::NAN, 1.0)),
            cell(1, (0, 1), (1, 1), (f64::NAN, 0.0, f64::NAN, 1.0)),
            cell(2, (0, 2), (1, 1), (0.7, 0.0, 0.3, 1.0)),
        ],
    );
    let cols = solve_edges(&grid, Axis::Columns);
    assert!(cols.success);
    assert_close(cols.sizes[0], 0.35);
    assert_close(cols.sizes[1], 0.35);
    assert_close(cols.edges[1], 0.35);
}

#[test]
fn test_unknown_extents_fail_without_panicking() {
    let grid = model(
        1,
        2,
        vec![
            cell(0, (0, 0), (1, 1), (0.0, 0.0, f64::NAN, 1.0)),
            cell(1, (0, 1), (1, 1), (f64::NAN, 0.0, f64::NAN, 1.0)),
        ],
    );
    let cols = solve_edges(&grid, Axis::Columns);
    assert!(!cols.success);
    assert_eq!(cols.edges.len(), 3);
    assert!(cols.edge(1).is_none());
    assert!(cols.index_at(0.5).is_none());
    // The other axis is unaffected.
    assert_normalized(&solve_edges(&grid, Axis::Rows));
}

#[test]
fn test_edges_after_edits() {
    let mut layout = layout(3, 3);
    layout.merge(0, 0, 2, 2).unwrap();
    let cell = layout.cell_at(2, 2).unwrap().id;
    layout.slice_horizontally(cell, 2).unwrap();

    let cols = layout.column_edge_positions();
    assert_normalized(&cols);
    assert_eq!(cols.edges.len(), 5);
    assert_close(cols.edges[3], 5.0 / 6.0);
    assert_close(
        cols.range_size(AxisRange::new(0, 2)).unwrap(),
        2.0 / 3.0,
    );
    assert_normalized(&layout.row_edge_positions());
}
