//! Common test utilities and assertion helpers.
//!
//! Builders for hand-made tilings plus assertions for the structural
//! properties every grid must keep: exact tiling, normalized edges and a
//! selection extent that matches its members.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_lossless
)]

use gridlayout::{Cell, CellId, EdgeSolution, Extent, GridLayout, GridModel, GridRect};

pub const EPS: f64 = 1e-5;

// ============================================================================
// Builders
// ============================================================================

/// Fresh uniform session.
#[must_use]
pub fn layout(rows: u32, cols: u32) -> GridLayout {
    GridLayout::new(rows, cols).expect("valid dimensions")
}

/// Cell at `(row, col)` with the given spans and normalized extent.
#[must_use]
pub fn cell(
    id: u32,
    (row, col): (u32, u32),
    (row_span, col_span): (u32, u32),
    extent: (f64, f64, f64, f64),
) -> Cell {
    Cell {
        row_span,
        column_span: col_span,
        ..Cell::new(
            CellId(id),
            row,
            col,
            Extent::new(extent.0, extent.1, extent.2, extent.3),
        )
    }
}

/// Model from a hand-made tiling; panics if the cells do not tile.
#[must_use]
pub fn model(rows: u32, cols: u32, cells: Vec<Cell>) -> GridModel {
    GridModel::from_cells(rows, cols, cells, 0).expect("cells tile the grid")
}

/// Id of the cell covering `(row, col)`.
#[must_use]
pub fn id_at(layout: &GridLayout, row: u32, col: u32) -> CellId {
    layout
        .grid()
        .id_at(row, col)
        .unwrap_or_else(|| panic!("no cell at ({row}, {col})"))
}

// ============================================================================
// Assertions
// ============================================================================

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= EPS,
        "expected {expected}, got {actual}"
    );
}

/// Distinct cells tile `[0, rows) x [0, cols)` exactly.
pub fn assert_tiles(grid: &GridModel) {
    let mut covered = vec![0u32; (grid.rows() * grid.cols()) as usize];
    for cell in grid.unique_cells() {
        let rect = cell.integer_extent();
        assert!(rect.col_span > 0 && rect.row_span > 0, "empty cell {rect}");
        assert!(
            rect.col + rect.col_span <= grid.cols() && rect.row + rect.row_span <= grid.rows(),
            "cell {} at {rect} leaves the {}x{} grid",
            cell.id,
            grid.rows(),
            grid.cols()
        );
        for row in rect.row..rect.row + rect.row_span {
            for col in rect.col..rect.col + rect.col_span {
                covered[(row * grid.cols() + col) as usize] += 1;
                assert_eq!(grid.id_at(row, col), Some(cell.id));
            }
        }
    }
    assert!(
        covered.iter().all(|n| *n == 1),
        "slots covered other than exactly once: {covered:?}"
    );
}

/// Edges run from 0 to 1 without going backwards.
pub fn assert_normalized(solution: &EdgeSolution) {
    assert!(solution.success, "{} did not resolve", solution.axis);
    let first = solution.edges.first().copied().unwrap();
    let last = solution.edges.last().copied().unwrap();
    assert_close(first, 0.0);
    assert_close(last, 1.0);
    for pair in solution.edges.windows(2) {
        assert!(
            pair[1] >= pair[0] - EPS,
            "{} edges decrease: {:?}",
            solution.axis,
            solution.edges
        );
    }
    let total: f64 = solution.edges.windows(2).map(|pair| pair[1] - pair[0]).sum();
    assert_close(total, 1.0);
}

/// Same shape, ids, spans, flags and content. Extents compare bit for bit,
/// so unknown (`NaN`) components match each other.
pub fn assert_same_grid(actual: &GridModel, expected: &GridModel) {
    assert_eq!(
        (actual.rows(), actual.cols()),
        (expected.rows(), expected.cols())
    );
    assert_eq!(actual.unique_ids(), expected.unique_ids());
    let bits = |e: &Extent| [e.left, e.top, e.width, e.height].map(f64::to_bits);
    let without_extent = |c: &Cell| Cell {
        extent: Extent::default(),
        ..c.clone()
    };
    for (a, e) in actual.unique_cells().into_iter().zip(expected.unique_cells()) {
        assert_eq!(
            bits(&a.extent),
            bits(&e.extent),
            "cell {} extent {} != {}",
            a.id,
            a.extent,
            e.extent
        );
        assert_eq!(without_extent(a), without_extent(e));
    }
}

/// Selection extent equals the union of its members.
pub fn assert_selection_consistent(layout: &GridLayout) {
    let expected = layout
        .selected_cells()
        .iter()
        .map(|id| layout.cell(*id).expect("selected cell exists").integer_extent())
        .fold(GridRect::EMPTY, |acc, rect| acc.union(&rect));
    assert_eq!(layout.selected_extent(), expected);
    assert_eq!(
        layout.selected_extent() == GridRect::EMPTY,
        layout.selected_cells().is_empty()
    );
}
