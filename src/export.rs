//! Plain-data export of the current layout.
//!
//! One record per distinct cell, in scan order, for report/diagnostic
//! consumers. Floats keep full precision (`Display` for `f64` prints the
//! shortest string that round-trips).

use serde::Serialize;
use std::fmt;

use crate::grid::GridModel;
use crate::layout::solve_edges;
use crate::types::{Axis, Extent, GridRect};

/// One distinct cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
    /// Position in scan order
    pub id: usize,
    /// `(col, row, colSpan, rowSpan)`
    pub cell: GridRect,
    /// `(x, y, w, h)`, normalized
    pub extent: Extent,
}

impl fmt::Display for ExportRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id={} cell={} extent={}", self.id, self.cell, self.extent)
    }
}

/// Whole-layout snapshot: dimensions, solved edges and every record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutExport {
    pub rows: u32,
    pub cols: u32,
    /// Unresolved positions serialize as `null`
    pub row_edges: Vec<f64>,
    pub column_edges: Vec<f64>,
    pub resolved: bool,
    pub cells: Vec<ExportRecord>,
}

/// Records for every distinct cell, in scan order.
pub fn export_records(grid: &GridModel) -> Vec<ExportRecord> {
    grid.unique_cells()
        .into_iter()
        .enumerate()
        .map(|(id, cell)| ExportRecord {
            id,
            cell: cell.integer_extent(),
            extent: cell.extent,
        })
        .collect()
}

pub fn export_layout(grid: &GridModel) -> LayoutExport {
    let rows = solve_edges(grid, Axis::Rows);
    let cols = solve_edges(grid, Axis::Columns);
    LayoutExport {
        rows: grid.rows(),
        cols: grid.cols(),
        resolved: rows.success && cols.success,
        row_edges: rows.edges,
        column_edges: cols.edges,
        cells: export_records(grid),
    }
}

/// One `Display` line per record.
pub fn export_text(grid: &GridModel) -> String {
    export_records(grid)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
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

    #[test]
    fn test_records_in_scan_order() {
        let grid = GridModel::new(2, 2).unwrap();
        let records = export_records(&grid);
        assert_eq!(records.len(), 4);
        assert_eq!(records[3].id, 3);
        assert_eq!(records[3].cell, GridRect::new(1, 1, 1, 1));
    }

    #[test]
    fn test_text_line_format() {
        let grid = GridModel::new(1, 2).unwrap();
        let text = export_text(&grid);
        assert_eq!(
            text,
            "id=0 cell=0,0,1,1 extent=0,0,0.5,1\nid=1 cell=1,0,1,1 extent=0.5,0,0.5,1"
        );
    }

    #[test]
    fn test_full_precision() {
        let grid = GridModel::new(1, 3).unwrap();
        let records = export_records(&grid);
        assert_eq!(
            records[1].to_string(),
            format!("id=1 cell=1,0,1,1 extent={},0,{},1", 1.0 / 3.0, 1.0 / 3.0)
        );
    }

    #[test]
    fn test_layout_json() {
        let grid = GridModel::new(2, 1).unwrap();
        let json = serde_json::to_value(export_layout(&grid)).unwrap();
        assert_eq!(json["rows"], 2);
        assert_eq!(json["resolved"], true);
        assert_eq!(json["rowEdges"][1], 0.5);
        assert_eq!(json["cells"][1]["cell"]["row"], 1);
    }
}
