use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Axis, AxisRange, Extent, GridRect};

/// Stable identity of a cell within one editing session.
///
/// Every occupancy slot a spanning cell covers stores the same id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct CellId(pub u32);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle to presentation state (text, image, border) owned by the
/// host. Slicing hands the same handle to every fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHandle(pub u64);

/// Interaction flags the engine stores but does not interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFlags {
    pub selected: bool,
    pub locked: bool,
    pub editing: bool,
    pub highlighted: bool,
}

/// One occupant of the grid, possibly spanning several rows/columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub id: CellId,
    /// Top row (0-indexed)
    pub row: u32,
    /// Left column (0-indexed)
    pub column: u32,
    pub row_span: u32,
    pub column_span: u32,
    /// Normalized position and size
    pub extent: Extent,
    pub flags: CellFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentHandle>,
}

impl Cell {
    /// A unit cell at `(row, column)`.
    pub fn new(id: CellId, row: u32, column: u32, extent: Extent) -> Self {
        Self {
            id,
            row,
            column,
            row_span: 1,
            column_span: 1,
            extent,
            flags: CellFlags::default(),
            content: None,
        }
    }

    /// True when the cell covers more than one slot.
    pub fn is_group(&self) -> bool {
        self.row_span > 1 || self.column_span > 1
    }

    /// `(column, row, column_span, row_span)`.
    pub fn integer_extent(&self) -> GridRect {
        GridRect::new(self.column, self.row, self.column_span, self.row_span)
    }

    /// Occupied indices along `axis`.
    pub fn range(&self, axis: Axis) -> AxisRange {
        self.integer_extent().range(axis)
    }

    pub(crate) fn set_range(&mut self, axis: Axis, range: AxisRange) {
        match axis {
            Axis::Rows => {
                self.row = range.start;
                self.row_span = range.span;
            }
            Axis::Columns => {
                self.column = range.start;
                self.column_span = range.span;
            }
        }
    }

    /// A copy carrying this cell's flags and content under a new id.
    pub(crate) fn fragment(&self, id: CellId) -> Cell {
        Cell { id, ..self.clone() }
    }

    /// Caption shown by hosts that have nothing better to display: the
    /// extent on the first line, `row,col,rowSpan,colSpan` on the second.
    pub fn label(&self) -> String {
        format!(
            "{}\n{},{},{},{}",
            self.extent, self.row, self.column, self.row_span, self.column_span
        )
    }
}
