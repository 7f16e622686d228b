//! Structured error types for the grid layout engine.
//!
//! Every structural operation either returns a freshly built grid or one of
//! these errors; the caller's grid is never touched on the error path.

use crate::types::{Axis, CellId};

/// All errors that can occur while editing a grid layout.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Grid dimensions must both be at least one.
    #[error("Invalid grid dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: u32, cols: u32 },

    /// Row or column span of zero.
    #[error("Invalid span: {row_span}x{col_span}")]
    InvalidSpan { row_span: u32, col_span: u32 },

    /// Slice count below two, or so large the pieces fall under tolerance.
    #[error("Invalid slice count: {0}")]
    InvalidParts(u32),

    /// Range reaches outside the grid.
    #[error(
        "Range ({row},{col}) {row_span}x{col_span} is outside the {rows}x{cols} grid"
    )]
    OutOfBounds {
        row: u32,
        col: u32,
        row_span: u32,
        col_span: u32,
        rows: u32,
        cols: u32,
    },

    /// A merge range cuts through a spanning cell.
    #[error("Range partially covers cell {0}")]
    RangeSplitsCell(CellId),

    /// No cell with this id exists in the current grid.
    #[error("Unknown cell: {0}")]
    UnknownCell(CellId),

    /// Not enough size information to place every edge on this axis.
    #[error("Edge positions along {0} could not be resolved")]
    Unresolved(Axis),

    /// Target cell has a zero or non-finite size.
    #[error("Cell {0} has a degenerate extent")]
    DegenerateExtent(CellId),

    /// A rebuilt occupancy array left a gap or overlap.
    #[error("Inconsistent grid: {0}")]
    Inconsistent(String),

    /// Malformed command script line.
    #[error("Command error on line {line}: {message}")]
    Command { line: usize, message: String },

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl GridError {
    /// True for conditions a caller can recover from by supplying more size
    /// information or picking another operation order.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Unresolved(_) | Self::DegenerateExtent(_))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
