use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    /// Horizontal bands, indexed top to bottom.
    Rows,
    /// Vertical bands, indexed left to right.
    Columns,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows => f.write_str("rows"),
            Self::Columns => f.write_str("columns"),
        }
    }
}

/// A half-open run of grid indices `[start, start + span)` along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AxisRange {
    pub start: u32,
    pub span: u32,
}

impl AxisRange {
    pub fn new(start: u32, span: u32) -> Self {
        Self { start, span }
    }

    /// One past the last index.
    pub fn end(&self) -> u32 {
        self.start + self.span
    }

    /// True if `other` lies entirely inside this range.
    pub fn contains(&self, other: &AxisRange) -> bool {
        other.start >= self.start && other.end() <= self.end()
    }

    /// Overlap of two ranges, `None` when they are disjoint.
    pub fn intersection(&self, other: &AxisRange) -> Option<AxisRange> {
        let start = self.start.max(other.start);
        let end = self.end().min(other.end());
        (end > start).then(|| AxisRange::new(start, end - start))
    }
}

/// Integer occupancy rectangle of a cell: `(column, row, column_span, row_span)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRect {
    pub col: u32,
    pub row: u32,
    pub col_span: u32,
    pub row_span: u32,
}

impl GridRect {
    /// The empty rectangle `(0,0,0,0)`.
    pub const EMPTY: GridRect = GridRect {
        col: 0,
        row: 0,
        col_span: 0,
        row_span: 0,
    };

    pub fn new(col: u32, row: u32, col_span: u32, row_span: u32) -> Self {
        Self {
            col,
            row,
            col_span,
            row_span,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.col_span == 0 || self.row_span == 0
    }

    /// Projection onto one axis.
    pub fn range(&self, axis: Axis) -> AxisRange {
        match axis {
            Axis::Rows => AxisRange::new(self.row, self.row_span),
            Axis::Columns => AxisRange::new(self.col, self.col_span),
        }
    }

    /// Smallest rectangle containing both. An empty operand is ignored.
    #[must_use]
    pub fn union(&self, other: &GridRect) -> GridRect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let col = self.col.min(other.col);
        let row = self.row.min(other.row);
        let right = (self.col + self.col_span).max(other.col + other.col_span);
        let bottom = (self.row + self.row_span).max(other.row + other.row_span);
        GridRect::new(col, row, right - col, bottom - row)
    }

    /// True if the interiors overlap.
    pub fn intersects(&self, other: &GridRect) -> bool {
        self.range(Axis::Rows)
            .intersection(&other.range(Axis::Rows))
            .is_some()
            && self
                .range(Axis::Columns)
                .intersection(&other.range(Axis::Columns))
                .is_some()
    }

    /// True if `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &GridRect) -> bool {
        self.range(Axis::Rows).contains(&other.range(Axis::Rows))
            && self.range(Axis::Columns).contains(&other.range(Axis::Columns))
    }
}

impl fmt::Display for GridRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.col, self.row, self.col_span, self.row_span
        )
    }
}

/// Normalized rectangle, every component a fraction of the whole layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Leading edge along `axis` (top for rows, left for columns).
    pub fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Rows => self.top,
            Axis::Columns => self.left,
        }
    }

    /// Size along `axis` (height for rows, width for columns).
    pub fn size(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Rows => self.height,
            Axis::Columns => self.width,
        }
    }

    /// Copy with the `axis` component replaced.
    #[must_use]
    pub fn with_axis(&self, axis: Axis, start: f64, size: f64) -> Extent {
        match axis {
            Axis::Rows => Extent::new(self.left, start, self.width, size),
            Axis::Columns => Extent::new(start, self.top, size, self.height),
        }
    }

    /// True if either dimension is zero, negative or not finite.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.left, self.top, self.width, self.height
        )
    }
}
