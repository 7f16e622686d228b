//! Editing session around a `GridModel`.
//!
//! `GridLayout` owns the current grid, the selection and the pending events.
//! Structural operations (slice, merge) build a complete new `GridModel`
//! and only swap it in on success, so a failed call leaves everything as it
//! was.

mod condense;
mod merge;
mod slice;

pub use condense::{condense, find_band};
pub use merge::{merge, validate_range};
pub use slice::slice;

use crate::config::LayoutConfig;
use crate::error::{GridError, Result};
use crate::export::{self, ExportRecord};
use crate::grid::GridModel;
use crate::layout::{solve_edges, EdgeSolution};
use crate::selection::{close_over, Selection};
use crate::types::{Axis, Cell, CellId, ContentHandle, GridRect};

/// Coarse change notifications for a presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutEvent {
    /// The grid was rebuilt; re-read every cell.
    GridReplaced { rows: u32, cols: u32 },
    SelectionChanged,
}

/// One editing session: grid, selection, edit state and event queue.
#[derive(Debug, Clone)]
pub struct GridLayout {
    grid: GridModel,
    selection: Selection,
    config: LayoutConfig,
    /// Cell currently being edited, at most one
    editing: Option<CellId>,
    events: Vec<LayoutEvent>,
}

impl GridLayout {
    /// A uniform `rows x cols` layout with default settings.
    pub fn new(rows: u32, cols: u32) -> Result<Self> {
        Self::with_config(rows, cols, LayoutConfig::default())
    }

    pub fn with_config(rows: u32, cols: u32, config: LayoutConfig) -> Result<Self> {
        let grid = GridModel::new(rows, cols)?;
        Ok(Self {
            grid,
            selection: Selection::new(),
            config,
            editing: None,
            events: vec![LayoutEvent::GridReplaced { rows, cols }],
        })
    }

    /// Start a session from an existing model.
    pub fn from_model(grid: GridModel, config: LayoutConfig) -> Self {
        let (rows, cols) = (grid.rows(), grid.cols());
        Self {
            grid,
            selection: Selection::new(),
            config,
            editing: None,
            events: vec![LayoutEvent::GridReplaced { rows, cols }],
        }
    }

    /// Discard everything and start over with a uniform grid.
    pub fn create_grid(&mut self, rows: u32, cols: u32) -> Result<()> {
        let grid = GridModel::new(rows, cols)?;
        let had_selection = !self.selection.is_empty();
        self.selection.clear();
        self.editing = None;
        self.replace_grid(grid);
        if had_selection {
            self.events.push(LayoutEvent::SelectionChanged);
        }
        Ok(())
    }

    // ---- Read access ----

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn rows(&self) -> u32 {
        self.grid.rows()
    }

    pub fn cols(&self) -> u32 {
        self.grid.cols()
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.grid.cell(id)
    }

    /// Cell covering slot `(row, col)`.
    pub fn cell_at(&self, row: u32, col: u32) -> Option<&Cell> {
        self.grid.cell_at(row, col)
    }

    /// Distinct cells in scan order.
    pub fn unique_elements(&self) -> Vec<&Cell> {
        self.grid.unique_cells()
    }

    pub fn row_edge_positions(&self) -> EdgeSolution {
        solve_edges(&self.grid, Axis::Rows)
    }

    pub fn column_edge_positions(&self) -> EdgeSolution {
        solve_edges(&self.grid, Axis::Columns)
    }

    /// Cell under a normalized point, when both axes resolve.
    pub fn cell_at_point(&self, x: f64, y: f64) -> Option<&Cell> {
        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return None;
        }
        let row = self.row_edge_positions().index_at(y)?;
        let col = self.column_edge_positions().index_at(x)?;
        self.grid.cell_at(row, col)
    }

    // ---- Structural edits ----

    /// Cut `id` into `parts` side-by-side pieces.
    pub fn slice_horizontally(&mut self, id: CellId, parts: u32) -> Result<()> {
        self.slice_cell(id, Axis::Columns, parts)
    }

    /// Cut `id` into `parts` stacked pieces.
    pub fn slice_vertically(&mut self, id: CellId, parts: u32) -> Result<()> {
        self.slice_cell(id, Axis::Rows, parts)
    }

    fn slice_cell(&mut self, id: CellId, axis: Axis, parts: u32) -> Result<()> {
        match slice(&self.grid, id, axis, parts, &self.config) {
            Ok(next) => {
                self.replace_grid(next);
                if self.selection.retain_existing(&self.grid) {
                    self.events.push(LayoutEvent::SelectionChanged);
                }
                self.sync_flags();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(cell = %id, %axis, parts, error = %err, "slice aborted");
                Err(err)
            }
        }
    }

    /// Merge the range anchored at `(start_row, start_col)`; clears the
    /// selection.
    pub fn merge(
        &mut self,
        start_row: u32,
        start_col: u32,
        row_span: u32,
        col_span: u32,
    ) -> Result<()> {
        match merge(
            &self.grid,
            start_row,
            start_col,
            row_span,
            col_span,
            &self.config,
        ) {
            Ok(next) => {
                self.replace_grid(next);
                self.clear_selection();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    start_row,
                    start_col,
                    row_span,
                    col_span,
                    error = %err,
                    "merge aborted"
                );
                Err(err)
            }
        }
    }

    /// True when the selection spans more than one slot.
    pub fn can_merge(&self) -> bool {
        let extent = self.selection.extent();
        !self.selection.is_empty() && (extent.col_span > 1 || extent.row_span > 1)
    }

    /// Merge the selection's bounding rectangle.
    pub fn merge_selection(&mut self) -> Result<()> {
        let extent = self.selection.extent();
        if !self.can_merge() {
            return Err(GridError::InvalidSpan {
                row_span: extent.row_span,
                col_span: extent.col_span,
            });
        }
        self.merge(extent.row, extent.col, extent.row_span, extent.col_span)
    }

    /// Slice every selected cell, then clear the selection.
    ///
    /// Cells that cannot be sliced for recoverable reasons are skipped;
    /// returns how many were sliced.
    pub fn slice_selection(&mut self, axis: Axis, parts: u32) -> Result<usize> {
        if parts < 2 {
            return Err(GridError::InvalidParts(parts));
        }
        let targets = self.selection.cells().to_vec();
        let mut sliced = 0;
        for id in targets {
            if !self.grid.contains(id) {
                continue;
            }
            match self.slice_cell(id, axis, parts) {
                Ok(()) => sliced += 1,
                Err(err) if err.is_recoverable() => {}
                Err(err) => return Err(err),
            }
        }
        self.clear_selection();
        Ok(sliced)
    }

    // ---- Selection ----

    pub fn selected_cells(&self) -> &[CellId] {
        self.selection.cells()
    }

    /// Bounding rectangle of the selection, `GridRect::EMPTY` when empty.
    pub fn selected_extent(&self) -> GridRect {
        self.selection.extent()
    }

    pub fn add_to_selection(&mut self, id: CellId) -> Result<()> {
        if self.selection.add(&self.grid, id)? {
            if let Some(cell) = self.grid.cell_mut(id) {
                cell.flags.selected = true;
                cell.flags.highlighted = true;
            }
            self.events.push(LayoutEvent::SelectionChanged);
        }
        Ok(())
    }

    pub fn remove_from_selection(&mut self, id: CellId) {
        if self.selection.remove(&self.grid, id) {
            if let Some(cell) = self.grid.cell_mut(id) {
                cell.flags.selected = false;
                cell.flags.highlighted = false;
            }
            self.events.push(LayoutEvent::SelectionChanged);
        }
    }

    /// Deselect everything and stop editing.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.editing = None;
        for cell in self.grid.cells_mut() {
            cell.flags.selected = false;
            cell.flags.highlighted = false;
            cell.flags.editing = false;
        }
        self.events.push(LayoutEvent::SelectionChanged);
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.grid);
        self.editing = None;
        for cell in self.grid.cells_mut() {
            cell.flags.selected = true;
            cell.flags.highlighted = false;
            cell.flags.editing = false;
        }
        self.events.push(LayoutEvent::SelectionChanged);
    }

    /// Shift-click: select every cell the rectangle from the selection to
    /// `id` touches, growing the rectangle until it cuts no cell.
    pub fn extend_selection(&mut self, id: CellId) -> Result<()> {
        let clicked = self
            .grid
            .cell(id)
            .map(Cell::integer_extent)
            .ok_or(GridError::UnknownCell(id))?;
        if self.selection.is_empty() {
            return self.add_to_selection(id);
        }
        let seed = self.selection.extent().union(&clicked);
        let (added, rect) = close_over(&self.grid, seed, self.selection.cells());
        tracing::debug!(added = added.len(), extent = %rect, "extended selection");
        for member in added {
            self.add_to_selection(member)?;
        }
        Ok(())
    }

    // ---- Per-cell state ----

    pub fn set_locked(&mut self, id: CellId, locked: bool) -> Result<()> {
        let cell = self.grid.cell_mut(id).ok_or(GridError::UnknownCell(id))?;
        cell.flags.locked = locked;
        if locked {
            cell.flags.editing = false;
            if self.editing == Some(id) {
                self.editing = None;
            }
        }
        Ok(())
    }

    /// Start editing `id`; refused (returns `false`) for locked cells.
    pub fn begin_edit(&mut self, id: CellId) -> Result<bool> {
        let locked = self
            .grid
            .cell(id)
            .map(|cell| cell.flags.locked)
            .ok_or(GridError::UnknownCell(id))?;
        if locked {
            return Ok(false);
        }
        self.editing = Some(id);
        self.sync_flags();
        Ok(true)
    }

    pub fn end_edit(&mut self) {
        self.editing = None;
        self.sync_flags();
    }

    pub fn editing(&self) -> Option<CellId> {
        self.editing
    }

    /// Attach a host-owned content handle; fragments of a later slice share it.
    pub fn set_content(&mut self, id: CellId, content: Option<ContentHandle>) -> Result<()> {
        let cell = self.grid.cell_mut(id).ok_or(GridError::UnknownCell(id))?;
        cell.content = content;
        Ok(())
    }

    // ---- Output ----

    /// Events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<LayoutEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn export_records(&self) -> Vec<ExportRecord> {
        export::export_records(&self.grid)
    }

    pub fn export_text(&self) -> String {
        export::export_text(&self.grid)
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&export::export_layout(
            &self.grid,
        ))?)
    }

    fn replace_grid(&mut self, grid: GridModel) {
        let (rows, cols) = (grid.rows(), grid.cols());
        tracing::info!(rows, cols, cells = grid.len(), "grid replaced");
        self.grid = grid;
        if self.editing.is_some_and(|id| !self.grid.contains(id)) {
            self.editing = None;
        }
        self.events.push(LayoutEvent::GridReplaced { rows, cols });
    }

    /// Make per-cell flags agree with the selection and edit state.
    fn sync_flags(&mut self) {
        let editing = self.editing;
        for cell in self.grid.cells_mut() {
            cell.flags.selected = self.selection.contains(cell.id);
            cell.flags.highlighted &= cell.flags.selected;
            cell.flags.editing = editing == Some(cell.id);
        }
    }
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
    fn test_failed_slice_leaves_state() {
        let mut layout = GridLayout::new(2, 2).unwrap();
        layout.take_events();
        let before = layout.grid().clone();
        assert!(layout.slice_horizontally(CellId(0), 1).is_err());
        assert_eq!(layout.grid(), &before);
        assert!(layout.take_events().is_empty());
    }

    #[test]
    fn test_slice_prunes_selection() {
        let mut layout = GridLayout::new(1, 2).unwrap();
        layout.add_to_selection(CellId(0)).unwrap();
        layout.add_to_selection(CellId(1)).unwrap();
        layout.slice_vertically(CellId(0), 2).unwrap();
        assert_eq!(layout.selected_cells(), &[CellId(1)]);
        assert_eq!(layout.selected_extent(), GridRect::new(1, 0, 1, 2));
        for cell in layout.unique_elements() {
            assert_eq!(cell.flags.selected, cell.id == CellId(1));
        }
    }

    #[test]
    fn test_merge_clears_selection() {
        let mut layout = GridLayout::new(2, 2).unwrap();
        layout.add_to_selection(CellId(0)).unwrap();
        layout.add_to_selection(CellId(1)).unwrap();
        assert!(layout.can_merge());
        layout.merge_selection().unwrap();
        assert!(layout.selected_cells().is_empty());
        assert_eq!(layout.unique_elements().len(), 3);
        let events = layout.take_events();
        assert!(events.contains(&LayoutEvent::GridReplaced { rows: 2, cols: 2 }));
        assert_eq!(events.last(), Some(&LayoutEvent::SelectionChanged));
    }

    #[test]
    fn test_locked_cell_refuses_edit() {
        let mut layout = GridLayout::new(1, 2).unwrap();
        assert!(layout.begin_edit(CellId(0)).unwrap());
        layout.set_locked(CellId(0), true).unwrap();
        assert_eq!(layout.editing(), None);
        assert!(!layout.begin_edit(CellId(0)).unwrap());
        assert!(layout.begin_edit(CellId(1)).unwrap());
        assert!(layout.cell(CellId(1)).unwrap().flags.editing);
    }

    #[test]
    fn test_cell_at_point() {
        let layout = GridLayout::new(2, 4).unwrap();
        assert_eq!(layout.cell_at_point(0.6, 0.2).map(|c| c.id), Some(CellId(2)));
        assert_eq!(layout.cell_at_point(1.0, 1.0).map(|c| c.id), Some(CellId(7)));
        assert!(layout.cell_at_point(1.5, 0.0).is_none());
    }
}
