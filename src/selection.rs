//! Selected cells and their bounding occupancy rectangle.

use std::collections::HashSet;

use crate::error::{GridError, Result};
use crate::grid::GridModel;
use crate::types::{CellId, GridRect};

/// Ordered set of selected cells plus their cached bounding rectangle
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Insertion order, no duplicates
    cells: Vec<CellId>,
    /// Union of every member's integer extent, `GridRect::EMPTY` when empty
    extent: GridRect,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    pub fn extent(&self) -> GridRect {
        self.extent
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.cells.contains(&id)
    }

    /// Add `id`; returns whether membership changed.
    pub fn add(&mut self, grid: &GridModel, id: CellId) -> Result<bool> {
        if !grid.contains(id) {
            return Err(GridError::UnknownCell(id));
        }
        let added = !self.contains(id);
        if added {
            self.cells.push(id);
        }
        self.recompute(grid);
        Ok(added)
    }

    /// Remove `id`; returns whether membership changed.
    pub fn remove(&mut self, grid: &GridModel, id: CellId) -> bool {
        let before = self.cells.len();
        self.cells.retain(|member| *member != id);
        self.recompute(grid);
        self.cells.len() != before
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.extent = GridRect::EMPTY;
    }

    /// Select one entry per distinct cell, in scan order.
    pub fn select_all(&mut self, grid: &GridModel) {
        self.cells = grid.unique_ids();
        self.recompute(grid);
    }

    /// Drop members that no longer exist in `grid`; returns whether any did.
    pub fn retain_existing(&mut self, grid: &GridModel) -> bool {
        let before = self.cells.len();
        self.cells.retain(|id| grid.contains(*id));
        self.recompute(grid);
        self.cells.len() != before
    }

    fn recompute(&mut self, grid: &GridModel) {
        self.extent = self
            .cells
            .iter()
            .filter_map(|id| grid.cell(*id))
            .fold(GridRect::EMPTY, |acc, cell| acc.union(&cell.integer_extent()));
    }
}

/// Grow `seed` until no cell outside `members` intersects it.
///
/// Each intersecting cell is taken in and the rectangle widened to cover it;
/// scanning repeats until a full pass adds nothing. Returns the newly taken
/// cells in the order they were found and the final rectangle.
pub fn close_over(
    grid: &GridModel,
    seed: GridRect,
    members: &[CellId],
) -> (Vec<CellId>, GridRect) {
    let mut taken: HashSet<CellId> = members.iter().copied().collect();
    let mut added = Vec::new();
    let mut rect = seed;
    let cells = grid.unique_cells();

    loop {
        let mut grew = false;
        for cell in &cells {
            if taken.contains(&cell.id) {
                continue;
            }
            let extent = cell.integer_extent();
            if extent.intersects(&rect) {
                rect = rect.union(&extent);
                taken.insert(cell.id);
                added.push(cell.id);
                grew = true;
            }
        }
        if !grew {
            break;
        }
    }
    (added, rect)
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
    fn test_add_is_idempotent() {
        let grid = GridModel::new(2, 2).unwrap();
        let mut selection = Selection::new();
        assert!(selection.add(&grid, CellId(0)).unwrap());
        assert!(!selection.add(&grid, CellId(0)).unwrap());
        assert_eq!(selection.len(), 1);
        assert_eq!(selection.extent(), GridRect::new(0, 0, 1, 1));
    }

    #[test]
    fn test_extent_is_union() {
        let grid = GridModel::new(3, 3).unwrap();
        let mut selection = Selection::new();
        selection.add(&grid, CellId(0)).unwrap();
        selection.add(&grid, CellId(8)).unwrap();
        assert_eq!(selection.extent(), GridRect::new(0, 0, 3, 3));

        selection.remove(&grid, CellId(0));
        assert_eq!(selection.extent(), GridRect::new(2, 2, 1, 1));
        selection.remove(&grid, CellId(8));
        assert_eq!(selection.extent(), GridRect::EMPTY);
    }

    #[test]
    fn test_unknown_cell_rejected() {
        let grid = GridModel::new(1, 1).unwrap();
        let mut selection = Selection::new();
        assert!(matches!(
            selection.add(&grid, CellId(5)),
            Err(GridError::UnknownCell(CellId(5)))
        ));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_close_over_uniform_grid() {
        let grid = GridModel::new(3, 3).unwrap();
        let (added, rect) = close_over(&grid, GridRect::new(0, 0, 2, 2), &[]);
        assert_eq!(added.len(), 4);
        assert_eq!(rect, GridRect::new(0, 0, 2, 2));
    }
}
