//! Occupancy grid and the arena of distinct cells.
//!
//! A `GridModel` is an immutable snapshot: a `rows x cols` row-major array of
//! cell ids plus the cells those ids refer to. Merge, slice and condense build
//! a new model and the session swaps it in whole.

mod occupancy;

pub(crate) use occupancy::Occupancy;

use std::collections::{HashMap, HashSet};

use crate::error::{GridError, Result};
use crate::types::{Axis, Cell, CellId, Extent};

/// Occupancy array plus the distinct cells it references
#[derive(Debug, Clone, PartialEq)]
pub struct GridModel {
    rows: u32,
    cols: u32,
    /// Row-major cell ids; spanning cells repeat their id
    slots: Vec<CellId>,
    cells: HashMap<CellId, Cell>,
    /// Next id handed out to a newly created cell
    next_id: u32,
}

impl GridModel {
    /// Uniform `rows x cols` grid of unit cells.
    ///
    /// Cell `(r, c)` gets extent `(c/cols, r/rows, 1/cols, 1/rows)`.
    pub fn new(rows: u32, cols: u32) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }

        let row_size = 1.0 / f64::from(rows);
        let col_size = 1.0 / f64::from(cols);
        let mut cells = Vec::new();
        let mut next_id = 0u32;
        for row in 0..rows {
            for col in 0..cols {
                let extent = Extent::new(
                    f64::from(col) * col_size,
                    f64::from(row) * row_size,
                    col_size,
                    row_size,
                );
                cells.push(Cell::new(CellId(next_id), row, col, extent));
                next_id += 1;
            }
        }

        Self::from_cells(rows, cols, cells, next_id)
    }

    /// Build a model from a complete tiling of cells.
    ///
    /// Fails with `Inconsistent` if the cells overlap, leave a gap, reach
    /// outside the grid or share an id. Ids handed out later start above both `next_id` and
    /// every id already present.
    pub fn from_cells(
        rows: u32,
        cols: u32,
        cells: Vec<Cell>,
        next_id: u32,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        let mut ids = HashSet::with_capacity(cells.len());
        if let Some(dup) = cells.iter().find(|cell| !ids.insert(cell.id)) {
            return Err(GridError::Inconsistent(format!(
                "cell {} used more than once",
                dup.id
            )));
        }
        let mut occupancy = Occupancy::new(rows, cols)?;
        for cell in &cells {
            occupancy.set_cell(cell)?;
        }
        let slots = occupancy.finish()?;
        let next_id = cells
            .iter()
            .map(|cell| cell.id.0.saturating_add(1))
            .fold(next_id, u32::max);

        Ok(Self {
            rows,
            cols,
            slots,
            cells: cells.into_iter().map(|cell| (cell.id, cell)).collect(),
            next_id,
        })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of rows or columns.
    pub fn count(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Rows => self.rows,
            Axis::Columns => self.cols,
        }
    }

    /// Number of distinct cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub(crate) fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(&id)
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(&id)
    }

    /// Every cell, in no particular order.
    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.values_mut()
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.cells.contains_key(&id)
    }

    /// Id stored in slot `(row, col)`.
    pub fn id_at(&self, row: u32, col: u32) -> Option<CellId> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.slots
            .get(row as usize * self.cols as usize + col as usize)
            .copied()
    }

    /// Cell covering slot `(row, col)`.
    pub fn cell_at(&self, row: u32, col: u32) -> Option<&Cell> {
        self.id_at(row, col).and_then(|id| self.cell(id))
    }

    /// Distinct ids in row-major scan order, each the first time it is seen.
    pub fn unique_ids(&self) -> Vec<CellId> {
        let mut seen = HashSet::with_capacity(self.cells.len());
        self.slots
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Distinct cells in row-major scan order.
    pub fn unique_cells(&self) -> Vec<&Cell> {
        self.unique_ids()
            .into_iter()
            .filter_map(|id| self.cell(id))
            .collect()
    }

    /// For every index along `axis`, the distinct cells crossing it, in scan
    /// order.
    pub fn intersecting(&self, axis: Axis) -> Vec<Vec<&Cell>> {
        let mut groups: Vec<Vec<&Cell>> = vec![Vec::new(); self.count(axis) as usize];
        for cell in self.unique_cells() {
            let range = cell.range(axis);
            for index in range.start..range.end() {
                if let Some(group) = groups.get_mut(index as usize) {
                    group.push(cell);
                }
            }
        }
        groups
    }

    /// Consume the model, returning its cells in scan order.
    pub(crate) fn into_cells(mut self) -> Vec<Cell> {
        self.unique_ids()
            .into_iter()
            .filter_map(|id| self.cells.remove(&id))
            .collect()
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
    use crate::types::GridRect;

    #[test]
    fn test_uniform_grid() {
        let grid = GridModel::new(2, 4).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.len(), 8);

        let cell = grid.cell_at(1, 3).unwrap();
        assert_eq!(cell.integer_extent(), GridRect::new(3, 1, 1, 1));
        assert_eq!(cell.extent, Extent::new(0.75, 0.5, 0.25, 0.5));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            GridModel::new(0, 3),
            Err(GridError::InvalidDimensions { rows: 0, cols: 3 })
        ));
    }

    #[test]
    fn test_unique_ids_follow_scan_order() {
        let grid = GridModel::new(2, 2).unwrap();
        let ids: Vec<u32> = grid.unique_ids().iter().map(|id| id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_spanning_cell_dedup() {
        let mut cells = GridModel::new(2, 2).unwrap().into_cells();
        // Widen cell 0 over cell 1
        cells.retain(|c| c.id != CellId(1));
        cells[0].column_span = 2;
        let grid = GridModel::from_cells(2, 2, cells, 4).unwrap();

        assert_eq!(grid.len(), 3);
        assert_eq!(grid.id_at(0, 1), Some(CellId(0)));
        assert_eq!(grid.unique_ids(), vec![CellId(0), CellId(2), CellId(3)]);

        let by_col = grid.intersecting(Axis::Columns);
        assert_eq!(by_col[1].len(), 2);
        assert_eq!(by_col[1][0].id, CellId(0));
    }

    #[test]
    fn test_overlap_and_gap_detected() {
        let mut cells = GridModel::new(1, 2).unwrap().into_cells();
        cells[0].column_span = 2;
        assert!(matches!(
            GridModel::from_cells(1, 2, cells.clone(), 2),
            Err(GridError::Inconsistent(_))
        ));

        cells.truncate(1);
        cells[0].column_span = 1;
        assert!(matches!(
            GridModel::from_cells(1, 2, cells, 2),
            Err(GridError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut cells = GridModel::new(1, 2).unwrap().into_cells();
        cells[1].id = CellId(0);
        let err = GridModel::from_cells(1, 2, cells, 2).unwrap_err();
        assert!(matches!(err, GridError::Inconsistent(ref msg) if msg.contains("#0")));
    }
}
