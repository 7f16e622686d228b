//! Occupancy array builder.
//!
//! Structural operations never edit a live array: they collect the final set
//! of cells and write them into a fresh `Occupancy`, which refuses overlaps and
//! reports gaps before anything is swapped in.

use crate::error::{GridError, Result};
use crate::types::{Cell, CellId};

pub(crate) struct Occupancy {
    rows: u32,
    cols: u32,
    slots: Vec<Option<CellId>>,
}

impl Occupancy {
    pub(crate) fn new(rows: u32, cols: u32) -> Result<Self> {
        let len = (rows as usize)
            .checked_mul(cols as usize)
            .ok_or(GridError::InvalidDimensions { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            slots: vec![None; len],
        })
    }

    /// Write `cell`'s id into every slot of its integer extent.
    pub(crate) fn set_cell(&mut self, cell: &Cell) -> Result<()> {
        let rect = cell.integer_extent();
        if rect.is_empty()
            || rect.row.saturating_add(rect.row_span) > self.rows
            || rect.col.saturating_add(rect.col_span) > self.cols
        {
            return Err(GridError::Inconsistent(format!(
                "cell {} at {} does not fit a {}x{} grid",
                cell.id, rect, self.rows, self.cols
            )));
        }

        let cols = self.cols as usize;
        for row in rect.row..rect.row + rect.row_span {
            for col in rect.col..rect.col + rect.col_span {
                let idx = row as usize * cols + col as usize;
                let Some(slot) = self.slots.get_mut(idx) else {
                    continue;
                };
                if let Some(other) = *slot {
                    return Err(GridError::Inconsistent(format!(
                        "cell {} overlaps cell {} at ({row},{col})",
                        cell.id, other
                    )));
                }
                *slot = Some(cell.id);
            }
        }
        Ok(())
    }

    /// Finished row-major slot array; fails if any slot is still empty.
    pub(crate) fn finish(self) -> Result<Vec<CellId>> {
        let cols = self.cols.max(1) as usize;
        self.slots
            .into_iter()
            .enumerate()
            .map(|(idx, slot)| {
                slot.ok_or_else(|| {
                    GridError::Inconsistent(format!(
                        "no cell covers ({},{})",
                        idx / cols,
                        idx % cols
                    ))
                })
            })
            .collect()
    }
}
