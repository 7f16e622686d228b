//! Edge position inference.
//!
//! Cells only carry their own normalized extent, so the position of every
//! row/column boundary has to be reconstructed from partial information.
//! The solver runs the same sequence of passes on either axis:
//!
//! 1. seed boundary positions from every cell's start/end, then size each
//!    index from a unit-span cell, a uniform span group, or a minimum-span
//!    cell that every other crossing cell contains
//! 2. subtract known sizes out of multi-span cells until nothing changes
//! 3. accumulate boundaries forward where start and size are known
//! 4. spread each unknown run evenly up to the nearest known boundary
//! 5. accumulate again
//!
//! Unknown values are `NaN` until resolved.

use crate::grid::GridModel;
use crate::types::{Axis, AxisRange, Cell};

/// Boundary positions along one axis
#[derive(Debug, Clone)]
pub struct EdgeSolution {
    pub axis: Axis,
    /// `count + 1` boundary positions, `edges[0] == 0`
    pub edges: Vec<f64>,
    /// `count` band sizes
    pub sizes: Vec<f64>,
    /// True iff every edge and size is known
    pub success: bool,
}

impl EdgeSolution {
    /// Position of boundary `index`, `None` if out of range or unresolved.
    pub fn edge(&self, index: u32) -> Option<f64> {
        self.edges
            .get(index as usize)
            .copied()
            .filter(|v| !v.is_nan())
    }

    /// Total size of a run of bands, summed band by band.
    pub fn range_size(&self, range: AxisRange) -> Option<f64> {
        let mut total = 0.0;
        for index in range.start..range.end() {
            total += self.edge(index + 1)? - self.edge(index)?;
        }
        Some(total)
    }

    /// Band containing normalized `position` (binary search over edges).
    pub fn index_at(&self, position: f64) -> Option<u32> {
        if !self.success || self.edges.len() < 2 {
            return None;
        }
        let last = self.edges.len() - 2;
        let idx = match self
            .edges
            .binary_search_by(|pos| pos.partial_cmp(&position).unwrap_or(std::cmp::Ordering::Equal))
        {
            Ok(i) => i.min(last),
            Err(i) => i.saturating_sub(1).min(last),
        };
        u32::try_from(idx).ok()
    }
}

fn known(value: f64) -> bool {
    !value.is_nan()
}

fn get(values: &[f64], index: u32) -> f64 {
    values.get(index as usize).copied().unwrap_or(f64::NAN)
}

fn set(values: &mut [f64], index: u32, value: f64) {
    if let Some(slot) = values.get_mut(index as usize) {
        *slot = value;
    }
}

fn set_if_unknown(values: &mut [f64], index: u32, value: f64) {
    if let Some(slot) = values.get_mut(index as usize) {
        if slot.is_nan() {
            *slot = value;
        }
    }
}

/// Give every band of `cell` an equal share of its size.
fn distribute(sizes: &mut [f64], cell: &Cell, axis: Axis) {
    let range = cell.range(axis);
    let share = cell.extent.size(axis) / f64::from(range.span);
    for index in range.start..range.end() {
        set_if_unknown(sizes, index, share);
    }
}

/// Infer boundary positions along `axis` from the cells in `grid`.
pub fn solve_edges(grid: &GridModel, axis: Axis) -> EdgeSolution {
    let count = grid.count(axis);
    let groups = grid.intersecting(axis);
    let mut sizes = vec![f64::NAN; count as usize];
    let mut edges = vec![f64::NAN; count as usize + 1];
    set(&mut edges, 0, 0.0);

    for cell in grid.unique_cells() {
        let range = cell.range(axis);
        let start = cell.extent.start(axis);
        set_if_unknown(&mut edges, range.start, start);
        set_if_unknown(&mut edges, range.end(), start + cell.extent.size(axis));
    }

    discover_sizes(&groups, axis, &mut sizes, &mut edges);
    subtract_known(&groups, axis, &mut sizes);
    accumulate(&mut edges, &sizes);
    fill_gaps(&mut edges, &mut sizes);
    accumulate(&mut edges, &sizes);

    let success = sizes.iter().chain(edges.iter()).all(|v| known(*v));
    tracing::debug!(
        %axis,
        count,
        success,
        unresolved = sizes.iter().filter(|v| !known(**v)).count(),
        "solved edges"
    );

    EdgeSolution {
        axis,
        edges,
        sizes,
        success,
    }
}

fn discover_sizes(groups: &[Vec<&Cell>], axis: Axis, sizes: &mut [f64], edges: &mut [f64]) {
    for (index, group) in (0u32..).zip(groups) {
        if known(get(sizes, index)) {
            continue;
        }

        let Some(first) = group.first() else {
            // Nothing crosses this band; it has no size.
            set(sizes, index, 0.0);
            let top = get(edges, index);
            if known(top) {
                set_if_unknown(edges, index + 1, top);
            }
            continue;
        };

        if let Some(unit) = group.iter().find(|c| c.range(axis).span == 1) {
            set(sizes, index, unit.extent.size(axis));
            continue;
        }

        let first_range = first.range(axis);
        if group.iter().all(|c| c.range(axis) == first_range) {
            distribute(sizes, first, axis);
            continue;
        }

        let Some(min_cell) = group.iter().min_by_key(|c| c.range(axis).span) else {
            continue;
        };
        let min_range = min_cell.range(axis);
        if group.iter().all(|c| c.range(axis).contains(&min_range)) {
            distribute(sizes, min_cell, axis);
        }
    }
}

fn subtract_known(groups: &[Vec<&Cell>], axis: Axis, sizes: &mut [f64]) {
    loop {
        let mut progress = false;
        for (index, group) in (0u32..).zip(groups) {
            if known(get(sizes, index)) {
                continue;
            }
            for cell in group {
                let range = cell.range(axis);
                if range.span < 2 {
                    continue;
                }
                let remainder = (range.start..range.end())
                    .filter(|other| *other != index)
                    .try_fold(cell.extent.size(axis), |acc, other| {
                        let size = get(sizes, other);
                        known(size).then_some(acc - size)
                    });
                if let Some(size) = remainder {
                    set(sizes, index, size);
                    progress = true;
                    break;
                }
            }
        }
        if !progress {
            break;
        }
    }
}

fn accumulate(edges: &mut [f64], sizes: &[f64]) {
    for (index, size) in (0u32..).zip(sizes.iter().copied()) {
        let top = get(edges, index);
        if known(top) && known(size) {
            set_if_unknown(edges, index + 1, top + size);
        }
    }
}

fn fill_gaps(edges: &mut [f64], sizes: &mut [f64]) {
    let Ok(count) = u32::try_from(sizes.len()) else {
        return;
    };
    let mut index = 0;
    while index < count {
        if known(get(sizes, index)) || !known(get(edges, index)) {
            index += 1;
            continue;
        }

        let mut run_end = index;
        while run_end + 1 < count && !known(get(sizes, run_end + 1)) {
            run_end += 1;
        }

        let Some(bound) = (index + 1..=run_end + 1).find(|e| known(get(edges, *e))) else {
            index = run_end + 1;
            continue;
        };

        let share = (get(edges, bound) - get(edges, index)) / f64::from(bound - index);
        for band in index..bound {
            set(sizes, band, share);
            let top = get(edges, band);
            set_if_unknown(edges, band + 1, top + share);
        }
        index = bound;
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
    use crate::types::{CellId, Extent};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_uniform_grid_edges() {
        let grid = GridModel::new(4, 2).unwrap();
        let rows = solve_edges(&grid, Axis::Rows);
        assert!(rows.success);
        assert_eq!(rows.edges.len(), 5);
        for (i, e) in rows.edges.iter().enumerate() {
            assert!(approx(*e, i as f64 * 0.25));
        }
        let cols = solve_edges(&grid, Axis::Columns);
        assert!(cols.success);
        assert!(approx(cols.edges[1], 0.5));
    }

    #[test]
    fn test_uniform_span_group_is_split_evenly() {
        // One cell spanning both columns of a 1x2 grid.
        let cell = Cell {
            column_span: 2,
            ..Cell::new(CellId(0), 0, 0, Extent::new(0.0, 0.0, 1.0, 1.0))
        };
        let grid = GridModel::from_cells(1, 2, vec![cell], 1).unwrap();
        let cols = solve_edges(&grid, Axis::Columns);
        assert!(cols.success);
        assert!(approx(cols.sizes[0], 0.5));
        assert!(approx(cols.edges[2], 1.0));
    }

    #[test]
    fn test_subtraction_resolves_remaining_band() {
        // Columns are 0.2 / 0.3 / 0.5 wide. Nothing crossing column 1 has a
        // unit span, so its width has to come out of the top-left cell.
        let a = Cell {
            column_span: 2,
            ..Cell::new(CellId(0), 0, 0, Extent::new(0.0, 0.0, 0.5, 0.5))
        };
        let b = Cell::new(CellId(1), 0, 2, Extent::new(0.5, 0.0, 0.5, 0.5));
        let c = Cell::new(CellId(2), 1, 0, Extent::new(0.0, 0.5, 0.2, 0.5));
        let d = Cell {
            column_span: 2,
            ..Cell::new(CellId(3), 1, 1, Extent::new(0.2, 0.5, 0.8, 0.5))
        };
        let grid = GridModel::from_cells(2, 3, vec![a, b, c, d], 4).unwrap();
        let cols = solve_edges(&grid, Axis::Columns);
        assert!(cols.success);
        assert!(approx(cols.sizes[1], 0.3));
        assert!(approx(cols.edges[1], 0.2));
        assert!(approx(cols.edges[2], 0.5));
        assert!(approx(cols.edges[3], 1.0));
    }

    #[test]
    fn test_gap_is_distributed_between_known_edges() {
        let mut edges = vec![0.0, f64::NAN, f64::NAN, 0.9, f64::NAN];
        let mut sizes = vec![f64::NAN, f64::NAN, f64::NAN, 0.1];
        fill_gaps(&mut edges, &mut sizes);
        accumulate(&mut edges, &sizes);
        assert!(approx(sizes[0], 0.3));
        assert!(approx(sizes[2], 0.3));
        assert!(approx(edges[2], 0.6));
        assert!(approx(edges[4], 1.0));
    }

    #[test]
    fn test_gap_stops_at_nearest_known_edge() {
        let mut edges = vec![0.0, f64::NAN, 0.2, f64::NAN, 1.0];
        let mut sizes = vec![f64::NAN; 4];
        fill_gaps(&mut edges, &mut sizes);
        assert!(approx(sizes[0], 0.1));
        assert!(approx(sizes[1], 0.1));
        assert!(approx(sizes[2], 0.4));
        assert!(approx(sizes[3], 0.4));
    }

    #[test]
    fn test_unresolved_reports_failure() {
        // A 2x2 tiling where both columns are only ever spanned by cells whose
        // extents say nothing about the interior boundary.
        let left = Cell {
            row_span: 2,
            ..Cell::new(CellId(0), 0, 0, Extent::new(0.0, 0.0, f64::NAN, 1.0))
        };
        let right = Cell {
            row_span: 2,
            ..Cell::new(CellId(1), 0, 1, Extent::new(f64::NAN, 0.0, f64::NAN, 1.0))
        };
        let grid = GridModel::from_cells(2, 2, vec![left, right], 2).unwrap();
        let cols = solve_edges(&grid, Axis::Columns);
        assert!(!cols.success);
        assert!(cols.edge(1).is_none());
        assert_eq!(cols.edge(0), Some(0.0));
    }

    #[test]
    fn test_index_at() {
        let grid = GridModel::new(4, 1).unwrap();
        let rows = solve_edges(&grid, Axis::Rows);
        assert_eq!(rows.index_at(0.0), Some(0));
        assert_eq!(rows.index_at(0.3), Some(1));
        assert_eq!(rows.index_at(0.5), Some(2));
        assert_eq!(rows.index_at(1.0), Some(3));
    }

    #[test]
    fn test_range_size_sums_bands() {
        let grid = GridModel::new(3, 3).unwrap();
        let cols = solve_edges(&grid, Axis::Columns);
        let size = cols.range_size(AxisRange::new(0, 2)).unwrap();
        assert!(approx(size, 2.0 / 3.0));
    }
}
