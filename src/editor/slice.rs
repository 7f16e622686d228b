//! Splitting one cell into equal parts along an axis.
//!
//! Cut positions are merged with the boundaries that already run through
//! the target. A cut that lands within epsilon of an existing boundary reuses
//! it; every other cut becomes a new row/column. The result is a monotone
//! map from old boundary indices to new ones, and every cell other than the
//! target is re-placed through that map: cells past a new boundary shift,
//! cells straddling it grow by one.

use std::collections::HashMap;

use crate::config::LayoutConfig;
use crate::error::{GridError, Result};
use crate::grid::GridModel;
use crate::layout::solve_edges;
use crate::types::{Axis, AxisRange, CellId};

use super::condense::condense;

/// Smallest piece a slice may produce, whatever the snap epsilon.
const MIN_PIECE_SIZE: f64 = 1e-6;

/// One boundary inside the target after slicing, in position order.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Boundary {
    /// Pre-existing boundary no cut landed on
    Existing(u32),
    /// New boundary introduced by a cut
    Fresh(f64),
    /// Cut that coincides with a pre-existing boundary
    Snapped { edge: u32, position: f64 },
}

/// Slice `target` into `parts` equal pieces along `axis`.
///
/// `Axis::Columns` produces side-by-side pieces, `Axis::Rows` stacked ones.
pub fn slice(
    grid: &GridModel,
    target: CellId,
    axis: Axis,
    parts: u32,
    config: &LayoutConfig,
) -> Result<GridModel> {
    if parts < 2 {
        return Err(GridError::InvalidParts(parts));
    }
    let cell = grid.cell(target).ok_or(GridError::UnknownCell(target))?;
    if cell.extent.is_degenerate() {
        return Err(GridError::DegenerateExtent(target));
    }

    let solution = solve_edges(grid, axis);
    if !solution.success {
        return Err(GridError::Unresolved(axis));
    }

    let range = cell.range(axis);
    let start_pos = solution
        .edge(range.start)
        .ok_or(GridError::Unresolved(axis))?;
    let end_pos = solution
        .edge(range.end())
        .ok_or(GridError::Unresolved(axis))?;
    let axis_size = end_pos - start_pos;
    if !axis_size.is_finite() || axis_size <= 0.0 {
        return Err(GridError::DegenerateExtent(target));
    }
    // Pieces no wider than the snap tolerance could not be told apart.
    if axis_size / f64::from(parts) <= config.snap_epsilon.max(MIN_PIECE_SIZE) {
        return Err(GridError::InvalidParts(parts));
    }

    let interior = (range.start + 1..range.end())
        .map(|index| {
            solution
                .edge(index)
                .map(|pos| (index, pos))
                .ok_or(GridError::Unresolved(axis))
        })
        .collect::<Result<Vec<_>>>()?;
    let cuts: Vec<f64> = (1..parts)
        .map(|j| start_pos + axis_size * (f64::from(j) / f64::from(parts)))
        .collect();

    let plan = plan_boundaries(&interior, &cuts, config.snap_epsilon);
    let fresh = plan
        .iter()
        .filter(|b| matches!(b, Boundary::Fresh(_)))
        .count();
    let fresh = u32::try_from(fresh).map_err(|_| GridError::InvalidParts(parts))?;

    // Old interior boundary index -> new index.
    let mut interior_map = HashMap::with_capacity(interior.len());
    // (new index, position) of every cut, bracketed by the target's own edges.
    let mut cut_bounds = vec![(range.start, start_pos)];
    for (new_index, boundary) in (range.start + 1..).zip(plan.iter().copied()) {
        match boundary {
            Boundary::Existing(edge) => {
                interior_map.insert(edge, new_index);
            }
            Boundary::Fresh(position) => cut_bounds.push((new_index, position)),
            Boundary::Snapped { edge, position } => {
                interior_map.insert(edge, new_index);
                cut_bounds.push((new_index, position));
            }
        }
    }
    cut_bounds.push((range.end() + fresh, end_pos));

    let remap = |edge: u32| -> Result<u32> {
        if edge <= range.start {
            Ok(edge)
        } else if edge >= range.end() {
            Ok(edge + fresh)
        } else {
            interior_map.get(&edge).copied().ok_or_else(|| {
                GridError::Inconsistent(format!("boundary {edge} missing from slice plan"))
            })
        }
    };

    let mut next_id = grid.next_id();
    let mut fragments = Vec::with_capacity(parts as usize);
    for pair in cut_bounds.windows(2) {
        let [(lo_index, lo_pos), (hi_index, hi_pos)] = pair else {
            continue;
        };
        let mut fragment = cell.fragment(CellId(next_id));
        next_id += 1;
        fragment.set_range(axis, AxisRange::new(*lo_index, hi_index - lo_index));
        fragment.extent = fragment.extent.with_axis(axis, *lo_pos, hi_pos - lo_pos);
        fragments.push(fragment);
    }

    let mut cells = grid
        .unique_cells()
        .into_iter()
        .filter(|other| other.id != target)
        .cloned()
        .collect::<Vec<_>>();
    for other in &mut cells {
        let other_range = other.range(axis);
        let start = remap(other_range.start)?;
        let end = remap(other_range.end())?;
        other.set_range(axis, AxisRange::new(start, end - start));
    }
    cells.extend(fragments);

    let count = grid.count(axis) + fresh;
    let (rows, cols) = match axis {
        Axis::Rows => (count, grid.cols()),
        Axis::Columns => (grid.rows(), count),
    };

    tracing::info!(
        cell = %target,
        %axis,
        parts,
        fresh,
        snapped = parts - 1 - fresh,
        "sliced cell"
    );
    let sliced = GridModel::from_cells(rows, cols, cells, next_id)?;
    condense(sliced, config)
}

/// Walk the existing interior boundaries and the requested cuts together,
/// pairing each cut with at most one boundary within `epsilon`.
fn plan_boundaries(interior: &[(u32, f64)], cuts: &[f64], epsilon: f64) -> Vec<Boundary> {
    let mut plan = Vec::with_capacity(interior.len() + cuts.len());
    let mut edges = interior.iter().copied().peekable();
    let mut cuts = cuts.iter().copied().peekable();

    loop {
        match (edges.peek().copied(), cuts.peek().copied()) {
            (Some((edge, position)), Some(cut)) => {
                if (position - cut).abs() <= epsilon {
                    plan.push(Boundary::Snapped { edge, position });
                    edges.next();
                    cuts.next();
                } else if position < cut {
                    plan.push(Boundary::Existing(edge));
                    edges.next();
                } else {
                    plan.push(Boundary::Fresh(cut));
                    cuts.next();
                }
            }
            (Some((edge, _)), None) => {
                plan.push(Boundary::Existing(edge));
                edges.next();
            }
            (None, Some(cut)) => {
                plan.push(Boundary::Fresh(cut));
                cuts.next();
            }
            (None, None) => break,
        }
    }
    plan
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
    use crate::types::Extent;

    #[test]
    fn test_plan_snaps_matching_cut() {
        let plan = plan_boundaries(&[(1, 0.5)], &[0.25, 0.5, 0.75], 1e-5);
        assert_eq!(
            plan,
            vec![
                Boundary::Fresh(0.25),
                Boundary::Snapped {
                    edge: 1,
                    position: 0.5
                },
                Boundary::Fresh(0.75),
            ]
        );
    }

    #[test]
    fn test_plan_keeps_unmatched_edges_in_order() {
        let plan = plan_boundaries(&[(3, 0.5)], &[1.0 / 3.0, 2.0 / 3.0], 1e-5);
        assert_eq!(
            plan,
            vec![
                Boundary::Fresh(1.0 / 3.0),
                Boundary::Existing(3),
                Boundary::Fresh(2.0 / 3.0),
            ]
        );
    }

    #[test]
    fn test_slice_single_cell() {
        let grid = GridModel::new(1, 1).unwrap();
        let sliced = slice(&grid, CellId(0), Axis::Columns, 2, &LayoutConfig::default()).unwrap();
        assert_eq!((sliced.rows(), sliced.cols()), (1, 2));
        let cells = sliced.unique_cells();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].extent, Extent::new(0.0, 0.0, 0.5, 1.0));
        assert_eq!(cells[1].extent, Extent::new(0.5, 0.0, 0.5, 1.0));
        assert!(sliced.cell(CellId(0)).is_none());
    }

    #[test]
    fn test_slice_pushes_neighbours() {
        // Slicing the top-left cell of a 2x2 grid into two columns widens the
        // bottom-left cell and shifts the right column.
        let grid = GridModel::new(2, 2).unwrap();
        let sliced = slice(&grid, CellId(0), Axis::Columns, 2, &LayoutConfig::default()).unwrap();
        assert_eq!(sliced.cols(), 3);
        let bottom_left = sliced.cell(CellId(2)).unwrap();
        assert_eq!((bottom_left.column, bottom_left.column_span), (0, 2));
        let top_right = sliced.cell(CellId(1)).unwrap();
        assert_eq!((top_right.column, top_right.column_span), (2, 1));
    }

    #[test]
    fn test_slice_reuses_existing_edge() {
        // 2x2 grid, merge the top row, then slice it back in two: the cut
        // lands on the column boundary the bottom row still carries.
        let grid = GridModel::new(2, 2).unwrap();
        let grid = super::super::merge::merge(&grid, 0, 0, 1, 2, &LayoutConfig::default())
            .unwrap();
        assert_eq!(grid.cols(), 2);
        let sliced = slice(&grid, CellId(0), Axis::Columns, 2, &LayoutConfig::default()).unwrap();
        assert_eq!(sliced.cols(), 2);
        assert_eq!(sliced.len(), 4);
    }

    #[test]
    fn test_slice_rejects_bad_input() {
        let grid = GridModel::new(1, 1).unwrap();
        let config = LayoutConfig::default();
        assert!(matches!(
            slice(&grid, CellId(0), Axis::Rows, 1, &config),
            Err(GridError::InvalidParts(1))
        ));
        assert!(matches!(
            slice(&grid, CellId(7), Axis::Rows, 2, &config),
            Err(GridError::UnknownCell(CellId(7)))
        ));
    }

    #[test]
    fn test_pieces_below_tolerance_rejected() {
        let grid = GridModel::new(1, 1).unwrap();
        let config = LayoutConfig::default();
        assert!(matches!(
            slice(&grid, CellId(0), Axis::Columns, u32::MAX, &config),
            Err(GridError::InvalidParts(u32::MAX))
        ));
        // 1/200_000 is under the default 1e-5 tolerance.
        assert!(matches!(
            slice(&grid, CellId(0), Axis::Columns, 200_000, &config),
            Err(GridError::InvalidParts(200_000))
        ));
        // A zero tolerance still refuses absurd counts.
        let exact = config.with_snap_epsilon(0.0);
        assert!(matches!(
            slice(&grid, CellId(0), Axis::Rows, 4_000_000_000, &exact),
            Err(GridError::InvalidParts(4_000_000_000))
        ));
        let sliced = slice(&grid, CellId(0), Axis::Rows, 1000, &config).unwrap();
        assert_eq!(sliced.rows(), 1000);
    }
}
