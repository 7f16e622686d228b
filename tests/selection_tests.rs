//! Selection tests: membership, bounding extent, shift-extend closure and
//! the flags the session keeps in step with them.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{assert_selection_consistent, id_at, layout};
use gridlayout::{CellId, GridError, GridRect, LayoutEvent};

#[test]
fn test_add_and_remove_are_idempotent() {
    let mut layout = layout(3, 3);
    layout.take_events();

    layout.add_to_selection(CellId(4)).unwrap();
    layout.add_to_selection(CellId(4)).unwrap();
    assert_eq!(layout.selected_cells(), &[CellId(4)]);
    assert_eq!(layout.selected_extent(), GridRect::new(1, 1, 1, 1));
    assert_eq!(layout.take_events(), vec![LayoutEvent::SelectionChanged]);

    layout.remove_from_selection(CellId(4));
    layout.remove_from_selection(CellId(4));
    assert!(layout.selected_cells().is_empty());
    assert_eq!(layout.selected_extent(), GridRect::EMPTY);
    assert_eq!(layout.take_events(), vec![LayoutEvent::SelectionChanged]);
}

#[test]
fn test_extent_tracks_members() {
    let mut layout = layout(4, 4);
    layout.merge(1, 1, 2, 2).unwrap();
    layout.add_to_selection(CellId(0)).unwrap();
    assert_selection_consistent(&layout);
    layout.add_to_selection(CellId(5)).unwrap();
    assert_eq!(layout.selected_extent(), GridRect::new(0, 0, 3, 3));
    assert_selection_consistent(&layout);
    layout.remove_from_selection(CellId(0));
    assert_eq!(layout.selected_extent(), GridRect::new(1, 1, 2, 2));
    assert_selection_consistent(&layout);
}

#[test]
fn test_flags_follow_selection() {
    let mut layout = layout(2, 2);
    layout.add_to_selection(CellId(1)).unwrap();
    let flags = layout.cell(CellId(1)).unwrap().flags;
    assert!(flags.selected && flags.highlighted);

    layout.select_all();
    for cell in layout.unique_elements() {
        assert!(cell.flags.selected);
        assert!(!cell.flags.highlighted);
    }

    layout.begin_edit(CellId(2)).unwrap();
    layout.clear_selection();
    assert_eq!(layout.editing(), None);
    for cell in layout.unique_elements() {
        assert!(!cell.flags.selected && !cell.flags.highlighted && !cell.flags.editing);
    }
}

#[test]
fn test_select_all_takes_one_entry_per_cell() {
    let mut layout = layout(4, 4);
    layout.merge(0, 0, 2, 2).unwrap();
    layout.select_all();
    assert_eq!(layout.selected_cells().len(), 13);
    assert_eq!(layout.selected_cells()[0], CellId(0));
    assert_eq!(layout.selected_extent(), GridRect::new(0, 0, 4, 4));
}

#[test]
fn test_extend_grows_until_no_cell_is_cut() {
    // The merged block in the lower right pulls the whole grid in.
    let mut layout = layout(3, 3);
    layout.merge(1, 1, 2, 2).unwrap();
    layout.add_to_selection(id_at(&layout, 1, 0)).unwrap();
    layout.extend_selection(id_at(&layout, 0, 1)).unwrap();

    assert_eq!(layout.selected_cells().len(), 6);
    assert_eq!(layout.selected_extent(), GridRect::new(0, 0, 3, 3));
    assert_selection_consistent(&layout);
}

#[test]
fn test_extend_stays_tight_on_uniform_grid() {
    let mut layout = layout(4, 4);
    layout.add_to_selection(CellId(5)).unwrap();
    layout.extend_selection(CellId(10)).unwrap();
    assert_eq!(layout.selected_cells().len(), 4);
    assert_eq!(layout.selected_extent(), GridRect::new(1, 1, 2, 2));
}

#[test]
fn test_extend_from_empty_selects_clicked_cell() {
    let mut layout = layout(2, 2);
    layout.extend_selection(CellId(3)).unwrap();
    assert_eq!(layout.selected_cells(), &[CellId(3)]);
    assert!(matches!(
        layout.extend_selection(CellId(40)),
        Err(GridError::UnknownCell(CellId(40)))
    ));
}

#[test]
fn test_slice_drops_removed_cell_from_selection() {
    let mut layout = layout(2, 2);
    layout.add_to_selection(CellId(0)).unwrap();
    layout.add_to_selection(CellId(3)).unwrap();
    layout.slice_horizontally(CellId(0), 2).unwrap();

    assert_eq!(layout.selected_cells(), &[CellId(3)]);
    assert_eq!(layout.selected_extent(), GridRect::new(2, 1, 1, 1));
    assert_selection_consistent(&layout);
}

#[test]
fn test_point_hit_testing() {
    let mut layout = layout(3, 3);
    layout.merge(1, 1, 2, 2).unwrap();
    let merged = id_at(&layout, 1, 1);
    assert_eq!(layout.cell_at_point(0.9, 0.9).map(|c| c.id), Some(merged));
    assert_eq!(layout.cell_at_point(0.1, 0.9).map(|c| c.id), Some(CellId(6)));
    assert!(layout.cell_at_point(-0.1, 0.5).is_none());
}
