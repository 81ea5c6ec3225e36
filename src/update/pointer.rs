//! Pointer handling: clicks, drags, the fill handle and double clicks
//!
//! Each event carries the viewport it happened in, so cell hit-testing is
//! recomputed per event from the current column layout.

use tracing::debug;

use super::context_menu::build_items;
use crate::commands::{Cmd, GridEvent};
use crate::geometry::{pointer_to_cell, Point};
use crate::grid::Grid;
use crate::messages::{PointerButton, PointerEvent};
use crate::selection::{Cell, CellTarget, SelectionMode};

/// Cell under the pointer. `pin_bands` keeps header, gutter and sticky bands
/// addressable while scrolled.
fn cursor_cell<T: Clone + PartialEq + 'static>(
    grid: &Grid<T>,
    event: &PointerEvent,
    pin_bands: bool,
) -> Option<Cell> {
    let viewport = if pin_bands {
        event.viewport
    } else {
        event.viewport.without_outer()
    };
    let geometry = grid.geometry(viewport.width);
    pointer_to_cell(event.position, &geometry, &viewport)
}

pub(super) fn pointer_down<T: Clone + PartialEq + 'static>(grid: &mut Grid<T>, event: &PointerEvent) {
    if grid.context_menu_open || grid.loading {
        return;
    }

    let right = event.button == PointerButton::Right;
    let left = event.button == PointerButton::Left;
    let cursor = if event.inside {
        cursor_cell(grid, event, true)
    } else {
        None
    };
    let active = grid.active_cell();

    if !event.inside && grid.editing {
        let keep_focus = active
            .and_then(|a| grid.columns.column_at(a.col))
            .is_some_and(|c| c.keep_focus);
        if keep_focus {
            return;
        }
    }

    grid.sel.left_pressed = left;

    if event.on_expand_handle && grid.expand_available().is_some() {
        let from = active.map_or(0, |a| a.row).max(grid.selection().map_or(0, |s| s.max.row));
        debug!("Fill drag from row {}", from);
        grid.sel.expand.from_row = Some(from.max(0) as usize);
        return;
    }

    let click_on_active = match (cursor, active) {
        (Some(c), Some(a)) => c == a && !grid.is_cell_disabled(a),
        _ => false,
    };
    if click_on_active && grid.editing {
        return;
    }

    let selection = grid.selection();
    let sticky_click =
        grid.columns.has_sticky_right() && cursor.is_some_and(|c| c.col == grid.columns.len() as i32 - 2);

    let in_selection_rows = |c: Cell| selection.is_some_and(|s| s.contains_row(c.row));
    let in_selection_cols = |c: Cell| selection.is_some_and(|s| s.contains_col(c.col));

    let right_in_selection = right && cursor.is_some_and(|c| in_selection_rows(c) && in_selection_cols(c));
    let right_on_selected_headers = right && cursor.is_some_and(|c| c.row == -1 && in_selection_cols(c));
    let right_on_selected_gutter = right && cursor.is_some_and(|c| c.col == -1 && in_selection_rows(c));
    let sticky_in_selection = sticky_click && cursor.is_some_and(in_selection_rows);

    let shift_extend = event.shift && active.is_some();

    if (!shift_extend || right) && grid.row_count() > 0 {
        if let Some(c) = cursor {
            let keep = |flag: bool| flag && active.is_some();
            let col = match active {
                Some(a) if keep(right_in_selection || right_on_selected_headers) => a.col,
                _ => {
                    if sticky_click {
                        0
                    } else {
                        c.col.max(0)
                    }
                }
            };
            let row = match active {
                Some(a) if keep(right_in_selection || right_on_selected_gutter || sticky_in_selection) => a.row,
                _ => c.row.max(0),
            };
            let mut target = CellTarget::new(col, row);
            if keep(right_in_selection) || sticky_click || c.col == -1 {
                target = target.no_scroll_x();
            }
            if keep(right_in_selection) || c.row == -1 {
                target = target.no_scroll_y();
            }
            grid.set_active_cell(Some(target));
        }
    }

    if click_on_active && !right {
        grid.last_editing_cell = active;
    }

    grid.editing = grid.options.edit_mode && click_on_active && !right;
    grid.sel.mode = match cursor {
        Some(c) if !right => SelectionMode {
            columns: (c.col != -1 && !sticky_click) || shift_extend,
            rows: c.row != -1 || shift_extend,
            active: true,
        },
        _ => SelectionMode::default(),
    };

    if shift_extend && !right {
        grid.sel.selection_cell = cursor.map(|c| {
            let col = c.col - if sticky_click { 1 } else { 0 };
            CellTarget::new(col.max(0), c.row.max(0))
        });
    } else if !right_in_selection {
        grid.sel.selection_cell = match cursor {
            Some(c) if c.col == -1 || c.row == -1 || sticky_click => {
                let mut col = c.col;
                let mut row = c.row;
                let mut target_flags = (false, false);

                if c.col == -1 || sticky_click {
                    col = grid.last_col();
                    target_flags.0 = true;
                }
                if c.row == -1 {
                    row = grid.last_row();
                    target_flags.1 = true;
                }
                let corner = grid.sel.selection_cell;
                if let (true, Some(corner)) = (right_on_selected_headers, corner) {
                    col = corner.col();
                    target_flags.1 = true;
                }
                if let (true, Some(corner)) = (right_on_selected_gutter || sticky_in_selection, corner) {
                    row = corner.row();
                    target_flags.0 = true;
                }

                let mut target = CellTarget::new(col, row);
                if target_flags.0 {
                    target = target.no_scroll_x();
                }
                if target_flags.1 {
                    target = target.no_scroll_y();
                }
                Some(target)
            }
            _ => None,
        };
    }

    if right && !grid.options.disable_context_menu && !grid.options.lock_rows {
        let position = menu_position(event);
        let items = build_items(grid);
        grid.context_menu_open = true;
        grid.emit(Cmd::OpenContextMenu { position, items });
    }
}

/// Menu position relative to the grid frame
fn menu_position(event: &PointerEvent) -> Point {
    let frame = event.viewport.outer.unwrap_or(event.viewport.inner);
    Point::new(event.position.x - frame.left, event.position.y - frame.top)
}

pub(super) fn pointer_move<T: Clone + PartialEq + 'static>(grid: &mut Grid<T>, event: &PointerEvent) {
    if let Some(from) = grid.sel.expand.from_row {
        if let Some(c) = cursor_cell(grid, event, false) {
            grid.sel.expand.rows_count = (c.row - from as i32).max(0) as usize;
            grid.emit(Cmd::ScrollIntoView(CellTarget::new(
                c.col,
                c.row.max(from as i32),
            )));
        }
    }

    if grid.sel.mode.active {
        let mode = grid.sel.mode;
        let last_col = grid.last_col();
        let last_row = grid.last_row();
        grid.sel.selection_cell = cursor_cell(grid, event, false).map(|c| {
            let col = if mode.columns {
                c.col.clamp(0, last_col.max(0))
            } else {
                last_col
            };
            let row = if mode.rows { c.row.max(0) } else { last_row };
            let mut target = CellTarget::new(col, row);
            if !mode.columns {
                target = target.no_scroll_x();
            }
            if !mode.rows {
                target = target.no_scroll_y();
            }
            target
        });
        grid.editing = false;
    }

    // A fill drag keeps the active cell where it is
    if grid.sel.left_pressed && !grid.loading && grid.sel.expand.from_row.is_none() {
        if let (Some(active), Some(c)) = (grid.active_cell(), cursor_cell(grid, event, false)) {
            if c != active && c.col >= 0 && c.row >= 0 {
                grid.set_active_cell(Some(CellTarget::at(c)));
            }
        }
    }
}

pub(super) fn pointer_up<T: Clone + PartialEq + 'static>(grid: &mut Grid<T>, event: &PointerEvent) {
    if event.button == PointerButton::Left {
        grid.sel.left_pressed = false;
    }

    if grid.sel.expand.from_row.is_some() {
        if grid.sel.expand.rows_count > 0 && grid.active_cell().is_some() {
            grid.apply_fill();
        }
        grid.sel.expand.from_row = None;
    }

    grid.sel.reset_mode();
}

pub(super) fn double_click<T: Clone + PartialEq + 'static>(grid: &mut Grid<T>, event: &PointerEvent) {
    if grid.loading {
        return;
    }
    let Some(cell) = cursor_cell(grid, event, true) else {
        return;
    };
    if cell.row < 0 {
        return;
    }
    let row_index = cell.row as usize;
    if let Some(row) = grid.rows().get(row_index).cloned() {
        grid.emit(Cmd::Notify(GridEvent::DoubleClickRow { row_index, row }));
    }
}
