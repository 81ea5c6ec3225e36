//! Keyboard handling
//!
//! Keys are matched in a fixed order: Tab wrap and exit first, then arrow
//! movement, then the editing keys. The first handler that applies wins.

use tracing::debug;

use crate::commands::{Cmd, ExitDirection};
use crate::grid::Grid;
use crate::input::{KeyCode, Keystroke};
use crate::selection::{Cell, CellTarget};

pub(super) fn handle_key<T: Clone + PartialEq + 'static>(grid: &mut Grid<T>, key: Keystroke) {
    let Some(active) = grid.active_cell() else {
        return;
    };
    if grid.loading {
        debug!("Ignoring {} while loading", key);
        return;
    }

    let disable_keys = grid
        .columns
        .column_at(active.col)
        .is_some_and(|c| c.disable_keys);

    if key.key == KeyCode::Tab && !disable_keys && tab_wraps(grid, active, key.mods.shift()) {
        return;
    }

    match key.key {
        KeyCode::Tab | KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
            move_by_key(grid, active, key, disable_keys)
        }
        KeyCode::Escape => grid.editing = false,
        KeyCode::Enter if key.mods.is_empty() => enter(grid, active, disable_keys),
        KeyCode::Enter | KeyCode::Insert
            if grid.options.edit_mode
                && grid.provisional.is_empty()
                && (key.key == KeyCode::Insert || only_shift(key)) =>
        {
            let row = grid.selection().map_or(active.row, |s| s.max.row).max(0);
            grid.insert_row_after(row as usize, 1, false);
        }
        KeyCode::Delete => {
            if !grid.editing && grid.options.edit_mode && active.row >= 0 {
                grid.delete_rows(active.row as usize, active.row as usize, true);
            }
        }
        KeyCode::Char('a') if key.mods.ctrl_or_meta() && !key.mods.alt() => {
            if !grid.editing {
                grid.select_all();
            }
        }
        _ => {
            if key.printable_char().is_some() {
                start_typing(grid, active);
            }
        }
    }
}

fn only_shift(key: Keystroke) -> bool {
    key.mods.shift() && !key.mods.ctrl() && !key.mods.meta() && !key.mods.alt()
}

/// Tab past the last column or Shift-Tab before the first. Returns true when handled.
fn tab_wraps<T: Clone + PartialEq + 'static>(grid: &mut Grid<T>, active: Cell, shift: bool) -> bool {
    let last_col = grid.last_col();
    let last_row = grid.last_row();

    let (at_edge, at_end, target, direction) = if shift {
        (
            active.col == 0,
            active.row == 0,
            Cell::new(last_col, active.row - 1),
            ExitDirection::Backward,
        )
    } else {
        (
            active.col == last_col,
            active.row == last_row,
            Cell::new(0, active.row + 1),
            ExitDirection::Forward,
        )
    };

    if !at_edge {
        return false;
    }

    grid.sel.selection_cell = None;
    grid.editing = false;

    if at_end {
        grid.set_active_cell(None);
        if let Some(bounced) = grid.active_cell() {
            debug!("Tab exit blocked, row {} bounced back", bounced.row);
        } else {
            debug!("Tab leaves the grid {:?}", direction);
            grid.emit(Cmd::ExitGrid(direction));
        }
    } else {
        grid.set_active_cell(Some(CellTarget::at(target)));
    }
    true
}

fn move_by_key<T: Clone + PartialEq + 'static>(
    grid: &mut Grid<T>,
    active: Cell,
    key: Keystroke,
    disable_keys: bool,
) {
    if grid.editing && disable_keys {
        return;
    }
    if grid.editing && matches!(key.key, KeyCode::Left | KeyCode::Right) {
        return;
    }

    let mods = key.mods;
    if key.key == KeyCode::Tab && mods.shift() {
        let target = grid.clamped_add(active, -1, 0);
        grid.set_active_cell(Some(CellTarget::at(target)));
        grid.sel.selection_cell = None;
        grid.editing = false;
        return;
    }

    let (mut dx, mut dy) = match key.key {
        KeyCode::Down => (0, 1),
        KeyCode::Up => (0, -1),
        KeyCode::Left => (-1, 0),
        _ => (1, 0),
    };
    if mods.ctrl_or_meta() {
        dx *= grid.columns.len() as i32;
        dy *= grid.row_count() as i32;
    }

    if mods.shift() {
        let from = grid.selection_cell().unwrap_or(active);
        let corner = grid.clamped_add(from, dx, dy);
        grid.sel.selection_cell = Some(CellTarget::at(corner));
    } else {
        let target = grid.clamped_add(active, dx, dy);
        grid.set_active_cell(Some(CellTarget::at(target)));
        grid.sel.selection_cell = None;

        let on_last_row = active.row == grid.last_row();
        let row_is_new = active.row >= 0 && grid.is_provisional(active.row as usize);
        if grid.options.edit_mode && key.key == KeyCode::Down && on_last_row && !row_is_new {
            let row = grid.selection().map_or(active.row, |s| s.max.row).max(0);
            grid.insert_row_after(row as usize, 1, false);
        }
        // Leaving an empty new last row upward removes it through the leave-row submit.
    }

    grid.editing = false;
}

/// Plain Enter: start editing, or finish and advance
fn enter<T: Clone + PartialEq + 'static>(grid: &mut Grid<T>, active: Cell, disable_keys: bool) {
    grid.sel.selection_cell = None;

    if grid.editing || grid.is_cell_disabled(active) {
        if !disable_keys {
            grid.stop_editing(false);
        }
        return;
    }

    grid.last_editing_cell = Some(active);
    if grid.options.edit_mode {
        grid.editing = true;
    }
    grid.emit(Cmd::ScrollIntoView(CellTarget::at(active)));
}

/// A printable key on an idle cell starts editing with that character
fn start_typing<T: Clone + PartialEq + 'static>(grid: &mut Grid<T>, active: Cell) {
    if grid.editing || grid.is_cell_disabled(active) {
        return;
    }
    grid.last_editing_cell = Some(active);
    grid.sel.selection_cell = None;
    if grid.options.edit_mode {
        grid.editing = true;
    }
    grid.emit(Cmd::ScrollIntoView(CellTarget::at(active)));
}
