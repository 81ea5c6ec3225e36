//! Update function for the Elm-style architecture
//!
//! All state transformations flow through [`update`]. Handlers push their
//! commands onto the grid's outbox. After dispatch, state before and after the
//! message is compared to derive lifecycle notifications.

pub mod context_menu;
mod keys;
mod pointer;

use tracing::{debug, info, span, warn, Level};

use crate::commands::{Cmd, GridEvent};
use crate::grid::Grid;
use crate::input::KeyCode;
use crate::messages::GridMsg;
use crate::tracing::GridSnapshot;

/// Main update function
///
/// Returns every command produced by the message, batched, or `None` when the
/// message had no visible effect.
pub fn update<T: Clone + PartialEq + 'static>(grid: &mut Grid<T>, msg: GridMsg<T>) -> Option<Cmd<T>> {
    let msg_name = msg.name();
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();
    debug!(target: "message", msg = %msg_name, "processing");

    let before = GridSnapshot::from_grid(grid);
    update_inner(grid, msg);
    let after = GridSnapshot::from_grid(grid);

    if let Some(diff) = before.diff(&after) {
        debug!(target: "selection", %diff, "state changed");
    }

    let mut cmds = grid.take_commands();
    cmds.extend(notifications(grid, &before, &after));

    let cmd = Cmd::batch(cmds);
    if cmd.is_none() {
        None
    } else {
        Some(cmd)
    }
}

fn update_inner<T: Clone + PartialEq + 'static>(grid: &mut Grid<T>, msg: GridMsg<T>) {
    if grid.is_submit_pending() && msg.is_input() {
        if let GridMsg::Key(key) = &msg {
            if key.key == KeyCode::Escape {
                info!(
                    "Abandoning pending submit {:?}",
                    grid.pending_ticket().map(|t| t.0)
                );
                grid.pending = None;
                grid.editing = false;
                return;
            }
        }
        debug!("Dropping {} while a submit is pending", msg.name());
        return;
    }

    match msg {
        GridMsg::Key(key) => {
            if grid.context_menu_open {
                if key.key == KeyCode::Escape {
                    close_context_menu(grid);
                }
                return;
            }
            keys::handle_key(grid, key);
        }
        GridMsg::Wheel { delta } => {
            if !grid.loading {
                grid.wheel(delta);
            }
        }
        GridMsg::PointerDown(event) => pointer::pointer_down(grid, &event),
        GridMsg::PointerMove(event) => pointer::pointer_move(grid, &event),
        GridMsg::PointerUp(event) => pointer::pointer_up(grid, &event),
        GridMsg::DoubleClick(event) => pointer::double_click(grid, &event),

        GridMsg::Copy => grid.copy(),
        GridMsg::Cut => grid.cut(),
        GridMsg::Paste(payload) => grid.paste(&payload),
        GridMsg::CopyAll => grid.copy_all(),

        GridMsg::SetRows(rows) => grid.set_rows(rows),
        GridMsg::SetRowData { row, value } => grid.set_row_data(row, value),
        GridMsg::StopEditing { next_row } => grid.stop_editing(next_row),
        GridMsg::SubmitResolved { ticket, accepted } => grid.resolve_submit(ticket, accepted),

        GridMsg::SetActiveCell(cell) => grid.set_active_cell_input(cell),
        GridMsg::SetSelection(selection) => grid.set_selection_input(selection),
        GridMsg::Submit => grid.submit(),
        GridMsg::Search {
            text,
            case_sensitive,
        } => grid.search(&text, case_sensitive),
        GridMsg::GoTo(line) => grid.go_to(line),
        GridMsg::ContextAction(action) => context_menu::handle_action(grid, action),
        GridMsg::CloseContextMenu => close_context_menu(grid),

        GridMsg::SetEditMode(edit_mode) => {
            grid.options.edit_mode = edit_mode;
            if !edit_mode {
                grid.editing = false;
            }
        }
        GridMsg::SetLoading(loading) => grid.loading = loading,
        GridMsg::Blur => {
            grid.editing = false;
            grid.sel.reset_mode();
        }
        GridMsg::ResizeColumn { id, width } => {
            if let Err(e) = grid.columns.set_column_width(&id, width) {
                warn!("Failed to resize column: {}", e);
            }
        }
        GridMsg::SetColumns(specs) => grid.set_columns(specs),
    }
}

fn close_context_menu<T: Clone + PartialEq + 'static>(grid: &mut Grid<T>) {
    if grid.context_menu_open {
        grid.context_menu_open = false;
        grid.emit(Cmd::CloseContextMenu);
    }
}

/// Lifecycle notifications and scroll requests implied by a state change
fn notifications<T: Clone + PartialEq + 'static>(
    grid: &Grid<T>,
    before: &GridSnapshot,
    after: &GridSnapshot,
) -> Vec<Cmd<T>> {
    let mut cmds = Vec::new();

    if before.editing != after.editing {
        if let Some(cell) = after.last_editing_cell {
            let cell = grid.cell_with_id(cell);
            let event = if after.editing {
                GridEvent::Focus { cell }
            } else {
                GridEvent::Blur { cell }
            };
            cmds.push(Cmd::Notify(event));
        }
    }

    if before.active != after.active {
        cmds.push(Cmd::Notify(GridEvent::ActiveCellChange {
            cell: grid.active_cell_with_id(),
        }));
    }
    if before.selection != after.selection {
        cmds.push(Cmd::Notify(GridEvent::SelectionChange {
            selection: grid.selection_with_id(),
        }));
    }

    if before.selection_cell != after.selection_cell {
        if let Some(target) = grid.sel.selection_cell {
            cmds.push(Cmd::ScrollIntoView(target));
        }
    }
    if before.active != after.active {
        if let Some(target) = grid.sel.active {
            cmds.push(Cmd::ScrollIntoView(target));
        }
    }

    cmds
}
