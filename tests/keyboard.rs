//! Keyboard navigation and editing tests

mod common;

use common::{edit_options, people, people_columns, TestHost};
use rowgrid::columns::text_column;
use rowgrid::commands::{Cmd, ExitDirection, GridEvent, Operation, OperationKind};
use rowgrid::grid::GridOptions;
use rowgrid::messages::GridMsg;

// ========================================================================
// Movement
// ========================================================================

#[test]
fn test_arrows_move_and_ctrl_jumps_to_edge() {
    let mut t = TestHost::people();
    t.key("arrowright");
    assert_eq!(t.active(), Some((1, 0)));

    t.key("ctrl+arrowdown");
    assert_eq!(t.active(), Some((1, 2)));

    t.key("ctrl+arrowleft");
    assert_eq!(t.active(), Some((0, 2)));

    // Leaving unchanged rows never reaches the host
    assert!(t.submits().is_empty());
}

#[test]
fn test_arrows_clamp_at_top_left() {
    let mut t = TestHost::people();
    t.keys(&["arrowup", "arrowleft"]);
    assert_eq!(t.active(), Some((0, 0)));
}

#[test]
fn test_shift_arrows_extend_selection() {
    let mut t = TestHost::people();
    t.keys(&["shift+arrowdown", "shift+arrowdown", "shift+arrowright"]);
    assert_eq!(t.active(), Some((0, 0)));
    assert_eq!(t.selection(), Some(((0, 0), (1, 2))));
}

#[test]
fn test_plain_arrow_collapses_selection() {
    let mut t = TestHost::people();
    t.keys(&["shift+arrowdown", "arrowright"]);
    assert_eq!(t.active(), Some((1, 0)));
    assert_eq!(t.selection(), Some(((1, 0), (1, 0))));
}

#[test]
fn test_tab_wraps_to_next_row_and_shift_tab_back() {
    let mut t = TestHost::people();
    t.keys(&["arrowright", "arrowright", "tab"]);
    assert_eq!(t.active(), Some((0, 1)));

    t.key("shift+tab");
    assert_eq!(t.active(), Some((2, 0)));
}

#[test]
fn test_tab_on_last_cell_exits_grid() {
    let mut t = TestHost::people();
    t.keys(&["ctrl+arrowright", "ctrl+arrowdown"]);
    assert_eq!(t.active(), Some((2, 2)));

    let cmds = t.key("tab");
    assert_eq!(t.active(), None);
    assert!(cmds
        .iter()
        .any(|c| matches!(c, Cmd::ExitGrid(ExitDirection::Forward))));
}

#[test]
fn test_shift_tab_on_first_cell_exits_backward() {
    let mut t = TestHost::people();
    let cmds = t.key("shift+tab");
    assert_eq!(t.active(), None);
    assert!(cmds
        .iter()
        .any(|c| matches!(c, Cmd::ExitGrid(ExitDirection::Backward))));
}

#[test]
fn test_wheel_moves_active_row() {
    let mut t = TestHost::people();
    t.send(GridMsg::Wheel { delta: -120.0 });
    assert_eq!(t.active(), Some((0, 1)));

    t.send(GridMsg::Wheel { delta: 50.0 });
    assert_eq!(t.active(), Some((0, 1)));

    t.send(GridMsg::Wheel { delta: 120.0 });
    assert_eq!(t.active(), Some((0, 0)));
}

#[test]
fn test_ctrl_a_selects_everything() {
    let mut t = TestHost::people();
    t.key("ctrl+a");
    assert_eq!(t.selection(), Some(((0, 0), (2, 2))));
}

// ========================================================================
// Editing
// ========================================================================

#[test]
fn test_enter_edits_then_advances_to_next_column() {
    let mut t = TestHost::people();
    t.key("enter");
    assert!(t.grid.is_editing());
    assert!(t
        .events()
        .iter()
        .any(|e| matches!(e, GridEvent::Focus { cell } if cell.col_id.as_deref() == Some("name"))));

    t.key("enter");
    assert!(!t.grid.is_editing());
    assert_eq!(t.active(), Some((1, 0)));

    // From the last column Enter wraps to the next row
    t.keys(&["ctrl+arrowright", "enter", "enter"]);
    assert_eq!(t.active(), Some((0, 1)));
}

#[test]
fn test_typing_starts_editing_and_locks_horizontal_arrows() {
    let mut t = TestHost::people();
    t.key("x");
    assert!(t.grid.is_editing());

    t.key("arrowright");
    assert_eq!(t.active(), Some((0, 0)));
    assert!(t.grid.is_editing());

    t.key("escape");
    assert!(!t.grid.is_editing());
    assert!(t.events().iter().any(|e| matches!(e, GridEvent::Blur { .. })));
}

#[test]
fn test_typing_outside_edit_mode_does_not_edit() {
    let mut t = TestHost::new(people_columns(), people(), GridOptions::default());
    t.key("x");
    assert!(!t.grid.is_editing());
}

#[test]
fn test_disable_keys_column_keeps_arrows_while_editing() {
    let columns = vec![text_column("name").disable_keys(true), text_column("city")];
    let mut t = TestHost::new(columns, people(), edit_options());
    t.key("enter");
    t.keys(&["arrowdown", "tab", "enter"]);
    assert_eq!(t.active(), Some((0, 0)));
    assert!(t.grid.is_editing());

    t.key("escape");
    t.key("arrowdown");
    assert_eq!(t.active(), Some((0, 1)));
}

#[test]
fn test_keys_ignored_while_loading() {
    let mut t = TestHost::people();
    t.send(GridMsg::SetLoading(true));
    t.keys(&["arrowdown", "enter"]);
    assert_eq!(t.active(), Some((0, 0)));
    assert!(!t.grid.is_editing());

    t.send(GridMsg::SetLoading(false));
    t.key("arrowdown");
    assert_eq!(t.active(), Some((0, 1)));
}

#[test]
fn test_leaving_edit_mode_stops_editing() {
    let mut t = TestHost::people();
    t.key("enter");
    t.send(GridMsg::SetEditMode(false));
    assert!(!t.grid.is_editing());
}

// ========================================================================
// Row insertion and deletion
// ========================================================================

#[test]
fn test_shift_enter_inserts_and_leaving_empty_row_discards_it() {
    let mut t = TestHost::people();
    t.key("arrowdown");
    t.key("shift+enter");
    assert_eq!(t.grid.row_count(), 4);
    assert_eq!(t.active(), Some((0, 2)));
    assert!(t.grid.is_provisional(2));

    t.key("arrowup");
    assert_eq!(t.grid.row_count(), 3);
    assert_eq!(t.active(), Some((0, 1)));
    assert!(t.grid.provisional_rows().is_empty());
    assert!(t.submits().is_empty());

    let kinds: Vec<OperationKind> = t.changes().concat().iter().map(|op| op.kind).collect();
    assert_eq!(kinds, vec![OperationKind::Create, OperationKind::Delete]);
}

#[test]
fn test_arrow_up_out_of_empty_appended_row_discards_it() {
    let mut t = TestHost::people();
    t.keys(&["arrowdown", "arrowdown", "arrowdown"]);
    assert_eq!(t.grid.row_count(), 4);
    assert_eq!(t.active(), Some((0, 3)));
    assert_eq!(t.grid.provisional_rows(), vec![3]);

    t.key("arrowup");
    assert_eq!(t.grid.row_count(), 3);
    assert_eq!(t.active(), Some((0, 2)));
    assert!(t.grid.provisional_rows().is_empty());
    assert!(t.submits().is_empty());
    assert_eq!(
        t.changes(),
        vec![vec![Operation::create(3, 4)], vec![Operation::delete(3, 4)]]
    );
}

#[test]
fn test_insert_key_blocked_while_new_row_exists() {
    let mut t = TestHost::people();
    t.key("insert");
    assert_eq!(t.grid.row_count(), 4);
    t.key("insert");
    assert_eq!(t.grid.row_count(), 4);
}

#[test]
fn test_arrow_down_on_last_row_appends_row() {
    let mut t = TestHost::people();
    t.keys(&["ctrl+arrowdown", "arrowdown"]);
    assert_eq!(t.grid.row_count(), 4);
    assert_eq!(t.active(), Some((0, 3)));

    // The new row is provisional, so a second ArrowDown does not append again
    t.key("arrowdown");
    assert_eq!(t.grid.row_count(), 4);
}

#[test]
fn test_enter_on_last_cell_appends_row() {
    let mut t = TestHost::people();
    t.keys(&["ctrl+arrowdown", "ctrl+arrowright", "enter", "enter"]);
    assert_eq!(t.grid.row_count(), 4);
    assert_eq!(t.active(), Some((0, 3)));
    assert!(!t.grid.is_editing());
}

#[test]
fn test_delete_key_removes_active_row() {
    let mut t = TestHost::people();
    t.key("arrowdown");
    t.key("delete");

    let submits = t.submits();
    assert_eq!(submits.len(), 1);
    assert_eq!(submits[0].row_index, 1);
    assert_eq!(t.column_values("name"), vec!["Ada", "Grace"]);
    assert_eq!(t.active(), Some((0, 1)));
}

#[test]
fn test_delete_key_ignored_with_locked_rows() {
    let mut t = TestHost::new(
        people_columns(),
        people(),
        GridOptions {
            lock_rows: true,
            ..edit_options()
        },
    );
    t.key("delete");
    t.key("insert");
    assert_eq!(t.grid.row_count(), 3);
    assert!(t.submits().is_empty());
}
