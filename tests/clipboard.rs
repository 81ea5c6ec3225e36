//! Copy, cut and paste through the in-memory host

mod common;

use common::{edit_options, numbered_rows, people, people_columns, TestHost};
use rowgrid::clipboard::{ClipboardPayload, MemoryClipboard};
use rowgrid::commands::{Operation, OperationKind};
use rowgrid::grid::GridOptions;
use rowgrid::messages::{CellInput, GridMsg};

fn select_block(t: &mut TestHost, (col, row): (i32, i32), keys: &[&str]) {
    t.send(GridMsg::SetActiveCell(Some(CellInput::new(col, row))));
    t.keys(keys);
}

// ========================================================================
// Copy
// ========================================================================

#[test]
fn test_copy_writes_selection_as_plain_and_html() {
    let mut t = TestHost::people();
    select_block(&mut t, (0, 0), &["shift+arrowdown", "shift+arrowright"]);
    t.send(GridMsg::Copy);

    let writes = t.clipboard_writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].plain.as_deref(), Some("Ada\tLondon\nLinus\tHelsinki"));
    assert_eq!(
        writes[0].html.as_deref(),
        Some("<table><tr><td>Ada</td><td>London</td></tr><tr><td>Linus</td><td>Helsinki</td></tr></table>")
    );
}

#[test]
fn test_copy_ignored_while_editing() {
    let mut t = TestHost::people();
    t.key("enter");
    t.send(GridMsg::Copy);
    assert!(t.clipboard_writes().is_empty());
}

#[test]
fn test_copy_then_paste_in_place_changes_nothing() {
    let mut t = TestHost::new(people_columns(), numbered_rows(4), edit_options());
    select_block(&mut t, (1, 1), &["shift+arrowdown", "shift+arrowright"]);
    t.send(GridMsg::Copy);

    let before = t.host.rows().to_vec();
    let clipboard = t.host.read_clipboard().unwrap();
    t.send(GridMsg::Paste(clipboard));

    assert_eq!(t.host.rows(), &before[..]);
    assert_eq!(t.changes(), vec![vec![Operation::update(1, 3)]]);
    assert_eq!(t.selection(), Some(((1, 1), (2, 2))));
}

#[test]
fn test_copy_all_includes_header_in_html() {
    let mut t = TestHost::people();
    t.send(GridMsg::CopyAll);

    let writes = t.clipboard_writes();
    let payload = &writes[0];
    assert_eq!(
        payload.plain.as_deref(),
        Some("Ada\tLondon\tA\nLinus\tHelsinki\tB\nGrace\tNew York\tA")
    );
    assert!(payload
        .html
        .as_deref()
        .unwrap()
        .starts_with("<table><tr><th>name</th><th>city</th><th>team</th></tr>"));
}

// ========================================================================
// Cut
// ========================================================================

#[test]
fn test_cut_copies_then_clears() {
    let mut t = TestHost::people();
    select_block(&mut t, (0, 0), &["shift+arrowdown"]);
    t.send(GridMsg::Cut);

    assert_eq!(t.clipboard_writes()[0].plain.as_deref(), Some("Ada\nLinus"));
    assert_eq!(t.column_values("name"), vec!["", "", "Grace"]);
    assert_eq!(t.column_values("city"), vec!["London", "Helsinki", "New York"]);
    assert_eq!(t.grid.row_count(), 3);
}

// ========================================================================
// Paste
// ========================================================================

#[test]
fn test_paste_block_grows_the_grid() {
    let mut t = TestHost::new(people_columns(), numbered_rows(7), edit_options());
    t.send(GridMsg::SetActiveCell(Some(CellInput::new(1, 5))));
    t.clear();

    t.send(GridMsg::Paste(ClipboardPayload::plain("a\tb\nc\td\ne\tf")));

    assert_eq!(
        t.changes(),
        vec![vec![Operation::update(5, 7), Operation::create(7, 8)]]
    );
    assert_eq!(t.grid.row_count(), 8);
    assert_eq!(t.column_values("city")[5..], ["a", "c", "e"]);
    assert_eq!(t.column_values("team")[5..], ["b", "d", "f"]);
    assert_eq!(t.column_values("name")[7], "");
    assert_eq!(t.active(), Some((1, 5)));
    assert_eq!(t.selection(), Some(((1, 5), (2, 7))));
}

#[test]
fn test_paste_truncated_when_rows_locked() {
    let options = GridOptions {
        lock_rows: true,
        ..edit_options()
    };
    let mut t = TestHost::new(people_columns(), people(), options);
    t.send(GridMsg::SetActiveCell(Some(CellInput::new(0, 2))));
    t.send(GridMsg::Paste(ClipboardPayload::plain("P\nQ")));

    assert_eq!(t.changes(), vec![vec![Operation::update(2, 3)]]);
    assert_eq!(t.column_values("name"), vec!["Ada", "Linus", "P"]);
    assert_eq!(t.grid.row_count(), 3);
}

#[test]
fn test_single_row_paste_fills_selection() {
    let mut t = TestHost::people();
    select_block(&mut t, (0, 0), &["shift+arrowdown", "shift+arrowdown"]);
    t.send(GridMsg::Paste(ClipboardPayload::plain("x\ty")));

    assert_eq!(t.column_values("name"), vec!["x", "x", "x"]);
    assert_eq!(t.column_values("city"), vec!["y", "y", "y"]);
    assert_eq!(t.column_values("team"), vec!["A", "B", "A"]);
    assert_eq!(t.selection(), Some(((0, 0), (1, 2))));
}

#[test]
fn test_html_paste_wins_over_plain() {
    let mut t = TestHost::people();
    t.send(GridMsg::SetActiveCell(Some(CellInput::new(0, 1))));
    let payload = ClipboardPayload {
        html: Some("<table><tr><td>X</td><td>Y</td></tr><tr><td>Z &amp; co</td><td>W</td></tr></table>".into()),
        plain: Some("ignored".into()),
        text: None,
    };
    t.send(GridMsg::Paste(payload));

    assert_eq!(t.column_values("name"), vec!["Ada", "X", "Z & co"]);
    assert_eq!(t.column_values("city"), vec!["London", "Y", "W"]);
}

#[test]
fn test_paste_ignored_while_editing() {
    let mut t = TestHost::people();
    t.key("enter");
    t.send(GridMsg::Paste(ClipboardPayload::plain("nope")));
    assert!(t.changes().is_empty());
    assert_eq!(t.column_values("name")[0], "Ada");
}

#[test]
fn test_paste_skips_disabled_columns() {
    let columns = vec![
        rowgrid::columns::text_column("name").disabled(true),
        rowgrid::columns::text_column("city"),
    ];
    let mut t = TestHost::new(columns, people(), edit_options());
    t.send(GridMsg::Paste(ClipboardPayload::plain("N\tC")));
    assert_eq!(t.column_values("name")[0], "Ada");
    assert_eq!(t.column_values("city")[0], "C");
}

// ========================================================================
// Host clipboard
// ========================================================================

#[test]
fn test_host_paste_reads_backend() {
    let mut t = TestHost::people();
    let mut clipboard = MemoryClipboard::new();
    rowgrid::ClipboardBackend::write(&mut clipboard, &ClipboardPayload::plain("Zed")).unwrap();
    t.host.set_clipboard(clipboard);

    let cmds = t.host.paste(&mut t.grid);
    t.cmds.extend(cmds);

    assert_eq!(t.column_values("name")[0], "Zed");
    let kinds: Vec<OperationKind> = t.changes().concat().iter().map(|op| op.kind).collect();
    assert_eq!(kinds, vec![OperationKind::Update]);
}
