//! Context menu items and their actions

use serde::{Deserialize, Serialize};

use crate::commands::Cmd;
use crate::grid::Grid;

/// What a menu entry does when chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContextAction {
    CopyClipboard,
    Search,
    InsertRowBelow { row: usize },
    DuplicateRow { row: usize },
    /// Duplicate rows `from..=to` (0-based)
    DuplicateRows { from: usize, to: usize },
    DeleteRow { row: usize },
    DeleteRows { from: usize, to: usize },
}

/// What a menu entry shows. Row numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContextMenuKind {
    CopyClipboard,
    Search,
    InsertRowBelow,
    DeleteRow,
    DeleteRows { from_row: usize, to_row: usize },
    DuplicateRow,
    DuplicateRows { from_row: usize, to_row: usize },
}

impl ContextMenuKind {
    pub fn label(&self) -> String {
        match self {
            ContextMenuKind::CopyClipboard => "Copy to clipboard".to_string(),
            ContextMenuKind::Search => "Search".to_string(),
            ContextMenuKind::InsertRowBelow => "Insert row below".to_string(),
            ContextMenuKind::DeleteRow => "Delete row".to_string(),
            ContextMenuKind::DeleteRows { from_row, to_row } => {
                format!("Delete rows {} to {}", from_row, to_row)
            }
            ContextMenuKind::DuplicateRow => "Duplicate row".to_string(),
            ContextMenuKind::DuplicateRows { from_row, to_row } => {
                format!("Duplicate rows {} to {}", from_row, to_row)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContextMenuItem {
    pub kind: ContextMenuKind,
    /// Fed back as `GridMsg::ContextAction` when chosen
    pub action: ContextAction,
}

impl ContextMenuItem {
    fn new(action: ContextAction) -> Self {
        let kind = match action {
            ContextAction::CopyClipboard => ContextMenuKind::CopyClipboard,
            ContextAction::Search => ContextMenuKind::Search,
            ContextAction::InsertRowBelow { .. } => ContextMenuKind::InsertRowBelow,
            ContextAction::DuplicateRow { .. } => ContextMenuKind::DuplicateRow,
            ContextAction::DuplicateRows { from, to } => ContextMenuKind::DuplicateRows {
                from_row: from + 1,
                to_row: to + 1,
            },
            ContextAction::DeleteRow { .. } => ContextMenuKind::DeleteRow,
            ContextAction::DeleteRows { from, to } => ContextMenuKind::DeleteRows {
                from_row: from + 1,
                to_row: to + 1,
            },
        };
        Self { kind, action }
    }

    pub fn label(&self) -> String {
        self.kind.label()
    }
}

/// Items for the current selection, in display order
pub fn build_items<T: Clone + PartialEq + 'static>(grid: &Grid<T>) -> Vec<ContextMenuItem> {
    let mut items = vec![
        ContextMenuItem::new(ContextAction::CopyClipboard),
        ContextMenuItem::new(ContextAction::Search),
    ];

    let selection = grid.effective_selection();
    let Some(active) = grid.active_cell() else {
        return items;
    };
    if active.row < 0 {
        return items;
    }

    let below = selection.map_or(active.row, |s| s.max.row).max(0) as usize;
    items.push(ContextMenuItem::new(ContextAction::InsertRowBelow { row: below }));

    match selection {
        Some(sel) if sel.min.row != sel.max.row && sel.min.row >= 0 => {
            let (from, to) = (sel.min.row as usize, sel.max.row as usize);
            items.push(ContextMenuItem::new(ContextAction::DuplicateRows { from, to }));
            items.push(ContextMenuItem::new(ContextAction::DeleteRows { from, to }));
        }
        _ => {
            let row = active.row as usize;
            items.push(ContextMenuItem::new(ContextAction::DuplicateRow { row }));
            items.push(ContextMenuItem::new(ContextAction::DeleteRow { row }));
        }
    }

    items
}

/// Run a chosen menu action. The menu always closes.
pub fn handle_action<T: Clone + PartialEq + 'static>(grid: &mut Grid<T>, action: ContextAction) {
    grid.context_menu_open = false;
    grid.emit(Cmd::CloseContextMenu);

    match action {
        ContextAction::CopyClipboard => grid.copy_all(),
        ContextAction::Search => grid.emit(Cmd::OpenSearch),
        structural if !grid.options.edit_mode => {
            tracing::debug!("Ignoring {:?} outside edit mode", structural);
        }
        ContextAction::InsertRowBelow { row } => grid.insert_row_after(row, 1, false),
        ContextAction::DuplicateRow { row } => grid.duplicate_rows(row, row),
        ContextAction::DuplicateRows { from, to } => grid.duplicate_rows(from, to),
        ContextAction::DeleteRow { row } => grid.delete_rows(row, row, true),
        ContextAction::DeleteRows { from, to } => grid.delete_rows(from, to, true),
    }
}
