//! Command types for the Elm-style architecture
//!
//! Commands represent side effects the host performs after an update. The grid
//! never mutates the row array itself: every change leaves as a `Cmd`.

use serde::Serialize;

use crate::clipboard::ClipboardPayload;
use crate::geometry::Point;
use crate::selection::{Cell, CellTarget};
use crate::update::context_menu::ContextMenuItem;

// ============================================================================
// Host-facing operation descriptors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    Update,
    Create,
    /// Local removal of an empty provisional row
    Delete,
}

/// Batch change descriptor covering the half-open range `[from, to)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub kind: OperationKind,
    pub from_row_index: usize,
    pub to_row_index: usize,
}

impl Operation {
    pub fn update(from: usize, to: usize) -> Self {
        Self {
            kind: OperationKind::Update,
            from_row_index: from,
            to_row_index: to,
        }
    }

    pub fn create(from: usize, to: usize) -> Self {
        Self {
            kind: OperationKind::Create,
            from_row_index: from,
            to_row_index: to,
        }
    }

    pub fn delete(from: usize, to: usize) -> Self {
        Self {
            kind: OperationKind::Delete,
            from_row_index: from,
            to_row_index: to,
        }
    }

    pub fn len(&self) -> usize {
        self.to_row_index.saturating_sub(self.from_row_index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmitKind {
    Update,
    Create,
    Delete,
    /// Deleting a row that was never confirmed by the host
    DeleteNew,
}

/// Single-row confirm descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitOperation {
    pub kind: SubmitKind,
    pub index: usize,
}

/// Correlates a submit request with its resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SubmitTicket(pub u64);

/// Authoritative row submit awaiting `GridMsg::SubmitResolved`
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest<T> {
    pub ticket: SubmitTicket,
    pub prev_rows: Vec<T>,
    pub new_rows: Vec<T>,
    pub row_index: usize,
    pub operation: SubmitOperation,
}

// ============================================================================
// Notifications
// ============================================================================

/// A cell with its column id resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellWithId {
    pub col_id: Option<String>,
    pub col: i32,
    pub row: i32,
}

impl CellWithId {
    pub fn cell(&self) -> Cell {
        Cell::new(self.col, self.row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionWithId {
    pub min: CellWithId,
    pub max: CellWithId,
}

/// Where focus goes when Tab leaves the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitDirection {
    Forward,
    Backward,
}

/// Lifecycle notifications, fired after the transition that caused them
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent<T> {
    /// Editing started on a cell
    Focus { cell: CellWithId },
    /// Editing stopped on a cell
    Blur { cell: CellWithId },
    ActiveCellChange { cell: Option<CellWithId> },
    SelectionChange { selection: Option<SelectionWithId> },
    DoubleClickRow { row_index: usize, row: T },
    SearchResult { found: bool },
    /// Outcome of an imperative submit
    Submitted { accepted: bool },
}

// ============================================================================
// Commands
// ============================================================================

/// Commands returned by update functions
#[derive(Debug, Clone)]
pub enum Cmd<T> {
    /// No command - do nothing
    None,
    /// Optimistic change the host should apply and echo back via `SetRows`
    Change {
        rows: Vec<T>,
        operations: Vec<Operation>,
    },
    /// Authoritative submit; the grid stays in the pending state until resolved
    SubmitRow(SubmitRequest<T>),
    /// Lifecycle notification
    Notify(GridEvent<T>),
    /// Put a payload on the clipboard
    WriteClipboard(ClipboardPayload),
    /// Bring a cell into view (see `Grid::scroll_target`)
    ScrollIntoView(CellTarget),
    /// Focus leaves the grid through Tab/Shift-Tab
    ExitGrid(ExitDirection),
    /// Show the context menu at a position
    OpenContextMenu {
        position: Point,
        items: Vec<ContextMenuItem>,
    },
    CloseContextMenu,
    /// Host should show its search prompt
    OpenSearch,
    /// Execute multiple commands
    Batch(Vec<Cmd<T>>),
}

impl<T> Default for Cmd<T> {
    fn default() -> Self {
        Cmd::None
    }
}

impl<T> Cmd<T> {
    /// Create a batch of commands, collapsing trivial cases
    pub fn batch(mut cmds: Vec<Cmd<T>>) -> Self {
        cmds.retain(|c| !matches!(c, Cmd::None));
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.pop().unwrap_or_default(),
            _ => Cmd::Batch(cmds),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Leaf commands in execution order
    pub fn flatten(self) -> Vec<Cmd<T>> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            other => vec![other],
        }
    }
}

impl<T> From<Option<Cmd<T>>> for Cmd<T> {
    fn from(cmd: Option<Cmd<T>>) -> Self {
        cmd.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_collapses() {
        let cmd: Cmd<()> = Cmd::batch(vec![Cmd::None, Cmd::OpenSearch, Cmd::None]);
        assert!(matches!(cmd, Cmd::OpenSearch));
        let cmd: Cmd<()> = Cmd::batch(vec![Cmd::None]);
        assert!(cmd.is_none());
    }

    #[test]
    fn test_flatten_nested_batches() {
        let cmd: Cmd<()> = Cmd::Batch(vec![
            Cmd::OpenSearch,
            Cmd::Batch(vec![Cmd::CloseContextMenu, Cmd::None]),
        ]);
        let leaves = cmd.flatten();
        assert_eq!(leaves.len(), 2);
        assert!(matches!(leaves[1], Cmd::CloseContextMenu));
    }

    #[test]
    fn test_operation_serializes_screaming_kind() {
        let json = serde_json::to_string(&Operation::create(7, 8)).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"CREATE","from_row_index":7,"to_row_index":8}"#
        );
    }
}
