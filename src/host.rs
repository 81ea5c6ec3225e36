//! In-memory host that owns the rows and answers the grid's commands
//!
//! The host is the other half of the contract: it applies every
//! `Cmd::Change`, decides `Cmd::SubmitRow` requests and keeps the clipboard.
//! Its answers are fed back through [`update`] in FIFO order until the grid
//! goes quiet.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, warn};

use crate::clipboard::{ClipboardBackend, ClipboardPayload, MemoryClipboard};
use crate::commands::{
    CellWithId, Cmd, ExitDirection, GridEvent, Operation, SelectionWithId, SubmitKind, SubmitRequest,
};
use crate::grid::Grid;
use crate::messages::GridMsg;
use crate::update::context_menu::ContextMenuItem;
use crate::update::update;

/// How the host answers row submits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPolicy {
    #[default]
    Accept,
    Reject,
    /// Hold requests until [`MemoryHost::resolve_deferred`]
    Defer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitDecision {
    Accepted,
    Rejected,
    Deferred,
}

/// One entry of the host's event log
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    Change {
        operations: Vec<Operation>,
        row_count: usize,
    },
    Submit {
        ticket: u64,
        kind: SubmitKind,
        row_index: usize,
        decision: SubmitDecision,
    },
    Clipboard {
        plain: Option<String>,
    },
    Focus {
        cell: CellWithId,
    },
    Blur {
        cell: CellWithId,
    },
    ActiveCellChange {
        cell: Option<CellWithId>,
    },
    SelectionChange {
        selection: Option<SelectionWithId>,
    },
    DoubleClickRow {
        row_index: usize,
    },
    SearchResult {
        found: bool,
    },
    Submitted {
        accepted: bool,
    },
    ExitGrid {
        direction: ExitDirection,
    },
    ContextMenu {
        items: Vec<ContextMenuItem>,
    },
    CloseContextMenu,
    OpenSearch,
}

pub struct MemoryHost<T> {
    rows: Vec<T>,
    policy: SubmitPolicy,
    clipboard: Box<dyn ClipboardBackend>,
    deferred: VecDeque<SubmitRequest<T>>,
    log: Vec<HostEvent>,
}

impl<T: Clone + PartialEq + 'static> MemoryHost<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows,
            policy: SubmitPolicy::default(),
            clipboard: Box::new(MemoryClipboard::default()),
            deferred: VecDeque::new(),
            log: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: SubmitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_clipboard(mut self, clipboard: impl ClipboardBackend + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    pub fn set_clipboard(&mut self, clipboard: impl ClipboardBackend + 'static) {
        self.clipboard = Box::new(clipboard);
    }

    pub fn set_policy(&mut self, policy: SubmitPolicy) {
        self.policy = policy;
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn log(&self) -> &[HostEvent] {
        &self.log
    }

    pub fn deferred_count(&self) -> usize {
        self.deferred.len()
    }

    /// Run a message and every host answer it provokes
    ///
    /// Returns the leaf commands in the order they were produced.
    pub fn dispatch(&mut self, grid: &mut Grid<T>, msg: GridMsg<T>) -> Vec<Cmd<T>> {
        let mut queue = VecDeque::from([msg]);
        let mut produced = Vec::new();

        while let Some(msg) = queue.pop_front() {
            let Some(cmd) = update(grid, msg) else {
                continue;
            };
            for cmd in cmd.flatten() {
                self.handle(&cmd, &mut queue);
                produced.push(cmd);
            }
        }

        produced
    }

    /// Answer the oldest deferred submit
    pub fn resolve_deferred(&mut self, grid: &mut Grid<T>, accepted: bool) -> Vec<Cmd<T>> {
        let Some(request) = self.deferred.pop_front() else {
            warn!("No deferred submit to resolve");
            return Vec::new();
        };
        self.log.push(HostEvent::Submit {
            ticket: request.ticket.0,
            kind: request.operation.kind,
            row_index: request.row_index,
            decision: if accepted {
                SubmitDecision::Accepted
            } else {
                SubmitDecision::Rejected
            },
        });

        let mut produced = Vec::new();
        if accepted {
            self.rows = request.new_rows.clone();
            produced.extend(self.dispatch(grid, GridMsg::SetRows(request.new_rows)));
        }
        produced.extend(self.dispatch(
            grid,
            GridMsg::SubmitResolved {
                ticket: request.ticket,
                accepted,
            },
        ));
        produced
    }

    /// Paste whatever the clipboard backend holds
    pub fn paste(&mut self, grid: &mut Grid<T>) -> Vec<Cmd<T>> {
        match self.clipboard.read() {
            Ok(payload) => self.dispatch(grid, GridMsg::Paste(payload)),
            Err(e) => {
                warn!("Clipboard read failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Put a payload on the clipboard as if copied from elsewhere
    pub fn put_clipboard(&mut self, payload: &ClipboardPayload) {
        if let Err(e) = self.clipboard.write(payload) {
            warn!("Clipboard write failed: {}", e);
        }
    }

    pub fn read_clipboard(&mut self) -> Option<ClipboardPayload> {
        self.clipboard.read().ok()
    }

    fn handle(&mut self, cmd: &Cmd<T>, queue: &mut VecDeque<GridMsg<T>>) {
        match cmd {
            Cmd::Change { rows, operations } => {
                debug!("Host applying {} operation(s)", operations.len());
                self.rows = rows.clone();
                self.log.push(HostEvent::Change {
                    operations: operations.clone(),
                    row_count: rows.len(),
                });
                queue.push_back(GridMsg::SetRows(rows.clone()));
            }
            Cmd::SubmitRow(request) => {
                let decision = match self.policy {
                    SubmitPolicy::Accept => {
                        self.rows = request.new_rows.clone();
                        queue.push_back(GridMsg::SetRows(request.new_rows.clone()));
                        queue.push_back(GridMsg::SubmitResolved {
                            ticket: request.ticket,
                            accepted: true,
                        });
                        SubmitDecision::Accepted
                    }
                    SubmitPolicy::Reject => {
                        queue.push_back(GridMsg::SubmitResolved {
                            ticket: request.ticket,
                            accepted: false,
                        });
                        SubmitDecision::Rejected
                    }
                    SubmitPolicy::Defer => {
                        self.deferred.push_back(request.clone());
                        SubmitDecision::Deferred
                    }
                };
                self.log.push(HostEvent::Submit {
                    ticket: request.ticket.0,
                    kind: request.operation.kind,
                    row_index: request.row_index,
                    decision,
                });
            }
            Cmd::WriteClipboard(payload) => {
                if let Err(e) = self.clipboard.write(payload) {
                    warn!("Clipboard write failed: {}", e);
                }
                self.log.push(HostEvent::Clipboard {
                    plain: payload.plain.clone(),
                });
            }
            Cmd::Notify(event) => self.log.push(match event {
                GridEvent::Focus { cell } => HostEvent::Focus { cell: cell.clone() },
                GridEvent::Blur { cell } => HostEvent::Blur { cell: cell.clone() },
                GridEvent::ActiveCellChange { cell } => HostEvent::ActiveCellChange { cell: cell.clone() },
                GridEvent::SelectionChange { selection } => HostEvent::SelectionChange {
                    selection: selection.clone(),
                },
                GridEvent::DoubleClickRow { row_index, .. } => HostEvent::DoubleClickRow {
                    row_index: *row_index,
                },
                GridEvent::SearchResult { found } => HostEvent::SearchResult { found: *found },
                GridEvent::Submitted { accepted } => HostEvent::Submitted {
                    accepted: *accepted,
                },
            }),
            Cmd::ExitGrid(direction) => self.log.push(HostEvent::ExitGrid {
                direction: *direction,
            }),
            Cmd::OpenContextMenu { items, .. } => {
                self.log.push(HostEvent::ContextMenu { items: items.clone() })
            }
            Cmd::CloseContextMenu => self.log.push(HostEvent::CloseContextMenu),
            Cmd::OpenSearch => self.log.push(HostEvent::OpenSearch),
            Cmd::ScrollIntoView(_) | Cmd::None | Cmd::Batch(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{record, text_column, Record, RecordFactory};
    use crate::grid::GridOptions;
    use crate::input::Keystroke;

    fn grid(rows: Vec<Record>) -> Grid<Record> {
        Grid::new(
            vec![text_column("a")],
            RecordFactory::new(),
            GridOptions {
                edit_mode: true,
                ..GridOptions::default()
            },
        )
        .with_rows(rows)
    }

    #[test]
    fn test_change_is_echoed_back() {
        let rows = vec![record([("a", "1")])];
        let mut grid = grid(rows.clone());
        let mut host = MemoryHost::new(rows);
        host.dispatch(
            &mut grid,
            GridMsg::SetRowData {
                row: 0,
                value: record([("a", "2")]),
            },
        );
        assert_eq!(host.rows(), grid.rows());
        assert_eq!(host.rows()[0]["a"], "2");
    }

    #[test]
    fn test_deferred_submit_resolves_later() {
        let rows = vec![record([("a", "1")])];
        let mut grid = grid(rows.clone());
        let mut host = MemoryHost::new(rows).with_policy(SubmitPolicy::Defer);
        host.dispatch(&mut grid, GridMsg::Key(Keystroke::parse("delete").unwrap()));
        assert!(grid.is_submit_pending());
        assert_eq!(host.deferred_count(), 1);

        host.resolve_deferred(&mut grid, true);
        assert!(!grid.is_submit_pending());
        assert!(grid.is_placeholder());
    }
}
