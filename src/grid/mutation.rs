//! Row mutations and the submit lifecycle
//!
//! A row is submitted when the active cell leaves it in edit mode, before a row
//! is inserted, and on an explicit submit. Submits that need the host go out as
//! `Cmd::SubmitRow` and park the grid until `GridMsg::SubmitResolved` arrives
//! with the same ticket. Work that was waiting on the submit is kept as a
//! [`Continuation`] and resumed on resolution.

use tracing::{debug, info, warn};

use super::{Grid, InitialRow};
use crate::commands::{
    Cmd, GridEvent, Operation, SubmitKind, SubmitOperation, SubmitRequest, SubmitTicket,
};
use crate::selection::CellTarget;

/// Result of a row submit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing to confirm, the row may be left
    Accepted,
    /// Validation failed or submitting is blocked
    Rejected,
    /// Waiting on the host
    Pending(SubmitTicket),
    /// An empty provisional row was removed locally
    Discarded,
}

/// Work resumed when a pending submit resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Continuation {
    None,
    InsertRowAfter {
        row: usize,
        count: usize,
        focus_first_column: bool,
    },
    ExplicitSubmit {
        row: usize,
        resettable: bool,
    },
    DeleteRows {
        min: usize,
        max: usize,
        move_active_cell: bool,
        /// Row count at the time of the request
        data_len: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingSubmit {
    pub ticket: SubmitTicket,
    pub row: usize,
    pub operation: SubmitOperation,
    pub continuation: Continuation,
}

impl PendingSubmit {
    pub fn is_delete(&self) -> bool {
        matches!(
            self.operation.kind,
            SubmitKind::Delete | SubmitKind::DeleteNew
        )
    }
}

impl<T: Clone + PartialEq + 'static> Grid<T> {
    // ========================================================================
    // Submit
    // ========================================================================

    /// Validate a row and decide whether the host must confirm it
    pub(crate) fn submit_row(&mut self, row: usize) -> SubmitOutcome {
        if let Some(pending) = &self.pending {
            debug!(
                "Row {} not submitted, ticket {} is pending",
                row, pending.ticket.0
            );
            return SubmitOutcome::Rejected;
        }

        if self.forbid_submit {
            self.forbid_submit = false;
            debug!("Row {} submit swallowed after bounce-back", row);
            return SubmitOutcome::Rejected;
        }

        let Some(value) = self.rows.get(row).cloned() else {
            return SubmitOutcome::Accepted;
        };

        if !self.required_satisfied(row) {
            info!("Row {} is missing required values", row);
            self.forbid_submit = true;
            self.return_to_row(row);
            return SubmitOutcome::Rejected;
        }

        let is_empty = self.is_row_empty(row);
        let is_creating = self.provisional.contains(&row);

        let initial = self
            .initial_row
            .as_ref()
            .filter(|initial| initial.row == row)
            .map(|initial| initial.value.clone());

        if let Some(initial) = initial {
            if !is_empty && initial != value {
                let kind = if is_creating || self.data_empty {
                    SubmitKind::Create
                } else {
                    SubmitKind::Update
                };
                let mut prev_rows = self.rows.clone();
                prev_rows[row] = initial;
                let new_rows = self.rows.clone();
                let ticket = self.request_submit(
                    prev_rows,
                    new_rows,
                    SubmitOperation { kind, index: row },
                );
                return SubmitOutcome::Pending(ticket);
            }
        }

        if is_creating {
            if is_empty {
                self.discard_provisional_row(row);
                return SubmitOutcome::Discarded;
            }
            let rows = self.rows.clone();
            let ticket = self.request_submit(
                rows.clone(),
                rows,
                SubmitOperation {
                    kind: SubmitKind::Create,
                    index: row,
                },
            );
            return SubmitOutcome::Pending(ticket);
        }

        if self.data_empty {
            debug!("Row {} not submitted, grid holds no data", row);
            return SubmitOutcome::Rejected;
        }

        SubmitOutcome::Accepted
    }

    fn request_submit(
        &mut self,
        prev_rows: Vec<T>,
        new_rows: Vec<T>,
        operation: SubmitOperation,
    ) -> SubmitTicket {
        let ticket = self.next_ticket();
        info!(
            "Submitting row {} as {:?} (ticket {})",
            operation.index, operation.kind, ticket.0
        );
        self.pending = Some(PendingSubmit {
            ticket,
            row: operation.index,
            operation,
            continuation: Continuation::None,
        });
        self.emit(Cmd::SubmitRow(SubmitRequest {
            ticket,
            prev_rows,
            new_rows,
            row_index: operation.index,
            operation,
        }));
        ticket
    }

    fn park(&mut self, continuation: Continuation) {
        if let Some(pending) = self.pending.as_mut() {
            pending.continuation = continuation;
        }
    }

    /// Bounce the active cell back to a row
    ///
    /// When focus already left the grid the first column is used. That bounce
    /// leaves no row behind, so no submit is swallowed and the latch is cleared.
    fn return_to_row(&mut self, row: usize) {
        let Some(active) = self.sel.active else {
            self.place_active_cell(Some(CellTarget::new(0, row as i32)));
            self.forbid_submit = false;
            return;
        };
        self.set_active_cell(Some(CellTarget::new(active.col(), row as i32)));
    }

    /// Host verdict on the pending submit
    pub(crate) fn resolve_submit(&mut self, ticket: SubmitTicket, accepted: bool) {
        match &self.pending {
            Some(pending) if pending.ticket == ticket => {}
            Some(pending) => {
                warn!(
                    "Ignoring resolution of ticket {}, ticket {} is pending",
                    ticket.0, pending.ticket.0
                );
                return;
            }
            None => {
                warn!("Ignoring resolution of ticket {}, nothing is pending", ticket.0);
                return;
            }
        }
        let Some(pending) = self.pending.take() else {
            return;
        };

        info!(
            "Ticket {} for row {} {}",
            ticket.0,
            pending.row,
            if accepted { "accepted" } else { "rejected" }
        );

        match pending.operation.kind {
            SubmitKind::Update | SubmitKind::Create => {
                if accepted {
                    self.data_empty = false;
                    self.provisional.remove(&pending.row);
                    self.initial_row = None;
                } else {
                    self.forbid_submit = true;
                    self.return_to_row(pending.row);
                }
            }
            SubmitKind::Delete | SubmitKind::DeleteNew => {}
        }

        self.resume(pending.continuation, accepted);
    }

    fn resume(&mut self, continuation: Continuation, accepted: bool) {
        match continuation {
            Continuation::None => {}
            Continuation::InsertRowAfter {
                row,
                count,
                focus_first_column,
            } => {
                if accepted {
                    self.data_empty = false;
                    self.apply_insert(row, count, focus_first_column);
                }
            }
            Continuation::ExplicitSubmit { row, resettable } => {
                self.finish_explicit_submit(row, accepted, resettable);
            }
            Continuation::DeleteRows {
                min,
                max,
                move_active_cell,
                data_len,
            } => self.finish_delete(min, max, move_active_cell, data_len, accepted),
        }
    }

    /// Imperative submit of the active row, reported as `Submitted`
    pub(crate) fn submit(&mut self) {
        let Some(row) = self.sel.active.map(|a| a.row()).filter(|&r| r >= 0) else {
            self.emit(Cmd::Notify(GridEvent::Submitted { accepted: true }));
            return;
        };
        let row = row as usize;

        self.forbid_submit = false;
        let has_required = self.columns.data_columns().any(|c| c.required);
        let resettable = !self.required_satisfied(row) || !has_required;

        match self.submit_row(row) {
            SubmitOutcome::Accepted => self.finish_explicit_submit(row, true, resettable),
            SubmitOutcome::Pending(_) => {
                self.park(Continuation::ExplicitSubmit { row, resettable })
            }
            SubmitOutcome::Rejected | SubmitOutcome::Discarded => {
                self.finish_explicit_submit(row, false, resettable)
            }
        }
    }

    /// A failed submit of an otherwise empty grid resets the host rows
    fn finish_explicit_submit(&mut self, row: usize, accepted: bool, resettable: bool) {
        let mut accepted = accepted;
        if !accepted && self.data_empty && resettable {
            debug!("Resetting empty grid after failed submit of row {}", row);
            self.emit(Cmd::Change {
                rows: Vec::new(),
                operations: vec![Operation::update(row, row + 1)],
            });
            accepted = true;
        }
        self.emit(Cmd::Notify(GridEvent::Submitted { accepted }));
    }

    // ========================================================================
    // Row data
    // ========================================================================

    /// A cell editor replaced the value of a row
    pub(crate) fn set_row_data(&mut self, row: usize, value: T) {
        let Some(current) = self.rows.get(row) else {
            warn!("Ignoring edit of row {} past the end", row);
            return;
        };

        if self.initial_row.as_ref().map_or(true, |i| i.row != row) {
            self.initial_row = Some(InitialRow {
                row,
                value: current.clone(),
            });
        }
        self.forbid_submit = false;

        let mut rows = self.rows.clone();
        rows[row] = value;
        self.emit(Cmd::Change {
            rows,
            operations: vec![Operation::update(row, row + 1)],
        });
    }

    // ========================================================================
    // Structural changes
    // ========================================================================

    /// Insert blank rows after `row`, submitting the active row first
    pub(crate) fn insert_row_after(&mut self, row: usize, count: usize, focus_first_column: bool) {
        if self.options.lock_rows {
            return;
        }

        if let Some(active_row) = self.sel.active.map(|a| a.row()).filter(|&r| r >= 0) {
            match self.submit_row(active_row as usize) {
                SubmitOutcome::Accepted => self.data_empty = false,
                SubmitOutcome::Pending(_) => {
                    self.park(Continuation::InsertRowAfter {
                        row,
                        count,
                        focus_first_column,
                    });
                    return;
                }
                SubmitOutcome::Rejected | SubmitOutcome::Discarded => return,
            }
        }

        self.apply_insert(row, count, focus_first_column);
    }

    fn apply_insert(&mut self, row: usize, count: usize, focus_first_column: bool) {
        if count == 0 {
            return;
        }
        self.sel.selection_cell = None;
        self.editing = false;

        let at = (row + 1).min(self.rows.len());
        let mut rows = self.rows.clone();
        let blanks: Vec<T> = (0..count).map(|_| self.create_row()).collect();
        rows.splice(at..at, blanks);

        debug!("Inserting {} row(s) at {}", count, at);
        self.emit(Cmd::Change {
            rows,
            operations: vec![Operation::create(at, at + count)],
        });

        self.shift_rows(at, count);
        self.provisional.extend(at..at + count);

        let col = if focus_first_column {
            0
        } else {
            self.sel.active.map_or(0, |a| a.col().max(0))
        };
        self.place_active_cell(Some(
            CellTarget::new(col, (at + count - 1) as i32).no_scroll_x(),
        ));
    }

    /// Request deletion of rows `min..=max` from the host
    pub(crate) fn delete_rows(&mut self, min: usize, max: usize, move_active_cell: bool) {
        if self.options.lock_rows || self.data_empty {
            return;
        }
        if self.pending.is_some() {
            debug!("Delete of rows {}..={} ignored while a submit is pending", min, max);
            return;
        }

        let data_len = self.rows.len();
        let max = max.min(data_len.saturating_sub(1));
        if min > max {
            return;
        }

        self.editing = false;
        self.sel.selection_cell = None;

        let kind = if self.provisional.contains(&min) {
            SubmitKind::DeleteNew
        } else {
            SubmitKind::Delete
        };
        let prev_rows = self.rows.clone();
        let new_rows: Vec<T> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(i, _)| *i < min || *i > max)
            .map(|(_, row)| row.clone())
            .collect();

        self.request_submit(prev_rows, new_rows, SubmitOperation { kind, index: min });
        self.park(Continuation::DeleteRows {
            min,
            max,
            move_active_cell,
            data_len,
        });
    }

    fn finish_delete(
        &mut self,
        min: usize,
        max: usize,
        move_active_cell: bool,
        data_len: usize,
        accepted: bool,
    ) {
        let Some(active) = self.sel.active else {
            if accepted {
                self.forget_rows(min, max);
            }
            return;
        };

        if !accepted {
            self.place_active_cell(Some(CellTarget::new(active.col(), min as i32)));
            return;
        }

        self.forget_rows(min, max);
        let was_last = active.row() == data_len as i32 - 1;
        if move_active_cell || was_last {
            let row = (data_len as i64 - 2 - max as i64 + min as i64).min(min as i64);
            if row < 0 {
                self.place_active_cell(None);
            } else {
                self.place_active_cell(Some(CellTarget::new(active.col(), row as i32)));
            }
        } else if active.row() > max as i32 {
            let row = active.row() - (max - min + 1) as i32;
            self.place_active_cell(Some(CellTarget::new(active.col(), row)));
        }
    }

    /// Remove an empty provisional row without asking the host
    fn discard_provisional_row(&mut self, row: usize) {
        info!("Discarding empty new row {}", row);
        let data_len = self.rows.len();
        let mut rows = self.rows.clone();
        rows.remove(row);
        self.emit(Cmd::Change {
            rows,
            operations: vec![Operation::delete(row, row + 1)],
        });

        self.forget_rows(row, row);

        if let Some(active) = self.sel.active {
            let active_row = active.row();
            if active_row > row as i32 {
                self.place_active_cell(Some(CellTarget::new(active.col(), active_row - 1)));
            } else if active_row == row as i32 {
                let next = (data_len as i32 - 2).min(row as i32);
                let target = (next >= 0).then(|| CellTarget::new(active.col(), next));
                self.place_active_cell(target);
            }
        }
    }

    /// Duplicate rows `min..=max` right after `max`
    pub(crate) fn duplicate_rows(&mut self, min: usize, max: usize) {
        if self.options.lock_rows {
            return;
        }
        let max = max.min(self.rows.len().saturating_sub(1));
        if min > max {
            return;
        }

        let copies: Vec<T> = (min..=max).filter_map(|i| self.duplicate_row(i)).collect();
        let count = copies.len();
        let at = max + 1;
        let mut rows = self.rows.clone();
        rows.splice(at..at, copies);

        debug!("Duplicating rows {}..={}", min, max);
        self.emit(Cmd::Change {
            rows,
            operations: vec![Operation::create(at, at + count)],
        });
        self.shift_rows(at, count);

        let last_col = self.last_col();
        self.set_active_cell(Some(CellTarget::new(0, at as i32).no_scroll_x()));
        self.sel.selection_cell =
            Some(CellTarget::new(last_col, (at + count - 1) as i32).no_scroll_x());
        self.editing = false;
    }

    /// Shift tracked row indices at or after `from` down by `count`
    fn shift_rows(&mut self, from: usize, count: usize) {
        self.provisional = self
            .provisional
            .iter()
            .map(|&r| if r >= from { r + count } else { r })
            .collect();
        if let Some(initial) = self.initial_row.as_mut() {
            if initial.row >= from {
                initial.row += count;
            }
        }
    }

    /// Drop tracked indices in `min..=max` and shift the ones after it up
    fn forget_rows(&mut self, min: usize, max: usize) {
        let count = max - min + 1;
        self.provisional = self
            .provisional
            .iter()
            .filter(|&&r| r < min || r > max)
            .map(|&r| if r > max { r - count } else { r })
            .collect();
        match self.initial_row.as_ref().map(|i| i.row) {
            Some(row) if row >= min && row <= max => self.initial_row = None,
            Some(row) if row > max => {
                if let Some(initial) = self.initial_row.as_mut() {
                    initial.row -= count;
                }
            }
            _ => {}
        }
    }

    // ========================================================================
    // Fill
    // ========================================================================

    /// Repeat the selected block over the rows the fill drag covered
    pub(crate) fn apply_fill(&mut self) {
        let count = self.sel.expand.rows_count;
        let Some(range) = self.effective_selection() else {
            return;
        };
        if count == 0 || range.min.row < 0 || range.min.col < 0 {
            return;
        }

        let first = range.max.row as usize + 1;
        let end = (first + count).min(self.rows.len());
        let filled = end.saturating_sub(first);

        if filled > 0 {
            let source = self.copy_matrix(range);
            let source = self.pre_paste(source, range.min.col);
            let height = source.len().max(1);

            let mut rows = self.rows.clone();
            for (ci, col) in (range.min.col..=range.max.col).enumerate() {
                let Some(column) = self.columns.data_column(col) else {
                    continue;
                };
                for r in first..end {
                    if self.cell_disabled(col, r) {
                        continue;
                    }
                    let value = source
                        .get((r - first) % height)
                        .and_then(|row| row.get(ci))
                        .map_or("", String::as_str);
                    rows[r] = column.paste_value(&rows[r], value, r);
                }
            }

            debug!("Filling rows {}..{} from {:?}", first, end, range);
            self.emit(Cmd::Change {
                rows,
                operations: vec![Operation::update(first, end)],
            });
        }

        self.set_active_cell(Some(
            CellTarget::new(range.min.col, range.min.row)
                .no_scroll_x()
                .no_scroll_y(),
        ));
        self.sel.selection_cell = Some(CellTarget::new(
            range.max.col,
            range.max.row + filled as i32,
        ));
        self.sel.expand.rows_count = 0;
    }
}
