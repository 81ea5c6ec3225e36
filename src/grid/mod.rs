//! Grid state: rows, columns, selection and the row submit lifecycle
//!
//! The grid never owns the authoritative row array. Every mutation leaves as a
//! [`Cmd`] and comes back through `GridMsg::SetRows`. What the grid does own is
//! the interaction state around those rows: the active cell, the selection,
//! editing, provisional (unconfirmed) rows and the single in-flight submit.

mod clipboard;
mod mutation;
mod navigation;

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use crate::columns::{ColumnRegistry, ColumnSpec, GutterSpec};
use crate::commands::{CellWithId, Cmd, SelectionWithId, SubmitTicket};
use crate::geometry::{cell_to_scroll_target, GridGeometry, ScrollTarget, Viewport};
use crate::selection::{Cell, CellTarget, Selection, SelectionState};

pub use mutation::SubmitOutcome;
pub(crate) use mutation::{Continuation, PendingSubmit};
pub(crate) use navigation::SearchCursor;

/// Produces and inspects rows of the host's row type
pub trait RowFactory<T: Clone> {
    /// A blank row for insertion and paste growth
    fn create_row(&self) -> T;

    /// Copy of a row for duplication
    fn duplicate_row(&self, row: &T, _row_index: usize) -> T {
        row.clone()
    }

    /// Whole-row emptiness. `None` falls back to every column's cell check.
    fn is_row_empty(&self, _row: &T, _is_creating: bool) -> Option<bool> {
        None
    }
}

/// Grid-level behavior switches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOptions {
    pub row_height: f32,
    pub header_row_height: f32,
    /// Forbid inserting, duplicating and deleting rows
    pub lock_rows: bool,
    /// Enter on the last row of the last column appends a row
    pub auto_add_row: bool,
    pub disable_expand_selection: bool,
    pub disable_context_menu: bool,
    /// Expose multi-cell selections instead of the active cell alone
    pub range_selection: bool,
    /// Cells may be edited and rows inserted or deleted
    pub edit_mode: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            row_height: 40.0,
            header_row_height: 40.0,
            lock_rows: false,
            auto_add_row: false,
            disable_expand_selection: true,
            disable_context_menu: false,
            range_selection: false,
            edit_mode: false,
        }
    }
}

/// Snapshot of a row taken when its first edit arrived
#[derive(Debug, Clone)]
pub(crate) struct InitialRow<T> {
    pub row: usize,
    pub value: T,
}

pub struct Grid<T> {
    pub(crate) columns: ColumnRegistry<T>,
    factory: Rc<dyn RowFactory<T>>,
    pub(crate) options: GridOptions,
    pub(crate) rows: Vec<T>,
    /// Host rows were empty and a placeholder row is shown
    pub(crate) placeholder: bool,
    pub(crate) sel: SelectionState,
    pub(crate) editing: bool,
    pub(crate) loading: bool,
    pub(crate) provisional: BTreeSet<usize>,
    pub(crate) data_empty: bool,
    /// Swallows the next row submit after a bounce-back
    pub(crate) forbid_submit: bool,
    pub(crate) initial_row: Option<InitialRow<T>>,
    pub(crate) pending: Option<PendingSubmit>,
    next_ticket: u64,
    pub(crate) last_editing_cell: Option<Cell>,
    pub(crate) search: SearchCursor,
    pub(crate) context_menu_open: bool,
    outbox: Vec<Cmd<T>>,
}

impl<T: Clone + PartialEq + 'static> Grid<T> {
    /// Grid with the default gutter and no sticky-right column
    pub fn new(
        columns: Vec<ColumnSpec<T>>,
        factory: impl RowFactory<T> + 'static,
        options: GridOptions,
    ) -> Self {
        Self::with_registry(
            ColumnRegistry::new(columns, GutterSpec::Default, None),
            factory,
            options,
        )
    }

    pub fn with_registry(
        columns: ColumnRegistry<T>,
        factory: impl RowFactory<T> + 'static,
        options: GridOptions,
    ) -> Self {
        let factory: Rc<dyn RowFactory<T>> = Rc::new(factory);
        let active = (columns.data_column_count() > 0).then(|| CellTarget::new(0, 0).no_scroll_x());
        let mut sel = SelectionState::new(options.range_selection);
        sel.active = active;

        let mut grid = Self {
            columns,
            factory,
            options,
            rows: Vec::new(),
            placeholder: false,
            sel,
            editing: false,
            loading: false,
            provisional: BTreeSet::new(),
            data_empty: true,
            forbid_submit: false,
            initial_row: None,
            pending: None,
            next_ticket: 1,
            last_editing_cell: None,
            search: SearchCursor::default(),
            context_menu_open: false,
            outbox: Vec::new(),
        };
        grid.set_rows(Vec::new());
        grid
    }

    /// Builder-style constructor that also sets the initial rows
    pub fn with_rows(mut self, rows: Vec<T>) -> Self {
        self.set_rows(rows);
        self
    }

    // ========================================================================
    // Rows
    // ========================================================================

    /// Replace the displayed rows with the host's array
    ///
    /// An empty array is displayed as one blank placeholder row. Provisional
    /// indices past the end are dropped and the active cell is clamped.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.placeholder = rows.is_empty();
        self.rows = if self.placeholder {
            vec![self.factory.create_row()]
        } else {
            rows
        };

        if self.initial_row.is_none() {
            let blank = self.factory.create_row();
            self.data_empty =
                self.placeholder || (self.rows.len() == 1 && self.rows[0] == blank);
        }

        let deleting = self
            .pending
            .as_ref()
            .is_some_and(PendingSubmit::is_delete);
        if !deleting {
            let len = self.rows.len();
            self.provisional.retain(|&row| row < len);
        }

        self.clamp_selection();
    }

    /// Displayed rows, including the placeholder when the host has none
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when the host array is empty, or holds a single blank row
    pub fn is_data_empty(&self) -> bool {
        self.data_empty
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn is_provisional(&self, row: usize) -> bool {
        self.provisional.contains(&row)
    }

    pub fn provisional_rows(&self) -> Vec<usize> {
        self.provisional.iter().copied().collect()
    }

    pub(crate) fn create_row(&self) -> T {
        self.factory.create_row()
    }

    pub(crate) fn duplicate_row(&self, row: usize) -> Option<T> {
        self.rows
            .get(row)
            .map(|data| self.factory.duplicate_row(data, row))
    }

    /// Row emptiness through the factory, else every data column's cell check
    pub fn is_row_empty(&self, row: usize) -> bool {
        let Some(data) = self.rows.get(row) else {
            return true;
        };
        let is_creating = self.provisional.contains(&row);
        self.factory
            .is_row_empty(data, is_creating)
            .unwrap_or_else(|| {
                self.columns
                    .data_columns()
                    .all(|c| c.is_cell_empty(data, row))
            })
    }

    /// Every required column of the row holds a value
    pub fn required_satisfied(&self, row: usize) -> bool {
        let Some(data) = self.rows.get(row) else {
            return true;
        };
        self.columns
            .data_columns()
            .filter(|c| c.required)
            .all(|c| !c.is_cell_empty(data, row))
    }

    pub fn is_cell_disabled(&self, cell: Cell) -> bool {
        if cell.row < 0 {
            return false;
        }
        self.cell_disabled(cell.col, cell.row as usize)
    }

    pub(crate) fn cell_disabled(&self, col: i32, row: usize) -> bool {
        match (self.columns.column_at(col), self.rows.get(row)) {
            (Some(column), Some(data)) => {
                column.is_disabled(data, row, self.provisional.contains(&row))
            }
            _ => false,
        }
    }

    // ========================================================================
    // Columns
    // ========================================================================

    pub fn columns(&self) -> &ColumnRegistry<T> {
        &self.columns
    }

    pub(crate) fn set_columns(&mut self, specs: Vec<ColumnSpec<T>>) {
        self.columns.set_columns(specs);
        self.clamp_selection();
    }

    /// Index of the last data column
    pub fn last_col(&self) -> i32 {
        self.columns.last_data_col()
    }

    pub fn last_row(&self) -> i32 {
        self.rows.len() as i32 - 1
    }

    pub fn geometry(&self, available_width: f32) -> GridGeometry {
        GridGeometry {
            layout: self.columns.layout(available_width),
            row_height: self.options.row_height,
            header_height: self.options.header_row_height,
            row_count: self.rows.len(),
            has_sticky_right: self.columns.has_sticky_right(),
        }
    }

    /// Scroll offsets needed to show a target cell in a viewport
    pub fn scroll_target(&self, target: &CellTarget, viewport: &Viewport) -> ScrollTarget {
        cell_to_scroll_target(target, &self.geometry(viewport.width), viewport)
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn active_cell(&self) -> Option<Cell> {
        self.sel.active_cell()
    }

    pub fn active_target(&self) -> Option<CellTarget> {
        self.sel.active
    }

    pub fn selection_cell(&self) -> Option<Cell> {
        self.sel.selection_cell.map(|c| c.cell)
    }

    /// The selection rectangle while both corners are set
    pub fn selection(&self) -> Option<Selection> {
        self.sel.selection()
    }

    /// The selection, or the active cell alone
    pub fn effective_selection(&self) -> Option<Selection> {
        self.sel.effective_range()
    }

    pub fn selection_state(&self) -> &SelectionState {
        &self.sel
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_context_menu_open(&self) -> bool {
        self.context_menu_open
    }

    pub fn is_submit_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_ticket(&self) -> Option<SubmitTicket> {
        self.pending.as_ref().map(|p| p.ticket)
    }

    pub fn is_submit_forbidden(&self) -> bool {
        self.forbid_submit
    }

    pub fn last_editing_cell(&self) -> Option<Cell> {
        self.last_editing_cell
    }

    pub fn cell_with_id(&self, cell: Cell) -> CellWithId {
        CellWithId {
            col_id: self.columns.data_column(cell.col).map(|c| c.id.clone()),
            col: cell.col,
            row: cell.row,
        }
    }

    pub fn active_cell_with_id(&self) -> Option<CellWithId> {
        self.active_cell().map(|cell| self.cell_with_id(cell))
    }

    pub fn selection_with_id(&self) -> Option<SelectionWithId> {
        self.effective_selection().map(|sel| SelectionWithId {
            min: self.cell_with_id(sel.min),
            max: self.cell_with_id(sel.max),
        })
    }

    /// Rows covered by the fill drag, `None` while the fill handle is unavailable
    pub fn expand_available(&self) -> Option<usize> {
        if self.options.disable_expand_selection || self.editing || self.sel.mode.active {
            return None;
        }
        let active = self.sel.active?;
        let range = self.effective_selection()?;
        let last_row = self.last_row();
        if active.row() < 0 || active.row() == last_row || range.max.row == last_row {
            return None;
        }

        let all_disabled = (range.min.col..=range.max.col).all(|col| {
            self.columns
                .column_at(col)
                .map_or(true, |c| c.disabled.is_always())
        });
        if all_disabled {
            return None;
        }

        Some(self.sel.expand.rows_count)
    }

    /// Move the active cell. Leaving a row submits it in edit mode.
    pub(crate) fn set_active_cell(&mut self, target: Option<CellTarget>) {
        let prev_row = self.sel.active.map(|a| a.row());
        self.sel.active = target;

        let next_row = target.map(|t| t.row());
        if self.options.edit_mode && prev_row != next_row {
            if let Some(row) = prev_row.filter(|&r| r >= 0) {
                self.submit_row(row as usize);
            }
        }
    }

    /// Move the active cell without the leave-row submit
    pub(crate) fn place_active_cell(&mut self, target: Option<CellTarget>) {
        self.sel.active = target;
    }

    /// Keep both selection corners inside the rows and data columns
    fn clamp_selection(&mut self) {
        let last_row = self.last_row();
        let last_col = self.last_col();

        let clamp = |target: CellTarget| -> Option<CellTarget> {
            if last_col < 0 {
                return None;
            }
            let cell = Cell::new(target.col().min(last_col), target.row().min(last_row));
            Some(CellTarget::at(cell).with_scroll(target.scroll))
        };

        if let Some(active) = self.sel.active {
            let clamped = clamp(active);
            if clamped.map(|c| c.cell) != Some(active.cell) {
                self.place_active_cell(clamped);
            }
        }
        if let Some(corner) = self.sel.selection_cell {
            self.sel.selection_cell = clamp(corner);
        }
    }

    // ========================================================================
    // Outbox
    // ========================================================================

    pub(crate) fn emit(&mut self, cmd: Cmd<T>) {
        self.outbox.push(cmd);
    }

    /// Drain commands produced since the last call
    pub fn take_commands(&mut self) -> Vec<Cmd<T>> {
        std::mem::take(&mut self.outbox)
    }

    pub(crate) fn next_ticket(&mut self) -> SubmitTicket {
        let ticket = SubmitTicket(self.next_ticket);
        self.next_ticket += 1;
        ticket
    }
}

impl<T> fmt::Debug for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.rows.len())
            .field("columns", &self.columns)
            .field("options", &self.options)
            .field("active", &self.sel.active)
            .field("selection_cell", &self.sel.selection_cell)
            .field("editing", &self.editing)
            .field("provisional", &self.provisional)
            .field("data_empty", &self.data_empty)
            .field("pending", &self.pending)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{record, text_column, Record, RecordFactory};

    fn grid(rows: Vec<Record>) -> Grid<Record> {
        Grid::new(
            vec![text_column("a"), text_column("b").required(true)],
            RecordFactory::new(),
            GridOptions {
                edit_mode: true,
                ..GridOptions::default()
            },
        )
        .with_rows(rows)
    }

    #[test]
    fn test_empty_host_rows_show_placeholder() {
        let grid = grid(Vec::new());
        assert_eq!(grid.row_count(), 1);
        assert!(grid.is_placeholder());
        assert!(grid.is_data_empty());
        assert_eq!(grid.active_cell(), Some(Cell::new(0, 0)));
    }

    #[test]
    fn test_single_blank_row_counts_as_empty() {
        let grid = grid(vec![Record::new()]);
        assert!(!grid.is_placeholder());
        assert!(grid.is_data_empty());

        let grid = grid_with_one_value();
        assert!(!grid.is_data_empty());
    }

    fn grid_with_one_value() -> Grid<Record> {
        grid(vec![record([("a", "x")])])
    }

    #[test]
    fn test_row_emptiness_and_required() {
        let grid = grid(vec![record([("a", "x")]), Record::new()]);
        assert!(!grid.is_row_empty(0));
        assert!(grid.is_row_empty(1));
        assert!(!grid.required_satisfied(0));
        assert!(grid.is_row_empty(99));
    }

    #[test]
    fn test_set_rows_clamps_active_cell() {
        let mut grid = grid(vec![Record::new(); 5]);
        grid.place_active_cell(Some(CellTarget::new(1, 4)));
        grid.set_rows(vec![Record::new(); 2]);
        assert_eq!(grid.active_cell(), Some(Cell::new(1, 1)));
    }

    #[test]
    fn test_cell_with_id_resolves_data_columns_only() {
        let grid = grid(vec![Record::new()]);
        assert_eq!(grid.cell_with_id(Cell::new(1, 0)).col_id.as_deref(), Some("b"));
        assert_eq!(grid.cell_with_id(Cell::new(-1, 0)).col_id, None);
    }

    #[test]
    fn test_expand_unavailable_by_default_and_on_last_row() {
        let mut grid = grid(vec![Record::new(); 3]);
        assert_eq!(grid.expand_available(), None);

        grid.options.disable_expand_selection = false;
        assert_eq!(grid.expand_available(), Some(0));
        grid.sel.expand.rows_count = 2;
        assert_eq!(grid.expand_available(), Some(2));
        grid.place_active_cell(Some(CellTarget::new(0, 2)));
        assert_eq!(grid.expand_available(), None);
    }
}
