//! Active-cell navigation, search and the imperative cell setters

use tracing::{debug, warn};

use super::Grid;
use crate::commands::{Cmd, GridEvent};
use crate::messages::{CellInput, ColumnRef, SelectionInput};
use crate::selection::{Cell, CellTarget, Selection};

/// Position of the last search hit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SearchCursor {
    pub text: String,
    pub case_sensitive: bool,
    pub last_hit: Option<Cell>,
}

impl<T: Clone + PartialEq + 'static> Grid<T> {
    /// `cell + (dx, dy)` clamped to the data area
    pub(crate) fn clamped_add(&self, cell: Cell, dx: i32, dy: i32) -> Cell {
        let last_col = self.last_col().max(0);
        let last_row = self.last_row().max(0);
        Cell::new(
            (cell.col + dx).clamp(0, last_col),
            (cell.row + dy).clamp(0, last_row),
        )
    }

    /// Finish editing and move on, to the next row or the next column
    ///
    /// On the very last cell this appends a row instead.
    pub(crate) fn stop_editing(&mut self, next_row: bool) {
        let Some(active) = self.sel.active else {
            self.editing = false;
            return;
        };

        let last_col = self.last_col();
        if active.row() == self.last_row() && active.col() == last_col {
            let row = active.row().max(0) as usize;
            if next_row && self.options.auto_add_row {
                self.insert_row_after(row, 1, false);
            } else {
                self.insert_row_after(row, 1, true);
            }
            return;
        }

        self.editing = false;
        let last_row = self.last_row();
        let target = if next_row {
            Cell::new(active.col(), (active.row() + 1).min(last_row))
        } else if active.col() >= last_col {
            Cell::new(0, (active.row() + 1).min(last_row))
        } else {
            Cell::new(active.col() + 1, active.row())
        };
        self.set_active_cell(Some(CellTarget::at(target)));
    }

    /// One wheel notch moves the active row. Positive deltas rotate up.
    pub(crate) fn wheel(&mut self, delta: f32) {
        let Some(active) = self.sel.active else {
            return;
        };
        let row = if delta > 100.0 {
            (active.row() - 1).max(0)
        } else if delta < -100.0 {
            (active.row() + 1).min(self.last_row())
        } else {
            return;
        };
        self.set_active_cell(Some(CellTarget::new(active.col(), row)));
    }

    /// Select every data cell, keeping the viewport where it is
    pub(crate) fn select_all(&mut self) {
        let last_col = self.last_col();
        if last_col < 0 {
            return;
        }
        self.set_active_cell(Some(CellTarget::new(0, 0).no_scroll_x().no_scroll_y()));
        self.sel.selection_cell = Some(
            CellTarget::new(last_col, self.last_row())
                .no_scroll_x()
                .no_scroll_y(),
        );
    }

    /// Find the next cell whose copied text contains `text`
    ///
    /// Repeating the same query continues after the previous hit. A miss wraps
    /// the cursor so the next search starts from the top.
    pub(crate) fn search(&mut self, text: &str, case_sensitive: bool) {
        if self.search.text != text || self.search.case_sensitive != case_sensitive {
            self.search = SearchCursor {
                text: text.to_string(),
                case_sensitive,
                last_hit: None,
            };
        }

        let found = self.find_next(text, case_sensitive);
        match found {
            Some(cell) => {
                debug!("Search {:?} found at {:?}", text, cell);
                self.search.last_hit = Some(cell);
                self.sel.selection_cell = None;
                self.set_active_cell(Some(CellTarget::at(cell)));
            }
            None => {
                debug!("Search {:?} found nothing", text);
                self.search.last_hit = None;
            }
        }

        self.emit(Cmd::Notify(GridEvent::SearchResult {
            found: found.is_some(),
        }));
    }

    fn find_next(&self, text: &str, case_sensitive: bool) -> Option<Cell> {
        if text.is_empty() {
            return None;
        }
        let needle = if case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        };

        let columns: Vec<_> = self.columns.data_columns().collect();
        let width = columns.len();
        if width == 0 {
            return None;
        }

        let start = self
            .search
            .last_hit
            .map_or(0, |c| c.row as usize * width + c.col as usize + 1);

        (start..self.rows.len() * width).find_map(|index| {
            let (row, col) = (index / width, index % width);
            let value = columns[col].copy_value(&self.rows[row], row)?;
            let haystack = if case_sensitive {
                value
            } else {
                value.to_lowercase()
            };
            haystack
                .contains(&needle)
                .then(|| Cell::new(col as i32, row as i32))
        })
    }

    /// Jump to a 1-based row number. Only available outside edit mode.
    pub(crate) fn go_to(&mut self, line: usize) {
        if self.options.edit_mode {
            debug!("Go to line {} ignored in edit mode", line);
            return;
        }
        if line == 0 || line > self.rows.len() {
            debug!("Go to line {} is out of range", line);
            return;
        }
        let Some(active) = self.sel.active else {
            return;
        };
        self.set_active_cell(Some(CellTarget::new(active.col(), line as i32 - 1)));
    }

    /// Resolve and clamp a host-supplied cell
    pub(crate) fn resolve_cell_input(&self, input: &CellInput) -> Option<Cell> {
        let col = match &input.col {
            ColumnRef::Index(index) => *index,
            ColumnRef::Id(id) => match self.columns.position_of(id) {
                Some(col) => col,
                None => {
                    warn!("Unknown column id {:?}", id);
                    return None;
                }
            },
        };

        let last_col = self.last_col();
        if last_col < 0 {
            return None;
        }
        Some(Cell::new(
            col.clamp(0, last_col),
            input.row.clamp(0, self.last_row().max(0)),
        ))
    }

    pub(crate) fn set_active_cell_input(&mut self, input: Option<CellInput>) {
        let target = input
            .as_ref()
            .and_then(|input| self.resolve_cell_input(input))
            .map(CellTarget::at);

        self.editing = false;
        self.sel.reset_mode();
        self.sel.selection_cell = None;
        self.set_active_cell(target);
    }

    pub(crate) fn set_selection_input(&mut self, input: Option<SelectionInput>) {
        self.editing = false;
        self.sel.reset_mode();

        let Some(input) = input else {
            self.sel.selection_cell = None;
            self.set_active_cell(None);
            return;
        };

        let (Some(a), Some(b)) = (
            self.resolve_cell_input(&input.min),
            self.resolve_cell_input(&input.max),
        ) else {
            return;
        };

        let selection = Selection::from_corners(a, b);
        self.set_active_cell(Some(CellTarget::at(selection.min)));
        self.sel.selection_cell = Some(CellTarget::at(selection.max));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{record, text_column, Record, RecordFactory};
    use crate::grid::GridOptions;

    fn grid() -> Grid<Record> {
        Grid::new(
            vec![text_column("name"), text_column("city")],
            RecordFactory::new(),
            GridOptions::default(),
        )
        .with_rows(vec![
            record([("name", "Ada"), ("city", "London")]),
            record([("name", "Linus"), ("city", "Helsinki")]),
            record([("name", "Grace"), ("city", "New York")]),
        ])
    }

    #[test]
    fn test_clamped_add_stays_in_bounds() {
        let grid = grid();
        assert_eq!(grid.clamped_add(Cell::new(1, 2), 5, 5), Cell::new(1, 2));
        assert_eq!(grid.clamped_add(Cell::new(0, 0), -1, -1), Cell::new(0, 0));
    }

    #[test]
    fn test_search_steps_through_hits_and_wraps() {
        let mut grid = grid();
        grid.search("n", false);
        assert_eq!(grid.active_cell(), Some(Cell::new(1, 0)));
        grid.search("n", false);
        assert_eq!(grid.active_cell(), Some(Cell::new(0, 1)));
        grid.search("n", false);
        assert_eq!(grid.active_cell(), Some(Cell::new(1, 1)));
        grid.search("n", false);
        assert_eq!(grid.active_cell(), Some(Cell::new(1, 2)));
        grid.search("n", false);
        assert_eq!(grid.search.last_hit, None);
        grid.search("n", false);
        assert_eq!(grid.active_cell(), Some(Cell::new(1, 0)));
    }

    #[test]
    fn test_search_case_sensitive() {
        let mut grid = grid();
        grid.search("york", true);
        assert_eq!(grid.search.last_hit, None);
        grid.search("York", true);
        assert_eq!(grid.active_cell(), Some(Cell::new(1, 2)));
    }

    #[test]
    fn test_go_to_is_one_based() {
        let mut grid = grid();
        grid.go_to(3);
        assert_eq!(grid.active_cell(), Some(Cell::new(0, 2)));
        grid.go_to(4);
        assert_eq!(grid.active_cell(), Some(Cell::new(0, 2)));
    }

    #[test]
    fn test_cell_input_by_id_and_clamped() {
        let grid = grid();
        let cell = grid.resolve_cell_input(&CellInput::new("city", 99));
        assert_eq!(cell, Some(Cell::new(1, 2)));
        assert_eq!(grid.resolve_cell_input(&CellInput::new("nope", 0)), None);
        assert_eq!(
            grid.resolve_cell_input(&CellInput::new(-4, -4)),
            Some(Cell::new(0, 0))
        );
    }
}
