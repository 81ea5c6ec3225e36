//! Copy, cut and paste against the selection

use tracing::{debug, warn};

use super::Grid;
use crate::clipboard::ClipboardPayload;
use crate::commands::{Cmd, Operation};
use crate::selection::{Cell, CellTarget, Selection};

impl<T: Clone + PartialEq + 'static> Grid<T> {
    /// Copied text of a rectangle, clipped to the data area
    pub(crate) fn copy_matrix(&self, range: Selection) -> Vec<Vec<String>> {
        let first_row = range.min.row.max(0);
        let first_col = range.min.col.max(0);

        (first_row..=range.max.row)
            .filter_map(|row| {
                let data = self.rows.get(row as usize)?;
                Some(
                    (first_col..=range.max.col)
                        .map(|col| {
                            self.columns
                                .data_column(col)
                                .and_then(|c| c.copy_value(data, row as usize))
                                .unwrap_or_default()
                        })
                        .collect(),
                )
            })
            .collect()
    }

    /// Run each pasted column through its column's `pre_paste_values`
    pub(crate) fn pre_paste(&self, matrix: Vec<Vec<String>>, first_col: i32) -> Vec<Vec<String>> {
        let width = matrix.first().map_or(0, Vec::len);
        let columns: Vec<Vec<String>> = (0..width)
            .map(|ci| {
                let values: Vec<String> = matrix
                    .iter()
                    .map(|row| row.get(ci).cloned().unwrap_or_default())
                    .collect();
                match self.columns.data_column(first_col + ci as i32) {
                    Some(column) => column.pre_paste_values(values),
                    None => values,
                }
            })
            .collect();

        (0..matrix.len())
            .map(|ri| {
                columns
                    .iter()
                    .map(|column| column.get(ri).cloned().unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    pub(crate) fn copy(&mut self) {
        if self.editing {
            return;
        }
        let Some(range) = self.effective_selection() else {
            return;
        };
        let matrix = self.copy_matrix(range);
        debug!("Copying {}x{} cells", matrix.len(), range.width());
        self.emit(Cmd::WriteClipboard(ClipboardPayload::from_matrix(
            &matrix, None,
        )));
    }

    pub(crate) fn cut(&mut self) {
        if self.editing || self.sel.active.is_none() {
            return;
        }
        self.copy();
        self.delete_selection();
    }

    /// Clear every enabled cell of the selection
    ///
    /// A selection made only of empty rows is left alone.
    pub(crate) fn delete_selection(&mut self) {
        let Some(range) = self.effective_selection() else {
            return;
        };
        let first_row = range.min.row.max(0) as usize;
        let last_row = (range.max.row.max(0) as usize).min(self.rows.len().saturating_sub(1));
        if first_row > last_row {
            return;
        }

        if (first_row..=last_row).all(|row| self.is_row_empty(row)) {
            return;
        }

        let mut rows = self.rows.clone();
        for row in first_row..=last_row {
            for col in range.min.col.max(0)..=range.max.col {
                let Some(column) = self.columns.data_column(col) else {
                    continue;
                };
                if !self.cell_disabled(col, row) {
                    rows[row] = column.delete_value(&rows[row], row);
                }
            }
        }

        self.emit(Cmd::Change {
            rows,
            operations: vec![Operation::update(first_row, last_row + 1)],
        });
    }

    /// Write a clipboard payload into the grid at the selection
    pub(crate) fn paste(&mut self, payload: &ClipboardPayload) {
        if self.editing {
            return;
        }
        let Some(range) = self.effective_selection() else {
            return;
        };

        let matrix = match payload.decode() {
            Ok(matrix) => matrix,
            Err(e) => {
                warn!("Failed to decode clipboard: {}", e);
                return;
            }
        };

        let min = Cell::new(range.min.col.max(0), range.min.row.max(0));
        let max = range.max;
        let matrix = self.pre_paste(matrix, min.col);
        let width = matrix.first().map_or(0, Vec::len);
        if width == 0 {
            return;
        }
        let last_col = self.last_col();

        if matrix.len() == 1 {
            let mut rows = self.rows.clone();
            let last_row = (max.row.max(0) as usize).min(rows.len().saturating_sub(1));
            for (ci, value) in matrix[0].iter().enumerate() {
                let col = min.col + ci as i32;
                let Some(column) = self.columns.data_column(col) else {
                    continue;
                };
                for row in min.row as usize..=last_row {
                    if !self.cell_disabled(col, row) {
                        rows[row] = column.paste_value(&rows[row], value, row);
                    }
                }
            }

            debug!("Pasting one row over rows {}..={}", min.row, last_row);
            self.emit(Cmd::Change {
                rows,
                operations: vec![Operation::update(min.row as usize, last_row + 1)],
            });
            self.set_active_cell(Some(CellTarget::at(min)));
            self.sel.selection_cell = Some(CellTarget::new(
                (min.col + width as i32 - 1).min(last_col),
                max.row,
            ));
            return;
        }

        let start = min.row as usize;
        let mut height = matrix.len();
        let mut rows = self.rows.clone();
        let missing = (start + height).saturating_sub(rows.len());
        let grown = missing > 0 && !self.options.lock_rows;

        if missing > 0 {
            if grown {
                rows.extend((0..missing).map(|_| self.create_row()));
            } else {
                height -= missing;
            }
        }

        let provisional = &self.provisional;
        for (ci, col) in (min.col..min.col + width as i32).enumerate() {
            if col > last_col {
                break;
            }
            let Some(column) = self.columns.data_column(col) else {
                continue;
            };
            for (ri, values) in matrix.iter().take(height).enumerate() {
                let row = start + ri;
                let disabled = column.is_disabled(&rows[row], row, provisional.contains(&row));
                if !disabled {
                    rows[row] = column.paste_value(&rows[row], &values[ci], row);
                }
            }
        }

        let mut operations = vec![Operation::update(
            start,
            start + height - if grown { missing } else { 0 },
        )];
        if grown {
            operations.push(Operation::create(start + height - missing, start + height));
        }

        debug!(
            "Pasting {} row(s) at row {}, {} new",
            height,
            start,
            if grown { missing } else { 0 }
        );
        self.emit(Cmd::Change { rows, operations });
        self.set_active_cell(Some(CellTarget::at(min)));
        self.sel.selection_cell = Some(CellTarget::new(
            (min.col + width as i32 - 1).min(last_col),
            (start + height) as i32 - 1,
        ));
    }

    /// Copy every row with a header of column titles
    pub(crate) fn copy_all(&mut self) {
        let columns: Vec<_> = self.columns.data_columns().collect();
        let header: Vec<String> = columns
            .iter()
            .map(|c| c.display_title().to_string())
            .collect();
        let matrix: Vec<Vec<String>> = self
            .rows
            .iter()
            .enumerate()
            .map(|(row, data)| {
                columns
                    .iter()
                    .map(|c| c.copy_value(data, row).unwrap_or_default())
                    .collect()
            })
            .collect();

        debug!("Copying all {} rows", matrix.len());
        self.emit(Cmd::WriteClipboard(ClipboardPayload::from_matrix(
            &matrix,
            Some(&header),
        )));
    }
}
