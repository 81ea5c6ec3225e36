//! Cell addressing and selection state
//!
//! The active cell and the selection cell are the two corners of the selection.
//! The normalized rectangle is derived from them on demand and never stored.

use serde::Serialize;

/// A grid coordinate. `col == -1` is the gutter, `row == -1` is the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// True for cells addressing data (not gutter, not header)
    pub fn is_data(&self) -> bool {
        self.col >= 0 && self.row >= 0
    }
}

/// One-shot scroll suppression flags carried with a cell target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScrollBehavior {
    pub do_not_scroll_x: bool,
    pub do_not_scroll_y: bool,
}

/// A cell plus scroll flags. Equality ignores the flags.
#[derive(Debug, Clone, Copy, Eq, Serialize)]
pub struct CellTarget {
    pub cell: Cell,
    pub scroll: ScrollBehavior,
}

impl PartialEq for CellTarget {
    fn eq(&self, other: &Self) -> bool {
        self.cell == other.cell
    }
}

impl CellTarget {
    pub const fn new(col: i32, row: i32) -> Self {
        Self {
            cell: Cell::new(col, row),
            scroll: ScrollBehavior {
                do_not_scroll_x: false,
                do_not_scroll_y: false,
            },
        }
    }

    pub fn at(cell: Cell) -> Self {
        Self::new(cell.col, cell.row)
    }

    pub fn no_scroll_x(mut self) -> Self {
        self.scroll.do_not_scroll_x = true;
        self
    }

    pub fn no_scroll_y(mut self) -> Self {
        self.scroll.do_not_scroll_y = true;
        self
    }

    pub fn with_scroll(mut self, scroll: ScrollBehavior) -> Self {
        self.scroll = scroll;
        self
    }

    #[inline]
    pub fn col(&self) -> i32 {
        self.cell.col
    }

    #[inline]
    pub fn row(&self) -> i32 {
        self.cell.row
    }
}

impl From<Cell> for CellTarget {
    fn from(cell: Cell) -> Self {
        CellTarget::at(cell)
    }
}

/// Normalized rectangle: `min.col <= max.col` and `min.row <= max.row`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub min: Cell,
    pub max: Cell,
}

impl Selection {
    pub fn from_corners(a: Cell, b: Cell) -> Self {
        Self {
            min: Cell::new(a.col.min(b.col), a.row.min(b.row)),
            max: Cell::new(a.col.max(b.col), a.row.max(b.row)),
        }
    }

    pub fn single(cell: Cell) -> Self {
        Self {
            min: cell,
            max: cell,
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.contains_row(cell.row) && self.contains_col(cell.col)
    }

    pub fn contains_row(&self, row: i32) -> bool {
        row >= self.min.row && row <= self.max.row
    }

    pub fn contains_col(&self, col: i32) -> bool {
        col >= self.min.col && col <= self.max.col
    }

    pub fn height(&self) -> usize {
        (self.max.row - self.min.row + 1).max(0) as usize
    }

    pub fn width(&self) -> usize {
        (self.max.col - self.min.col + 1).max(0) as usize
    }
}

/// Which axes a pointer drag currently affects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionMode {
    pub columns: bool,
    pub rows: bool,
    pub active: bool,
}

/// Fill-down drag state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpandState {
    /// Row the drag started from, `None` when not expanding
    pub from_row: Option<usize>,
    /// Rows covered below the selection so far
    pub rows_count: usize,
}

/// Active cell, selection corner and drag state
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub active: Option<CellTarget>,
    pub selection_cell: Option<CellTarget>,
    pub mode: SelectionMode,
    pub expand: ExpandState,
    /// Expose the full rectangle instead of the active cell alone
    pub range_selection: bool,
    /// Left button held since the last pointer down
    pub left_pressed: bool,
}

impl SelectionState {
    pub fn new(range_selection: bool) -> Self {
        Self {
            range_selection,
            ..Self::default()
        }
    }

    pub fn active_cell(&self) -> Option<Cell> {
        self.active.map(|a| a.cell)
    }

    /// The selection rectangle, present only while both corners are set
    pub fn selection(&self) -> Option<Selection> {
        let active = self.active?;
        let corner = self.selection_cell?;
        if self.range_selection {
            Some(Selection::from_corners(active.cell, corner.cell))
        } else {
            Some(Selection::single(active.cell))
        }
    }

    /// The selection, or the active cell as a 1x1 rectangle
    pub fn effective_range(&self) -> Option<Selection> {
        self.selection()
            .or_else(|| self.active.map(|a| Selection::single(a.cell)))
    }

    pub fn reset_mode(&mut self) {
        self.mode = SelectionMode::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes() {
        let sel = Selection::from_corners(Cell::new(3, 1), Cell::new(0, 4));
        assert_eq!(sel.min, Cell::new(0, 1));
        assert_eq!(sel.max, Cell::new(3, 4));
        assert_eq!(sel.width(), 4);
        assert_eq!(sel.height(), 4);
        assert!(sel.contains(Cell::new(2, 2)));
        assert!(!sel.contains(Cell::new(2, 5)));
    }

    #[test]
    fn test_cell_target_equality_ignores_scroll_flags() {
        let a = CellTarget::new(1, 2);
        let b = CellTarget::new(1, 2).no_scroll_x().no_scroll_y();
        assert_eq!(a, b);
        assert_ne!(a, CellTarget::new(2, 2));
    }

    #[test]
    fn test_selection_requires_both_corners() {
        let mut state = SelectionState::new(true);
        assert_eq!(state.selection(), None);
        assert_eq!(state.effective_range(), None);

        state.active = Some(CellTarget::new(1, 1));
        assert_eq!(state.selection(), None);
        assert_eq!(
            state.effective_range(),
            Some(Selection::single(Cell::new(1, 1)))
        );

        state.selection_cell = Some(CellTarget::new(0, 3));
        assert_eq!(
            state.selection(),
            Some(Selection::from_corners(Cell::new(1, 1), Cell::new(0, 3)))
        );
    }

    #[test]
    fn test_selection_degenerates_without_range_mode() {
        let mut state = SelectionState::new(false);
        state.active = Some(CellTarget::new(1, 1));
        state.selection_cell = Some(CellTarget::new(4, 6));
        assert_eq!(state.selection(), Some(Selection::single(Cell::new(1, 1))));
    }
}
