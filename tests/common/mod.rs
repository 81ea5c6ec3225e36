//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use rowgrid::clipboard::ClipboardPayload;
use rowgrid::columns::{checkbox_column, record, text_column, ColumnSpec, Record, RecordFactory};
use rowgrid::commands::{Cmd, GridEvent, Operation, SubmitRequest};
use rowgrid::geometry::{cell_center, Rect, Viewport};
use rowgrid::grid::{Grid, GridOptions};
use rowgrid::host::{MemoryHost, SubmitPolicy};
use rowgrid::input::Keystroke;
use rowgrid::messages::{GridMsg, PointerEvent};
use rowgrid::selection::Cell;

/// Width every test viewport lays columns out against
pub const VIEWPORT_WIDTH: f32 = 1000.0;

// ========================================================================
// Fixtures
// ========================================================================

/// Edit mode with range selection, everything else default
pub fn edit_options() -> GridOptions {
    GridOptions {
        edit_mode: true,
        range_selection: true,
        ..GridOptions::default()
    }
}

/// Three text columns: name, city, team
pub fn people_columns() -> Vec<ColumnSpec<Record>> {
    vec![text_column("name"), text_column("city"), text_column("team")]
}

pub fn people() -> Vec<Record> {
    vec![
        record([("name", "Ada"), ("city", "London"), ("team", "A")]),
        record([("name", "Linus"), ("city", "Helsinki"), ("team", "B")]),
        record([("name", "Grace"), ("city", "New York"), ("team", "A")]),
    ]
}

/// `n` rows whose cells read `r{row}c{col}`
pub fn numbered_rows(n: usize) -> Vec<Record> {
    (0..n)
        .map(|r| {
            record([
                ("name", format!("r{}c0", r)),
                ("city", format!("r{}c1", r)),
                ("team", format!("r{}c2", r)),
            ])
        })
        .collect()
}

/// Columns `active` (checkbox) and `name` (required text)
pub fn musk_columns() -> Vec<ColumnSpec<Record>> {
    vec![
        checkbox_column("active"),
        text_column("name").required(true),
    ]
}

// ========================================================================
// Test host
// ========================================================================

/// Grid plus an in-memory host, recording every command produced
pub struct TestHost {
    pub grid: Grid<Record>,
    pub host: MemoryHost<Record>,
    pub cmds: Vec<Cmd<Record>>,
}

impl TestHost {
    pub fn new(columns: Vec<ColumnSpec<Record>>, rows: Vec<Record>, options: GridOptions) -> Self {
        let grid = Grid::new(columns, RecordFactory::new(), options).with_rows(rows.clone());
        Self {
            grid,
            host: MemoryHost::new(rows),
            cmds: Vec::new(),
        }
    }

    pub fn people() -> Self {
        Self::new(people_columns(), people(), edit_options())
    }

    pub fn with_policy(mut self, policy: SubmitPolicy) -> Self {
        self.host.set_policy(policy);
        self
    }

    pub fn send(&mut self, msg: GridMsg<Record>) -> Vec<Cmd<Record>> {
        let cmds = self.host.dispatch(&mut self.grid, msg);
        self.cmds.extend(cmds.iter().cloned());
        cmds
    }

    pub fn key(&mut self, key: &str) -> Vec<Cmd<Record>> {
        let key = Keystroke::parse(key).unwrap();
        self.send(GridMsg::Key(key))
    }

    pub fn keys(&mut self, keys: &[&str]) {
        for key in keys {
            self.key(key);
        }
    }

    /// Replace a cell value the way a cell editor would
    pub fn edit(&mut self, col: &str, row: usize, value: &str) {
        let mut data = self.grid.rows()[row].clone();
        if value.is_empty() {
            data.remove(col);
        } else {
            data.insert(col.to_string(), value.to_string());
        }
        self.send(GridMsg::SetRowData { row, value: data });
    }

    pub fn resolve(&mut self, accepted: bool) {
        let cmds = self.host.resolve_deferred(&mut self.grid, accepted);
        self.cmds.extend(cmds);
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    // --------------------------------------------------------------------
    // Pointer
    // --------------------------------------------------------------------

    /// Viewport tall enough to show every row, unscrolled
    pub fn viewport(&self) -> Viewport {
        let options = self.grid.options();
        let height = options.header_row_height + options.row_height * self.grid.row_count() as f32;
        Viewport::new(Rect::new(0.0, 0.0, VIEWPORT_WIDTH, height))
    }

    pub fn pointer(&self, col: i32, row: i32) -> PointerEvent {
        let viewport = self.viewport();
        let geometry = self.grid.geometry(viewport.width);
        let point = cell_center(Cell::new(col, row), &geometry, &viewport).unwrap();
        PointerEvent::new(point, viewport)
    }

    pub fn press(&mut self, event: PointerEvent) {
        self.send(GridMsg::PointerDown(event));
        self.send(GridMsg::PointerUp(event));
    }

    pub fn click(&mut self, col: i32, row: i32) {
        let event = self.pointer(col, row);
        self.press(event);
    }

    pub fn shift_click(&mut self, col: i32, row: i32) {
        let event = self.pointer(col, row).with_shift();
        self.press(event);
    }

    pub fn right_click(&mut self, col: i32, row: i32) {
        let event = self.pointer(col, row).right();
        self.press(event);
    }

    pub fn drag(&mut self, from: (i32, i32), to: (i32, i32)) {
        let from = self.pointer(from.0, from.1);
        self.send(GridMsg::PointerDown(from));
        let to = self.pointer(to.0, to.1);
        self.send(GridMsg::PointerMove(to));
        self.send(GridMsg::PointerUp(to));
    }

    // --------------------------------------------------------------------
    // Recorded commands
    // --------------------------------------------------------------------

    pub fn submits(&self) -> Vec<SubmitRequest<Record>> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                Cmd::SubmitRow(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    /// Operation lists of every `Cmd::Change`, in order
    pub fn changes(&self) -> Vec<Vec<Operation>> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                Cmd::Change { operations, .. } => Some(operations.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn events(&self) -> Vec<GridEvent<Record>> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                Cmd::Notify(event) => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clipboard_writes(&self) -> Vec<ClipboardPayload> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                Cmd::WriteClipboard(payload) => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn active(&self) -> Option<(i32, i32)> {
        self.grid.active_cell().map(|c| (c.col, c.row))
    }

    /// Effective selection as `((min col, min row), (max col, max row))`
    pub fn selection(&self) -> Option<((i32, i32), (i32, i32))> {
        self.grid
            .effective_selection()
            .map(|s| ((s.min.col, s.min.row), (s.max.col, s.max.row)))
    }

    /// Values of one column across the host's rows
    pub fn column_values(&self, col: &str) -> Vec<String> {
        self.host
            .rows()
            .iter()
            .map(|r| r.get(col).cloned().unwrap_or_default())
            .collect()
    }
}
