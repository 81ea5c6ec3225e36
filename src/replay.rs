//! Scripted replay of grid interactions over CSV rows
//!
//! A script is a YAML document:
//!
//! ```yaml
//! required: [name]
//! steps:
//!   - do: click
//!     col: 0
//!     row: 1
//!   - do: keys
//!     keys: [enter]
//!   - do: edit
//!     value: Ada
//!   - do: keys
//!     keys: [enter, arrowdown]
//! ```
//!
//! Steps are turned into `GridMsg`s and run through a [`MemoryHost`]. Pointer
//! steps address cells; the replay computes client positions from a viewport
//! tall enough to show every row.

use std::io::{Read, Write};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::clipboard::{ClipboardBackend, ClipboardPayload};
use crate::columns::{text_column, ColumnSpec, Record, RecordFactory};
use crate::commands::Cmd;
use crate::error::GridError;
use crate::geometry::{cell_center, Rect, Viewport};
use crate::grid::{Grid, GridOptions};
use crate::host::{HostEvent, MemoryHost, SubmitPolicy};
use crate::input::Keystroke;
use crate::messages::{CellInput, ColumnRef, GridMsg, PointerEvent};
use crate::selection::Cell;
use crate::update::context_menu::ContextAction;

/// Width the replay lays columns out against
const REPLAY_WIDTH: f32 = 1000.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    /// Column ids that must hold a value before a row is accepted
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

/// Column given as an index or an id
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptColumn {
    Index(i32),
    Id(String),
}

impl From<ScriptColumn> for ColumnRef {
    fn from(col: ScriptColumn) -> Self {
        match col {
            ScriptColumn::Index(i) => ColumnRef::Index(i),
            ScriptColumn::Id(id) => ColumnRef::Id(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyName {
    Accept,
    Reject,
    Defer,
}

impl From<PolicyName> for SubmitPolicy {
    fn from(name: PolicyName) -> Self {
        match name {
            PolicyName::Accept => SubmitPolicy::Accept,
            PolicyName::Reject => SubmitPolicy::Reject,
            PolicyName::Defer => SubmitPolicy::Defer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "do", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Key strings such as `enter`, `shift+tab` or `ctrl+a`
    Keys { keys: Vec<String> },
    /// What a cell editor would write into the active cell
    Edit { value: String },
    Click {
        col: i32,
        row: i32,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        right: bool,
    },
    DoubleClick { col: i32, row: i32 },
    Drag {
        from: [i32; 2],
        to: [i32; 2],
    },
    /// Drag the fill handle of the selection down to a row
    Fill { to_row: i32 },
    Wheel { delta: f32 },
    Copy,
    Cut,
    /// Paste the clipboard contents
    Paste,
    /// Put plain text on the clipboard, then paste it
    PasteText { text: String },
    CopyAll,
    Submit,
    Search {
        text: String,
        #[serde(default)]
        case_sensitive: bool,
    },
    GoTo { line: usize },
    SetActiveCell { col: ScriptColumn, row: i32 },
    Menu { action: ContextAction },
    EditMode { enabled: bool },
    Policy { policy: PolicyName },
    /// Answer the oldest deferred submit
    Resolve { accepted: bool },
}

impl Script {
    pub fn from_yaml(text: &str) -> Result<Self, GridError> {
        serde_yaml::from_str(text).map_err(|e| GridError::Parse {
            message: e.to_string(),
            line: e.location().map(|l| l.line()),
        })
    }

    pub fn load(path: &Path) -> Result<Self, GridError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| GridError::Script(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&text)
    }
}

/// Header and records of a CSV table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Record>,
}

impl Table {
    pub fn read(reader: impl Read) -> Result<Self, GridError> {
        let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = csv
            .headers()
            .map_err(parse_error)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for result in csv.records() {
            let record = result.map_err(parse_error)?;
            rows.push(
                headers
                    .iter()
                    .zip(record.iter())
                    .filter(|(_, value)| !value.is_empty())
                    .map(|(key, value)| (key.clone(), value.to_string()))
                    .collect(),
            );
        }
        Ok(Self { headers, rows })
    }

    pub fn load(path: &Path) -> Result<Self, GridError> {
        let file = std::fs::File::open(path)
            .map_err(|e| GridError::Script(format!("{}: {}", path.display(), e)))?;
        Self::read(file)
    }

    pub fn write(&self, writer: impl Write) -> Result<(), GridError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(&self.headers).map_err(parse_error)?;
        for row in &self.rows {
            csv.write_record(
                self.headers
                    .iter()
                    .map(|h| row.get(h).map(String::as_str).unwrap_or("")),
            )
            .map_err(parse_error)?;
        }
        csv.flush()
            .map_err(|e| GridError::Script(format!("Failed to write rows: {}", e)))
    }

    /// One text column per header
    pub fn columns(&self, required: &[String]) -> Vec<ColumnSpec<Record>> {
        self.headers
            .iter()
            .map(|h| text_column(h).required(required.contains(h)))
            .collect()
    }
}

fn parse_error(e: csv::Error) -> GridError {
    GridError::Parse {
        message: e.to_string(),
        line: e.position().map(|p| p.line() as usize),
    }
}

/// Grid, host and table wired together for one replay
pub struct Replay {
    pub grid: Grid<Record>,
    pub host: MemoryHost<Record>,
    headers: Vec<String>,
}

impl Replay {
    pub fn new(table: Table, required: &[String], options: GridOptions, policy: SubmitPolicy) -> Self {
        let grid = Grid::new(table.columns(required), RecordFactory::new(), options)
            .with_rows(table.rows.clone());
        Self {
            grid,
            host: MemoryHost::new(table.rows).with_policy(policy),
            headers: table.headers,
        }
    }

    pub fn with_clipboard(mut self, clipboard: impl ClipboardBackend + 'static) -> Self {
        self.host.set_clipboard(clipboard);
        self
    }

    /// Viewport showing every row at once
    fn viewport(&self) -> Viewport {
        let options = self.grid.options();
        let height = options.header_row_height + options.row_height * self.grid.row_count() as f32;
        Viewport::new(Rect::new(0.0, 0.0, REPLAY_WIDTH, height))
    }

    fn pointer_at(&self, col: i32, row: i32) -> Result<PointerEvent, GridError> {
        let viewport = self.viewport();
        let geometry = self.grid.geometry(viewport.width);
        let point = cell_center(Cell::new(col, row), &geometry, &viewport)
            .ok_or_else(|| GridError::Script(format!("No cell at column {}, row {}", col, row)))?;
        Ok(PointerEvent::new(point, viewport))
    }

    fn send(&mut self, msg: GridMsg<Record>) -> Vec<Cmd<Record>> {
        self.host.dispatch(&mut self.grid, msg)
    }

    pub fn step(&mut self, step: ScriptStep) -> Result<(), GridError> {
        debug!("Replay step {:?}", step);
        match step {
            ScriptStep::Keys { keys } => {
                for key in keys {
                    let key = Keystroke::parse(&key)?;
                    self.send(GridMsg::Key(key));
                }
            }
            ScriptStep::Edit { value } => {
                let cell = self
                    .grid
                    .active_cell_with_id()
                    .ok_or_else(|| GridError::Script("No active cell to edit".to_string()))?;
                let col_id = cell
                    .col_id
                    .ok_or_else(|| GridError::UnknownColumn(cell.col.to_string()))?;
                let row = usize::try_from(cell.row)
                    .map_err(|_| GridError::Script(format!("Cannot edit row {}", cell.row)))?;
                let mut data = self.grid.rows().get(row).cloned().unwrap_or_default();
                if value.is_empty() {
                    data.remove(&col_id);
                } else {
                    data.insert(col_id, value);
                }
                self.send(GridMsg::SetRowData { row, value: data });
            }
            ScriptStep::Click {
                col,
                row,
                shift,
                right,
            } => {
                let mut event = self.pointer_at(col, row)?;
                if shift {
                    event = event.with_shift();
                }
                if right {
                    event = event.right();
                }
                self.send(GridMsg::PointerDown(event));
                self.send(GridMsg::PointerUp(event));
            }
            ScriptStep::DoubleClick { col, row } => {
                let event = self.pointer_at(col, row)?;
                self.send(GridMsg::DoubleClick(event));
            }
            ScriptStep::Drag { from, to } => {
                let down = self.pointer_at(from[0], from[1])?;
                self.send(GridMsg::PointerDown(down));
                let up = self.pointer_at(to[0], to[1])?;
                self.send(GridMsg::PointerMove(up));
                self.send(GridMsg::PointerUp(up));
            }
            ScriptStep::Fill { to_row } => {
                let active = self
                    .grid
                    .active_cell()
                    .ok_or_else(|| GridError::Script("No active cell to fill from".to_string()))?;
                let handle = self.grid.effective_selection().map_or(active, |s| s.max);
                let down = self.pointer_at(handle.col, handle.row)?.on_expand_handle();
                self.send(GridMsg::PointerDown(down));
                let to = self.pointer_at(handle.col, to_row)?;
                self.send(GridMsg::PointerMove(to));
                self.send(GridMsg::PointerUp(to));
            }
            ScriptStep::Wheel { delta } => {
                self.send(GridMsg::Wheel { delta });
            }
            ScriptStep::Copy => {
                self.send(GridMsg::Copy);
            }
            ScriptStep::Cut => {
                self.send(GridMsg::Cut);
            }
            ScriptStep::Paste => {
                self.host.paste(&mut self.grid);
            }
            ScriptStep::PasteText { text } => {
                self.host.put_clipboard(&ClipboardPayload::plain(text));
                self.host.paste(&mut self.grid);
            }
            ScriptStep::CopyAll => {
                self.send(GridMsg::CopyAll);
            }
            ScriptStep::Submit => {
                self.send(GridMsg::Submit);
            }
            ScriptStep::Search {
                text,
                case_sensitive,
            } => {
                self.send(GridMsg::Search {
                    text,
                    case_sensitive,
                });
            }
            ScriptStep::GoTo { line } => {
                self.send(GridMsg::GoTo(line));
            }
            ScriptStep::SetActiveCell { col, row } => {
                self.send(GridMsg::SetActiveCell(Some(CellInput::new(col, row))));
            }
            ScriptStep::Menu { action } => {
                self.send(GridMsg::ContextAction(action));
            }
            ScriptStep::EditMode { enabled } => {
                self.send(GridMsg::SetEditMode(enabled));
            }
            ScriptStep::Policy { policy } => self.host.set_policy(policy.into()),
            ScriptStep::Resolve { accepted } => {
                self.host.resolve_deferred(&mut self.grid, accepted);
            }
        }
        Ok(())
    }

    pub fn run(&mut self, script: Script) -> Result<(), GridError> {
        let count = script.steps.len();
        for (i, step) in script.steps.into_iter().enumerate() {
            self.step(step)
                .map_err(|e| GridError::Script(format!("step {}: {}", i + 1, e)))?;
        }
        info!("Replayed {} step(s)", count);
        Ok(())
    }

    /// The host's rows with the original header
    pub fn table(&self) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.host.rows().to_vec(),
        }
    }

    pub fn log(&self) -> &[HostEvent] {
        self.host.log()
    }
}
