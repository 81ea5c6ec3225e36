//! Message types for the Elm-style architecture
//!
//! All state changes flow through [`GridMsg`]. Input messages carry raw host
//! events, the rest are host requests and submit resolutions.

use crate::clipboard::ClipboardPayload;
use crate::columns::ColumnSpec;
use crate::commands::SubmitTicket;
use crate::geometry::{Point, Viewport};
use crate::input::Keystroke;
use crate::update::context_menu::ContextAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// A pointer event together with the geometry it happened in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub button: PointerButton,
    pub shift: bool,
    /// Whether the event target lies inside the grid
    pub inside: bool,
    /// Whether the event target is the fill handle of the selection
    pub on_expand_handle: bool,
    pub viewport: Viewport,
}

impl PointerEvent {
    /// Left-button event inside the grid
    pub fn new(position: Point, viewport: Viewport) -> Self {
        Self {
            position,
            button: PointerButton::Left,
            shift: false,
            inside: true,
            on_expand_handle: false,
            viewport,
        }
    }

    pub fn right(mut self) -> Self {
        self.button = PointerButton::Right;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn outside(mut self) -> Self {
        self.inside = false;
        self
    }

    pub fn on_expand_handle(mut self) -> Self {
        self.on_expand_handle = true;
        self
    }
}

/// A column addressed by index or by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Index(i32),
    Id(String),
}

impl From<i32> for ColumnRef {
    fn from(index: i32) -> Self {
        ColumnRef::Index(index)
    }
}

impl From<&str> for ColumnRef {
    fn from(id: &str) -> Self {
        ColumnRef::Id(id.to_string())
    }
}

/// Host-supplied cell for the imperative setters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellInput {
    pub col: ColumnRef,
    pub row: i32,
}

impl CellInput {
    pub fn new(col: impl Into<ColumnRef>, row: i32) -> Self {
        Self {
            col: col.into(),
            row,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionInput {
    pub min: CellInput,
    pub max: CellInput,
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum GridMsg<T> {
    // === Input ===
    Key(Keystroke),
    /// Wheel rotation. A positive delta rotates up.
    Wheel { delta: f32 },
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    DoubleClick(PointerEvent),

    // === Clipboard ===
    Copy,
    Cut,
    Paste(ClipboardPayload),
    /// Copy every row with a header line
    CopyAll,

    // === Host feedback ===
    /// Authoritative row array, usually the echo of a `Cmd::Change`
    SetRows(Vec<T>),
    /// A cell editor changed the value of a row
    SetRowData { row: usize, value: T },
    /// A cell editor finished editing
    StopEditing { next_row: bool },
    SubmitResolved { ticket: SubmitTicket, accepted: bool },

    // === Imperative API ===
    SetActiveCell(Option<CellInput>),
    SetSelection(Option<SelectionInput>),
    Submit,
    Search { text: String, case_sensitive: bool },
    /// Jump to a 1-based row number
    GoTo(usize),
    ContextAction(ContextAction),
    CloseContextMenu,

    // === Configuration ===
    SetEditMode(bool),
    SetLoading(bool),
    /// Focus left the grid
    Blur,
    ResizeColumn { id: String, width: f32 },
    SetColumns(Vec<ColumnSpec<T>>),
}

impl<T> GridMsg<T> {
    /// Messages produced by direct user input
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            GridMsg::Key(_)
                | GridMsg::Wheel { .. }
                | GridMsg::PointerDown(_)
                | GridMsg::PointerMove(_)
                | GridMsg::PointerUp(_)
                | GridMsg::DoubleClick(_)
        )
    }

    /// Variant name for log lines
    pub fn name(&self) -> &'static str {
        match self {
            GridMsg::Key(_) => "Key",
            GridMsg::Wheel { .. } => "Wheel",
            GridMsg::PointerDown(_) => "PointerDown",
            GridMsg::PointerMove(_) => "PointerMove",
            GridMsg::PointerUp(_) => "PointerUp",
            GridMsg::DoubleClick(_) => "DoubleClick",
            GridMsg::Copy => "Copy",
            GridMsg::Cut => "Cut",
            GridMsg::Paste(_) => "Paste",
            GridMsg::CopyAll => "CopyAll",
            GridMsg::SetRows(_) => "SetRows",
            GridMsg::SetRowData { .. } => "SetRowData",
            GridMsg::StopEditing { .. } => "StopEditing",
            GridMsg::SubmitResolved { .. } => "SubmitResolved",
            GridMsg::SetActiveCell(_) => "SetActiveCell",
            GridMsg::SetSelection(_) => "SetSelection",
            GridMsg::Submit => "Submit",
            GridMsg::Search { .. } => "Search",
            GridMsg::GoTo(_) => "GoTo",
            GridMsg::ContextAction(_) => "ContextAction",
            GridMsg::CloseContextMenu => "CloseContextMenu",
            GridMsg::SetEditMode(_) => "SetEditMode",
            GridMsg::SetLoading(_) => "SetLoading",
            GridMsg::Blur => "Blur",
            GridMsg::ResizeColumn { .. } => "ResizeColumn",
            GridMsg::SetColumns(_) => "SetColumns",
        }
    }
}
