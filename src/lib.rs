//! rowgrid - interaction and row-mutation engine for editable grids
//!
//! This crate provides the state machine behind a spreadsheet-style grid:
//! active cell and selection, keyboard and pointer handling, clipboard
//! exchange, and the row submit lifecycle. It implements the Elm Architecture
//! pattern: the host feeds [`GridMsg`]s to [`update`] and performs the
//! returned [`Cmd`]s. Rendering is left to the host.

pub mod cli;
pub mod clipboard;
pub mod columns;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod host;
pub mod input;
pub mod messages;
pub mod replay;
pub mod selection;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use clipboard::{ClipboardBackend, ClipboardPayload};
pub use columns::{ColumnSpec, Record, RecordFactory};
pub use commands::{Cmd, GridEvent, Operation, OperationKind, SubmitKind};
pub use config::GridConfig;
pub use error::GridError;
pub use grid::{Grid, GridOptions, RowFactory};
pub use messages::GridMsg;
pub use selection::{Cell, CellTarget, Selection};
pub use update::update;
