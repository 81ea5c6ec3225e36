//! Tracing setup and state snapshots for diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! selection, submit and row mutation issues.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=message=debug,selection=debug` - scoped filtering
//! - `RUST_LOG=rowgrid::grid=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/rowgrid/logs/rowgrid.log` with daily rotation.
//! File logging uses debug level by default.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::grid::Grid;
use crate::selection::{Cell, CellTarget, Selection};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG and defaults to `warn`. The console
/// writes to stderr so replay output on stdout stays machine-readable.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, crate::config_paths::LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of interaction state for diffing
#[derive(Debug, Clone, PartialEq)]
pub struct GridSnapshot {
    pub active: Option<CellTarget>,
    pub selection_cell: Option<CellTarget>,
    /// Selection as exposed to the host (falls back to the active cell)
    pub selection: Option<Selection>,
    pub editing: bool,
    pub last_editing_cell: Option<Cell>,
    pub row_count: usize,
    pub provisional: Vec<usize>,
    pub pending: Option<u64>,
    pub forbid_submit: bool,
}

impl GridSnapshot {
    pub fn from_grid<T: Clone + PartialEq + 'static>(grid: &Grid<T>) -> Self {
        Self {
            active: grid.active_target(),
            selection_cell: grid.selection_state().selection_cell,
            selection: grid.effective_selection(),
            editing: grid.is_editing(),
            last_editing_cell: grid.last_editing_cell(),
            row_count: grid.row_count(),
            provisional: grid.provisional_rows(),
            pending: grid.pending_ticket().map(|t| t.0),
            forbid_submit: grid.is_submit_forbidden(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &GridSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.active != other.active {
            changes.push(format!(
                "active: {} → {}",
                fmt_target(self.active),
                fmt_target(other.active)
            ));
        }
        if self.selection_cell != other.selection_cell {
            changes.push(format!(
                "selection cell: {} → {}",
                fmt_target(self.selection_cell),
                fmt_target(other.selection_cell)
            ));
        }
        if self.editing != other.editing {
            let status = if other.editing { "started" } else { "stopped" };
            changes.push(format!("editing {}", status));
        }
        if self.row_count != other.row_count {
            changes.push(format!("rows: {} → {}", self.row_count, other.row_count));
        }
        if self.provisional != other.provisional {
            changes.push(format!(
                "provisional: {:?} → {:?}",
                self.provisional, other.provisional
            ));
        }
        if self.pending != other.pending {
            changes.push(match other.pending {
                Some(ticket) => format!("submit #{} pending", ticket),
                None => "submit settled".to_string(),
            });
        }
        if self.forbid_submit != other.forbid_submit {
            changes.push(format!("forbid submit: {}", other.forbid_submit));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

fn fmt_target(target: Option<CellTarget>) -> String {
    match target {
        Some(t) => format!("({},{})", t.col(), t.row()),
        None => "none".to_string(),
    }
}
