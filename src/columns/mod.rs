//! Column configuration, normalization and width layout

pub mod layout;
pub mod record;
pub mod registry;
pub mod spec;

pub use layout::{ColumnLayout, FlexItem};
pub use record::{checkbox_column, int_column, record, text_column, Record, RecordFactory};
pub use registry::{Column, ColumnKind, ColumnRegistry, GUTTER_ID, STICKY_RIGHT_ID};
pub use spec::{ColumnSpec, ColumnWidth, Disabled, GutterSpec, RowContext};
