//! String-map rows and ready-made columns over them
//!
//! `Record` is the row type the replay CLI and the integration tests use.
//! Missing keys and empty strings both count as empty cells.

use std::collections::BTreeMap;

use super::spec::ColumnSpec;
use crate::grid::RowFactory;

pub type Record = BTreeMap<String, String>;

/// Build a record from `(key, value)` pairs
pub fn record<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Record
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

fn is_blank(row: &Record, key: &str) -> bool {
    row.get(key).map_or(true, |v| v.is_empty())
}

fn with_value(row: &Record, key: &str, value: Option<String>) -> Record {
    let mut next = row.clone();
    match value {
        Some(value) => {
            next.insert(key.to_string(), value);
        }
        None => {
            next.remove(key);
        }
    }
    next
}

/// Free-text column. Pasted newlines collapse to spaces.
pub fn text_column(id: &str) -> ColumnSpec<Record> {
    let empty_key = id.to_string();
    let copy_key = id.to_string();
    let paste_key = id.to_string();
    let delete_key = id.to_string();

    ColumnSpec::new(id)
        .title(id)
        .is_cell_empty(move |row: &Record, _| is_blank(row, &empty_key))
        .copy_value(move |row: &Record, _| row.get(&copy_key).cloned())
        .paste_value(move |row: &Record, value: &str, _| {
            let cleaned = value.replace(['\r', '\n'], " ");
            let cleaned = cleaned.trim();
            let value = (!cleaned.is_empty()).then(|| cleaned.to_string());
            with_value(row, &paste_key, value)
        })
        .delete_value(move |row: &Record, _| with_value(row, &delete_key, None))
}

/// Integer column. Pasted text that does not parse clears the cell.
pub fn int_column(id: &str) -> ColumnSpec<Record> {
    let empty_key = id.to_string();
    let copy_key = id.to_string();
    let paste_key = id.to_string();
    let delete_key = id.to_string();

    ColumnSpec::new(id)
        .title(id)
        .is_cell_empty(move |row: &Record, _| is_blank(row, &empty_key))
        .copy_value(move |row: &Record, _| row.get(&copy_key).cloned())
        .paste_value(move |row: &Record, value: &str, _| {
            let digits: String = value.trim().replace([',', '_', ' '], "");
            let parsed = digits.parse::<i64>().ok().map(|n| n.to_string());
            with_value(row, &paste_key, parsed)
        })
        .delete_value(move |row: &Record, _| with_value(row, &delete_key, None))
}

/// Boolean column stored as `"true"`/`"false"`, copied as `YES`/`NO`
pub fn checkbox_column(id: &str) -> ColumnSpec<Record> {
    let empty_key = id.to_string();
    let copy_key = id.to_string();
    let paste_key = id.to_string();
    let delete_key = id.to_string();

    ColumnSpec::new(id)
        .title(id)
        .is_cell_empty(move |row: &Record, _| {
            row.get(&empty_key).map(String::as_str) != Some("true")
        })
        .copy_value(move |row: &Record, _| {
            let checked = row.get(&copy_key).map(String::as_str) == Some("true");
            Some(if checked { "YES" } else { "NO" }.to_string())
        })
        .paste_value(move |row: &Record, value: &str, _| {
            let checked = matches!(
                value.trim().to_lowercase().as_str(),
                "yes" | "true" | "on"
            );
            with_value(row, &paste_key, Some(checked.to_string()))
        })
        .delete_value(move |row: &Record, _| {
            with_value(row, &delete_key, Some("false".to_string()))
        })
}

/// Row factory producing records pre-filled with fixed defaults
#[derive(Debug, Clone, Default)]
pub struct RecordFactory {
    defaults: Record,
}

impl RecordFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: Record) -> Self {
        Self { defaults }
    }
}

impl RowFactory<Record> for RecordFactory {
    fn create_row(&self) -> Record {
        self.defaults.clone()
    }
}
