//! Column registry: normalized, fully-defaulted column list
//!
//! Index 0 is always the gutter, data columns follow, and an optional
//! sticky-right column comes last. Grid cells address data columns with
//! `col = index - 1`, which makes the gutter `col == -1`.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::layout::{ColumnLayout, FlexItem};
use super::spec::{
    CellPredicate, ColumnSpec, ColumnWidth, CopyFn, DeleteFn, Disabled, GutterSpec, PasteFn,
    PrePasteFn, RowContext,
};
use crate::error::GridError;

pub const GUTTER_ID: &str = "__gutter";
pub const STICKY_RIGHT_ID: &str = "__sticky_right";

const DEFAULT_MIN_WIDTH: f32 = 100.0;
const SYNTHETIC_COLUMN_WIDTH: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Gutter,
    Data,
    StickyRight,
}

/// A column with every behavior resolved
pub struct Column<T> {
    pub id: String,
    pub title: Option<String>,
    pub kind: ColumnKind,
    pub basis: f32,
    pub grow: f32,
    pub shrink: f32,
    pub min_width: f32,
    pub max_width: Option<f32>,
    pub disabled: Disabled<T>,
    pub required: bool,
    pub disable_keys: bool,
    pub keep_focus: bool,
    pub render_when_scrolling: bool,
    empty_fn: CellPredicate<T>,
    copy_fn: CopyFn<T>,
    paste_fn: PasteFn<T>,
    pre_paste_fn: PrePasteFn,
    delete_fn: DeleteFn<T>,
}

impl<T> Column<T> {
    pub fn is_disabled(&self, row_data: &T, row_index: usize, is_creating: bool) -> bool {
        self.disabled.evaluate(&RowContext {
            row_data,
            row_index,
            is_creating,
        })
    }

    pub fn is_cell_empty(&self, row_data: &T, row_index: usize) -> bool {
        (self.empty_fn)(row_data, row_index)
    }

    pub fn copy_value(&self, row_data: &T, row_index: usize) -> Option<String> {
        (self.copy_fn)(row_data, row_index)
    }

    pub fn paste_value(&self, row_data: &T, value: &str, row_index: usize) -> T {
        (self.paste_fn)(row_data, value, row_index)
    }

    pub fn pre_paste_values(&self, values: Vec<String>) -> Vec<String> {
        (self.pre_paste_fn)(values)
    }

    pub fn delete_value(&self, row_data: &T, row_index: usize) -> T {
        (self.delete_fn)(row_data, row_index)
    }

    /// Header text: the title, or the id when untitled
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    fn flex_item(&self) -> FlexItem {
        FlexItem {
            basis: self.basis,
            grow: self.grow,
            shrink: self.shrink,
            min: self.min_width,
            max: self.max_width,
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("basis", &self.basis)
            .field("grow", &self.grow)
            .field("min_width", &self.min_width)
            .field("disabled", &self.disabled)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// Normalized column list plus the width overrides set by resizing
pub struct ColumnRegistry<T> {
    specs: Vec<ColumnSpec<T>>,
    gutter: GutterSpec<T>,
    sticky_right: Option<ColumnSpec<T>>,
    width_overrides: HashMap<String, f32>,
    columns: Vec<Column<T>>,
}

impl<T: Clone + 'static> ColumnRegistry<T> {
    pub fn new(
        specs: Vec<ColumnSpec<T>>,
        gutter: GutterSpec<T>,
        sticky_right: Option<ColumnSpec<T>>,
    ) -> Self {
        let mut registry = Self {
            specs,
            gutter,
            sticky_right,
            width_overrides: HashMap::new(),
            columns: Vec::new(),
        };
        registry.normalize();
        registry
    }

    /// Replace the data columns, keeping width overrides of columns that survive
    pub fn set_columns(&mut self, specs: Vec<ColumnSpec<T>>) {
        self.specs = specs;
        let known: Vec<String> = self.specs.iter().map(|s| s.id.clone()).collect();
        self.width_overrides
            .retain(|id, _| known.iter().any(|k| k == id) || is_synthetic(id));
        self.normalize();
    }

    /// Pin a column to a fixed pixel width (resize interaction)
    pub fn set_column_width(&mut self, id: &str, width: f32) -> Result<(), GridError> {
        if !self.columns.iter().any(|c| c.id == id) {
            return Err(GridError::UnknownColumn(id.to_string()));
        }
        tracing::debug!("Column {} resized to {}px", id, width);
        self.width_overrides.insert(id.to_string(), width.max(0.0));
        self.normalize();
        Ok(())
    }

    pub fn width_override(&self, id: &str) -> Option<f32> {
        self.width_overrides.get(id).copied()
    }

    fn normalize(&mut self) {
        let mut columns = Vec::with_capacity(self.specs.len() + 2);

        let gutter = match &self.gutter {
            GutterSpec::Default => synthetic_column(None, GUTTER_ID, ColumnKind::Gutter),
            GutterSpec::Custom(spec) => synthetic_column(Some(spec), GUTTER_ID, ColumnKind::Gutter),
            GutterSpec::Hidden => {
                let mut column = synthetic_column(None, GUTTER_ID, ColumnKind::Gutter);
                column.basis = 0.0;
                column.min_width = 0.0;
                column
            }
        };
        columns.push(gutter);

        for spec in &self.specs {
            columns.push(resolve(spec, ColumnKind::Data));
        }

        if let Some(spec) = &self.sticky_right {
            columns.push(synthetic_column(
                Some(spec),
                STICKY_RIGHT_ID,
                ColumnKind::StickyRight,
            ));
        }

        for column in &mut columns {
            if let Some(width) = self.width_overrides.get(&column.id) {
                column.basis = *width;
                column.grow = 0.0;
                column.shrink = 0.0;
            }
        }

        self.columns = columns;
    }
}

impl<T> ColumnRegistry<T> {
    /// All columns including gutter and sticky-right
    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn has_sticky_right(&self) -> bool {
        self.sticky_right.is_some()
    }

    pub fn data_column_count(&self) -> usize {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Data)
            .count()
    }

    /// Index of the last data column, `-1` when there are none
    pub fn last_data_col(&self) -> i32 {
        self.data_column_count() as i32 - 1
    }

    /// Column addressed by a cell column index (gutter at `-1`)
    pub fn column_at(&self, col: i32) -> Option<&Column<T>> {
        if col < -1 {
            return None;
        }
        self.columns.get((col + 1) as usize)
    }

    /// Data column at a cell column index
    pub fn data_column(&self, col: i32) -> Option<&Column<T>> {
        self.column_at(col).filter(|c| c.kind == ColumnKind::Data)
    }

    pub fn data_columns(&self) -> impl Iterator<Item = &Column<T>> {
        self.columns.iter().filter(|c| c.kind == ColumnKind::Data)
    }

    /// Cell column index of a data column id
    pub fn position_of(&self, id: &str) -> Option<i32> {
        self.columns
            .iter()
            .position(|c| c.id == id && c.kind == ColumnKind::Data)
            .map(|index| index as i32 - 1)
    }

    /// Resolve pixel widths against the available width
    pub fn layout(&self, available_width: f32) -> ColumnLayout {
        let items: Vec<FlexItem> = self.columns.iter().map(Column::flex_item).collect();
        ColumnLayout::resolve(&items, available_width)
    }
}

impl<T> fmt::Debug for ColumnRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnRegistry")
            .field("columns", &self.columns)
            .field("width_overrides", &self.width_overrides)
            .finish()
    }
}

fn is_synthetic(id: &str) -> bool {
    id == GUTTER_ID || id == STICKY_RIGHT_ID
}

fn resolve<T: Clone + 'static>(spec: &ColumnSpec<T>, kind: ColumnKind) -> Column<T> {
    let (mut basis, mut grow, mut shrink) = (0.0, 1.0, 1.0);
    match spec.width {
        Some(ColumnWidth::Flex(factor)) => grow = factor,
        Some(ColumnWidth::Fixed(px)) => {
            basis = px;
            grow = 0.0;
            shrink = 0.0;
        }
        None => {}
    }

    Column {
        id: spec.id.clone(),
        title: spec.title.clone(),
        kind,
        basis: spec.basis.unwrap_or(basis),
        grow: spec.grow.unwrap_or(grow),
        shrink: spec.shrink.unwrap_or(shrink),
        min_width: spec.min_width.unwrap_or(DEFAULT_MIN_WIDTH),
        max_width: spec.max_width,
        disabled: spec.disabled.clone().unwrap_or_default(),
        required: spec.required.unwrap_or(false),
        disable_keys: spec.disable_keys.unwrap_or(false),
        keep_focus: spec.keep_focus.unwrap_or(false),
        render_when_scrolling: spec.render_when_scrolling.unwrap_or(true),
        empty_fn: spec.is_cell_empty.clone().unwrap_or_else(never_empty),
        copy_fn: spec.copy_value.clone().unwrap_or_else(copy_nothing),
        paste_fn: spec.paste_value.clone().unwrap_or_else(paste_unchanged),
        pre_paste_fn: spec.pre_paste_values.clone().unwrap_or_else(pre_paste_identity),
        delete_fn: spec.delete_value.clone().unwrap_or_else(delete_unchanged),
    }
}

fn never_empty<T: 'static>() -> CellPredicate<T> {
    Rc::new(|_: &T, _: usize| false)
}

fn always_empty<T: 'static>() -> CellPredicate<T> {
    Rc::new(|_: &T, _: usize| true)
}

fn copy_nothing<T: 'static>() -> CopyFn<T> {
    Rc::new(|_: &T, _: usize| None)
}

fn paste_unchanged<T: Clone + 'static>() -> PasteFn<T> {
    Rc::new(|row: &T, _: &str, _: usize| row.clone())
}

fn pre_paste_identity() -> PrePasteFn {
    Rc::new(|values: Vec<String>| values)
}

fn delete_unchanged<T: Clone + 'static>() -> DeleteFn<T> {
    Rc::new(|row: &T, _: usize| row.clone())
}

/// Gutter and sticky-right columns: 40px fixed, no minimum, always empty
fn synthetic_column<T: Clone + 'static>(
    spec: Option<&ColumnSpec<T>>,
    id: &str,
    kind: ColumnKind,
) -> Column<T> {
    let mut base = match spec {
        Some(spec) => spec.clone(),
        None => ColumnSpec::new(id),
    };
    base.id = id.to_string();
    if base.width.is_none() && base.basis.is_none() {
        base.width = Some(ColumnWidth::Fixed(SYNTHETIC_COLUMN_WIDTH));
    }
    base.min_width = Some(base.min_width.unwrap_or(0.0));
    base.is_cell_empty = Some(always_empty());
    resolve(&base, kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: &str) -> ColumnSpec<String> {
        ColumnSpec::new(id)
    }

    #[test]
    fn test_gutter_injected_with_defaults() {
        let registry = ColumnRegistry::new(vec![spec("a"), spec("b")], GutterSpec::Default, None);
        let columns = registry.columns();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].kind, ColumnKind::Gutter);
        assert_eq!(columns[0].basis, 40.0);
        assert_eq!(columns[0].grow, 0.0);
        assert_eq!(columns[0].min_width, 0.0);
        assert!(columns[0].is_cell_empty(&String::new(), 0));
        assert_eq!(registry.data_column_count(), 2);
        assert_eq!(registry.last_data_col(), 1);
    }

    #[test]
    fn test_data_column_defaults() {
        let registry = ColumnRegistry::new(vec![spec("a")], GutterSpec::Default, None);
        let column = registry.data_column(0).unwrap();
        let row = "value".to_string();
        assert_eq!(column.min_width, 100.0);
        assert!(!column.required);
        assert!(!column.disable_keys);
        assert!(!column.keep_focus);
        assert!(column.render_when_scrolling);
        assert!(!column.is_disabled(&row, 0, false));
        assert!(!column.is_cell_empty(&row, 0));
        assert_eq!(column.copy_value(&row, 0), None);
        assert_eq!(column.paste_value(&row, "other", 0), "value");
        assert_eq!(column.delete_value(&row, 0), "value");
        assert_eq!(
            column.pre_paste_values(vec!["x".to_string()]),
            vec!["x".to_string()]
        );
    }

    #[test]
    fn test_hidden_gutter_has_zero_width() {
        let registry = ColumnRegistry::new(vec![spec("a")], GutterSpec::Hidden, None);
        let layout = registry.layout(0.0);
        assert_eq!(layout.widths[0], 0.0);
    }

    #[test]
    fn test_sticky_right_is_last_and_not_data() {
        let registry = ColumnRegistry::new(
            vec![spec("a"), spec("b")],
            GutterSpec::Default,
            Some(spec("actions")),
        );
        assert!(registry.has_sticky_right());
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.columns()[3].kind, ColumnKind::StickyRight);
        assert_eq!(registry.columns()[3].id, STICKY_RIGHT_ID);
        assert!(registry.data_column(2).is_none());
        assert!(registry.column_at(2).is_some());
        assert_eq!(registry.last_data_col(), 1);
    }

    #[test]
    fn test_width_override_survives_reordering() {
        let mut registry =
            ColumnRegistry::new(vec![spec("a"), spec("b")], GutterSpec::Default, None);
        registry.set_column_width("b", 250.0).unwrap();

        registry.set_columns(vec![spec("b"), spec("a")]);
        let b = registry.data_column(0).unwrap();
        assert_eq!(b.id, "b");
        assert_eq!(b.basis, 250.0);
        assert_eq!(b.grow, 0.0);
        assert_eq!(registry.data_column(1).unwrap().basis, 0.0);
    }

    #[test]
    fn test_width_override_dropped_with_column() {
        let mut registry =
            ColumnRegistry::new(vec![spec("a"), spec("b")], GutterSpec::Default, None);
        registry.set_column_width("a", 120.0).unwrap();
        registry.set_columns(vec![spec("b")]);
        assert_eq!(registry.width_override("a"), None);
    }

    #[test]
    fn test_unknown_column_width_is_error() {
        let mut registry = ColumnRegistry::new(vec![spec("a")], GutterSpec::Default, None);
        assert_eq!(
            registry.set_column_width("zzz", 10.0),
            Err(GridError::UnknownColumn("zzz".to_string()))
        );
    }

    #[test]
    fn test_position_of() {
        let registry = ColumnRegistry::new(vec![spec("a"), spec("b")], GutterSpec::Default, None);
        assert_eq!(registry.position_of("b"), Some(1));
        assert_eq!(registry.position_of(GUTTER_ID), None);
        assert_eq!(registry.position_of("nope"), None);
    }

    #[test]
    fn test_legacy_widths() {
        let registry = ColumnRegistry::new(
            vec![
                spec("a").width(ColumnWidth::Flex(2.0)),
                spec("b").width(ColumnWidth::Fixed(80.0)),
            ],
            GutterSpec::Default,
            None,
        );
        let a = registry.data_column(0).unwrap();
        assert_eq!((a.basis, a.grow, a.shrink), (0.0, 2.0, 1.0));
        let b = registry.data_column(1).unwrap();
        assert_eq!((b.basis, b.grow, b.shrink), (80.0, 0.0, 0.0));
    }

    #[test]
    fn test_disabled_only_constant_true_is_always() {
        let registry = ColumnRegistry::new(
            vec![
                spec("a").disabled(true),
                spec("b").disabled_when(|ctx| ctx.is_creating),
            ],
            GutterSpec::Default,
            None,
        );
        assert!(registry.data_column(0).unwrap().disabled.is_always());
        let b = registry.data_column(1).unwrap();
        assert!(!b.disabled.is_always());
        assert!(b.is_disabled(&String::new(), 0, true));
        assert!(!b.is_disabled(&String::new(), 0, false));
    }
}
