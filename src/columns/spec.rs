//! Sparse column configuration as supplied by the host
//!
//! A [`ColumnSpec`] only carries what the host sets. Defaults are resolved once,
//! by the registry, so nothing downstream has to ask "was this provided?".

use std::fmt;
use std::rc::Rc;

/// Row passed to per-row column predicates
#[derive(Debug)]
pub struct RowContext<'a, T> {
    pub row_data: &'a T,
    pub row_index: usize,
    /// True while the row is provisional (created, not yet confirmed by the host)
    pub is_creating: bool,
}

pub type CellPredicate<T> = Rc<dyn Fn(&T, usize) -> bool>;
pub type CopyFn<T> = Rc<dyn Fn(&T, usize) -> Option<String>>;
pub type PasteFn<T> = Rc<dyn Fn(&T, &str, usize) -> T>;
pub type DeleteFn<T> = Rc<dyn Fn(&T, usize) -> T>;
pub type PrePasteFn = Rc<dyn Fn(Vec<String>) -> Vec<String>>;
pub type DisabledFn<T> = Rc<dyn Fn(&RowContext<'_, T>) -> bool>;

/// Whether a column's cells accept edits
pub enum Disabled<T> {
    Always(bool),
    When(DisabledFn<T>),
}

impl<T> Disabled<T> {
    pub fn evaluate(&self, ctx: &RowContext<'_, T>) -> bool {
        match self {
            Disabled::Always(flag) => *flag,
            Disabled::When(predicate) => predicate(ctx),
        }
    }

    /// Only a constant `true` counts; predicates may enable some rows
    pub fn is_always(&self) -> bool {
        matches!(self, Disabled::Always(true))
    }
}

impl<T> Default for Disabled<T> {
    fn default() -> Self {
        Disabled::Always(false)
    }
}

impl<T> Clone for Disabled<T> {
    fn clone(&self) -> Self {
        match self {
            Disabled::Always(flag) => Disabled::Always(*flag),
            Disabled::When(predicate) => Disabled::When(Rc::clone(predicate)),
        }
    }
}

impl<T> fmt::Debug for Disabled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disabled::Always(flag) => write!(f, "Always({})", flag),
            Disabled::When(_) => write!(f, "When(..)"),
        }
    }
}

/// Legacy single-value width
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    /// Grow factor with zero basis
    Flex(f32),
    /// Fixed pixel width (`0 0 <px>`)
    Fixed(f32),
}

/// A partially configured column
pub struct ColumnSpec<T> {
    pub id: String,
    pub title: Option<String>,
    pub width: Option<ColumnWidth>,
    pub basis: Option<f32>,
    pub grow: Option<f32>,
    pub shrink: Option<f32>,
    pub min_width: Option<f32>,
    pub max_width: Option<f32>,
    pub disabled: Option<Disabled<T>>,
    pub required: Option<bool>,
    pub disable_keys: Option<bool>,
    pub keep_focus: Option<bool>,
    pub render_when_scrolling: Option<bool>,
    pub is_cell_empty: Option<CellPredicate<T>>,
    pub copy_value: Option<CopyFn<T>>,
    pub paste_value: Option<PasteFn<T>>,
    pub pre_paste_values: Option<PrePasteFn>,
    pub delete_value: Option<DeleteFn<T>>,
}

impl<T> ColumnSpec<T> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            width: None,
            basis: None,
            grow: None,
            shrink: None,
            min_width: None,
            max_width: None,
            disabled: None,
            required: None,
            disable_keys: None,
            keep_focus: None,
            render_when_scrolling: None,
            is_cell_empty: None,
            copy_value: None,
            paste_value: None,
            pre_paste_values: None,
            delete_value: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn width(mut self, width: ColumnWidth) -> Self {
        self.width = Some(width);
        self
    }

    pub fn flex(mut self, basis: f32, grow: f32, shrink: f32) -> Self {
        self.basis = Some(basis);
        self.grow = Some(grow);
        self.shrink = Some(shrink);
        self
    }

    pub fn min_width(mut self, px: f32) -> Self {
        self.min_width = Some(px);
        self
    }

    pub fn max_width(mut self, px: f32) -> Self {
        self.max_width = Some(px);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(Disabled::Always(disabled));
        self
    }

    pub fn disabled_when(mut self, predicate: impl Fn(&RowContext<'_, T>) -> bool + 'static) -> Self {
        self.disabled = Some(Disabled::When(Rc::new(predicate)));
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn disable_keys(mut self, disable_keys: bool) -> Self {
        self.disable_keys = Some(disable_keys);
        self
    }

    pub fn keep_focus(mut self, keep_focus: bool) -> Self {
        self.keep_focus = Some(keep_focus);
        self
    }

    pub fn render_when_scrolling(mut self, render: bool) -> Self {
        self.render_when_scrolling = Some(render);
        self
    }

    pub fn is_cell_empty(mut self, f: impl Fn(&T, usize) -> bool + 'static) -> Self {
        self.is_cell_empty = Some(Rc::new(f));
        self
    }

    pub fn copy_value(mut self, f: impl Fn(&T, usize) -> Option<String> + 'static) -> Self {
        self.copy_value = Some(Rc::new(f));
        self
    }

    pub fn paste_value(mut self, f: impl Fn(&T, &str, usize) -> T + 'static) -> Self {
        self.paste_value = Some(Rc::new(f));
        self
    }

    pub fn pre_paste_values(mut self, f: impl Fn(Vec<String>) -> Vec<String> + 'static) -> Self {
        self.pre_paste_values = Some(Rc::new(f));
        self
    }

    pub fn delete_value(mut self, f: impl Fn(&T, usize) -> T + 'static) -> Self {
        self.delete_value = Some(Rc::new(f));
        self
    }
}

impl<T> Clone for ColumnSpec<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            width: self.width,
            basis: self.basis,
            grow: self.grow,
            shrink: self.shrink,
            min_width: self.min_width,
            max_width: self.max_width,
            disabled: self.disabled.clone(),
            required: self.required,
            disable_keys: self.disable_keys,
            keep_focus: self.keep_focus,
            render_when_scrolling: self.render_when_scrolling,
            is_cell_empty: self.is_cell_empty.clone(),
            copy_value: self.copy_value.clone(),
            paste_value: self.paste_value.clone(),
            pre_paste_values: self.pre_paste_values.clone(),
            delete_value: self.delete_value.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("width", &self.width)
            .field("disabled", &self.disabled)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// Leading gutter column configuration
pub enum GutterSpec<T> {
    /// 40px row-number gutter
    Default,
    /// Gutter with host overrides for title and layout
    Custom(ColumnSpec<T>),
    /// Zero-width gutter
    Hidden,
}

impl<T> Default for GutterSpec<T> {
    fn default() -> Self {
        GutterSpec::Default
    }
}

impl<T> Clone for GutterSpec<T> {
    fn clone(&self) -> Self {
        match self {
            GutterSpec::Default => GutterSpec::Default,
            GutterSpec::Custom(spec) => GutterSpec::Custom(spec.clone()),
            GutterSpec::Hidden => GutterSpec::Hidden,
        }
    }
}

impl<T> fmt::Debug for GutterSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GutterSpec::Default => write!(f, "Default"),
            GutterSpec::Custom(spec) => write!(f, "Custom({})", spec.id),
            GutterSpec::Hidden => write!(f, "Hidden"),
        }
    }
}
