//! Pointer-to-cell addressing and scroll targets
//!
//! Both directions are pure functions of the geometry supplied with each
//! pointer event. Nothing here is cached between events.

use serde::{Deserialize, Serialize};

use crate::columns::ColumnLayout;
use crate::selection::{Cell, CellTarget};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Screen rectangle in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Viewport state at the moment of an input event
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Scrolled content rectangle (moves with scrolling)
    pub inner: Rect,
    /// Fixed outer frame, used to pin header, gutter and sticky bands
    pub outer: Option<Rect>,
    pub width: f32,
    pub height: f32,
    pub scroll_top: f32,
    pub scroll_left: f32,
}

impl Viewport {
    /// Unscrolled viewport whose content starts at the frame origin
    pub fn new(frame: Rect) -> Self {
        Self {
            inner: Rect::new(frame.left, frame.top, frame.width, frame.height),
            outer: Some(frame),
            width: frame.width,
            height: frame.height,
            scroll_top: 0.0,
            scroll_left: 0.0,
        }
    }

    /// The same viewport without band pinning
    pub fn without_outer(&self) -> Self {
        Self {
            outer: None,
            ..*self
        }
    }

    /// Apply a scroll target, moving the content rectangle with it
    pub fn scroll_to(&mut self, target: ScrollTarget) {
        if let Some(top) = target.top {
            self.inner.top += self.scroll_top - top;
            self.scroll_top = top;
        }
        if let Some(left) = target.left {
            self.inner.left += self.scroll_left - left;
            self.scroll_left = left;
        }
    }
}

/// Column edges plus row metrics for one event
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    pub layout: ColumnLayout,
    pub row_height: f32,
    pub header_height: f32,
    pub row_count: usize,
    pub has_sticky_right: bool,
}

/// New scroll offsets. `None` on an axis means no scroll is needed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollTarget {
    pub top: Option<f32>,
    pub left: Option<f32>,
}

impl ScrollTarget {
    pub fn is_noop(&self) -> bool {
        self.top.is_none() && self.left.is_none()
    }
}

/// Map a pointer position to the cell under it
pub fn pointer_to_cell(point: Point, geometry: &GridGeometry, viewport: &Viewport) -> Option<Cell> {
    let layout = &geometry.layout;
    let len = layout.len();
    if len == 0 {
        return None;
    }

    let mut x = point.x - viewport.inner.left;
    let mut y = point.y - viewport.inner.top;

    if let Some(outer) = viewport.outer {
        if point.y - outer.top <= geometry.header_height {
            y = 0.0;
        }
        if point.x - outer.left <= layout.widths[0] {
            x = 0.0;
        }
        if geometry.has_sticky_right && len >= 2 && outer.right() - point.x <= layout.widths[len - 1] {
            x = layout.rights[len - 2] + 1.0;
        }
    }

    let col = match layout.rights.iter().position(|&right| x < right) {
        Some(index) => index as i32 - 1,
        None => len as i32 - 2,
    };

    let last_row = geometry.row_count as i32 - 1;
    let row = if geometry.row_height > 0.0 {
        ((y - geometry.header_height) / geometry.row_height).floor() as i32
    } else {
        -1
    };

    Some(Cell::new(col, row.max(-1).min(last_row)))
}

/// Client position of a cell's center, the inverse of [`pointer_to_cell`]
///
/// Column `-1` is the gutter and row `-1` the header.
pub fn cell_center(cell: Cell, geometry: &GridGeometry, viewport: &Viewport) -> Option<Point> {
    let slot = usize::try_from(cell.col + 1).ok()?;
    let width = *geometry.layout.widths.get(slot)?;
    let right = *geometry.layout.rights.get(slot)?;
    let x = viewport.inner.left + right - width / 2.0;

    let y = if cell.row < 0 {
        viewport.inner.top + geometry.header_height / 2.0
    } else {
        viewport.inner.top
            + geometry.header_height
            + cell.row as f32 * geometry.row_height
            + geometry.row_height / 2.0
    };
    Some(Point::new(x, y))
}

/// Smallest scroll adjustment that brings the target cell fully into view
pub fn cell_to_scroll_target(target: &CellTarget, geometry: &GridGeometry, viewport: &Viewport) -> ScrollTarget {
    let mut result = ScrollTarget::default();
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return result;
    }

    let cell = target.cell;

    if !target.scroll.do_not_scroll_y && cell.row >= 0 {
        let top_max = cell.row as f32 * geometry.row_height;
        let top_min = (cell.row + 1) as f32 * geometry.row_height + geometry.header_height
            - viewport.height
            + 1.0;

        if viewport.scroll_top > top_max {
            result.top = Some(top_max);
        } else if viewport.scroll_top < top_min {
            result.top = Some(top_min);
        }
    }

    let layout = &geometry.layout;
    let col = cell.col;
    if !target.scroll.do_not_scroll_x && col >= 0 && ((col + 1) as usize) < layout.len() {
        let col = col as usize;
        let sticky = if geometry.has_sticky_right {
            layout.widths.last().copied().unwrap_or(0.0)
        } else {
            0.0
        };
        let left_max = layout.rights[col] - layout.rights[0];
        let left_min = layout.rights[col] + layout.widths[col + 1] + sticky - viewport.width + 1.0;

        if viewport.scroll_left > left_max {
            result.left = Some(left_max);
        } else if viewport.scroll_left < left_min {
            result.left = Some(left_min);
        }
    }

    result
}
