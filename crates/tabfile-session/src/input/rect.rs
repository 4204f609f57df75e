//! Rectangle selection over a single-column list with edge auto-scroll.

use std::ops::Range;
use std::time::Instant;

use tabfile_core::{ItemRecord, SessionConfig};

use super::Point;
use crate::selection::SelectionModel;

/// Geometry of the visible list.
///
/// Row `k` spans `[k * pitch, k * pitch + row_height]` in content
/// coordinates, where `pitch = row_height + row_spacing`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Vertical scroll offset of the content.
    pub scroll_offset: f64,
    /// Visible height.
    pub height: f64,
    pub row_height: f64,
    /// Gap between rows.
    pub row_spacing: f64,
    /// Width of the row hit area; points right of it hit no row.
    pub row_width: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_offset: 0.0,
            height: 600.0,
            row_height: 24.0,
            row_spacing: 0.0,
            row_width: f64::INFINITY,
        }
    }
}

impl Viewport {
    pub fn new(height: f64, row_height: f64) -> Self {
        Self {
            height,
            row_height,
            ..Self::default()
        }
    }

    pub fn with_spacing(mut self, row_spacing: f64) -> Self {
        self.row_spacing = row_spacing;
        self
    }

    pub fn with_row_width(mut self, row_width: f64) -> Self {
        self.row_width = row_width;
        self
    }

    pub fn row_pitch(&self) -> f64 {
        self.row_height + self.row_spacing
    }

    /// Height of `rows` rows laid out top to bottom.
    pub fn content_height(&self, rows: usize) -> f64 {
        if rows == 0 {
            0.0
        } else {
            (rows - 1) as f64 * self.row_pitch() + self.row_height
        }
    }

    /// Largest valid scroll offset for `rows` rows.
    pub fn max_scroll(&self, rows: usize) -> f64 {
        (self.content_height(rows) - self.height).max(0.0)
    }

    /// Convert a viewport point to content coordinates.
    pub fn to_content(&self, point: Point) -> Point {
        Point::new(point.x, point.y + self.scroll_offset)
    }

    /// The row under a viewport point, if any.
    pub fn row_at(&self, point: Point, rows: usize) -> Option<usize> {
        let content = self.to_content(point);
        if content.x < 0.0 || content.x >= self.row_width || content.y < 0.0 {
            return None;
        }
        let index = (content.y / self.row_pitch()).floor() as usize;
        let offset = content.y - index as f64 * self.row_pitch();
        (index < rows && offset <= self.row_height).then_some(index)
    }

    /// Rows whose vertical bounds intersect `[top, bottom]` in content
    /// coordinates.
    pub fn rows_intersecting(&self, top: f64, bottom: f64, rows: usize) -> Range<usize> {
        let pitch = self.row_pitch();
        if rows == 0 || bottom < top || pitch <= 0.0 || top > self.content_height(rows) {
            return 0..0;
        }
        let first = ((top - self.row_height) / pitch).ceil().max(0.0) as usize;
        let last = (bottom / pitch).floor();
        if last < 0.0 {
            return 0..0;
        }
        let end = (last as usize + 1).min(rows);
        if first >= end { 0..0 } else { first..end }
    }
}

/// An in-progress rectangle selection.
///
/// The origin is kept in content coordinates so the rectangle stays put
/// while the list scrolls underneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct RectSelection {
    origin: Point,
    pointer: Point,
    rows: Range<usize>,
    velocity: f64,
    next_tick: Option<Instant>,
}

impl RectSelection {
    /// Start a rectangle at `origin`, given in content coordinates.
    pub(crate) fn begin(origin: Point, viewport: &Viewport) -> Self {
        Self {
            origin,
            pointer: Point::new(origin.x, origin.y - viewport.scroll_offset),
            rows: 0..0,
            velocity: 0.0,
            next_tick: None,
        }
    }

    /// Rows currently covered by the rectangle.
    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }

    /// Scroll distance applied per auto-scroll tick; negative scrolls up.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn next_tick(&self) -> Option<Instant> {
        self.next_tick
    }

    /// Origin in content coordinates.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Follow the pointer. Returns whether the selection changed.
    pub(crate) fn pointer_moved(
        &mut self,
        at: Instant,
        position: Point,
        viewport: &Viewport,
        items: &[ItemRecord],
        selection: &mut SelectionModel,
        config: &SessionConfig,
    ) -> bool {
        self.pointer = position;
        self.velocity = edge_velocity(position.y, viewport.height, config);
        if self.velocity == 0.0 {
            self.next_tick = None;
        } else if self.next_tick.is_none() {
            self.next_tick = Some(at + config.autoscroll_tick());
        }
        self.reselect(viewport, items, selection)
    }

    /// Advance auto-scroll by one tick. Returns the new scroll offset when
    /// the list moved.
    pub(crate) fn tick(
        &mut self,
        now: Instant,
        viewport: &mut Viewport,
        items: &[ItemRecord],
        selection: &mut SelectionModel,
        config: &SessionConfig,
    ) -> Option<f64> {
        if self.velocity == 0.0 {
            self.next_tick = None;
            return None;
        }
        self.next_tick = Some(now + config.autoscroll_tick());

        let max = viewport.max_scroll(items.len());
        let offset = (viewport.scroll_offset + self.velocity).clamp(0.0, max);
        if offset == viewport.scroll_offset {
            return None;
        }
        viewport.scroll_offset = offset;
        self.reselect(viewport, items, selection);
        Some(offset)
    }

    /// Recompute the covered rows and toggle only the rows that entered or
    /// left the rectangle.
    fn reselect(
        &mut self,
        viewport: &Viewport,
        items: &[ItemRecord],
        selection: &mut SelectionModel,
    ) -> bool {
        let bottom_limit = viewport
            .content_height(items.len())
            .max(viewport.scroll_offset + viewport.height);
        let current = viewport.to_content(self.pointer);
        let clamp_x = |x: f64| x.clamp(0.0, viewport.row_width);
        let clamp_y = |y: f64| y.clamp(0.0, bottom_limit);

        let left = clamp_x(self.origin.x).min(clamp_x(current.x));
        let top = clamp_y(self.origin.y).min(clamp_y(current.y));
        let bottom = clamp_y(self.origin.y).max(clamp_y(current.y));

        let rows = if left >= viewport.row_width {
            0..0
        } else {
            viewport.rows_intersecting(top, bottom, items.len())
        };
        if rows == self.rows {
            return false;
        }

        let old = std::mem::replace(&mut self.rows, rows.clone());
        for index in old.start..old.end.min(rows.start) {
            selection.remove_index(items, index);
        }
        for index in old.start.max(rows.end)..old.end {
            selection.remove_index(items, index);
        }
        for index in rows.start..rows.end.min(old.start) {
            selection.add_index(items, index);
        }
        for index in rows.start.max(old.end)..rows.end {
            selection.add_index(items, index);
        }
        true
    }
}

fn edge_velocity(y: f64, height: f64, config: &SessionConfig) -> f64 {
    let margin = config.autoscroll_margin;
    let divisor = config.autoscroll_divisor.max(f64::EPSILON);
    if y < margin {
        (y - margin) / divisor
    } else if y > height - margin {
        (y - (height - margin)) / divisor
    } else {
        0.0
    }
}
