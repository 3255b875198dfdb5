//! Movable, resizable selection rectangle.
//!
//! The engine owns one [`SelectionRect`] in view-local coordinates and
//! updates it from pointer drags. It never performs I/O and is driven only
//! from the thread that owns the overlay.

use regio_config::selection::SelectionConfig;
use regio_types::{DragMode, SelectionRect};

/// Corner hit area is this multiple of the drawn handle radius
const HIT_TOLERANCE_FACTOR: f32 = 1.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryLimits {
    pub handle_radius: f32,
    pub min_width: f32,
    pub min_height: f32,
}

impl From<&SelectionConfig> for GeometryLimits {
    fn from(config: &SelectionConfig) -> Self {
        Self {
            handle_radius: config.handle_radius(),
            min_width: config.min_width(),
            min_height: config.min_height(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    mode: DragMode,
    start_rect: SelectionRect,
    start_x: f32,
    start_y: f32,
}

#[derive(Debug, Clone)]
pub struct GeometryEngine {
    rect: SelectionRect,
    limits: GeometryLimits,
    view_width: f32,
    view_height: f32,
    drag: Option<Drag>,
}

impl GeometryEngine {
    pub fn new(initial: SelectionRect, limits: GeometryLimits) -> Self {
        Self {
            rect: initial,
            limits,
            view_width: 0.0,
            view_height: 0.0,
            drag: None,
        }
    }

    pub fn from_config(config: &SelectionConfig) -> Self {
        Self::new(config.initial_rect(), GeometryLimits::from(config))
    }

    pub fn current_rect(&self) -> SelectionRect {
        self.rect
    }

    pub fn limits(&self) -> GeometryLimits {
        self.limits
    }

    pub fn active_mode(&self) -> DragMode {
        self.drag.map(|d| d.mode).unwrap_or_default()
    }

    pub fn hit_test(&self, x: f32, y: f32) -> DragMode {
        let tolerance = self.limits.handle_radius * HIT_TOLERANCE_FACTOR;
        let near = |ax: f32, ay: f32| (x - ax).abs() <= tolerance && (y - ay).abs() <= tolerance;
        let r = &self.rect;

        if near(r.left, r.top) {
            DragMode::ResizeTopLeft
        } else if near(r.right, r.top) {
            DragMode::ResizeTopRight
        } else if near(r.left, r.bottom) {
            DragMode::ResizeBottomLeft
        } else if near(r.right, r.bottom) {
            DragMode::ResizeBottomRight
        } else if r.contains(x, y) {
            DragMode::Move
        } else {
            DragMode::None
        }
    }

    pub fn on_drag_start(&mut self, x: f32, y: f32) -> DragMode {
        let mode = self.hit_test(x, y);
        self.drag = Some(Drag {
            mode,
            start_rect: self.rect,
            start_x: x,
            start_y: y,
        });
        mode
    }

    /// Returns true when the rectangle changed
    pub fn on_drag_move(&mut self, x: f32, y: f32) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let dx = x - drag.start_x;
        let dy = y - drag.start_y;
        let before = self.rect;

        match drag.mode {
            DragMode::None => return false,
            DragMode::Move => {
                let mut r = drag.start_rect;
                r.offset(dx, dy);
                self.rect = r;
            }
            DragMode::ResizeTopLeft => self.resize(drag.start_rect, dx, dy, true, true),
            DragMode::ResizeTopRight => self.resize(drag.start_rect, dx, dy, false, true),
            DragMode::ResizeBottomLeft => self.resize(drag.start_rect, dx, dy, true, false),
            DragMode::ResizeBottomRight => self.resize(drag.start_rect, dx, dy, false, false),
        }

        self.clamp_to_bounds(self.view_width, self.view_height);
        self.rect != before
    }

    /// Ends the drag, returning the rectangle it started from
    pub fn on_drag_end(&mut self) -> Option<SelectionRect> {
        self.drag.take().map(|d| d.start_rect)
    }

    /// Records the measured view size and clamps the rectangle into it
    pub fn set_view_size(&mut self, width: f32, height: f32) {
        self.view_width = width;
        self.view_height = height;
        self.clamp_to_bounds(width, height);
    }

    // The dragged edge moves back toward its partner when the minimum is
    // violated; the opposite edge stays pinned.
    fn resize(&mut self, start: SelectionRect, dx: f32, dy: f32, left: bool, top: bool) {
        let mut r = start;
        let GeometryLimits {
            min_width,
            min_height,
            ..
        } = self.limits;

        if left {
            r.left += dx;
        } else {
            r.right += dx;
        }
        if top {
            r.top += dy;
        } else {
            r.bottom += dy;
        }

        if r.width() < min_width {
            if left {
                r.left = r.right - min_width;
            } else {
                r.right = r.left + min_width;
            }
        }
        if r.height() < min_height {
            if top {
                r.top = r.bottom - min_height;
            } else {
                r.bottom = r.top + min_height;
            }
        }

        self.rect = r;
    }

    pub fn clamp_to_bounds(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let GeometryLimits {
            min_width,
            min_height,
            ..
        } = self.limits;
        let r = &mut self.rect;

        let dx = (-r.left).max(0.0) + (width - r.right).min(0.0);
        let dy = (-r.top).max(0.0) + (height - r.bottom).min(0.0);
        r.offset(dx, dy);

        // A view smaller than the minimum size wins over the minimum.
        r.left = clamp(r.left, 0.0, (width - min_width).max(0.0));
        r.top = clamp(r.top, 0.0, (height - min_height).max(0.0));
        r.right = clamp(r.right, (r.left + min_width).min(width), width);
        r.bottom = clamp(r.bottom, (r.top + min_height).min(height), height);
    }
}

// f32::clamp panics when lo > hi; callers guarantee lo <= hi but this stays total.
fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    v.max(lo).min(hi)
}
