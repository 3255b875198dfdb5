use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub enum AppEvent {
    UiEvent(UiEvent),
    /// Text to show in the result area of the overlay
    ShowResult(String),
    StatusUpdate {
        status: String,
        running: bool,
    },
    AutoModeChanged(bool),
    SelectionChanged(SelectionRect),
    TickCompleted(TickOutcome),
    BackendReady,
}

/// Input coming from the overlay surface
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Pointer(PointerEvent),
    /// View measured (or re-measured) with the given size in view pixels
    ViewResized { width: f32, height: f32 },
    /// Overlay view dragged to a new on-screen origin
    ViewMoved { x: f32, y: f32 },
    TranslateOnce,
    ToggleAuto,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
}

/// Which trigger started a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Manual,
    Auto,
}

/// How a single capture tick ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Translated,
    /// Recognized text identical to the previous tick, translation skipped
    Unchanged,
    NoText,
    CaptureFailed,
    TranslationFailed,
    /// Finished after the loop was stopped; result thrown away
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    #[default]
    None,
    Move,
    ResizeTopLeft,
    ResizeTopRight,
    ResizeBottomLeft,
    ResizeBottomRight,
}

/// Selection rectangle in view-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl SelectionRect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn offset(&mut self, dx: f32, dy: f32) {
        self.left += dx;
        self.right += dx;
        self.top += dy;
        self.bottom += dy;
    }

    /// Half-open containment, an empty rectangle contains nothing
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.left < self.right
            && self.top < self.bottom
            && x >= self.left
            && x < self.right
            && y >= self.top
            && y < self.bottom
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            left: self.left * factor,
            top: self.top * factor,
            right: self.right * factor,
            bottom: self.bottom * factor,
        }
    }
}

/// Integer pixel rectangle in source-frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScreenRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Where the overlay view sits on screen and how view pixels map to screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewPlacement {
    pub origin_x: f32,
    pub origin_y: f32,
    pub scale: f32,
}

impl Default for ViewPlacement {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            scale: 1.0,
        }
    }
}

impl ViewPlacement {
    /// Map a view-local selection onto the capture frame, truncating toward zero
    pub fn to_screen(&self, rect: &SelectionRect) -> ScreenRect {
        let map_x = |v: f32| ((self.origin_x + v) * self.scale) as i32;
        let map_y = |v: f32| ((self.origin_y + v) * self.scale) as i32;
        ScreenRect {
            left: map_x(rect.left),
            top: map_y(rect.top),
            right: map_x(rect.right),
            bottom: map_y(rect.bottom),
        }
    }
}
