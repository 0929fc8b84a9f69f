//! Document-space geometry resolution.
//!
//! Hosts report node rectangles relative to the viewport (the moving window),
//! while trigger thresholds live in document space (the fixed page). This
//! module converts between the two. Nothing here is cached: positions must be
//! re-resolved after every scroll, resize, or layout change.

/// A position in full-document coordinates (px).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offset {
    pub top: f64,
    pub left: f64,
}

/// An axis-aligned rectangle (px). Whether it is viewport-relative or
/// document-relative depends on where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self { top, left, width, height }
    }

    /// Bottom edge (top + height).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Snapshot of the host viewport: its height and current scroll offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Visible height in px.
    pub height: f64,
    /// Vertical scroll position in document px.
    pub scroll_top: f64,
    /// Horizontal scroll position in document px.
    pub scroll_left: f64,
}

impl Viewport {
    pub fn new(height: f64) -> Self {
        Self {
            height,
            scroll_top: 0.0,
            scroll_left: 0.0,
        }
    }
}

/// Resolve a viewport-relative rect to its absolute document-space offset by
/// adding the current scroll position.
#[inline]
pub fn absolute_offset(rect: &Rect, viewport: &Viewport) -> Offset {
    Offset {
        top: rect.top + viewport.scroll_top,
        left: rect.left + viewport.scroll_left,
    }
}
