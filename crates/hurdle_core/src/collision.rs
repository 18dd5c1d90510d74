//! Axis-aligned rectangles and the overlap test behind every collision check.
//!
//! Coordinates are y-down screen space: y = 0 at the top edge, larger y is
//! lower on screen. A rectangle is its top-left corner plus extents, which is
//! also how the renderer positions quads, so boxes flow from simulation to
//! drawing without conversion.
//!
//! The overlap test uses strict inequalities on all four edges (half-open
//! intervals). Rectangles that merely touch do not overlap, so an obstacle
//! grazing the actor's edge pixel-exactly is still a miss.

/// Axis-aligned rectangle in y-down screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// Half-open-interval AABB overlap. Pure function, no state.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}
