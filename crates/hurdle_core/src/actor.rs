//! Player character physics: jump impulse, gravity, landing correction.

use crate::collision::Rect;

/// The player-controlled runner.
///
/// Horizontal position is fixed; the world scrolls past instead. The only
/// dynamics are vertical: a jump impulse, gravity every step, and a clamp
/// back onto the ground band when the arc comes down.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub velocity_y: f32,
    pub grounded: bool,
    /// Top-edge y while standing on the ground band. Computed once from
    /// screen geometry at construction and clamped to on every landing.
    pub rest_y: f32,
}

impl Actor {
    /// Build an actor standing on the ground band.
    pub fn new(x: f32, width: f32, height: f32, rest_y: f32) -> Self {
        Self {
            x,
            y: rest_y,
            width,
            height,
            velocity_y: 0.0,
            grounded: true,
            rest_y,
        }
    }

    /// Jump is edge-triggered and only legal from grounded state. Airborne
    /// calls are a no-op, which is what rules out double jumps.
    pub fn jump(&mut self, jump_velocity: f32) {
        if self.grounded {
            self.velocity_y = jump_velocity;
            self.grounded = false;
        }
    }

    /// One fixed step of vertical integration.
    ///
    /// Order matters: gravity into velocity, velocity into position, then
    /// the landing clamp. Changing this order changes every jump arc.
    pub fn tick(&mut self, gravity: f32) {
        self.velocity_y += gravity;
        self.y += self.velocity_y;
        if self.y >= self.rest_y {
            self.y = self.rest_y;
            self.velocity_y = 0.0;
            self.grounded = true;
        }
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
