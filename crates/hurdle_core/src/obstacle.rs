//! Ground-aligned obstacles scrolling from the right edge toward the player.

use crate::collision::Rect;

#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One fixed step of scrolling. Nothing but x changes.
    pub fn tick(&mut self, scroll_speed: f32) {
        self.x -= scroll_speed;
    }

    /// True once the obstacle has fully left the visible area on the left.
    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_decreases_by_exactly_the_scroll_speed() {
        let mut obstacle = Obstacle::new(800.0, 310.0, 20.0, 40.0);
        let mut previous_x = obstacle.x;
        for _ in 0..50 {
            obstacle.tick(5.0);
            assert_eq!(obstacle.x, previous_x - 5.0);
            previous_x = obstacle.x;
        }
    }

    #[test]
    fn tick_leaves_everything_but_x_alone() {
        let mut obstacle = Obstacle::new(800.0, 310.0, 20.0, 40.0);
        obstacle.tick(5.0);
        assert_eq!(obstacle.y, 310.0);
        assert_eq!(obstacle.width, 20.0);
        assert_eq!(obstacle.height, 40.0);
    }

    #[test]
    fn off_screen_requires_fully_crossing_the_left_edge() {
        // Right edge exactly on the screen edge: still visible.
        let flush = Obstacle::new(-20.0, 310.0, 20.0, 40.0);
        assert!(!flush.is_off_screen());
        // One step further and it is gone.
        let gone = Obstacle::new(-20.1, 310.0, 20.0, 40.0);
        assert!(gone.is_off_screen());
    }

    #[test]
    fn canonical_obstacle_exits_on_tick_165() {
        // Spawned at x = 800 with width 20 and scroll 5, the off-screen
        // check first passes on tick 165 (x + 20 < 0 needs x < -20).
        let mut obstacle = Obstacle::new(800.0, 310.0, 20.0, 40.0);
        for tick in 1..=164 {
            obstacle.tick(5.0);
            assert!(
                !obstacle.is_off_screen(),
                "obstacle left the screen early, on tick {}",
                tick
            );
        }
        obstacle.tick(5.0);
        assert!(obstacle.is_off_screen());
    }

    #[test]
    fn bounding_box_follows_position() {
        let mut obstacle = Obstacle::new(800.0, 310.0, 20.0, 40.0);
        obstacle.tick(5.0);
        let bb = obstacle.bounding_box();
        assert_eq!(bb.x, 795.0);
        assert_eq!(bb.y, 310.0);
        assert_eq!(bb.w, 20.0);
        assert_eq!(bb.h, 40.0);
    }
}
