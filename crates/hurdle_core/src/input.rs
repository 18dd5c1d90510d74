//! Keyboard state tracking with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` returns true every frame the
//!   key is physically down.
//!
//! - **Edge-triggered (just_pressed / just_released):** true only during the
//!   frame the transition happened. They are cleared by `end_frame()`, which
//!   the main loop calls only after at least one fixed simulation step has
//!   consumed them. This prevents a press from being silently lost on a frame
//!   that has zero simulation steps (when the accumulator hasn't built up
//!   enough time).
//!
//! The jump key is the whole game, so dropped or doubled presses are the
//! worst input bug this system can have; both sets exist to rule them out.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Up,
    W,
    R,
    Escape,
    F3,
    F4,
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    /// Spend the pressed edge for one key; held state is untouched.
    ///
    /// A frame can run several fixed steps before `end_frame` clears the
    /// transient sets, so a press that one step already acted on would still
    /// read as just-pressed on the next. Callers consume the edge when the
    /// first read must also be the last (a restart press, for example, must
    /// not reread as a jump one step later).
    pub fn consume_press(&mut self, key: Key) {
        self.just_pressed.remove(&key);
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
