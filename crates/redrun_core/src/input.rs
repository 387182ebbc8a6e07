//! Input state tracking with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` returns true every frame the
//!   key is physically down. Used for continuous actions like vertical
//!   movement.
//!
//! - **Edge-triggered (just_pressed):** true only during the frame the press
//!   transition happened. Cleared by `end_frame()`, which the main loop calls
//!   only after at least one fixed simulation step has consumed it, so a
//!   press is never silently lost on a frame with zero simulation steps.

use std::collections::HashSet;

/// The full key set the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Enter,
    Escape,
    F3,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        assert!(input.is_held(Key::Up));
        assert!(input.is_just_pressed(Key::Up));
    }

    #[test]
    fn key_up_clears_held_sets_just_released() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.key_up(Key::Up);
        assert!(!input.is_held(Key::Up));
        assert!(input.is_just_released(Key::Up));
    }

    #[test]
    fn os_key_repeat_does_not_double_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Enter);
        input.end_frame();
        // A repeated key_down while already held must not re-arm the edge,
        // otherwise a held confirm key would fire once per repeat event.
        input.key_down(Key::Enter);
        assert!(input.is_held(Key::Enter));
        assert!(!input.is_just_pressed(Key::Enter));
    }

    #[test]
    fn key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::Down);
        assert!(!input.is_just_released(Key::Down));
        assert!(!input.is_held(Key::Down));
    }

    #[test]
    fn end_frame_clears_transient_state_keeps_held() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.key_down(Key::Enter);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::Up));
        assert!(!input.is_just_pressed(Key::Enter));
        assert!(input.is_held(Key::Up));
        assert!(input.is_held(Key::Enter));
    }

    #[test]
    fn end_frame_clears_just_released() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.key_up(Key::Up);
        assert!(input.is_just_released(Key::Up));
        input.end_frame();
        assert!(!input.is_just_released(Key::Up));
    }

    #[test]
    fn multiple_keys_are_independent() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.key_down(Key::Down);
        assert!(input.is_held(Key::Up));
        assert!(input.is_held(Key::Down));

        input.key_up(Key::Up);
        assert!(!input.is_held(Key::Up));
        assert!(input.is_held(Key::Down));
        assert!(!input.is_just_released(Key::Down));
    }

    #[test]
    fn default_state_is_empty() {
        let input = InputState::new();
        assert!(!input.is_held(Key::Up));
        assert!(!input.is_just_pressed(Key::Enter));
        assert!(!input.is_just_released(Key::Escape));
    }
}
