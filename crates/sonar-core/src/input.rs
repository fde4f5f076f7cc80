//! Frame-based keyboard snapshots.

use crate::host::InputSource;
use crate::keys::Key;

/// Keyboard state sampled once per frame.
///
/// Window events call [`press`](Self::press) and [`release`](Self::release)
/// as they arrive; the frame loop calls [`snapshot`](Self::snapshot) once
/// before running game logic. Queries answer against the two most recent
/// snapshots, so a fresh press is reported for exactly one frame.
#[derive(Debug, Clone)]
pub struct KeyboardState {
    /// Live state written by window events.
    raw: [bool; Key::COUNT],
    /// Keys pressed since the last snapshot, even if already released.
    latched: [bool; Key::COUNT],
    current: [bool; Key::COUNT],
    previous: [bool; Key::COUNT],
}

impl KeyboardState {
    pub const fn new() -> Self {
        Self {
            raw: [false; Key::COUNT],
            latched: [false; Key::COUNT],
            current: [false; Key::COUNT],
            previous: [false; Key::COUNT],
        }
    }

    /// Record a key-down event.
    pub fn press(&mut self, key: Key) {
        self.raw[key.index()] = true;
        self.latched[key.index()] = true;
    }

    /// Record a key-up event.
    pub fn release(&mut self, key: Key) {
        self.raw[key.index()] = false;
    }

    /// Forget every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.raw = [false; Key::COUNT];
        self.latched = [false; Key::COUNT];
    }

    /// Advance one frame.
    pub fn snapshot(&mut self) {
        self.previous = self.current;
        for (i, held) in self.current.iter_mut().enumerate() {
            *held = self.raw[i] || self.latched[i];
        }
        self.latched = [false; Key::COUNT];
    }

    /// Keys held at the latest snapshot.
    pub fn held_keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.current
            .iter()
            .enumerate()
            .filter_map(|(i, &held)| held.then_some(i))
    }
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for KeyboardState {
    fn key_pressed(&self, key: Key) -> bool {
        self.current[key.index()] && !self.previous[key.index()]
    }

    fn key_held(&self, key: Key) -> bool {
        self.current[key.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_press_lasts_one_frame() {
        let mut keys = KeyboardState::new();
        keys.press(Key::Enter);
        keys.snapshot();
        assert!(keys.key_pressed(Key::Enter));
        assert!(keys.key_held(Key::Enter));

        keys.snapshot();
        assert!(!keys.key_pressed(Key::Enter));
        assert!(keys.key_held(Key::Enter));

        keys.release(Key::Enter);
        keys.snapshot();
        assert!(!keys.key_held(Key::Enter));
    }

    #[test]
    fn test_tap_between_frames_is_not_lost() {
        let mut keys = KeyboardState::new();
        keys.press(Key::Space);
        keys.release(Key::Space);
        keys.snapshot();
        assert!(keys.key_pressed(Key::Space));

        keys.snapshot();
        assert!(!keys.key_held(Key::Space));
    }

    #[test]
    fn test_release_all() {
        let mut keys = KeyboardState::new();
        keys.press(Key::Down);
        keys.press(Key::LeftAlt);
        keys.snapshot();
        assert_eq!(keys.held_keys().count(), 2);

        keys.release_all();
        keys.snapshot();
        assert_eq!(keys.held_keys().count(), 0);
    }

    #[test]
    fn test_repress_after_release() {
        let mut keys = KeyboardState::new();
        keys.press(Key::A);
        keys.snapshot();
        keys.release(Key::A);
        keys.snapshot();
        keys.press(Key::A);
        keys.snapshot();
        assert!(keys.key_pressed(Key::A));
    }
}
