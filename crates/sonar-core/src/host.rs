//! Collaborator interfaces consumed by the menu and the game loop.
//!
//! Concrete implementations live in the host: the keyboard snapshot in
//! [`crate::KeyboardState`], speech in `sonar-speech` and sound in
//! `sonar-audio`.

use crate::keys::Key;

/// Per-frame keyboard queries.
pub trait InputSource {
    /// Whether `key` went from released to held at the latest snapshot.
    fn key_pressed(&self, key: Key) -> bool;

    /// Whether `key` is held at the latest snapshot.
    fn key_held(&self, key: Key) -> bool;
}

/// Text-to-speech output.
pub trait SpeechSink {
    /// Speak `text`. With `interrupt`, any utterance in progress is cut off.
    fn speak(&mut self, text: &str, interrupt: bool);

    /// Silence the current utterance.
    fn stop(&mut self);
}

/// Fire-and-forget sound playback.
pub trait SoundSink {
    /// Play the sound registered under `sound_id` once.
    fn play_one_shot(&mut self, sound_id: &str);
}

/// Everything a [`crate::Menu`] needs from its host during a frame.
pub trait MenuHost: InputSource + SpeechSink + SoundSink {}

impl<T: InputSource + SpeechSink + SoundSink> MenuHost for T {}
