//! Spoken message that waits for Enter.

use sonar_core::{Key, MenuHost, SpeechSink};

use super::DECIDE_SOUND;

const REPEAT_KEYS: [Key; 4] = [Key::Left, Key::Right, Key::Up, Key::Down];

/// Speaks a message and repeats it on any arrow key until Enter is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageScene {
    text: String,
}

impl MessageScene {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn open<H: SpeechSink + ?Sized>(&self, host: &mut H) {
        host.speak(&self.text, false);
    }

    /// Returns true once the message is dismissed.
    pub fn frame_update<H: MenuHost + ?Sized>(&self, host: &mut H) -> bool {
        if REPEAT_KEYS.into_iter().any(|key| host.key_pressed(key)) {
            host.speak(&self.text, false);
        }
        if host.key_pressed(Key::Enter) {
            host.play_one_shot(DECIDE_SOUND);
            return true;
        }
        false
    }
}
