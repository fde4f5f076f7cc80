//! Per-frame host: keyboard snapshot, speech and sound for the game.

use std::sync::Arc;

use parking_lot::Mutex;
use sonar_audio::SoundSystem;
use sonar_core::{InputSource, Key, KeyboardState, SoundSink, SpeechSink};
use sonar_speech::Speaker;
use tracing::{debug, trace};

/// Keyboard state shared between window event handlers and the frame loop.
pub type SharedKeyboard = Arc<Mutex<KeyboardState>>;

/// Everything a scene can reach during a frame.
///
/// Key queries answer against the snapshot taken by
/// [`frame_update`](Self::frame_update), so every scene in a frame sees the
/// same presses.
#[derive(Debug)]
pub struct GameHost {
    keyboard: SharedKeyboard,
    frame_keys: KeyboardState,
    speaker: Speaker,
    sounds: SoundSystem,
    exit_requested: bool,
    frame: u64,
}

impl GameHost {
    pub fn new(keyboard: SharedKeyboard, speaker: Speaker, sounds: SoundSystem) -> Self {
        Self {
            keyboard,
            frame_keys: KeyboardState::new(),
            speaker,
            sounds,
            exit_requested: false,
            frame: 0,
        }
    }

    /// Advance one frame: snapshot keys, then handle the global keys.
    ///
    /// Left Ctrl silences speech, F1 repeats the last announcement and
    /// Alt+F4 requests exit.
    pub fn frame_update(&mut self) {
        {
            let mut keyboard = self.keyboard.lock();
            keyboard.snapshot();
            self.frame_keys = keyboard.clone();
        }
        self.frame += 1;
        trace!("Frame {}", self.frame);

        if self.frame_keys.key_pressed(Key::LeftCtrl) {
            self.speaker.stop();
        }
        if self.frame_keys.key_pressed(Key::F1) && !self.speaker.repeat_last() {
            debug!("Nothing to repeat");
        }
        if self.frame_keys.key_held(Key::LeftAlt) && self.frame_keys.key_pressed(Key::F4) {
            debug!("Alt+F4 pressed");
            self.request_exit();
        }
    }

    /// Ask the frame loop to shut down. The game may still veto it.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// Take a pending exit request, clearing it.
    pub fn take_exit_request(&mut self) -> bool {
        std::mem::take(&mut self.exit_requested)
    }

    pub fn keyboard(&self) -> SharedKeyboard {
        self.keyboard.clone()
    }

    pub const fn frame(&self) -> u64 {
        self.frame
    }

    #[cfg(test)]
    pub const fn speaker(&self) -> &Speaker {
        &self.speaker
    }

    pub const fn sounds(&self) -> &SoundSystem {
        &self.sounds
    }

    pub fn sounds_mut(&mut self) -> &mut SoundSystem {
        &mut self.sounds
    }
}

impl InputSource for GameHost {
    fn key_pressed(&self, key: Key) -> bool {
        self.frame_keys.key_pressed(key)
    }

    fn key_held(&self, key: Key) -> bool {
        self.frame_keys.key_held(key)
    }
}

impl SpeechSink for GameHost {
    fn speak(&mut self, text: &str, interrupt: bool) {
        self.speaker.speak(text, interrupt);
    }

    fn stop(&mut self) {
        self.speaker.stop();
    }
}

impl SoundSink for GameHost {
    fn play_one_shot(&mut self, sound_id: &str) {
        SoundSink::play_one_shot(&mut self.sounds, sound_id);
    }
}
