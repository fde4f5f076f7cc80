//! # sonar-speech
//!
//! Spoken announcements for Sonar.
//!
//! With the `tts` feature the platform speech engine is used (SAPI, Speech
//! Dispatcher, AVFoundation...). Without it, or when no engine can be
//! opened, every announcement is still written to the log so the game can be
//! followed from `debug.log`.

use sonar_core::SpeechSink;
use tracing::{debug, info};
#[cfg(feature = "tts")]
use tracing::{error, warn};

/// Text-to-speech front end.
pub struct Speaker {
    #[cfg(feature = "tts")]
    tts: Option<tts::Tts>,
    enabled: bool,
    last_spoken: Option<String>,
}

impl Speaker {
    /// Create a speaker. When `enabled` is false no engine is opened and
    /// announcements only reach the log.
    pub fn new(enabled: bool) -> Self {
        Self {
            #[cfg(feature = "tts")]
            tts: if enabled { open_engine() } else { None },
            enabled,
            last_spoken: None,
        }
    }

    /// A speaker that only logs.
    pub fn log_only() -> Self {
        Self::new(false)
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn last_spoken(&self) -> Option<&str> {
        self.last_spoken.as_deref()
    }

    /// Speak `text`, cutting off the current utterance when `interrupt` is
    /// set. Empty text is ignored.
    pub fn speak(&mut self, text: &str, interrupt: bool) {
        if text.is_empty() {
            return;
        }
        info!(target: "sonar::speech", "{text}");
        self.last_spoken = Some(text.to_string());
        self.engine_speak(text, interrupt);
    }

    /// Silence the current utterance.
    pub fn stop(&mut self) {
        debug!("Speech stopped");
        self.engine_stop();
    }

    /// Speak the last announcement again. Returns false if nothing has been
    /// spoken yet.
    pub fn repeat_last(&mut self) -> bool {
        match self.last_spoken.take() {
            Some(text) => {
                self.speak(&text, true);
                true
            }
            None => false,
        }
    }
}

#[cfg(feature = "tts")]
impl Speaker {
    /// Whether a speech engine is attached.
    pub const fn has_engine(&self) -> bool {
        self.tts.is_some()
    }

    fn engine_speak(&mut self, text: &str, interrupt: bool) {
        if let Some(tts) = &mut self.tts {
            if let Err(e) = tts.speak(text, interrupt) {
                error!("Failed to speak: {e}");
            }
        }
    }

    fn engine_stop(&mut self) {
        if let Some(tts) = &mut self.tts {
            if let Err(e) = tts.stop() {
                error!("Failed to stop speech: {e}");
            }
        }
    }
}

#[cfg(not(feature = "tts"))]
impl Speaker {
    pub const fn has_engine(&self) -> bool {
        false
    }

    const fn engine_speak(&self, _text: &str, _interrupt: bool) {}

    const fn engine_stop(&self) {}
}

impl Default for Speaker {
    fn default() -> Self {
        Self::new(true)
    }
}

impl std::fmt::Debug for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Speaker")
            .field("enabled", &self.enabled)
            .field("has_engine", &self.has_engine())
            .field("last_spoken", &self.last_spoken)
            .finish()
    }
}

impl SpeechSink for Speaker {
    fn speak(&mut self, text: &str, interrupt: bool) {
        Self::speak(self, text, interrupt);
    }

    fn stop(&mut self) {
        Self::stop(self);
    }
}

#[cfg(feature = "tts")]
fn open_engine() -> Option<tts::Tts> {
    match tts::Tts::default() {
        Ok(tts) => {
            info!("Initialized speech engine");
            Some(tts)
        }
        Err(e) => {
            warn!("Speech engine unavailable, announcements are logged only: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_only_keeps_last_spoken() {
        let mut speaker = Speaker::log_only();
        assert!(!speaker.has_engine());
        assert_eq!(speaker.last_spoken(), None);

        speaker.speak("Main menu", true);
        speaker.speak("Start game, 1", true);
        assert_eq!(speaker.last_spoken(), Some("Start game, 1"));
    }

    #[test]
    fn test_empty_text_is_ignored() {
        let mut speaker = Speaker::log_only();
        speaker.speak("Options", false);
        speaker.speak("", true);
        assert_eq!(speaker.last_spoken(), Some("Options"));
    }

    #[test]
    fn test_repeat_last() {
        let mut speaker = Speaker::log_only();
        assert!(!speaker.repeat_last());
        speaker.speak("Exit, X", true);
        assert!(speaker.repeat_last());
        assert_eq!(speaker.last_spoken(), Some("Exit, X"));
    }

    #[test]
    #[cfg_attr(not(feature = "tts"), ignore = "built without the tts feature")]
    #[allow(clippy::assertions_on_constants)]
    fn test_default_build_includes_engine() {
        assert!(cfg!(feature = "tts"));
    }

    #[cfg(feature = "tts")]
    #[test]
    fn test_enabled_speaker_opens_engine_when_available() {
        let available = tts::Tts::default().is_ok();
        assert_eq!(Speaker::new(true).has_engine(), available);
        assert!(!Speaker::new(false).has_engine());
    }

    #[test]
    fn test_speech_sink_delegates() {
        fn announce(sink: &mut impl SpeechSink) {
            sink.speak("Hello", true);
            sink.stop();
        }
        let mut speaker = Speaker::log_only();
        announce(&mut speaker);
        assert_eq!(speaker.last_spoken(), Some("Hello"));
    }
}
