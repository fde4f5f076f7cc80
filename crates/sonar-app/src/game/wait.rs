//! Frame-driven waits: a countdown, or a sound playing to its end.

use sonar_audio::SoundHandle;
use sonar_core::{Clock, SystemClock, Timer};

/// Counts down `duration_ms` while the frame loop keeps running.
#[derive(Debug, Clone)]
pub struct Wait<C: Clock = SystemClock> {
    timer: Timer<C>,
    duration_ms: u64,
}

impl<C: Clock> Wait<C> {
    pub fn with_clock(duration_ms: u64, clock: C) -> Self {
        Self {
            timer: Timer::with_clock(clock),
            duration_ms,
        }
    }

    pub fn is_done(&self) -> bool {
        self.timer.elapsed() >= self.duration_ms
    }

    #[cfg(test)]
    fn remaining_ms(&self) -> u64 {
        self.duration_ms.saturating_sub(self.timer.elapsed())
    }
}

/// Holds a scene until a one-shot finishes playing.
///
/// Gives up after `limit_ms` so a muted or stalled output cannot hang the
/// game.
#[derive(Debug, Clone)]
pub struct WaitSound<C: Clock = SystemClock> {
    handle: SoundHandle,
    limit: Wait<C>,
}

impl<C: Clock> WaitSound<C> {
    pub fn with_clock(handle: SoundHandle, limit_ms: u64, clock: C) -> Self {
        Self {
            handle,
            limit: Wait::with_clock(limit_ms, clock),
        }
    }

    pub fn is_done(&self) -> bool {
        !self.handle.is_playing() || self.limit.is_done()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Tests use unwrap for brevity

    use super::*;
    use sonar_audio::{SampleData, SoundSystem};
    use sonar_core::ManualClock;

    /// A silent system holding a four-frame sound under "blip".
    fn sounds() -> SoundSystem {
        let mut sounds = SoundSystem::silent(".", 8000, 2);
        sounds
            .bank_mut()
            .insert("blip", SampleData::new(vec![0.2; 4], 8000, 1))
            .unwrap();
        sounds
    }

    #[test]
    fn test_wait_finishes_after_duration() {
        let clock = ManualClock::new();
        let wait = Wait::with_clock(500, clock.clone());
        assert!(!wait.is_done());
        clock.advance(499);
        assert_eq!(wait.remaining_ms(), 1);
        clock.advance(1);
        assert!(wait.is_done());
        assert_eq!(wait.remaining_ms(), 0);
    }

    #[test]
    fn test_zero_wait_is_done_at_once() {
        assert!(Wait::with_clock(0, ManualClock::new()).is_done());
    }

    #[test]
    fn test_wait_sound_ends_with_playback() {
        let mut sounds = sounds();
        let handle = sounds.play("blip").unwrap().unwrap();
        let wait = WaitSound::with_clock(handle, 10_000, ManualClock::new());
        assert!(!wait.is_done());

        let mut out = vec![0.0; 2];
        sounds.mixer().lock().render(&mut out);
        assert!(!wait.is_done());

        let mut out = vec![0.0; 16];
        sounds.mixer().lock().render(&mut out);
        assert!(wait.is_done());
    }

    #[test]
    fn test_wait_sound_gives_up_after_limit() {
        let mut sounds = sounds();
        let clock = ManualClock::new();
        let handle = sounds.play("blip").unwrap().unwrap();
        let wait = WaitSound::with_clock(handle.clone(), 300, clock.clone());

        clock.advance(299);
        assert!(!wait.is_done());
        clock.advance(1);
        assert!(wait.is_done());
        assert!(handle.is_playing());
    }
}
