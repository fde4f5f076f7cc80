//! Handles for controlling playing sounds.

use std::sync::Arc;

use crate::decode::SampleData;
use crate::mixer::{PlaybackParams, SharedMixer, VoiceId};

/// Control handle for one voice in the mixer.
///
/// The handle stays valid after the voice ends; queries then report a
/// stopped sound and setters do nothing.
#[derive(Clone)]
pub struct SoundHandle {
    id: VoiceId,
    mixer: SharedMixer,
}

impl SoundHandle {
    pub(crate) fn new(id: VoiceId, mixer: SharedMixer) -> Self {
        Self { id, mixer }
    }

    pub const fn id(&self) -> VoiceId {
        self.id
    }

    /// Whether the voice is still in the mix (paused counts as playing).
    pub fn is_playing(&self) -> bool {
        self.mixer.lock().is_active(self.id)
    }

    pub fn is_paused(&self) -> bool {
        self.mixer.lock().is_paused(self.id)
    }

    pub fn set_paused(&self, paused: bool) {
        self.mixer.lock().set_paused(self.id, paused);
    }

    pub fn stop(&self) {
        self.mixer.lock().stop(self.id);
    }

    /// Fade to silence over `ms` milliseconds, then stop.
    pub fn fade_out(&self, ms: u64) {
        self.mixer.lock().fade_out(self.id, ms);
    }

    pub fn params(&self) -> Option<PlaybackParams> {
        self.mixer.lock().params(self.id)
    }

    pub fn set_volume_db(&self, volume_db: f32) {
        self.mixer
            .lock()
            .update_params(self.id, |p| p.volume_db = volume_db);
    }

    pub fn set_pan(&self, pan: f32) {
        self.mixer.lock().update_params(self.id, |p| p.pan = pan);
    }

    pub fn set_pitch(&self, pitch: f32) {
        self.mixer.lock().update_params(self.id, |p| p.pitch = pitch);
    }
}

impl std::fmt::Debug for SoundHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundHandle").field("id", &self.id).finish()
    }
}

/// A reusable sound with persistent settings.
///
/// Unlike one-shots, a `Sound` remembers its volume, pan and pitch across
/// plays, and can be paused, stopped (rewinding it) and replayed.
#[derive(Debug)]
pub struct Sound {
    sample: Arc<SampleData>,
    mixer: SharedMixer,
    params: PlaybackParams,
    voice: Option<SoundHandle>,
}

impl Sound {
    pub(crate) fn new(sample: Arc<SampleData>, mixer: SharedMixer) -> Self {
        Self {
            sample,
            mixer,
            params: PlaybackParams::default(),
            voice: None,
        }
    }

    /// Play once from the start, replacing any previous playback.
    pub fn play(&mut self) {
        self.start(false);
    }

    /// Play from the start in a loop until stopped.
    pub fn play_looped(&mut self) {
        self.start(true);
    }

    fn start(&mut self, looping: bool) {
        self.stop();
        self.params.looping = looping;
        let id = self
            .mixer
            .lock()
            .start(self.sample.clone(), self.params, false);
        self.voice = id.map(|id| SoundHandle::new(id, self.mixer.clone()));
    }

    /// Stop playback. The next play starts from the beginning.
    pub fn stop(&mut self) {
        if let Some(voice) = self.voice.take() {
            voice.stop();
        }
    }

    /// Pause or resume. Pausing a sound that is not playing does nothing.
    pub fn set_paused(&mut self, paused: bool) {
        if let Some(voice) = &self.voice {
            if voice.is_playing() {
                voice.set_paused(paused);
            }
        }
    }

    pub fn is_paused(&self) -> bool {
        self.voice.as_ref().is_some_and(SoundHandle::is_paused)
    }

    pub fn is_playing(&self) -> bool {
        self.voice.as_ref().is_some_and(SoundHandle::is_playing)
    }

    /// Fade the current playback out over `ms` milliseconds.
    pub fn fade_out(&self, ms: u64) {
        if let Some(voice) = &self.voice {
            voice.fade_out(ms);
        }
    }

    pub const fn volume_db(&self) -> f32 {
        self.params.volume_db
    }

    pub fn set_volume_db(&mut self, volume_db: f32) {
        self.params.volume_db = volume_db;
        if let Some(voice) = &self.voice {
            voice.set_volume_db(volume_db);
        }
    }

    pub const fn pan(&self) -> f32 {
        self.params.pan
    }

    pub fn set_pan(&mut self, pan: f32) {
        self.params.pan = pan;
        if let Some(voice) = &self.voice {
            voice.set_pan(pan);
        }
    }

    pub const fn pitch(&self) -> f32 {
        self.params.pitch
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.params.pitch = pitch;
        if let Some(voice) = &self.voice {
            voice.set_pitch(pitch);
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.sample.duration_ms()
    }
}

impl Drop for Sound {
    fn drop(&mut self) {
        self.stop();
    }
}
