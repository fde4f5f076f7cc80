//! Additive voice mixer.
//!
//! The mixer is shared between the game thread, which starts and controls
//! voices, and the audio callback, which calls [`Mixer::render`].

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{trace, warn};

use crate::decode::SampleData;

/// Maximum number of one-shot voices playing at once.
pub const MAX_ONE_SHOTS: usize = 100;

/// Identifier of a playing voice.
pub type VoiceId = u64;

/// Mixer shared with the audio callback.
pub type SharedMixer = Arc<Mutex<Mixer>>;

/// Convert decibels to a linear amplitude factor.
pub fn db_to_gain(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Convert a linear amplitude factor to decibels.
pub fn gain_to_db(gain: f32) -> f32 {
    20.0 * gain.max(f32::MIN_POSITIVE).log10()
}

/// Per-voice playback settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackParams {
    /// Volume in dB, 0 is unity gain.
    pub volume_db: f32,
    /// Stereo position from -100 (left) to 100 (right).
    pub pan: f32,
    /// Playback speed in percent, 100 is the original pitch.
    pub pitch: f32,
    pub looping: bool,
}

impl Default for PlaybackParams {
    fn default() -> Self {
        Self {
            volume_db: 0.0,
            pan: 0.0,
            pitch: 100.0,
            looping: false,
        }
    }
}

impl PlaybackParams {
    pub fn new(pan: f32, volume_db: f32, pitch: f32) -> Self {
        Self {
            volume_db,
            pan,
            pitch,
            looping: false,
        }
    }

    pub const fn looped(mut self) -> Self {
        self.looping = true;
        self
    }
}

/// Linear fade towards silence.
#[derive(Debug, Clone, Copy)]
struct Fade {
    remaining: u64,
    total: u64,
}

impl Fade {
    /// Gain for the next frame, or `None` once the fade is over.
    fn next_gain(&mut self) -> Option<f32> {
        if self.remaining == 0 {
            return None;
        }
        let gain = self.remaining as f32 / self.total as f32;
        self.remaining -= 1;
        Some(gain)
    }
}

#[derive(Debug)]
struct Voice {
    id: VoiceId,
    sample: Arc<SampleData>,
    params: PlaybackParams,
    /// Fractional read position in source frames.
    position: f64,
    paused: bool,
    one_shot: bool,
    finished: bool,
    fade: Option<Fade>,
}

impl Voice {
    /// Linearly interpolated (left, right) pair at the current position.
    fn frame(&self) -> (f32, f32) {
        let frames = self.sample.frames();
        let index = self.position.floor() as usize;
        let frac = (self.position - self.position.floor()) as f32;
        let next = if index + 1 < frames {
            index + 1
        } else if self.params.looping {
            0
        } else {
            index
        };

        let lerp = |channel: usize| {
            let a = self.sample.sample(index, channel);
            let b = self.sample.sample(next, channel);
            a + (b - a) * frac
        };
        (lerp(0), lerp(1))
    }

    fn render(&mut self, out: &mut [f32], out_channels: usize, out_rate: u32, master: f32) {
        let frames = self.sample.frames() as f64;
        if frames == 0.0 || out_rate == 0 {
            self.finished = true;
            return;
        }

        let pitch = f64::from(self.params.pitch.max(1.0)) / 100.0;
        let step = pitch * f64::from(self.sample.sample_rate) / f64::from(out_rate);
        let gain = db_to_gain(self.params.volume_db) * master;
        let pan = (self.params.pan / 100.0).clamp(-1.0, 1.0);
        let left_gain = gain * (1.0 - pan.max(0.0));
        let right_gain = gain * (1.0 + pan.min(0.0));

        for frame in out.chunks_exact_mut(out_channels) {
            if self.position >= frames {
                if self.params.looping {
                    self.position %= frames;
                } else {
                    self.finished = true;
                    return;
                }
            }

            let fade = match self.fade.as_mut() {
                Some(fade) => match fade.next_gain() {
                    Some(g) => g,
                    None => {
                        self.finished = true;
                        return;
                    }
                },
                None => 1.0,
            };

            let (left, right) = self.frame();
            if out_channels == 1 {
                frame[0] += (left * left_gain + right * right_gain) * 0.5 * fade;
            } else {
                frame[0] += left * left_gain * fade;
                frame[1] += right * right_gain * fade;
            }
            self.position += step;
        }
    }
}

/// Sums active voices into the output stream.
#[derive(Debug)]
pub struct Mixer {
    voices: Vec<Voice>,
    next_id: VoiceId,
    sample_rate: u32,
    channels: u16,
    master_gain: f32,
}

impl Mixer {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            voices: Vec::new(),
            next_id: 1,
            sample_rate,
            channels: channels.max(1),
            master_gain: 1.0,
        }
    }

    /// Wrap a new mixer for sharing with an output stream.
    pub fn shared(sample_rate: u32, channels: u16) -> SharedMixer {
        Arc::new(Mutex::new(Self::new(sample_rate, channels)))
    }

    /// Adopt the output device's format.
    pub fn configure(&mut self, sample_rate: u32, channels: u16) {
        self.sample_rate = sample_rate;
        self.channels = channels.max(1);
    }

    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub const fn channels(&self) -> u16 {
        self.channels
    }

    pub fn set_master_volume_db(&mut self, db: f32) {
        self.master_gain = db_to_gain(db);
    }

    pub fn master_volume_db(&self) -> f32 {
        gain_to_db(self.master_gain)
    }

    /// Start a voice. One-shots are refused once [`MAX_ONE_SHOTS`] are
    /// playing.
    pub fn start(
        &mut self,
        sample: Arc<SampleData>,
        params: PlaybackParams,
        one_shot: bool,
    ) -> Option<VoiceId> {
        if one_shot && self.one_shot_count() >= MAX_ONE_SHOTS {
            warn!("One-shot pool full ({MAX_ONE_SHOTS} voices), dropping sound");
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.voices.push(Voice {
            id,
            sample,
            params,
            position: 0.0,
            paused: false,
            one_shot,
            finished: false,
            fade: None,
        });
        trace!("Voice {id} started");
        Some(id)
    }

    /// Stop and discard a voice. Returns false if it was not playing.
    pub fn stop(&mut self, id: VoiceId) -> bool {
        let before = self.voices.len();
        self.voices.retain(|v| v.id != id);
        before != self.voices.len()
    }

    pub fn stop_all(&mut self) {
        self.voices.clear();
    }

    /// Whether the voice is still in the mix (paused voices count).
    pub fn is_active(&self, id: VoiceId) -> bool {
        self.voice(id).is_some_and(|v| !v.finished)
    }

    pub fn is_paused(&self, id: VoiceId) -> bool {
        self.voice(id).is_some_and(|v| v.paused)
    }

    pub fn set_paused(&mut self, id: VoiceId, paused: bool) -> bool {
        self.voice_mut(id).map(|v| v.paused = paused).is_some()
    }

    pub fn params(&self, id: VoiceId) -> Option<PlaybackParams> {
        self.voice(id).map(|v| v.params)
    }

    /// Change the settings of a playing voice.
    pub fn update_params(&mut self, id: VoiceId, update: impl FnOnce(&mut PlaybackParams)) -> bool {
        self.voice_mut(id).map(|v| update(&mut v.params)).is_some()
    }

    /// Fade a voice to silence over `ms` milliseconds, then stop it.
    pub fn fade_out(&mut self, id: VoiceId, ms: u64) -> bool {
        let frames = (ms * u64::from(self.sample_rate) / 1000).max(1);
        self.voice_mut(id)
            .map(|v| {
                v.fade = Some(Fade {
                    remaining: frames,
                    total: frames,
                });
            })
            .is_some()
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn one_shot_count(&self) -> usize {
        self.voices.iter().filter(|v| v.one_shot).count()
    }

    /// Mix every active voice into `out` (interleaved, `channels()` wide).
    /// `out` is overwritten.
    pub fn render(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        let channels = usize::from(self.channels);
        for voice in self.voices.iter_mut().filter(|v| !v.paused && !v.finished) {
            voice.render(out, channels, self.sample_rate, self.master_gain);
        }

        for sample in out.iter_mut() {
            if sample.abs() > 0.9 {
                *sample = sample.tanh();
            }
        }

        self.voices.retain(|v| !v.finished);
    }

    fn voice(&self, id: VoiceId) -> Option<&Voice> {
        self.voices.iter().find(|v| v.id == id)
    }

    fn voice_mut(&mut self, id: VoiceId) -> Option<&mut Voice> {
        self.voices.iter_mut().find(|v| v.id == id)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Tests use unwrap for brevity

    use super::*;

    fn constant(value: f32, frames: usize) -> Arc<SampleData> {
        Arc::new(SampleData::new(vec![value; frames], 1000, 1))
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_db_conversion() {
        assert!(approx(db_to_gain(0.0), 1.0));
        assert!(approx(db_to_gain(-20.0), 0.1));
        assert!(approx(gain_to_db(0.5), -6.0206));
    }

    #[test]
    fn test_centered_voice_fills_both_channels() {
        let mut mixer = Mixer::new(1000, 2);
        mixer.start(constant(0.5, 10), PlaybackParams::default(), true);

        let mut out = vec![0.0; 8];
        mixer.render(&mut out);
        assert!(out.iter().all(|&s| approx(s, 0.5)));
    }

    #[test]
    fn test_pan_and_volume() {
        let mut mixer = Mixer::new(1000, 2);
        mixer.start(
            constant(0.5, 10),
            PlaybackParams::new(-100.0, -20.0, 100.0),
            true,
        );

        let mut out = vec![0.0; 4];
        mixer.render(&mut out);
        assert!(approx(out[0], 0.05));
        assert!(approx(out[1], 0.0));
    }

    #[test]
    fn test_one_shot_finishes_and_is_removed() {
        let mut mixer = Mixer::new(1000, 1);
        let id = mixer.start(constant(0.5, 3), PlaybackParams::default(), true).unwrap();

        let mut out = vec![0.0; 5];
        mixer.render(&mut out);
        assert!(approx(out[2], 0.5));
        assert!(approx(out[3], 0.0));
        assert!(!mixer.is_active(id));
        assert_eq!(mixer.voice_count(), 0);
    }

    #[test]
    fn test_looping_voice_keeps_playing() {
        let mut mixer = Mixer::new(1000, 1);
        let id = mixer
            .start(constant(0.5, 3), PlaybackParams::default().looped(), false)
            .unwrap();

        let mut out = vec![0.0; 10];
        mixer.render(&mut out);
        assert!(out.iter().all(|&s| approx(s, 0.5)));
        assert!(mixer.is_active(id));
    }

    #[test]
    fn test_pitch_changes_speed() {
        let mut mixer = Mixer::new(1000, 1);
        let id = mixer
            .start(constant(0.5, 10), PlaybackParams::new(0.0, 0.0, 200.0), true)
            .unwrap();

        let mut out = vec![0.0; 5];
        mixer.render(&mut out);
        assert!(mixer.is_active(id));
        mixer.render(&mut out);
        assert!(!mixer.is_active(id));
    }

    #[test]
    fn test_pause_silences_without_advancing() {
        let mut mixer = Mixer::new(1000, 1);
        let id = mixer.start(constant(0.5, 4), PlaybackParams::default(), false).unwrap();
        assert!(mixer.set_paused(id, true));

        let mut out = vec![0.0; 8];
        mixer.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
        assert!(mixer.is_paused(id));

        mixer.set_paused(id, false);
        mixer.render(&mut out);
        assert!(approx(out[3], 0.5));
        assert!(approx(out[4], 0.0));
    }

    #[test]
    fn test_fade_out_stops_voice() {
        let mut mixer = Mixer::new(1000, 1);
        let id = mixer
            .start(constant(0.5, 100), PlaybackParams::default().looped(), false)
            .unwrap();
        mixer.fade_out(id, 4);

        let mut out = vec![0.0; 6];
        mixer.render(&mut out);
        assert!(approx(out[0], 0.5));
        assert!(out[1] < out[0]);
        assert!(approx(out[4], 0.0));
        assert!(!mixer.is_active(id));
    }

    #[test]
    fn test_one_shot_pool_is_bounded() {
        let mut mixer = Mixer::new(1000, 1);
        let sample = constant(0.001, 100);
        for _ in 0..MAX_ONE_SHOTS {
            assert!(mixer
                .start(sample.clone(), PlaybackParams::default(), true)
                .is_some());
        }
        assert!(mixer
            .start(sample.clone(), PlaybackParams::default(), true)
            .is_none());
        // Non-pooled voices are not limited.
        assert!(mixer
            .start(sample.clone(), PlaybackParams::default(), false)
            .is_some());

        let mut out = vec![0.0; 200];
        mixer.render(&mut out);
        assert!(mixer
            .start(sample, PlaybackParams::default(), true)
            .is_some());
    }

    #[test]
    fn test_soft_limit() {
        let mut mixer = Mixer::new(1000, 1);
        for _ in 0..3 {
            mixer.start(constant(0.9, 2), PlaybackParams::default(), true);
        }
        let mut out = vec![0.0; 1];
        mixer.render(&mut out);
        assert!(out[0] < 1.0);
        assert!(approx(out[0], 2.7f32.tanh()));
    }

    #[test]
    fn test_stop_and_update() {
        let mut mixer = Mixer::new(1000, 2);
        let id = mixer.start(constant(0.5, 10), PlaybackParams::default(), false).unwrap();
        assert!(mixer.update_params(id, |p| p.pan = 50.0));
        assert!(approx(mixer.params(id).unwrap().pan, 50.0));
        assert!(mixer.stop(id));
        assert!(!mixer.stop(id));
        assert!(!mixer.update_params(id, |p| p.pan = 0.0));
    }
}
