//! # sonar-audio
//!
//! Sound playback for Sonar.
//!
//! Features:
//! - Whole-file decoding with symphonia, resampled once at load time
//! - A sound bank keyed by `"folder/file.ogg"`
//! - Additive mixer with per-voice volume, pan, pitch, looping and fades
//! - Bounded pool of fire-and-forget one-shot voices
//! - Low-latency cpal output

pub mod bank;
pub mod decode;
pub mod mixer;
pub mod output;
pub mod resample;
pub mod sound;
pub mod system;

pub use bank::SoundBank;
pub use decode::SampleData;
pub use mixer::{db_to_gain, gain_to_db, Mixer, PlaybackParams, SharedMixer, VoiceId, MAX_ONE_SHOTS};
pub use output::{AudioOutput, StreamFormat};
pub use sound::{Sound, SoundHandle};
pub use system::{SoundConfig, SoundSystem};
