//! Owned sound system: bank, mixer and output device.

use std::path::{Path, PathBuf};

use sonar_core::{Error, Result, SoundSink};
use tracing::{info, warn};

use crate::bank::SoundBank;
use crate::mixer::{Mixer, PlaybackParams, SharedMixer};
use crate::output::{AudioOutput, StreamFormat};
use crate::sound::{Sound, SoundHandle};

/// Settings for [`SoundSystem::new`].
#[derive(Debug, Clone)]
pub struct SoundConfig {
    /// Directory sound keys are resolved against.
    pub root: PathBuf,
    pub master_volume_db: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("sounds"),
            master_volume_db: 0.0,
        }
    }
}

/// Loads sounds and plays them through the default output device.
///
/// Without an output device the system keeps working but nothing is heard.
#[derive(Debug)]
pub struct SoundSystem {
    bank: SoundBank,
    mixer: SharedMixer,
    output: Option<AudioOutput>,
    root: PathBuf,
}

impl SoundSystem {
    /// Open the default output device. Failure to open it is logged and
    /// leaves the system silent.
    pub fn new(config: SoundConfig) -> Self {
        let fallback = StreamFormat::FALLBACK;
        let mixer = Mixer::shared(fallback.sample_rate, fallback.channels);
        mixer.lock().set_master_volume_db(config.master_volume_db);

        let output = match AudioOutput::open_default(mixer.clone()) {
            Ok(output) => Some(output),
            Err(e) => {
                warn!("Audio output unavailable, sounds are muted: {e}");
                None
            }
        };

        let (rate, device) = output.as_ref().map_or((fallback.sample_rate, "no device"), |o| {
            (o.format().sample_rate, o.device_name())
        });
        info!(
            "Sound system ready on {device} at {rate} Hz, root {}",
            config.root.display()
        );

        Self {
            bank: SoundBank::new(rate),
            mixer,
            output,
            root: config.root,
        }
    }

    /// A system with no output device, rendering only when asked.
    pub fn silent(root: impl Into<PathBuf>, sample_rate: u32, channels: u16) -> Self {
        Self {
            bank: SoundBank::new(sample_rate),
            mixer: Mixer::shared(sample_rate, channels),
            output: None,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub const fn has_output(&self) -> bool {
        self.output.is_some()
    }

    pub fn mixer(&self) -> SharedMixer {
        self.mixer.clone()
    }

    pub const fn bank(&self) -> &SoundBank {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut SoundBank {
        &mut self.bank
    }

    /// Preload every sound in `root/folder`.
    pub fn load_folder(&mut self, folder: &str) -> Result<usize> {
        let count = self.bank.load_folder(&self.root, folder)?;
        info!("Loaded {count} sounds from {folder}");
        Ok(count)
    }

    pub fn set_master_volume_db(&self, db: f32) {
        self.mixer.lock().set_master_volume_db(db);
    }

    /// Play `key` once with default settings.
    pub fn play(&mut self, key: &str) -> Result<Option<SoundHandle>> {
        self.play_one_shot_with(key, PlaybackParams::default())
    }

    /// Play `key` once with the given pan, volume and pitch.
    ///
    /// Returns `Ok(None)` when the one-shot pool is full.
    pub fn play_one_shot_with(
        &mut self,
        key: &str,
        params: PlaybackParams,
    ) -> Result<Option<SoundHandle>> {
        self.start(key, params, true)
    }

    /// Play `key` in a loop until the returned handle stops it.
    pub fn play_looped(&mut self, key: &str) -> Result<Option<SoundHandle>> {
        self.start(key, PlaybackParams::default().looped(), false)
    }

    /// A reusable [`Sound`] for `key`.
    pub fn sound(&mut self, key: &str) -> Result<Sound> {
        let sample = self.sample(key)?;
        Ok(Sound::new(sample, self.mixer.clone()))
    }

    pub fn stop_all(&self) {
        self.mixer.lock().stop_all();
    }

    fn start(
        &mut self,
        key: &str,
        params: PlaybackParams,
        one_shot: bool,
    ) -> Result<Option<SoundHandle>> {
        let sample = self.sample(key)?;
        let id = self.mixer.lock().start(sample, params, one_shot);
        Ok(id.map(|id| SoundHandle::new(id, self.mixer.clone())))
    }

    /// Cached sample for `key`, loading `root/key` on first use.
    fn sample(&mut self, key: &str) -> Result<std::sync::Arc<crate::decode::SampleData>> {
        if let Some(sample) = self.bank.get(key) {
            return Ok(sample);
        }
        let path = self.root.join(key);
        if !path.is_file() {
            return Err(Error::SoundNotFound(key.to_string()));
        }
        self.bank.load_file(key, &path)?;
        self.bank
            .get(key)
            .ok_or_else(|| Error::SoundNotFound(key.to_string()))
    }
}

impl SoundSink for SoundSystem {
    fn play_one_shot(&mut self, sound_id: &str) {
        if let Err(e) = self.play(sound_id) {
            warn!("Cannot play {sound_id}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Tests use unwrap for brevity

    use super::*;
    use crate::decode::tests::wav_bytes;
    use crate::decode::SampleData;
    use crate::mixer::MAX_ONE_SHOTS;

    fn system() -> (tempfile::TempDir, SoundSystem) {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("fx")).unwrap();
        std::fs::write(
            root.path().join("fx/cursor.wav"),
            wav_bytes(&[8000; 400], 8000, 1),
        )
        .unwrap();
        let system = SoundSystem::silent(root.path(), 8000, 2);
        (root, system)
    }

    #[test]
    fn test_lazy_load_on_first_play() {
        let (_root, mut system) = system();
        assert!(!system.bank().contains("fx/cursor.wav"));
        let handle = system.play("fx/cursor.wav").unwrap();
        assert!(handle.is_some_and(|h| h.is_playing()));
        assert!(system.bank().contains("fx/cursor.wav"));
    }

    #[test]
    fn test_missing_sound_is_not_found() {
        let (_root, mut system) = system();
        let err = system.play("fx/none.wav").unwrap_err();
        assert!(matches!(err, Error::SoundNotFound(_)));

        // Through the sink the failure is only logged.
        SoundSink::play_one_shot(&mut system, "fx/none.wav");
        assert_eq!(system.mixer().lock().voice_count(), 0);
    }

    #[test]
    fn test_one_shot_pool_is_bounded() {
        let (_root, mut system) = system();
        system
            .bank_mut()
            .insert("tick", SampleData::new(vec![0.0; 8000], 8000, 1))
            .unwrap();

        for _ in 0..MAX_ONE_SHOTS {
            assert!(system.play("tick").unwrap().is_some());
        }
        assert!(system.play("tick").unwrap().is_none());

        // Looped sounds are not part of the pool.
        let looped = system.play_looped("tick").unwrap().unwrap();
        assert!(looped.params().is_some_and(|p| p.looping));
    }

    #[test]
    fn test_finished_one_shots_free_the_pool() {
        let (_root, mut system) = system();
        system
            .bank_mut()
            .insert("blip", SampleData::new(vec![0.1; 2], 8000, 1))
            .unwrap();
        for _ in 0..MAX_ONE_SHOTS {
            system.play("blip").unwrap();
        }
        let mut out = vec![0.0; 16];
        system.mixer().lock().render(&mut out);
        assert!(system.play("blip").unwrap().is_some());
    }

    #[test]
    fn test_load_folder_and_sound() {
        let (_root, mut system) = system();
        assert_eq!(system.load_folder("fx").unwrap(), 1);
        let mut sound = system.sound("fx/cursor.wav").unwrap();
        sound.set_pan(-100.0);
        sound.play();
        assert!(sound.is_playing());
        assert_eq!(sound.duration_ms(), 50);
    }
}
