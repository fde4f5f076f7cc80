//! In-memory cache of decoded sounds.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use sonar_core::{Error, Result};
use tracing::{debug, info, warn};

use crate::decode::SampleData;
use crate::resample::resample;

/// File extensions picked up by [`SoundBank::load_folder`].
const SUPPORTED_EXTENSIONS: &[&str] = &["ogg", "wav", "flac", "mp3"];

/// Decoded sounds keyed by `"folder/file_name"`, ready for the mixer.
#[derive(Debug, Default)]
pub struct SoundBank {
    samples: HashMap<String, Arc<SampleData>>,
    output_rate: u32,
}

impl SoundBank {
    /// Create an empty bank that resamples to `output_rate`.
    pub fn new(output_rate: u32) -> Self {
        Self {
            samples: HashMap::new(),
            output_rate,
        }
    }

    pub const fn output_rate(&self) -> u32 {
        self.output_rate
    }

    /// Load every supported sound directly inside `root/folder` (no
    /// recursion). Files that fail to decode are skipped with a warning.
    ///
    /// Returns the number of sounds loaded.
    pub fn load_folder(&mut self, root: &Path, folder: &str) -> Result<usize> {
        let dir = root.join(folder);
        let entries = std::fs::read_dir(&dir).map_err(|e| {
            Error::SoundNotFound(format!("sound folder {}: {e}", dir.display()))
        })?;

        let mut files: Vec<_> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_supported(path))
            .collect();
        files.sort();

        info!("Loading sound folder: {} ({} files)", dir.display(), files.len());

        let mut loaded = 0;
        for path in files {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let key = format!("{folder}/{file_name}");
            match self.load_file(&key, &path) {
                Ok(()) => loaded += 1,
                Err(e) => warn!("Skipping {}: {e}", path.display()),
            }
        }
        Ok(loaded)
    }

    /// Decode `path` and store it under `key`.
    pub fn load_file(&mut self, key: &str, path: &Path) -> Result<()> {
        let data = SampleData::from_file(path)?;
        self.insert(key, data)
    }

    /// Store already decoded audio under `key`.
    pub fn insert(&mut self, key: &str, data: SampleData) -> Result<()> {
        let data = resample(data, self.output_rate)?;
        debug!("Cached sound {key} ({} ms)", data.duration_ms());
        self.samples.insert(key.to_string(), Arc::new(data));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<Arc<SampleData>> {
        self.samples.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.samples.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.samples.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sorted keys of every cached sound.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.samples.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Tests use unwrap for brevity

    use super::*;
    use crate::decode::tests::wav_bytes;

    fn write_wav(dir: &Path, name: &str, frames: usize) {
        let pcm = vec![1000i16; frames];
        std::fs::write(dir.join(name), wav_bytes(&pcm, 8000, 1)).unwrap();
    }

    #[test]
    fn test_load_folder_keys_and_skips() {
        let root = tempfile::tempdir().unwrap();
        let ui = root.path().join("ui");
        std::fs::create_dir_all(ui.join("nested")).unwrap();
        write_wav(&ui, "cursor.wav", 80);
        write_wav(&ui, "decide.WAV", 160);
        write_wav(&ui.join("nested"), "deep.wav", 80);
        std::fs::write(ui.join("readme.txt"), "not a sound").unwrap();
        std::fs::write(ui.join("broken.ogg"), "garbage").unwrap();

        let mut bank = SoundBank::new(8000);
        let loaded = bank.load_folder(root.path(), "ui").unwrap();
        assert_eq!(loaded, 2);
        assert_eq!(bank.keys(), vec!["ui/cursor.wav", "ui/decide.WAV"]);
        assert_eq!(bank.get("ui/decide.WAV").unwrap().frames(), 160);
        assert!(!bank.contains("ui/nested/deep.wav"));
    }

    #[test]
    fn test_missing_folder_is_error() {
        let root = tempfile::tempdir().unwrap();
        let mut bank = SoundBank::new(8000);
        let err = bank.load_folder(root.path(), "nope").unwrap_err();
        assert!(matches!(err, Error::SoundNotFound(_)));
    }

    #[test]
    fn test_insert_resamples_to_output_rate() {
        let mut bank = SoundBank::new(16000);
        bank.insert("beep", SampleData::new(vec![0.2; 800], 8000, 1))
            .unwrap();
        let beep = bank.get("beep").unwrap();
        assert_eq!(beep.sample_rate, 16000);
        assert_eq!(beep.frames(), 1600);

        assert!(bank.remove("beep"));
        assert!(bank.is_empty());
    }
}
