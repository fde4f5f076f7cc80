//! Game configuration loaded from `config.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sonar_core::{Error, Result};
use tracing::{debug, info};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "SONAR_CONFIG";

/// Window, timing, sound and speech settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub game_name: String,
    pub game_version: String,
    pub window_width: f64,
    pub window_height: f64,
    pub frames_per_second: u32,
    /// Directory sound keys such as `fx/decide.ogg` are resolved against.
    pub sound_dir: PathBuf,
    /// Per-run debug log, truncated at startup.
    pub log_file: PathBuf,
    pub speech_enabled: bool,
    pub master_volume_db: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            game_name: "Sonar".to_string(),
            game_version: env!("CARGO_PKG_VERSION").to_string(),
            window_width: 1200.0,
            window_height: 800.0,
            frames_per_second: 60,
            sound_dir: PathBuf::from("."),
            log_file: PathBuf::from("debug.log"),
            speech_enabled: true,
            master_volume_db: 0.0,
        }
    }
}

impl GameConfig {
    /// Load from `$SONAR_CONFIG`, or `config.json` in the platform config
    /// directory. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Window title, e.g. `"Sonar (0.1.0)"`.
    pub fn window_title(&self) -> String {
        format!("{} ({})", self.game_name, self.game_version)
    }

    /// Duration of one frame in milliseconds.
    pub fn frame_interval_ms(&self) -> u64 {
        1000 / u64::from(self.frames_per_second.max(1))
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    directories::ProjectDirs::from("", "", "sonar").map(|dirs| dirs.config_dir().join("config.json"))
}
