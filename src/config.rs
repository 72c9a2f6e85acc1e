//! Game settings loaded from a TOML file.
//!
//! Every field has a default, so an absent file or a partial one is fine.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "sky_siege.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Viewport width in world units.
    pub width: f32,
    /// Viewport height in world units.
    pub height: f32,
    pub target_fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            target_fps: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub music: PathBuf,
    pub laser: PathBuf,
    pub explosion: PathBuf,
    pub upgrade: PathBuf,
    pub music_volume: f32,
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music: PathBuf::from("assets/doom_mus.wav"),
            laser: PathBuf::from("assets/lazer-blip.wav"),
            explosion: PathBuf::from("assets/explosion.wav"),
            upgrade: PathBuf::from("assets/upgrade.wav"),
            music_volume: 0.3,
            sfx_volume: 0.7,
            muted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: PathBuf,
    /// `env_logger` filter used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("sky_siege.log"),
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed RNG seed; a fresh one is drawn when absent.
    pub seed: Option<u64>,
    pub window: WindowConfig,
    pub audio: AudioConfig,
    pub log: LogConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse(err) => write!(f, "malformed config: {err}"),
            Self::Invalid(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl GameConfig {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let window = &self.window;
        if !(window.width > 0.0 && window.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "viewport must be positive, got {}x{}",
                window.width, window.height
            )));
        }
        if window.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be > 0".to_string()));
        }
        for (name, volume) in [
            ("music_volume", self.audio.music_volume),
            ("sfx_volume", self.audio.sfx_volume),
        ] {
            if !(0.0..=1.0).contains(&volume) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within 0..=1, got {volume}"
                )));
            }
        }
        Ok(())
    }

    /// Seconds per simulation step.
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.window.target_fps as f32
    }
}
