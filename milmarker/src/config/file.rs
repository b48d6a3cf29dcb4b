//! INI configuration file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use super::keys::ConfigKey;
use crate::animate::{
    OrbitConfig, ThrottleMode, DEFAULT_HEADING_THRESHOLD, DEFAULT_ORBIT_RADIUS, DEFAULT_ORBIT_SPEED,
};
use crate::geo::LatLng;
use crate::icon::{IconConfig, MarkupStrategy};
use crate::marker::MarkerConfig;
use crate::symbol::{KeyStrategy, ProviderConfig, DEFAULT_SYMBOL_SIZE};

/// Frame rate used when simulating animations.
pub const DEFAULT_FPS: u32 = 60;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors reading or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// `[symbol]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSettings {
    pub default_size: f64,
    pub key_strategy: KeyStrategy,
}

impl Default for SymbolSettings {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_SYMBOL_SIZE,
            key_strategy: KeyStrategy::default(),
        }
    }
}

/// `[icon]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IconSettings {
    pub markup: MarkupStrategy,
    pub class_name: String,
}

/// `[orbit]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitSettings {
    /// Radians per second.
    pub speed: f64,
    /// Degrees.
    pub heading_threshold: f64,
    /// Degrees of latitude.
    pub radius: f64,
    pub throttle: ThrottleMode,
    pub fps: u32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            speed: DEFAULT_ORBIT_SPEED,
            heading_threshold: DEFAULT_HEADING_THRESHOLD,
            radius: DEFAULT_ORBIT_RADIUS,
            throttle: ThrottleMode::default(),
            fps: DEFAULT_FPS,
        }
    }
}

/// Parsed `config.ini`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub symbol: SymbolSettings,
    pub icon: IconSettings,
    pub orbit: OrbitSettings,
}

/// Default location of the configuration file.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("milmarker")
        .join("config.ini")
}

impl ConfigFile {
    /// Load from the default location, or defaults if there is no file.
    pub fn load() -> ConfigResult<Self> {
        let path = config_file_path();
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from `path`. Missing keys keep their defaults; unknown sections
    /// and keys are ignored.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(e) => ConfigError::Io(e),
            ini::Error::Parse(e) => ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;

        let mut config = Self::default();
        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }

        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini.write_to_file(path)?;

        debug!(path = %path.display(), "Saved config file");
        Ok(())
    }

    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            default_size: self.symbol.default_size,
            key_strategy: self.symbol.key_strategy,
        }
    }

    pub fn icon_config(&self) -> IconConfig {
        IconConfig {
            markup: self.icon.markup,
            class_name: self.icon.class_name.clone(),
        }
    }

    pub fn marker_config(&self) -> MarkerConfig {
        MarkerConfig {
            provider: self.provider_config(),
            icon: self.icon_config(),
        }
    }

    /// Orbit around `center` with the configured parameters.
    pub fn orbit_config(&self, center: LatLng) -> OrbitConfig {
        OrbitConfig::new(center)
            .with_radius(self.orbit.radius)
            .with_speed(self.orbit.speed)
            .with_heading_threshold(self.orbit.heading_threshold)
            .with_throttle(self.orbit.throttle)
    }

    /// Time between simulated frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.orbit.fps.max(1)))
    }
}
