//! Addressable configuration keys.
//!
//! Every setting is reachable as `section.key`, which is how the CLI reads
//! and writes individual values and how the file loader applies them.

use std::str::FromStr;

use super::file::{ConfigError, ConfigFile, ConfigResult};
use crate::animate::{MAX_HEADING_THRESHOLD, MIN_HEADING_THRESHOLD};

/// A single configuration setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    SymbolDefaultSize,
    SymbolKeyStrategy,
    IconMarkup,
    IconClassName,
    OrbitSpeed,
    OrbitHeadingThreshold,
    OrbitRadius,
    OrbitThrottle,
    OrbitFps,
}

const ALL_KEYS: &[ConfigKey] = &[
    ConfigKey::SymbolDefaultSize,
    ConfigKey::SymbolKeyStrategy,
    ConfigKey::IconMarkup,
    ConfigKey::IconClassName,
    ConfigKey::OrbitSpeed,
    ConfigKey::OrbitHeadingThreshold,
    ConfigKey::OrbitRadius,
    ConfigKey::OrbitThrottle,
    ConfigKey::OrbitFps,
];

impl ConfigKey {
    /// All keys, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        ALL_KEYS
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::SymbolDefaultSize | ConfigKey::SymbolKeyStrategy => "symbol",
            ConfigKey::IconMarkup | ConfigKey::IconClassName => "icon",
            ConfigKey::OrbitSpeed
            | ConfigKey::OrbitHeadingThreshold
            | ConfigKey::OrbitRadius
            | ConfigKey::OrbitThrottle
            | ConfigKey::OrbitFps => "orbit",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::SymbolDefaultSize => "default_size",
            ConfigKey::SymbolKeyStrategy => "key_strategy",
            ConfigKey::IconMarkup => "markup",
            ConfigKey::IconClassName => "class_name",
            ConfigKey::OrbitSpeed => "speed",
            ConfigKey::OrbitHeadingThreshold => "heading_threshold",
            ConfigKey::OrbitRadius => "radius",
            ConfigKey::OrbitThrottle => "throttle",
            ConfigKey::OrbitFps => "fps",
        }
    }

    /// Unit the stored number is measured in, if any.
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            ConfigKey::SymbolDefaultSize => Some("px"),
            ConfigKey::OrbitSpeed => Some("rad/s"),
            ConfigKey::OrbitHeadingThreshold => Some("deg"),
            ConfigKey::OrbitRadius => Some("deg lat"),
            ConfigKey::OrbitFps => Some("fps"),
            ConfigKey::SymbolKeyStrategy
            | ConfigKey::IconMarkup
            | ConfigKey::IconClassName
            | ConfigKey::OrbitThrottle => None,
        }
    }

    /// Current value as text.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::SymbolDefaultSize => config.symbol.default_size.to_string(),
            ConfigKey::SymbolKeyStrategy => config.symbol.key_strategy.to_string(),
            ConfigKey::IconMarkup => config.icon.markup.to_string(),
            ConfigKey::IconClassName => config.icon.class_name.clone(),
            ConfigKey::OrbitSpeed => config.orbit.speed.to_string(),
            ConfigKey::OrbitHeadingThreshold => config.orbit.heading_threshold.to_string(),
            ConfigKey::OrbitRadius => config.orbit.radius.to_string(),
            ConfigKey::OrbitThrottle => config.orbit.throttle.to_string(),
            ConfigKey::OrbitFps => config.orbit.fps.to_string(),
        }
    }

    /// Parse and store `value`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> ConfigResult<()> {
        let value = value.trim();
        match self {
            ConfigKey::SymbolDefaultSize => {
                config.symbol.default_size = self.positive(value)?;
            }
            ConfigKey::SymbolKeyStrategy => {
                config.symbol.key_strategy = value.parse().map_err(|e| self.invalid(value, e))?;
            }
            ConfigKey::IconMarkup => {
                config.icon.markup = value.parse().map_err(|e| self.invalid(value, e))?;
            }
            ConfigKey::IconClassName => {
                config.icon.class_name = value.to_string();
            }
            ConfigKey::OrbitSpeed => {
                config.orbit.speed = self.positive(value)?;
            }
            ConfigKey::OrbitHeadingThreshold => {
                let threshold = self.positive(value)?;
                if !(MIN_HEADING_THRESHOLD..=MAX_HEADING_THRESHOLD).contains(&threshold) {
                    return Err(self.invalid(
                        value,
                        format!(
                            "must be between {} and {} degrees",
                            MIN_HEADING_THRESHOLD, MAX_HEADING_THRESHOLD
                        ),
                    ));
                }
                config.orbit.heading_threshold = threshold;
            }
            ConfigKey::OrbitRadius => {
                config.orbit.radius = self.positive(value)?;
            }
            ConfigKey::OrbitThrottle => {
                config.orbit.throttle = value.parse().map_err(|e| self.invalid(value, e))?;
            }
            ConfigKey::OrbitFps => {
                let fps: u32 = value
                    .parse()
                    .map_err(|_| self.invalid(value, "expected a whole number"))?;
                if !(1..=1000).contains(&fps) {
                    return Err(self.invalid(value, "must be between 1 and 1000"));
                }
                config.orbit.fps = fps;
            }
        }
        Ok(())
    }

    fn positive(&self, value: &str) -> ConfigResult<f64> {
        match value.parse::<f64>() {
            Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
            Ok(_) => Err(self.invalid(value, "must be a positive number")),
            Err(_) => Err(self.invalid(value, "expected a number")),
        }
    }

    fn invalid(&self, value: &str, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animate::ThrottleMode;
    use crate::icon::MarkupStrategy;
    use crate::symbol::KeyStrategy;

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "symbol.default_size".parse::<ConfigKey>().unwrap(),
            ConfigKey::SymbolDefaultSize
        );
        assert_eq!(
            "Orbit.Throttle".parse::<ConfigKey>().unwrap(),
            ConfigKey::OrbitThrottle
        );
        assert!(matches!(
            "orbit.colour".parse::<ConfigKey>(),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_every_key_roundtrips_through_get_set() {
        let config = ConfigFile::default();
        for key in ConfigKey::all() {
            let mut copy = ConfigFile::default();
            key.set(&mut copy, &key.get(&config)).unwrap();
            assert_eq!(copy, config, "{}", key);
        }
    }

    #[test]
    fn test_set_values() {
        let mut config = ConfigFile::default();
        ConfigKey::SymbolKeyStrategy
            .set(&mut config, "insertion_order")
            .unwrap();
        ConfigKey::IconMarkup.set(&mut config, "node").unwrap();
        ConfigKey::OrbitThrottle.set(&mut config, "last-emission").unwrap();
        ConfigKey::OrbitFps.set(&mut config, " 120 ").unwrap();

        assert_eq!(config.symbol.key_strategy, KeyStrategy::InsertionOrder);
        assert_eq!(config.icon.markup, MarkupStrategy::Node);
        assert_eq!(config.orbit.throttle, ThrottleMode::LastEmission);
        assert_eq!(config.orbit.fps, 120);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = ConfigFile::default();
        assert!(ConfigKey::SymbolDefaultSize.set(&mut config, "-1").is_err());
        assert!(ConfigKey::SymbolDefaultSize.set(&mut config, "inf").is_err());
        assert!(ConfigKey::OrbitHeadingThreshold.set(&mut config, "200").is_err());
        assert!(ConfigKey::OrbitHeadingThreshold.set(&mut config, "0.01").is_err());
        assert!(ConfigKey::OrbitFps.set(&mut config, "0").is_err());
        assert!(ConfigKey::IconMarkup.set(&mut config, "png").is_err());
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_only_numeric_keys_have_units() {
        let config = ConfigFile::default();
        for key in ConfigKey::all() {
            let numeric = key.get(&config).parse::<f64>().is_ok();
            assert_eq!(key.unit().is_some(), numeric, "{}", key);
        }
        assert_eq!(ConfigKey::OrbitSpeed.unit(), Some("rad/s"));
    }

    #[test]
    fn test_sections_are_grouped() {
        let sections: Vec<_> = ConfigKey::all().iter().map(|k| k.section()).collect();
        let mut deduped = sections.clone();
        deduped.dedup();
        assert_eq!(deduped, vec!["symbol", "icon", "orbit"]);
    }
}
