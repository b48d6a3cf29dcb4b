//! Config command - inspect and edit the settings file.
//!
//! Values are shown the way the library stores them after validation, with
//! units, and `list` also reports what the orbit settings work out to on a
//! simulated frame clock.

use std::f64::consts::TAU;

use clap::Subcommand;
use milmarker::animate::ThrottleMode;
use milmarker::config::{config_file_path, ConfigFile, ConfigKey};
use milmarker::LatLng;
use tracing::debug;

use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one setting (e.g. orbit.speed)
    Get {
        /// Setting name as section.key
        key: String,
    },

    /// Validate and store one setting
    Set {
        /// Setting name as section.key
        key: String,

        /// New value; numbers are checked against the setting's range
        value: String,
    },

    /// Print every setting and the orbit timing it produces
    List,

    /// Print where the settings file lives
    Path,
}

pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => {
            let key = lookup(&key)?;
            println!("{}", with_unit(key, &ConfigFile::load()?));
        }
        ConfigCommands::Set { key, value } => {
            let key = lookup(&key)?;
            let mut settings = ConfigFile::load()?;
            let before = with_unit(key, &settings);
            key.set(&mut settings, &value)
                .map_err(|e| CliError::Config(e.to_string()))?;
            settings.save()?;
            debug!(key = %key, raw = %value, "Stored setting");
            println!("{}: {} -> {}", key, before, with_unit(key, &settings));
        }
        ConfigCommands::List => print!("{}", listing(&ConfigFile::load()?)),
        ConfigCommands::Path => {
            let path = config_file_path();
            let state = if path.exists() { "" } else { " (not created yet, using defaults)" };
            println!("{}{}", path.display(), state);
        }
    }
    Ok(())
}

fn lookup(name: &str) -> Result<ConfigKey, CliError> {
    name.parse().map_err(|_| {
        let known: Vec<String> = ConfigKey::all().iter().map(ConfigKey::name).collect();
        CliError::Config(format!("no setting named '{}' (known: {})", name, known.join(", ")))
    })
}

/// Stored value followed by its unit, or `(empty)` for blank text.
fn with_unit(key: ConfigKey, settings: &ConfigFile) -> String {
    let value = key.get(settings);
    match key.unit() {
        _ if value.is_empty() => "(empty)".to_string(),
        Some(unit) => format!("{} {}", value, unit),
        None => value,
    }
}

/// What the orbit settings amount to at the configured frame rate.
fn orbit_timing(settings: &ConfigFile) -> Vec<(&'static str, String)> {
    let orbit = settings.orbit_config(LatLng::new(0.0, 0.0));
    let fps = settings.orbit.fps.max(1);
    let mut rows = Vec::new();

    if let Some(period) = orbit.period() {
        let seconds = period.as_secs_f64();
        rows.push(("period", format!("{:.2} s", seconds)));
        rows.push(("frames per orbit", format!("{}", (seconds * f64::from(fps)).ceil())));
    }
    rows.push((
        "frame interval",
        format!("{:.2} ms", settings.frame_interval().as_secs_f64() * 1000.0),
    ));
    rows.push((
        "sweep per frame",
        format!("{:.3} deg", (orbit.speed / f64::from(fps)).to_degrees()),
    ));

    let steps = (360.0 / orbit.effective_threshold()).floor();
    let headings = match orbit.throttle {
        ThrottleMode::Grid => format!("{}", steps),
        ThrottleMode::LastEmission => format!("up to {}", steps),
    };
    rows.push(("headings per orbit", headings));
    rows.push(("ring circumference", format!("{:.3} deg lat", orbit.radius_lat * TAU)));
    rows
}

fn listing(settings: &ConfigFile) -> String {
    let mut out = String::new();
    let mut section = "";
    for key in ConfigKey::all() {
        if key.section() != section {
            section = key.section();
            out.push_str(&format!("[{}]\n", section));
        }
        out.push_str(&format!("  {:<18} {}\n", key.key_name(), with_unit(*key, settings)));
    }

    out.push_str("\norbit timing:\n");
    for (label, value) in orbit_timing(settings) {
        out.push_str(&format!("  {:<18} {}\n", label, value));
    }
    out
}
