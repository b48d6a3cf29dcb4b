//! Orbit command - simulate an orbiting marker.
//!
//! Drives the orbit animator on a manual frame scheduler against a recording
//! marker host, then prints what the host received. Run with `--verbose` to
//! see every host write as it happens.

use std::cell::RefCell;
use std::rc::Rc;

use milmarker::animate::{ManualScheduler, OrbitingMarker, ThrottleMode};
use milmarker::config::{ConfigFile, ConfigKey};
use milmarker::marker::{MilSymbolProps, RecordingHost};
use milmarker::render::FrameRenderer;
use milmarker::LatLng;
use tracing::info;

use crate::error::CliError;

/// Longest simulation accepted, in frames.
const MAX_SIMULATED_FRAMES: f64 = 1_000_000.0;

/// Arguments for the orbit command.
pub struct OrbitArgs {
    pub code: String,
    pub lat: f64,
    pub lng: f64,
    pub seconds: Option<f64>,
    pub fps: Option<u32>,
    pub throttle: Option<ThrottleMode>,
    pub speed: Option<f64>,
    pub radius: Option<f64>,
    pub size: Option<f64>,
}

/// What the host saw during a simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitSummary {
    pub frames: u64,
    pub position_updates: usize,
    pub icon_swaps: usize,
    pub headings: Vec<f64>,
    pub final_position: LatLng,
}

/// Run the orbit command.
pub fn run(args: OrbitArgs) -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    let summary = simulate(&args, &config)?;

    println!("Frames:           {}", summary.frames);
    println!("Position updates: {}", summary.position_updates);
    println!("Icon swaps:       {}", summary.icon_swaps);
    println!("Headings emitted: {}", summary.headings.len());
    let headings: Vec<String> = summary
        .headings
        .iter()
        .map(|h| format!("{:.1}", h))
        .collect();
    println!("  {}", headings.join(" "));
    println!("Final position:   {}", summary.final_position);

    Ok(())
}

/// Fly the marker and collect the host-side results.
///
/// Without `--seconds` the simulation covers one full orbit.
pub fn simulate(args: &OrbitArgs, config: &ConfigFile) -> Result<OrbitSummary, CliError> {
    if !(args.lat.is_finite() && args.lat.abs() < 90.0) {
        return Err(CliError::Config(format!("latitude must be within (-90, 90), got {}", args.lat)));
    }
    if !args.lng.is_finite() {
        return Err(CliError::Config(format!("longitude must be finite, got {}", args.lng)));
    }

    // Overrides go through the same validation as the config file.
    let mut settings = config.clone();
    let overrides = [
        (ConfigKey::OrbitSpeed, args.speed.map(|v| v.to_string())),
        (ConfigKey::OrbitRadius, args.radius.map(|v| v.to_string())),
        (ConfigKey::OrbitFps, args.fps.map(|v| v.to_string())),
    ];
    for (key, value) in overrides {
        if let Some(value) = value {
            key.set(&mut settings, &value)
                .map_err(|e| CliError::Config(e.to_string()))?;
        }
    }
    if let Some(throttle) = args.throttle {
        settings.orbit.throttle = throttle;
    }

    let center = LatLng::new(args.lat, args.lng);
    let orbit = settings.orbit_config(center);
    let fps = settings.orbit.fps;

    let seconds = match args.seconds {
        Some(s) if s.is_finite() && s > 0.0 => s,
        Some(s) => return Err(CliError::Config(format!("seconds must be positive, got {}", s))),
        None => orbit
            .period()
            .map(|p| p.as_secs_f64())
            .ok_or_else(|| CliError::Config("orbit speed must be positive".into()))?,
    };
    let frame_count = (seconds * fps as f64).ceil();
    if frame_count > MAX_SIMULATED_FRAMES {
        return Err(CliError::Config(format!(
            "{} s at {} fps needs {} frames, limit is {}",
            seconds, fps, frame_count, MAX_SIMULATED_FRAMES
        )));
    }
    let frames = frame_count as usize;
    let dt = settings.frame_interval();

    let host = Rc::new(RecordingHost::new());
    let scheduler = Rc::new(ManualScheduler::new());
    let mut props = MilSymbolProps::new(center, args.code.as_str());
    if let Some(size) = args.size {
        props = props.with_size(size);
    }

    info!(code = %args.code, frames, fps, throttle = %orbit.throttle, "Starting orbit simulation");
    let orbiting = OrbitingMarker::launch(
        host.clone(),
        Rc::new(FrameRenderer::new()),
        scheduler.clone(),
        props,
        orbit,
        settings.marker_config(),
    )?;

    let published = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&published);
    orbiting.on_heading(move |heading| sink.borrow_mut().push(heading));

    scheduler.run_frames(frames, dt);
    // Let the last published heading reach the icon.
    scheduler.run_frames(1, dt);

    if let Some(e) = orbiting.last_error() {
        return Err(e.into());
    }

    let final_position = host
        .marker(0)
        .map(|m| m.position())
        .unwrap_or(center);
    let stats = orbiting.stats();
    orbiting.stop();

    Ok(OrbitSummary {
        frames: stats.frames,
        position_updates: host.set_lat_lng_count(),
        icon_swaps: host.set_icon_count(),
        headings: published.take(),
        final_position,
    })
}
