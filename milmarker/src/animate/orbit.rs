//! Circular orbit animation for a live marker.
//!
//! The animator moves a marker around a centre point once per frame, writing
//! the position straight into the host handle, and publishes the direction
//! of travel whenever it has turned far enough to be worth redrawing the
//! symbol.
//!
//! # State Machine
//!
//! ```text
//! Idle --[start]--> Running --[cancel | handle gone]--> Stopped
//! Idle --[cancel]--> Stopped
//! ```
//!
//! `Stopped` is terminal. Every frame callback first checks that the animator
//! is still running, so a callback that was already queued when the animator
//! stopped does nothing.
//!
//! # Heading throttle
//!
//! Heading is the tangent of the orbit, `angle + 90°`, in `[0, 360)`. The
//! default [`ThrottleMode::Grid`] publishes a heading once it is at least the
//! threshold away from the reference, then advances the reference in whole
//! threshold steps. A full orbit yields exactly `360 / threshold`
//! publications at any frame rate.
//!
//! [`ThrottleMode::LastEmission`] makes the published heading itself the new
//! reference. Frame quantization then makes each step slightly larger than
//! the threshold, so a full orbit at 15° yields 22 to 24 publications
//! depending on frame rate.

use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::{Rc, Weak};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::scheduler::{FrameRequestId, FrameScheduler};
use crate::geo::{heading_difference, longitude_radius, normalize_heading, signed_heading_delta, LatLng};
use crate::marker::MarkerHandle;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Angular speed in radians per second.
pub const DEFAULT_ORBIT_SPEED: f64 = 0.6;

/// Heading change that triggers a publication, in degrees.
pub const DEFAULT_HEADING_THRESHOLD: f64 = 15.0;

/// Heading thresholds are clamped into this range, in degrees.
pub const MIN_HEADING_THRESHOLD: f64 = 0.1;
pub const MAX_HEADING_THRESHOLD: f64 = 180.0;

/// Orbit radius in degrees of latitude.
pub const DEFAULT_ORBIT_RADIUS: f64 = 0.01;

// ─────────────────────────────────────────────────────────────────────────────
// States and outcomes
// ─────────────────────────────────────────────────────────────────────────────

/// Animator lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    /// Created, no frame requested yet.
    Idle,
    /// Advancing every frame.
    Running,
    /// Cancelled or lost its marker. Terminal.
    Stopped,
}

impl AnimatorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimatorState::Idle => "Idle",
            AnimatorState::Running => "Running",
            AnimatorState::Stopped => "Stopped",
        }
    }
}

impl std::fmt::Display for AnimatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a single frame did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Position written; `heading` is set when one was published.
    Advanced { heading: Option<f64> },
    /// The animator was not running. Nothing was written.
    Stale,
    /// The marker handle is gone; the animator stopped.
    Detached,
}

/// How heading publications are throttled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrottleMode {
    /// Publish when the heading crosses the next threshold multiple from the
    /// starting heading.
    #[default]
    Grid,
    /// Publish when the heading is a threshold away from the last published
    /// heading, which then becomes the reference.
    LastEmission,
}

impl ThrottleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThrottleMode::LastEmission => "last_emission",
            ThrottleMode::Grid => "grid",
        }
    }
}

impl std::fmt::Display for ThrottleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThrottleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "last_emission" => Ok(ThrottleMode::LastEmission),
            "grid" => Ok(ThrottleMode::Grid),
            other => Err(format!(
                "unknown throttle mode '{}', expected last_emission or grid",
                other
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Orbit geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Orbit parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitConfig {
    pub center: LatLng,
    /// Radius in degrees of latitude.
    pub radius_lat: f64,
    /// Radians per second.
    pub speed: f64,
    /// Degrees.
    pub heading_threshold: f64,
    pub throttle: ThrottleMode,
    /// Angle at start, radians clockwise from north.
    pub start_angle: f64,
}

impl OrbitConfig {
    /// Default orbit around `center`.
    pub fn new(center: LatLng) -> Self {
        Self {
            center,
            radius_lat: DEFAULT_ORBIT_RADIUS,
            speed: DEFAULT_ORBIT_SPEED,
            heading_threshold: DEFAULT_HEADING_THRESHOLD,
            throttle: ThrottleMode::default(),
            start_angle: 0.0,
        }
    }

    pub fn with_radius(mut self, radius_lat: f64) -> Self {
        self.radius_lat = radius_lat;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Set the publication threshold, clamped into
    /// [`MIN_HEADING_THRESHOLD`]..=[`MAX_HEADING_THRESHOLD`].
    pub fn with_heading_threshold(mut self, threshold: f64) -> Self {
        self.heading_threshold = threshold;
        self.heading_threshold = self.effective_threshold();
        self
    }

    /// Threshold actually used by the throttle. NaN falls back to the
    /// default.
    pub fn effective_threshold(&self) -> f64 {
        if self.heading_threshold.is_nan() {
            DEFAULT_HEADING_THRESHOLD
        } else {
            self.heading_threshold
                .clamp(MIN_HEADING_THRESHOLD, MAX_HEADING_THRESHOLD)
        }
    }

    pub fn with_throttle(mut self, throttle: ThrottleMode) -> Self {
        self.throttle = throttle;
        self
    }

    /// Longitude radius that keeps the orbit circular on the ground.
    pub fn radius_lng(&self) -> f64 {
        longitude_radius(self.radius_lat, self.center.lat)
    }

    /// Time for one full orbit, or `None` when the speed is not positive.
    pub fn period(&self) -> Option<Duration> {
        if self.speed > 0.0 && self.speed.is_finite() {
            Some(Duration::from_secs_f64(TAU / self.speed))
        } else {
            None
        }
    }

    /// Position at `angle` radians.
    pub fn position_at(&self, angle: f64) -> LatLng {
        LatLng::new(
            self.center.lat + self.radius_lat * angle.cos(),
            self.center.lng + self.radius_lng() * angle.sin(),
        )
    }

    /// Direction of travel at `angle` radians, in degrees.
    pub fn heading_at(&self, angle: f64) -> f64 {
        normalize_heading(angle.to_degrees() + 90.0)
    }
}

/// Counters kept by the animator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrbitStats {
    /// Frames that advanced the orbit.
    pub frames: u64,
    pub position_updates: u64,
    pub heading_emissions: u64,
    /// Callbacks that arrived after the animator stopped.
    pub stale_frames: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Animator
// ─────────────────────────────────────────────────────────────────────────────

type HeadingObserver = Rc<dyn Fn(f64)>;

/// State shared with queued frame callbacks, which hold it weakly.
struct OrbitShared {
    config: OrbitConfig,
    scheduler: Rc<dyn FrameScheduler>,
    handle: RefCell<Option<Weak<dyn MarkerHandle>>>,
    observer: RefCell<Option<HeadingObserver>>,
    state: Cell<AnimatorState>,
    angle: Cell<f64>,
    last_emitted: Cell<f64>,
    last_time: Cell<Option<Duration>>,
    pending: Cell<Option<FrameRequestId>>,
    stats: Cell<OrbitStats>,
}

impl OrbitShared {
    fn schedule(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let id = self.scheduler.request_frame(Box::new(move |now| {
            if let Some(shared) = weak.upgrade() {
                shared.on_frame(now);
            }
        }));
        self.pending.set(Some(id));
    }

    fn update_stats(&self, f: impl FnOnce(&mut OrbitStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }

    fn stop(&self, reason: &str) {
        self.state.set(AnimatorState::Stopped);
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel_frame(id);
        }
        info!(reason, stats = ?self.stats.get(), "Orbit animator stopped");
    }

    fn on_frame(self: &Rc<Self>, now: Duration) -> FrameOutcome {
        if self.state.get() != AnimatorState::Running {
            self.update_stats(|s| s.stale_frames += 1);
            trace!(state = %self.state.get(), "Ignoring stale orbit frame");
            return FrameOutcome::Stale;
        }
        self.pending.set(None);

        let handle = self.handle.borrow().as_ref().and_then(Weak::upgrade);
        let Some(handle) = handle else {
            self.stop("marker handle gone");
            return FrameOutcome::Detached;
        };

        let dt = self
            .last_time
            .replace(Some(now))
            .map(|last| now.saturating_sub(last))
            .unwrap_or_default();
        let angle = self.angle.get() + self.config.speed * dt.as_secs_f64();
        self.angle.set(angle);

        let position = self.config.position_at(angle);
        handle.set_lat_lng(position);

        let heading = self.config.heading_at(angle);
        let emitted = self.throttle(heading);
        self.update_stats(|s| {
            s.frames += 1;
            s.position_updates += 1;
            if emitted.is_some() {
                s.heading_emissions += 1;
            }
        });
        trace!(angle, lat = position.lat, lng = position.lng, "Orbit frame");

        if let Some(heading) = emitted {
            debug!(heading, "Heading published");
            let observer = self.observer.borrow().clone();
            if let Some(observer) = observer {
                observer(heading);
            }
        }

        // The observer may have cancelled us.
        if self.state.get() == AnimatorState::Running {
            self.schedule();
        }

        FrameOutcome::Advanced { heading: emitted }
    }

    /// Decide whether `heading` is published, updating the reference.
    fn throttle(&self, heading: f64) -> Option<f64> {
        let threshold = self.config.effective_threshold();
        let last = self.last_emitted.get();

        match self.config.throttle {
            ThrottleMode::LastEmission => {
                if heading_difference(heading, last) >= threshold {
                    self.last_emitted.set(heading);
                    Some(heading)
                } else {
                    None
                }
            }
            ThrottleMode::Grid => {
                let delta = signed_heading_delta(last, heading);
                let steps = (delta.abs() / threshold).floor();
                if steps >= 1.0 {
                    let advanced = last + delta.signum() * steps * threshold;
                    self.last_emitted.set(normalize_heading(advanced));
                    Some(heading)
                } else {
                    None
                }
            }
        }
    }
}

/// Drives a marker around an orbit on a frame scheduler.
///
/// Dropping the animator cancels it.
pub struct OrbitAnimator {
    shared: Rc<OrbitShared>,
}

impl std::fmt::Debug for OrbitAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrbitAnimator")
            .field("config", &self.shared.config)
            .field("state", &self.shared.state.get())
            .field("angle", &self.shared.angle.get())
            .field("last_emitted", &self.shared.last_emitted.get())
            .field("stats", &self.shared.stats.get())
            .finish()
    }
}

impl OrbitAnimator {
    pub fn new(config: OrbitConfig, scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            shared: Rc::new(OrbitShared {
                config,
                scheduler,
                handle: RefCell::new(None),
                observer: RefCell::new(None),
                state: Cell::new(AnimatorState::Idle),
                angle: Cell::new(config.start_angle),
                last_emitted: Cell::new(config.heading_at(config.start_angle)),
                last_time: Cell::new(None),
                pending: Cell::new(None),
                stats: Cell::new(OrbitStats::default()),
            }),
        }
    }

    /// Marker the animator writes positions into.
    pub fn attach(&self, handle: Weak<dyn MarkerHandle>) {
        *self.shared.handle.borrow_mut() = Some(handle);
    }

    /// Called with each published heading.
    pub fn on_heading(&self, observer: impl Fn(f64) + 'static) {
        *self.shared.observer.borrow_mut() = Some(Rc::new(observer));
    }

    /// Request the first frame. Only an idle animator starts.
    pub fn start(&self) -> bool {
        if self.shared.state.get() != AnimatorState::Idle {
            return false;
        }
        self.shared.state.set(AnimatorState::Running);
        self.shared.last_time.set(Some(self.shared.scheduler.now()));
        self.shared.schedule();
        info!(
            center = %self.shared.config.center,
            radius = self.shared.config.radius_lat,
            speed = self.shared.config.speed,
            throttle = %self.shared.config.throttle,
            "Orbit animator started"
        );
        true
    }

    /// Stop for good. Returns `false` if already stopped.
    pub fn cancel(&self) -> bool {
        if self.shared.state.get() == AnimatorState::Stopped {
            return false;
        }
        self.shared.stop("cancelled");
        true
    }

    /// Run one frame at `now` as if the scheduler had called back.
    pub fn tick(&self, now: Duration) -> FrameOutcome {
        if let Some(id) = self.shared.pending.take() {
            self.shared.scheduler.cancel_frame(id);
        }
        self.shared.on_frame(now)
    }

    pub fn state(&self) -> AnimatorState {
        self.shared.state.get()
    }

    pub fn is_running(&self) -> bool {
        self.state() == AnimatorState::Running
    }

    pub fn stats(&self) -> OrbitStats {
        self.shared.stats.get()
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.shared.config
    }
}

impl Drop for OrbitAnimator {
    fn drop(&mut self) {
        if self.shared.state.get() != AnimatorState::Stopped {
            self.shared.stop("dropped");
        }
    }
}
