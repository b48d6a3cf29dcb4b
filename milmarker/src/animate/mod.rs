//! Frame-driven marker animation.

mod orbit;
mod orbiting;
mod scheduler;

pub use orbit::{
    AnimatorState, FrameOutcome, OrbitAnimator, OrbitConfig, OrbitStats, ThrottleMode,
    DEFAULT_HEADING_THRESHOLD, DEFAULT_ORBIT_RADIUS, DEFAULT_ORBIT_SPEED, MAX_HEADING_THRESHOLD,
    MIN_HEADING_THRESHOLD,
};
pub use orbiting::OrbitingMarker;
pub use scheduler::{FrameCallback, FrameRequestId, FrameScheduler, ManualScheduler};
