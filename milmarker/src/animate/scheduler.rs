//! Frame scheduling.
//!
//! A [`FrameScheduler`] is the host's "call me before the next paint" hook.
//! Callbacks receive the scheduler clock at the time the frame runs.
//! [`ManualScheduler`] drives frames explicitly and is what tests and the CLI
//! simulation use.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use tracing::trace;

/// Identifies a pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequestId(pub u64);

/// Callback run once on the next frame with the current clock.
pub type FrameCallback = Box<dyn FnOnce(Duration)>;

/// Host frame loop.
pub trait FrameScheduler {
    /// Current frame clock.
    fn now(&self) -> Duration;

    /// Run `callback` once on the next frame.
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId;

    /// Cancel a pending request. Returns `false` if it already ran or was
    /// cancelled.
    fn cancel_frame(&self, id: FrameRequestId) -> bool;
}

/// Scheduler advanced by hand.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    pending: RefCell<Vec<(FrameRequestId, FrameCallback)>>,
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now.get())
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward without running anything.
    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get() + dt);
    }

    /// Run every callback pending right now. Callbacks requested while
    /// running wait for the next call. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        // Taken out first so callbacks may request or cancel frames.
        let batch = std::mem::take(&mut *self.pending.borrow_mut());
        let now = self.now.get();
        let count = batch.len();
        for (id, callback) in batch {
            trace!(id = id.0, "Running frame callback");
            callback(now);
        }
        count
    }

    /// Advance by `dt` and run pending callbacks, `frames` times. Returns
    /// the total number of callbacks run.
    pub fn run_frames(&self, frames: usize, dt: Duration) -> usize {
        let mut total = 0;
        for _ in 0..frames {
            self.advance(dt);
            total += self.run_pending();
        }
        total
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Remove pending callbacks without running them, so a test can invoke
    /// them out of band.
    pub fn take_pending(&self) -> Vec<FrameCallback> {
        std::mem::take(&mut *self.pending.borrow_mut())
            .into_iter()
            .map(|(_, callback)| callback)
            .collect()
    }
}

impl FrameScheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId {
        let id = FrameRequestId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.pending.borrow_mut().push((id, callback));
        id
    }

    fn cancel_frame(&self, id: FrameRequestId) -> bool {
        let mut pending = self.pending.borrow_mut();
        match pending.iter().position(|(pending_id, _)| *pending_id == id) {
            Some(index) => {
                pending.remove(index);
                true
            }
            None => false,
        }
    }
}
