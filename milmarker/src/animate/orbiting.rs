//! A symbol marker flying an orbit.
//!
//! Positions go straight from the animator into the host handle every frame.
//! Published headings are folded into the symbol's `direction` option on a
//! separate render frame, so an icon swap may trail the position by one
//! frame and several headings published before that frame collapse into the
//! latest one.

use std::cell::{Cell, Ref, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use super::orbit::{AnimatorState, OrbitAnimator, OrbitConfig, OrbitStats};
use super::scheduler::{FrameRequestId, FrameScheduler};
use crate::error::{SymbolError, SymbolResult};
use crate::marker::{MarkerConfig, MarkerHost, MilSymbolMarker, MilSymbolProps, UpdateOutcome};
use crate::symbol::{Renderer, DIRECTION};

struct OrbitingInner {
    marker: RefCell<MilSymbolMarker>,
    scheduler: Rc<dyn FrameScheduler>,
    pending_heading: Cell<Option<f64>>,
    render_request: Cell<Option<FrameRequestId>>,
    active: Cell<bool>,
    icon_swaps: Cell<u64>,
    last_error: RefCell<Option<SymbolError>>,
    heading_observer: RefCell<Option<Rc<dyn Fn(f64)>>>,
}

impl OrbitingInner {
    fn publish(self: &Rc<Self>, heading: f64) {
        if !self.active.get() {
            return;
        }
        let observer = self.heading_observer.borrow().clone();
        if let Some(observer) = observer {
            observer(heading);
        }
        self.pending_heading.set(Some(heading));
        if self.render_request.get().is_some() {
            return;
        }

        let weak = Rc::downgrade(self);
        let id = self.scheduler.request_frame(Box::new(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.render();
            }
        }));
        self.render_request.set(Some(id));
    }

    fn render(&self) {
        self.render_request.set(None);
        if !self.active.get() {
            return;
        }
        let Some(heading) = self.pending_heading.take() else {
            return;
        };

        match self.marker.borrow_mut().set_option(DIRECTION, heading) {
            Ok(UpdateOutcome::Applied) => {
                self.icon_swaps.set(self.icon_swaps.get() + 1);
                debug!(heading, "Orbiting marker icon updated");
            }
            Ok(_) => {}
            Err(e) => {
                warn!(heading, error = %e, "Orbiting marker icon update failed");
                *self.last_error.borrow_mut() = Some(e);
            }
        }
    }
}

/// A [`MilSymbolMarker`] driven around an orbit.
///
/// Dropping it stops the animation and removes the marker.
pub struct OrbitingMarker {
    inner: Rc<OrbitingInner>,
    animator: OrbitAnimator,
}

impl std::fmt::Debug for OrbitingMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrbitingMarker")
            .field("animator", &self.animator)
            .field("active", &self.inner.active.get())
            .field("icon_swaps", &self.inner.icon_swaps.get())
            .finish_non_exhaustive()
    }
}

impl OrbitingMarker {
    /// Mount the marker at the orbit's start point and start animating.
    ///
    /// `props.position` is replaced by the start point and the `direction`
    /// option by the starting heading.
    pub fn launch(
        host: Rc<dyn MarkerHost>,
        renderer: Rc<dyn Renderer>,
        scheduler: Rc<dyn FrameScheduler>,
        props: MilSymbolProps,
        orbit: OrbitConfig,
        config: MarkerConfig,
    ) -> SymbolResult<Self> {
        let mut props = props;
        props.position = orbit.position_at(orbit.start_angle);
        props
            .options
            .insert(DIRECTION, orbit.heading_at(orbit.start_angle));

        let marker = MilSymbolMarker::mount_with(host, renderer, props, config)?;
        let handle = marker.handle();

        let inner = Rc::new(OrbitingInner {
            marker: RefCell::new(marker),
            scheduler: Rc::clone(&scheduler),
            pending_heading: Cell::new(None),
            render_request: Cell::new(None),
            active: Cell::new(true),
            icon_swaps: Cell::new(0),
            last_error: RefCell::new(None),
            heading_observer: RefCell::new(None),
        });

        let animator = OrbitAnimator::new(orbit, scheduler);
        if let Some(handle) = handle {
            animator.attach(handle);
        }
        let weak: Weak<OrbitingInner> = Rc::downgrade(&inner);
        animator.on_heading(move |heading| {
            if let Some(inner) = weak.upgrade() {
                inner.publish(heading);
            }
        });
        animator.start();

        Ok(Self { inner, animator })
    }

    /// Stop animating and remove the marker.
    ///
    /// The animator is cancelled before the marker goes away, so no frame
    /// can write to a removed handle. Returns `false` if already stopped.
    pub fn stop(&self) -> bool {
        if !self.inner.active.replace(false) {
            return false;
        }
        self.animator.cancel();
        if let Some(id) = self.inner.render_request.take() {
            self.inner.scheduler.cancel_frame(id);
        }
        self.inner.marker.borrow_mut().unmount();
        true
    }

    /// Called with each heading the animator publishes, before the icon
    /// catches up with it.
    pub fn on_heading(&self, observer: impl Fn(f64) + 'static) {
        *self.inner.heading_observer.borrow_mut() = Some(Rc::new(observer));
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.get()
    }

    pub fn state(&self) -> AnimatorState {
        self.animator.state()
    }

    pub fn stats(&self) -> OrbitStats {
        self.animator.stats()
    }

    pub fn animator(&self) -> &OrbitAnimator {
        &self.animator
    }

    /// Icon swaps applied for published headings.
    pub fn icon_swaps(&self) -> u64 {
        self.inner.icon_swaps.get()
    }

    /// Most recent icon update failure.
    pub fn last_error(&self) -> Option<SymbolError> {
        self.inner.last_error.borrow().clone()
    }

    pub fn marker(&self) -> Ref<'_, MilSymbolMarker> {
        self.inner.marker.borrow()
    }
}

impl Drop for OrbitingMarker {
    fn drop(&mut self) {
        self.stop();
    }
}
