//! Marker lifecycle binding.
//!
//! A [`MarkerBinding`] owns what a marker should look like (position, icon,
//! tooltip, popup, event handlers) and a non-owning reference to the live
//! handle once mounted. Icon changes go through the existing handle; the
//! marker is never recreated to change its icon.

use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use super::handle::{EventHandlers, MarkerHandle, MarkerHost, MarkerSpec};
use crate::geo::LatLng;
use crate::icon::IconDescriptor;

/// Result of pushing an update towards the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The live handle was written.
    Applied,
    /// The host already shows this value.
    Unchanged,
    /// No live handle; the value is kept for the next mount.
    Detached,
}

/// Binds icon and position state to one host marker.
///
/// Hosts keep the handles they create alive until `remove_marker`; a handle
/// the host dropped early reads as detached.
#[derive(Debug)]
pub struct MarkerBinding {
    position: Rc<LatLng>,
    icon: Rc<IconDescriptor>,
    /// Last icon delivered to the live handle.
    pushed: Option<Rc<IconDescriptor>>,
    handle: Option<Weak<dyn MarkerHandle>>,
    event_handlers: EventHandlers,
    tooltip: Option<String>,
    popup: Option<String>,
}

impl MarkerBinding {
    pub fn new(position: LatLng, icon: Rc<IconDescriptor>) -> Self {
        Self {
            position: Rc::new(position),
            icon,
            pushed: None,
            handle: None,
            event_handlers: EventHandlers::default(),
            tooltip: None,
            popup: None,
        }
    }

    pub fn with_event_handlers(mut self, handlers: EventHandlers) -> Self {
        self.event_handlers = handlers;
        self
    }

    pub fn with_tooltip(mut self, tooltip: Option<String>) -> Self {
        self.tooltip = tooltip;
        self
    }

    pub fn with_popup(mut self, popup: Option<String>) -> Self {
        self.popup = popup;
        self
    }

    /// Handlers for the next mount.
    pub fn set_event_handlers(&mut self, handlers: EventHandlers) {
        self.event_handlers = handlers;
    }

    pub fn set_tooltip(&mut self, tooltip: Option<String>) {
        self.tooltip = tooltip;
    }

    pub fn set_popup(&mut self, popup: Option<String>) {
        self.popup = popup;
    }

    /// Create the host marker with the current icon and position.
    ///
    /// Returns `false` if already mounted.
    pub fn mount(&mut self, host: &dyn MarkerHost) -> bool {
        if self.is_mounted() {
            return false;
        }

        let spec = MarkerSpec {
            position: Rc::clone(&self.position),
            icon: Rc::clone(&self.icon),
            event_handlers: self.event_handlers.clone(),
            tooltip: self.tooltip.clone(),
            popup: self.popup.clone(),
        };
        let handle = host.create_marker(spec);
        self.handle = Some(Rc::downgrade(&handle));
        self.pushed = Some(Rc::clone(&self.icon));

        debug!(position = %self.position, "Mounted marker");
        true
    }

    /// Remove the host marker. Returns `false` if nothing was mounted.
    pub fn unmount(&mut self, host: &dyn MarkerHost) -> bool {
        self.pushed = None;
        let Some(handle) = self.handle.take().and_then(|weak| weak.upgrade()) else {
            return false;
        };
        host.remove_marker(&handle);
        debug!(position = %self.position, "Unmounted marker");
        true
    }

    /// The live handle, if the host still holds it.
    pub fn live_handle(&self) -> Option<Rc<dyn MarkerHandle>> {
        self.handle.as_ref().and_then(Weak::upgrade)
    }

    /// Non-owning handle for collaborators that write the marker directly.
    pub fn handle(&self) -> Option<Weak<dyn MarkerHandle>> {
        self.handle.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.live_handle().is_some()
    }

    /// Show `icon`, writing the handle only if it differs from what the
    /// host already has.
    pub fn update_icon(&mut self, icon: Rc<IconDescriptor>) -> UpdateOutcome {
        self.icon = icon;

        let Some(handle) = self.live_handle() else {
            trace!("Icon update dropped, marker not mounted");
            return UpdateOutcome::Detached;
        };

        if let Some(pushed) = &self.pushed {
            if Rc::ptr_eq(pushed, &self.icon) {
                return UpdateOutcome::Unchanged;
            }
        }

        handle.set_icon(Rc::clone(&self.icon));
        self.pushed = Some(Rc::clone(&self.icon));
        trace!("Applied icon update");
        UpdateOutcome::Applied
    }

    /// Move the marker. An equal position keeps the existing `Rc`.
    pub fn move_to(&mut self, position: LatLng) -> UpdateOutcome {
        if *self.position == position {
            return UpdateOutcome::Unchanged;
        }
        self.position = Rc::new(position);

        match self.live_handle() {
            Some(handle) => {
                handle.set_lat_lng(position);
                UpdateOutcome::Applied
            }
            None => {
                trace!(position = %position, "Position update dropped, marker not mounted");
                UpdateOutcome::Detached
            }
        }
    }

    pub fn position(&self) -> &Rc<LatLng> {
        &self.position
    }

    /// Icon the marker shows, or will show on its next mount.
    pub fn icon(&self) -> &Rc<IconDescriptor> {
        &self.icon
    }

    pub fn event_handlers(&self) -> &EventHandlers {
        &self.event_handlers
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn popup(&self) -> Option<&str> {
        self.popup.as_deref()
    }
}
