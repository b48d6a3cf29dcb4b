//! Host-side marker capabilities.
//!
//! The map library is abstracted as a [`MarkerHost`] that creates and
//! removes markers, and a [`MarkerHandle`] through which a live marker's icon
//! and position are written. Handles are owned by the host; the marker layer
//! only ever keeps a `Weak` reference.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::geo::LatLng;
use crate::icon::IconDescriptor;

/// A live, host-owned marker.
pub trait MarkerHandle {
    /// Replace the marker's icon.
    fn set_icon(&self, icon: Rc<IconDescriptor>);

    /// Move the marker.
    fn set_lat_lng(&self, position: LatLng);
}

/// Creates and removes markers on a map.
pub trait MarkerHost {
    /// Add a marker and return its handle.
    fn create_marker(&self, spec: MarkerSpec) -> Rc<dyn MarkerHandle>;

    /// Remove a marker previously created by this host.
    fn remove_marker(&self, handle: &Rc<dyn MarkerHandle>);
}

/// A user interaction reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerEvent {
    /// Event name such as `click` or `mouseover`.
    pub kind: String,
    /// Marker position when the event fired.
    pub position: LatLng,
}

impl MarkerEvent {
    pub fn new(kind: impl Into<String>, position: LatLng) -> Self {
        Self {
            kind: kind.into(),
            position,
        }
    }
}

/// Callback for a marker event.
pub type EventHandler = Rc<dyn Fn(&MarkerEvent)>;

/// Event callbacks keyed by event name, in registration order.
#[derive(Clone, Default)]
pub struct EventHandlers {
    handlers: IndexMap<String, EventHandler>,
}

impl std::fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

impl EventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration. A second handler for the same event
    /// replaces the first.
    pub fn on(mut self, kind: impl Into<String>, handler: impl Fn(&MarkerEvent) + 'static) -> Self {
        self.handlers.insert(kind.into(), Rc::new(handler));
        self
    }

    pub fn get(&self, kind: &str) -> Option<&EventHandler> {
        self.handlers.get(kind)
    }

    /// Registered event names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke the handler for `event.kind`; returns whether one ran.
    pub fn dispatch(&self, event: &MarkerEvent) -> bool {
        match self.handlers.get(&event.kind) {
            Some(handler) => {
                handler(event);
                true
            }
            None => false,
        }
    }
}

/// Everything a host needs to create a marker.
#[derive(Debug, Clone)]
pub struct MarkerSpec {
    /// Initial position. The same `Rc` is handed over on every mount.
    pub position: Rc<LatLng>,
    pub icon: Rc<IconDescriptor>,
    pub event_handlers: EventHandlers,
    pub tooltip: Option<String>,
    pub popup: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_dispatch_runs_matching_handler() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let handlers = EventHandlers::new().on("click", move |e: &MarkerEvent| {
            sink.borrow_mut().push(e.kind.clone());
        });

        let position = LatLng::new(51.505, -0.09);
        assert!(handlers.dispatch(&MarkerEvent::new("click", position)));
        assert!(!handlers.dispatch(&MarkerEvent::new("dblclick", position)));
        assert_eq!(*seen.borrow(), vec!["click".to_string()]);
    }

    #[test]
    fn test_later_registration_replaces() {
        let handlers = EventHandlers::new()
            .on("click", |_: &MarkerEvent| {})
            .on("mouseover", |_: &MarkerEvent| {})
            .on("click", |_: &MarkerEvent| {});
        let names: Vec<_> = handlers.names().collect();
        assert_eq!(names, vec!["click", "mouseover"]);
        assert_eq!(handlers.len(), 2);
    }
}
