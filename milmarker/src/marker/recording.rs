//! In-memory marker host that records every call.
//!
//! Used by the test suite and by the CLI orbit simulation in place of a map.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

use super::handle::{EventHandlers, MarkerEvent, MarkerHandle, MarkerHost, MarkerSpec};
use crate::geo::LatLng;
use crate::icon::IconDescriptor;

/// A call made against the host or one of its handles.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Create { id: usize, position: LatLng },
    SetIcon { id: usize },
    SetLatLng { id: usize, position: LatLng },
    Remove { id: usize },
}

type CallLog = Rc<RefCell<Vec<HostCall>>>;

/// A recorded marker.
#[derive(Debug)]
pub struct RecordingHandle {
    id: usize,
    log: CallLog,
    initial_position: Rc<LatLng>,
    position: Cell<LatLng>,
    icon: RefCell<Rc<IconDescriptor>>,
    event_handlers: EventHandlers,
    tooltip: Option<String>,
    popup: Option<String>,
}

impl RecordingHandle {
    pub fn id(&self) -> usize {
        self.id
    }

    /// Current icon.
    pub fn icon(&self) -> Rc<IconDescriptor> {
        Rc::clone(&self.icon.borrow())
    }

    /// Current position.
    pub fn position(&self) -> LatLng {
        self.position.get()
    }

    /// The position `Rc` handed over at creation.
    pub fn initial_position(&self) -> Rc<LatLng> {
        Rc::clone(&self.initial_position)
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn popup(&self) -> Option<&str> {
        self.popup.as_deref()
    }

    pub fn event_handlers(&self) -> &EventHandlers {
        &self.event_handlers
    }

    /// Simulate a user interaction. Returns whether a handler ran.
    pub fn fire(&self, kind: &str) -> bool {
        self.event_handlers
            .dispatch(&MarkerEvent::new(kind, self.position.get()))
    }
}

impl MarkerHandle for RecordingHandle {
    fn set_icon(&self, icon: Rc<IconDescriptor>) {
        trace!(id = self.id, "set_icon");
        *self.icon.borrow_mut() = icon;
        self.log.borrow_mut().push(HostCall::SetIcon { id: self.id });
    }

    fn set_lat_lng(&self, position: LatLng) {
        trace!(id = self.id, position = %position, "set_lat_lng");
        self.position.set(position);
        self.log
            .borrow_mut()
            .push(HostCall::SetLatLng { id: self.id, position });
    }
}

/// Host that keeps its markers in memory.
#[derive(Debug, Default)]
pub struct RecordingHost {
    log: CallLog,
    markers: RefCell<Vec<Rc<RecordingHandle>>>,
    next_id: Cell<usize>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls so far, oldest first.
    pub fn calls(&self) -> Vec<HostCall> {
        self.log.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.log.borrow_mut().clear();
    }

    fn count(&self, pred: impl Fn(&HostCall) -> bool) -> usize {
        self.log.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn created_count(&self) -> usize {
        self.count(|c| matches!(c, HostCall::Create { .. }))
    }

    pub fn set_icon_count(&self) -> usize {
        self.count(|c| matches!(c, HostCall::SetIcon { .. }))
    }

    pub fn set_lat_lng_count(&self) -> usize {
        self.count(|c| matches!(c, HostCall::SetLatLng { .. }))
    }

    pub fn removed_count(&self) -> usize {
        self.count(|c| matches!(c, HostCall::Remove { .. }))
    }

    /// Markers currently on the map.
    pub fn markers(&self) -> Vec<Rc<RecordingHandle>> {
        self.markers.borrow().clone()
    }

    /// A live marker by id.
    pub fn marker(&self, id: usize) -> Option<Rc<RecordingHandle>> {
        self.markers.borrow().iter().find(|m| m.id == id).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.markers.borrow().len()
    }

    /// Drop every handle without logging removals, as a host tearing down
    /// its map would.
    pub fn forget_all(&self) {
        self.markers.borrow_mut().clear();
    }
}

impl MarkerHost for RecordingHost {
    fn create_marker(&self, spec: MarkerSpec) -> Rc<dyn MarkerHandle> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let position = *spec.position;
        let handle = Rc::new(RecordingHandle {
            id,
            log: Rc::clone(&self.log),
            initial_position: spec.position,
            position: Cell::new(position),
            icon: RefCell::new(spec.icon),
            event_handlers: spec.event_handlers,
            tooltip: spec.tooltip,
            popup: spec.popup,
        });

        self.markers.borrow_mut().push(Rc::clone(&handle));
        self.log
            .borrow_mut()
            .push(HostCall::Create { id, position });
        trace!(id, position = %position, "create_marker");

        handle
    }

    fn remove_marker(&self, handle: &Rc<dyn MarkerHandle>) {
        let target = Rc::as_ptr(handle) as *const ();
        let mut markers = self.markers.borrow_mut();
        let Some(index) = markers
            .iter()
            .position(|m| Rc::as_ptr(m) as *const () == target)
        else {
            return;
        };

        let removed = markers.remove(index);
        self.log
            .borrow_mut()
            .push(HostCall::Remove { id: removed.id });
        trace!(id = removed.id, "remove_marker");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::IconMarkup;

    fn spec(lat: f64) -> MarkerSpec {
        MarkerSpec {
            position: Rc::new(LatLng::new(lat, 0.0)),
            icon: Rc::new(IconDescriptor {
                markup: IconMarkup::Svg("<svg/>".into()),
                size: [1.0, 1.0],
                anchor: [0.5, 0.5],
                class_name: String::new(),
            }),
            event_handlers: EventHandlers::default(),
            tooltip: None,
            popup: Some("HQ".into()),
        }
    }

    #[test]
    fn test_records_create_and_remove() {
        let host = RecordingHost::new();
        let a = host.create_marker(spec(1.0));
        let _b = host.create_marker(spec(2.0));
        assert_eq!(host.live_count(), 2);
        assert_eq!(host.marker(1).unwrap().popup(), Some("HQ"));

        host.remove_marker(&a);
        host.remove_marker(&a);

        assert_eq!(host.live_count(), 1);
        assert_eq!(host.removed_count(), 1);
        assert_eq!(
            host.calls(),
            vec![
                HostCall::Create { id: 0, position: LatLng::new(1.0, 0.0) },
                HostCall::Create { id: 1, position: LatLng::new(2.0, 0.0) },
                HostCall::Remove { id: 0 },
            ]
        );
    }

    #[test]
    fn test_handle_writes_are_logged() {
        let host = RecordingHost::new();
        let handle = host.create_marker(spec(0.0));
        handle.set_lat_lng(LatLng::new(3.0, 4.0));
        handle.set_icon(spec(0.0).icon);

        assert_eq!(host.set_lat_lng_count(), 1);
        assert_eq!(host.set_icon_count(), 1);
        assert_eq!(host.marker(0).unwrap().position(), LatLng::new(3.0, 4.0));
    }
}
