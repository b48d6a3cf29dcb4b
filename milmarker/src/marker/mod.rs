//! Map markers for military symbols.
//!
//! The host map is reached only through [`MarkerHost`] and [`MarkerHandle`];
//! [`MilSymbolMarker`] is the declarative entry point and
//! [`MarkerBinding`] the lifecycle underneath it.

mod binding;
mod handle;
mod mil_symbol;
mod recording;

pub use binding::{MarkerBinding, UpdateOutcome};
pub use handle::{EventHandler, EventHandlers, MarkerEvent, MarkerHandle, MarkerHost, MarkerSpec};
pub use mil_symbol::{MarkerConfig, MilSymbolMarker, MilSymbolProps};
pub use recording::{HostCall, RecordingHandle, RecordingHost};
