//! milmarker - Military symbol markers for web maps
//!
//! This library renders military symbols (MIL-STD-2525 / APP-6 symbol
//! identification codes) as map marker icons and keeps live markers in sync
//! with them:
//!
//! - [`symbol`] memoizes rendered glyphs per `(code, options)` key
//! - [`icon`] turns glyphs into host icon descriptors
//! - [`marker`] binds descriptors to host markers without remounting
//! - [`animate`] flies markers around an orbit on a frame scheduler
//! - [`render`] provides the bundled frame renderer
//! - [`config`] loads user settings
//!
//! Everything runs on one thread; shared state uses `Rc` and `RefCell`.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use milmarker::marker::{MilSymbolMarker, MilSymbolProps, RecordingHost};
//! use milmarker::render::FrameRenderer;
//!
//! let host = Rc::new(RecordingHost::new());
//! let props = MilSymbolProps::new([51.505, -0.09], "SFGPEWRH--MT").with_size(35.0);
//! let marker = MilSymbolMarker::mount(host.clone(), Rc::new(FrameRenderer::new()), props).unwrap();
//!
//! assert!(marker.icon().markup.to_markup().contains("<svg"));
//! assert_eq!(host.created_count(), 1);
//! ```

pub mod animate;
pub mod config;
pub mod error;
pub mod geo;
pub mod icon;
pub mod marker;
pub mod render;
pub mod symbol;

pub use error::{SymbolError, SymbolResult};
pub use geo::LatLng;
