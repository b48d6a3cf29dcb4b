//! Symbol identity and memoized symbol instances.
//!
//! ```text
//! (SymbolCode, SymbolOptions) ──► CacheKey ──► SymbolInstanceProvider ──► Rc<dyn Glyph>
//!                                                    │
//!                                                    └── Renderer (collaborator)
//! ```
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use milmarker::render::FrameRenderer;
//! use milmarker::symbol::{SymbolCode, SymbolInstanceProvider, SymbolOptions};
//!
//! let mut provider = SymbolInstanceProvider::new(Rc::new(FrameRenderer::new()));
//! let code = SymbolCode::from("SFGPEWRH--MT");
//! let options = SymbolOptions::new().with("fill", true);
//!
//! let first = provider.get(&code, &options).unwrap();
//! let again = provider.get(&code, &options).unwrap();
//! assert!(Rc::ptr_eq(&first, &again));
//! ```

mod code;
mod glyph;
mod key;
mod options;
mod provider;

pub use code::{CodeEncoding, SymbolCode};
pub use glyph::{Anchor, Glyph, GlyphSize, Renderer};
pub use key::{CacheKey, KeyStrategy};
pub use options::{OptionValue, SymbolOptions, DEFAULT_SYMBOL_SIZE, DIRECTION, KNOWN_OPTIONS, SIZE};
pub use provider::{ProviderConfig, SymbolInstanceProvider};
