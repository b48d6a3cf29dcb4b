//! Renderer collaborator interface.
//!
//! The marker pipeline never draws symbols itself. A [`Renderer`] turns a
//! `(code, options)` pair into a [`Glyph`]: an immutable object that can emit
//! markup and report its pixel size and anchor point.

use std::rc::Rc;

use serde::Serialize;

use super::code::SymbolCode;
use super::options::SymbolOptions;
use crate::error::SymbolResult;
use crate::render::RenderNode;

/// Pixel size of a rendered glyph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlyphSize {
    pub width: f64,
    pub height: f64,
}

/// Offset in pixels from the glyph's top-left corner to the point that sits
/// on the marker's geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

/// A rendered symbol instance.
///
/// Implementations may compute layout lazily while producing markup, so
/// callers read [`size`](Glyph::size) and [`anchor`](Glyph::anchor) after
/// [`to_markup`](Glyph::to_markup) or [`to_node`](Glyph::to_node).
pub trait Glyph: std::fmt::Debug {
    /// Serialized vector markup (an `<svg>` document).
    fn to_markup(&self) -> String;

    /// Detached render tree equivalent to the markup.
    fn to_node(&self) -> RenderNode;

    /// Pixel size.
    fn size(&self) -> GlyphSize;

    /// Anchor offset in pixels.
    fn anchor(&self) -> Anchor;
}

/// Produces glyphs for symbol codes.
///
/// Rendering is synchronous. A malformed code fails with
/// [`SymbolError::InvalidSymbolCode`](crate::SymbolError::InvalidSymbolCode).
pub trait Renderer {
    /// Render a glyph for the code with fully resolved options.
    fn render(&self, code: &SymbolCode, options: &SymbolOptions) -> SymbolResult<Rc<dyn Glyph>>;
}

impl<F> Renderer for F
where
    F: Fn(&SymbolCode, &SymbolOptions) -> SymbolResult<Rc<dyn Glyph>>,
{
    fn render(&self, code: &SymbolCode, options: &SymbolOptions) -> SymbolResult<Rc<dyn Glyph>> {
        self(code, options)
    }
}
