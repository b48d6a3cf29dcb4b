//! Reference symbol renderer.
//!
//! [`FrameRenderer`] is the bundled [`Renderer`](crate::symbol::Renderer):
//! it validates letter and numeric SIDCs and draws affiliation frames with a
//! direction arrow and text fields. Hosts with a full symbology library plug
//! in their own renderer instead.

mod frame;
mod node;
mod sidc;

pub use frame::{FrameGlyph, FrameRenderer};
pub use node::RenderNode;
pub use sidc::{classify, Affiliation, SidcInfo};

/// Sample symbols for demos, as `(code, description)`.
pub const DEMO_SYMBOLS: &[(&str, &str)] = &[
    ("SFGPEWRH--MT", "infantry"),
    ("SFGPUCA---MT", "armor"),
    ("SFGPUCD---MT", "air defense"),
    ("SFGPUCF---MT", "artillery"),
];
