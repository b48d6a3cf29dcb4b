//! Icon descriptors and how they are built from glyphs.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::render::RenderNode;
use crate::symbol::Glyph;

/// How a descriptor carries the glyph's markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkupStrategy {
    /// Serialized `<svg>` text.
    #[default]
    Svg,
    /// Detached render tree.
    Node,
}

impl MarkupStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkupStrategy::Svg => "svg",
            MarkupStrategy::Node => "node",
        }
    }
}

impl std::fmt::Display for MarkupStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkupStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(MarkupStrategy::Svg),
            "node" => Ok(MarkupStrategy::Node),
            other => Err(format!(
                "unknown markup strategy '{}', expected svg or node",
                other
            )),
        }
    }
}

/// Markup payload of a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconMarkup {
    Svg(String),
    Node(RenderNode),
}

impl IconMarkup {
    /// Markup as text, serializing a node if needed.
    pub fn to_markup(&self) -> String {
        match self {
            IconMarkup::Svg(svg) => svg.clone(),
            IconMarkup::Node(node) => node.to_markup(),
        }
    }

    pub fn strategy(&self) -> MarkupStrategy {
        match self {
            IconMarkup::Svg(_) => MarkupStrategy::Svg,
            IconMarkup::Node(_) => MarkupStrategy::Node,
        }
    }
}

/// Host-consumable icon: markup plus pixel size and anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconDescriptor {
    pub markup: IconMarkup,
    /// `[width, height]` in pixels.
    pub size: [f64; 2],
    /// `[x, y]` offset of the marker position from the top-left corner.
    pub anchor: [f64; 2],
    /// CSS class applied by DOM hosts; empty by default.
    pub class_name: String,
}

/// Settings for building descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconConfig {
    pub markup: MarkupStrategy,
    pub class_name: String,
}

/// Turns glyphs into descriptors.
#[derive(Debug, Clone, Default)]
pub struct IconBuilder {
    config: IconConfig,
}

impl IconBuilder {
    pub fn new(config: IconConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IconConfig {
        &self.config
    }

    /// Build a descriptor for `glyph`.
    ///
    /// Markup is produced first; size and anchor are read afterwards since
    /// a glyph may settle its layout while generating markup.
    pub fn build(&self, glyph: &dyn Glyph) -> IconDescriptor {
        let markup = match self.config.markup {
            MarkupStrategy::Svg => IconMarkup::Svg(glyph.to_markup()),
            MarkupStrategy::Node => IconMarkup::Node(glyph.to_node()),
        };
        let size = glyph.size();
        let anchor = glyph.anchor();

        IconDescriptor {
            markup,
            size: [size.width, size.height],
            anchor: [anchor.x, anchor.y],
            class_name: self.config.class_name.clone(),
        }
    }
}
