//! Reference frame renderer.
//!
//! Draws the affiliation frame of a symbol (rectangle, diamond, square or
//! quatrefoil), an optional direction-of-movement arrow and the text fields
//! around it. Interior icons are not drawn.
//!
//! Geometry is laid out in a 200x200 unit space centred on (100, 100), where
//! `size` pixels correspond to 100 units. The pixel size of a glyph is its
//! bounding box scaled to pixels and rounded up, and the anchor is the frame
//! centre in the same pixel space.

use std::rc::Rc;

use tracing::trace;

use super::node::RenderNode;
use super::sidc::{classify, Affiliation, SidcInfo};
use crate::error::{SymbolError, SymbolResult};
use crate::symbol::{
    Anchor, Glyph, GlyphSize, OptionValue, Renderer, SymbolCode, SymbolOptions, DEFAULT_SYMBOL_SIZE,
    DIRECTION, SIZE,
};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Frame centre in unit space.
const CENTER: f64 = 100.0;

/// Units per `size` pixel step.
const UNITS_PER_SIZE: f64 = 100.0;

const DEFAULT_STROKE_WIDTH: f64 = 4.0;
const DEFAULT_INFO_SIZE: f64 = 40.0;
const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Length of the direction arrow measured from the frame centre.
const ARROW_LENGTH: f64 = 95.0;
const ARROW_HEAD_LENGTH: f64 = 12.0;
const ARROW_HEAD_HALF_WIDTH: f64 = 6.0;

/// Gap between the frame and the text fields.
const TEXT_GAP: f64 = 10.0;

/// Rough advance width of a glyph relative to the font size.
const CHAR_WIDTH_RATIO: f64 = 0.6;

const PLANNED_DASH: &str = "8,8";

/// Fields printed to the right of the frame, top to bottom.
const RIGHT_FIELDS: &[&str] = &[
    "uniqueDesignation",
    "higherFormation",
    "additionalInformation",
    "staffComments",
];

/// Fields printed to the left of the frame, top to bottom.
const LEFT_FIELDS: &[&str] = &["dtg", "altitudeDepth", "location", "speed"];

/// Field printed centred above the frame.
const TOP_FIELD: &str = "quantity";

/// Axis-aligned box in unit space.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Bounds {
    fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    fn include_point(&mut self, x: f64, y: f64) {
        self.x0 = self.x0.min(x);
        self.y0 = self.y0.min(y);
        self.x1 = self.x1.max(x);
        self.y1 = self.y1.max(y);
    }

    fn include(&mut self, other: Bounds) {
        self.include_point(other.x0, other.y0);
        self.include_point(other.x1, other.y1);
    }

    fn inflate(&self, by: f64) -> Self {
        Self::new(self.x0 - by, self.y0 - by, self.x1 + by, self.y1 + by)
    }
}

/// Colour scheme for frame fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorMode {
    Light,
    Medium,
    Dark,
}

impl ColorMode {
    fn parse(value: &OptionValue) -> SymbolResult<Self> {
        match value.as_str() {
            Some("Light") => Ok(ColorMode::Light),
            Some("Medium") => Ok(ColorMode::Medium),
            Some("Dark") => Ok(ColorMode::Dark),
            _ => Err(SymbolError::invalid_option(
                "colorMode",
                format!("expected Light, Medium or Dark, got '{}'", value),
            )),
        }
    }

    fn fill(&self, affiliation: Affiliation) -> &'static str {
        match (self, affiliation) {
            (ColorMode::Light, Affiliation::Friend) => "rgb(128,224,255)",
            (ColorMode::Light, Affiliation::Hostile) => "rgb(255,128,128)",
            (ColorMode::Light, Affiliation::Neutral) => "rgb(170,255,170)",
            (ColorMode::Light, Affiliation::Unknown) => "rgb(255,255,128)",
            (ColorMode::Medium, Affiliation::Friend) => "rgb(0,168,220)",
            (ColorMode::Medium, Affiliation::Hostile) => "rgb(255,48,49)",
            (ColorMode::Medium, Affiliation::Neutral) => "rgb(0,226,110)",
            (ColorMode::Medium, Affiliation::Unknown) => "rgb(255,255,0)",
            (ColorMode::Dark, Affiliation::Friend) => "rgb(0,107,140)",
            (ColorMode::Dark, Affiliation::Hostile) => "rgb(200,0,0)",
            (ColorMode::Dark, Affiliation::Neutral) => "rgb(0,160,0)",
            (ColorMode::Dark, Affiliation::Unknown) => "rgb(225,220,0)",
        }
    }
}

/// Resolved drawing parameters.
#[derive(Debug, Clone)]
struct Style {
    size: f64,
    fill: bool,
    fill_color: String,
    fill_opacity: f64,
    frame: bool,
    stroke: String,
    stroke_width: f64,
    padding: f64,
    direction: Option<f64>,
    info_fields: bool,
    info_size: f64,
    info_color: String,
    font_family: String,
}

impl Style {
    fn resolve(info: &SidcInfo, options: &SymbolOptions) -> SymbolResult<Self> {
        let size = number(options, SIZE)?.unwrap_or(DEFAULT_SYMBOL_SIZE);
        if size <= 0.0 {
            return Err(SymbolError::invalid_option(SIZE, "must be positive"));
        }

        let stroke_width = number(options, "strokeWidth")?.unwrap_or(DEFAULT_STROKE_WIDTH);
        if stroke_width < 0.0 {
            return Err(SymbolError::invalid_option("strokeWidth", "must not be negative"));
        }

        let padding = number(options, "padding")?.unwrap_or(0.0).max(0.0);

        let fill_opacity = number(options, "fillOpacity")?.unwrap_or(1.0);
        if !(0.0..=1.0).contains(&fill_opacity) {
            return Err(SymbolError::invalid_option(
                "fillOpacity",
                "must be between 0 and 1",
            ));
        }

        let direction = number(options, DIRECTION)?;

        let color_mode = match options.get("colorMode") {
            Some(value) => ColorMode::parse(value)?,
            None => ColorMode::Light,
        };

        let mono = text(options, "monoColor").filter(|c| !c.is_empty());
        let fill_color = text(options, "fillColor")
            .unwrap_or_else(|| color_mode.fill(info.affiliation).to_string());
        let stroke = mono
            .clone()
            .or_else(|| text(options, "frameColor"))
            .unwrap_or_else(|| "black".to_string());

        let info_size = number(options, "infoSize")?.unwrap_or(DEFAULT_INFO_SIZE);
        if info_size <= 0.0 {
            return Err(SymbolError::invalid_option("infoSize", "must be positive"));
        }

        Ok(Self {
            size,
            fill: mono.is_none() && flag(options, "fill").unwrap_or(true),
            fill_color,
            fill_opacity,
            frame: flag(options, "frame").unwrap_or(true),
            stroke,
            stroke_width,
            padding,
            direction,
            info_fields: flag(options, "infoFields").unwrap_or(true),
            info_size,
            info_color: text(options, "infoColor").unwrap_or_else(|| "black".to_string()),
            font_family: text(options, "fontfamily")
                .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string()),
        })
    }

    fn scale(&self) -> f64 {
        self.size / UNITS_PER_SIZE
    }
}

/// Read a finite numeric option. Present but non-numeric values are errors.
fn number(options: &SymbolOptions, name: &str) -> SymbolResult<Option<f64>> {
    match options.get(name) {
        None => Ok(None),
        Some(value) => match value.as_f64() {
            Some(n) if n.is_finite() => Ok(Some(n)),
            _ => Err(SymbolError::invalid_option(
                name,
                format!("expected a finite number, got '{}'", value),
            )),
        },
    }
}

fn flag(options: &SymbolOptions, name: &str) -> Option<bool> {
    options.get(name).and_then(OptionValue::as_bool)
}

fn text(options: &SymbolOptions, name: &str) -> Option<String> {
    options.get(name).map(|v| v.to_string())
}

/// Format a coordinate with at most two decimals.
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        // Avoid "-0".
        return "0".to_string();
    }
    let s = format!("{:.2}", rounded);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn frame_outline(affiliation: Affiliation) -> (&'static str, Bounds) {
    match affiliation {
        Affiliation::Friend => (
            "M25,50 L175,50 L175,150 L25,150 Z",
            Bounds::new(25.0, 50.0, 175.0, 150.0),
        ),
        Affiliation::Hostile => (
            "M100,28 L172,100 L100,172 L28,100 Z",
            Bounds::new(28.0, 28.0, 172.0, 172.0),
        ),
        Affiliation::Neutral => (
            "M45,45 L155,45 L155,155 L45,155 Z",
            Bounds::new(45.0, 45.0, 155.0, 155.0),
        ),
        Affiliation::Unknown => (
            "M63,63 C63,20 137,20 137,63 C180,63 180,137 137,137 \
             C137,180 63,180 63,137 C20,137 20,63 63,63 Z",
            Bounds::new(30.0, 30.0, 170.0, 170.0),
        ),
    }
}

/// A rendered frame symbol.
#[derive(Debug, Clone)]
pub struct FrameGlyph {
    node: RenderNode,
    markup: String,
    size: GlyphSize,
    anchor: Anchor,
    affiliation: Affiliation,
}

impl FrameGlyph {
    /// Frame family the glyph was drawn with.
    pub fn affiliation(&self) -> Affiliation {
        self.affiliation
    }

    fn layout(info: SidcInfo, options: &SymbolOptions, style: &Style) -> Self {
        let (outline, frame_bounds) = frame_outline(info.affiliation);
        let mut bounds = frame_bounds.inflate(style.stroke_width / 2.0);
        let mut group = RenderNode::element("g");

        if style.frame {
            let mut path = RenderNode::element("path")
                .attr("d", outline)
                .attr("fill", if style.fill { style.fill_color.as_str() } else { "none" });
            if style.fill && style.fill_opacity < 1.0 {
                path = path.attr("fill-opacity", num(style.fill_opacity));
            }
            path = path
                .attr("stroke", &style.stroke)
                .attr("stroke-width", num(style.stroke_width));
            if info.planned {
                path = path.attr("stroke-dasharray", PLANNED_DASH);
            }
            group.push(path);
        }

        if let Some(direction) = style.direction {
            let (arrow, arrow_bounds) = direction_arrow(direction, style);
            bounds.include(arrow_bounds.inflate(style.stroke_width / 2.0));
            group.push(arrow);
        }

        if style.info_fields {
            for (node, text_bounds) in text_fields(frame_bounds, options, style) {
                bounds.include(text_bounds);
                group.push(node);
            }
        }

        let bounds = bounds.inflate(style.padding);
        let scale = style.scale();
        let width = ((bounds.x1 - bounds.x0) * scale).ceil().max(1.0);
        let height = ((bounds.y1 - bounds.y0) * scale).ceil().max(1.0);

        // View box matches the rounded pixel size so the scale is exact.
        let node = RenderNode::element("svg")
            .attr("xmlns", SVG_NAMESPACE)
            .attr("version", "1.2")
            .attr("baseProfile", "tiny")
            .attr("width", num(width))
            .attr("height", num(height))
            .attr(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    num(bounds.x0),
                    num(bounds.y0),
                    num(width / scale),
                    num(height / scale)
                ),
            )
            .child(group);

        let markup = node.to_markup();

        Self {
            node,
            markup,
            size: GlyphSize { width, height },
            anchor: Anchor {
                x: (CENTER - bounds.x0) * scale,
                y: (CENTER - bounds.y0) * scale,
            },
            affiliation: info.affiliation,
        }
    }
}

impl Glyph for FrameGlyph {
    fn to_markup(&self) -> String {
        self.markup.clone()
    }

    fn to_node(&self) -> RenderNode {
        self.node.clone()
    }

    fn size(&self) -> GlyphSize {
        self.size
    }

    fn anchor(&self) -> Anchor {
        self.anchor
    }
}

/// Arrow from the frame centre towards `direction` (degrees clockwise from
/// north).
fn direction_arrow(direction: f64, style: &Style) -> (RenderNode, Bounds) {
    let radians = direction.to_radians();
    let (ux, uy) = (radians.sin(), -radians.cos());
    let (px, py) = (-uy, ux);

    let tip = (CENTER + ARROW_LENGTH * ux, CENTER + ARROW_LENGTH * uy);
    let base = (tip.0 - ARROW_HEAD_LENGTH * ux, tip.1 - ARROW_HEAD_LENGTH * uy);
    let left = (
        base.0 + ARROW_HEAD_HALF_WIDTH * px,
        base.1 + ARROW_HEAD_HALF_WIDTH * py,
    );
    let right = (
        base.0 - ARROW_HEAD_HALF_WIDTH * px,
        base.1 - ARROW_HEAD_HALF_WIDTH * py,
    );

    let d = format!(
        "M{},{} L{},{} M{},{} L{},{} L{},{} Z",
        num(CENTER),
        num(CENTER),
        num(base.0),
        num(base.1),
        num(tip.0),
        num(tip.1),
        num(left.0),
        num(left.1),
        num(right.0),
        num(right.1),
    );

    let mut bounds = Bounds::new(CENTER, CENTER, CENTER, CENTER);
    for (x, y) in [tip, left, right] {
        bounds.include_point(x, y);
    }

    let node = RenderNode::element("path")
        .attr("d", d)
        .attr("fill", &style.stroke)
        .attr("stroke", &style.stroke)
        .attr("stroke-width", num(style.stroke_width));

    (node, bounds)
}

fn text_node(value: &str, x: f64, y: f64, anchor: &str, style: &Style) -> RenderNode {
    RenderNode::element("text")
        .attr("x", num(x))
        .attr("y", num(y))
        .attr("text-anchor", anchor)
        .attr("font-family", &style.font_family)
        .attr("font-size", num(style.info_size))
        .attr("fill", &style.info_color)
        .child(RenderNode::text(value))
}

fn text_width(value: &str, style: &Style) -> f64 {
    value.chars().count() as f64 * style.info_size * CHAR_WIDTH_RATIO
}

fn field(options: &SymbolOptions, name: &str) -> Option<String> {
    text(options, name).filter(|v| !v.is_empty())
}

fn text_fields(frame: Bounds, options: &SymbolOptions, style: &Style) -> Vec<(RenderNode, Bounds)> {
    let mut out = Vec::new();
    let fs = style.info_size;

    let right: Vec<String> = RIGHT_FIELDS.iter().filter_map(|n| field(options, n)).collect();
    let left: Vec<String> = LEFT_FIELDS.iter().filter_map(|n| field(options, n)).collect();

    for (lines, x, anchor) in [
        (&right, frame.x1 + TEXT_GAP, "start"),
        (&left, frame.x0 - TEXT_GAP, "end"),
    ] {
        let top = CENTER - lines.len() as f64 * fs / 2.0;
        for (i, line) in lines.iter().enumerate() {
            let baseline = top + fs * (i as f64 + 0.8);
            let width = text_width(line, style);
            let (bx0, bx1) = if anchor == "start" {
                (x, x + width)
            } else {
                (x - width, x)
            };
            out.push((
                text_node(line, x, baseline, anchor, style),
                Bounds::new(bx0, top + fs * i as f64, bx1, top + fs * (i as f64 + 1.0)),
            ));
        }
    }

    if let Some(quantity) = field(options, TOP_FIELD) {
        let baseline = frame.y0 - TEXT_GAP;
        let width = text_width(&quantity, style);
        out.push((
            text_node(&quantity, CENTER, baseline, "middle", style),
            Bounds::new(CENTER - width / 2.0, baseline - fs, CENTER + width / 2.0, baseline),
        ));
    }

    out
}

/// Renders affiliation frames for letter and numeric SIDCs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameRenderer;

impl FrameRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render without erasing the concrete glyph type.
    pub fn render_frame(&self, code: &SymbolCode, options: &SymbolOptions) -> SymbolResult<FrameGlyph> {
        let info = classify(code)?;
        let style = Style::resolve(&info, options)?;
        let glyph = FrameGlyph::layout(info, options, &style);
        trace!(
            code = %code,
            affiliation = info.affiliation.as_str(),
            width = glyph.size.width,
            height = glyph.size.height,
            "Laid out frame glyph"
        );
        Ok(glyph)
    }
}

impl Renderer for FrameRenderer {
    fn render(&self, code: &SymbolCode, options: &SymbolOptions) -> SymbolResult<Rc<dyn Glyph>> {
        Ok(Rc::new(self.render_frame(code, options)?))
    }
}
