//! Render command - draw a symbol with the bundled renderer.
//!
//! Prints the SVG markup, the render tree, or the full icon descriptor, and
//! optionally rasterizes the markup to a PNG file.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::ValueEnum;
use milmarker::config::ConfigFile;
use milmarker::icon::{IconBuilder, IconConfig, MarkupStrategy};
use milmarker::render::{FrameRenderer, DEMO_SYMBOLS};
use milmarker::symbol::{Glyph, OptionValue, SymbolCode, SymbolInstanceProvider, SymbolOptions};
use resvg::{tiny_skia, usvg};
use tracing::{debug, info};

use crate::error::CliError;

/// Output format for the render command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// SVG document
    #[default]
    Svg,
    /// Render tree as JSON
    Node,
    /// Icon descriptor (markup, size, anchor, class name) as JSON
    Json,
}

/// Arguments for the render command.
pub struct RenderArgs {
    pub code: Option<String>,
    pub size: Option<f64>,
    pub options: Vec<(String, OptionValue)>,
    pub format: OutputFormat,
    pub png: Option<PathBuf>,
    pub scale: f32,
    pub demo: bool,
}

/// Parse a `key=value` option. Values are typed like the library does it:
/// `true`/`false`, then numbers, then text.
pub fn parse_option(raw: &str) -> Result<(String, OptionValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing option name in '{}'", raw));
    }
    let value = match value.parse::<OptionValue>() {
        Ok(value) => value,
        Err(never) => match never {},
    };
    Ok((name.to_string(), value))
}

/// Run the render command.
pub fn run(args: RenderArgs) -> Result<(), CliError> {
    let config = ConfigFile::load()?;

    if args.demo {
        return run_demo(&args, &config);
    }

    let code = args
        .code
        .as_deref()
        .ok_or_else(|| CliError::Config("a symbol code is required unless --demo is given".into()))?;

    let mut provider =
        SymbolInstanceProvider::with_config(Rc::new(FrameRenderer::new()), config.provider_config());
    let options = build_options(args.size, &args.options);
    let glyph = provider.get(&SymbolCode::new(code), &options)?;

    let markup = glyph.to_markup();
    match args.format {
        OutputFormat::Svg => println!("{}", markup),
        OutputFormat::Node => println!("{}", to_json(&glyph.to_node())?),
        OutputFormat::Json => {
            let descriptor = IconBuilder::new(config.icon_config()).build(glyph.as_ref());
            println!("{}", to_json(&descriptor)?);
        }
    }

    if let Some(path) = &args.png {
        rasterize(&markup, args.scale, path)?;
        info!(path = %path.display(), scale = args.scale, "Wrote PNG");
    }

    Ok(())
}

/// Render every demo symbol and print a one-line summary for each.
fn run_demo(args: &RenderArgs, config: &ConfigFile) -> Result<(), CliError> {
    let builder = IconBuilder::new(IconConfig {
        markup: MarkupStrategy::Svg,
        ..config.icon_config()
    });
    let mut provider =
        SymbolInstanceProvider::with_config(Rc::new(FrameRenderer::new()), config.provider_config());
    let options = build_options(args.size, &args.options);

    for (code, description) in DEMO_SYMBOLS {
        let glyph = provider.get(&SymbolCode::new(*code), &options)?;
        let icon = builder.build(glyph.as_ref());
        println!(
            "{:<14} {:<12} size {}x{}  anchor ({}, {})",
            code, description, icon.size[0], icon.size[1], icon.anchor[0], icon.anchor[1]
        );

        if let Some(dir) = &args.png {
            std::fs::create_dir_all(dir)?;
            let path = dir.join(format!("{}.png", code));
            rasterize(&glyph.to_markup(), args.scale, &path)?;
            debug!(path = %path.display(), "Wrote demo PNG");
        }
    }

    Ok(())
}

/// `--size` first, explicit options on top.
fn build_options(size: Option<f64>, overrides: &[(String, OptionValue)]) -> SymbolOptions {
    let mut options = SymbolOptions::new();
    if let Some(size) = size {
        options = options.with_size(size);
    }
    for (name, value) in overrides {
        options.insert(name.clone(), value.clone());
    }
    options
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value).map_err(std::io::Error::from)?)
}

/// Rasterize SVG markup into a PNG at `scale` times its pixel size.
fn rasterize(svg: &str, scale: f32, path: &Path) -> Result<(), CliError> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(CliError::Config(format!("scale must be positive, got {}", scale)));
    }

    let tree = usvg::Tree::from_str(svg, &usvg::Options::default())
        .map_err(|e| CliError::Raster(e.to_string()))?;

    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| CliError::Raster(format!("cannot allocate {}x{} pixmap", width, height)))?;

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    pixmap
        .save_png(path)
        .map_err(|e| CliError::Raster(e.to_string()))
}
