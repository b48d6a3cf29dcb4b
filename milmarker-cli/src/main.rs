//! milmarker CLI - Command-line interface
//!
//! Renders military symbols with the bundled renderer, simulates orbiting
//! markers, and manages the configuration file.

mod commands;
mod error;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use milmarker::animate::ThrottleMode;
use milmarker::symbol::OptionValue;

use commands::config::ConfigCommands;
use commands::orbit::OrbitArgs;
use commands::render::{OutputFormat, RenderArgs};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "milmarker")]
#[command(about = "Military symbol map markers", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging (every host write and frame)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render a symbol to SVG, a render tree, or an icon descriptor
    Render {
        /// Symbol identification code (letter or numeric SIDC)
        #[arg(required_unless_present = "demo", conflicts_with = "demo")]
        code: Option<String>,

        /// Symbol size (defaults to symbol.default_size)
        #[arg(long)]
        size: Option<f64>,

        /// Symbol option as key=value (repeatable)
        #[arg(short = 'o', long = "option", value_parser = commands::render::parse_option)]
        options: Vec<(String, OptionValue)>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
        format: OutputFormat,

        /// Also write a PNG (a directory with --demo)
        #[arg(long)]
        png: Option<PathBuf>,

        /// Scale factor for PNG output
        #[arg(long, default_value_t = 1.0)]
        scale: f32,

        /// Render the sample symbol set instead of a single code
        #[arg(long)]
        demo: bool,
    },

    /// Fly a symbol around an orbit and report what the map received
    Orbit {
        /// Symbol identification code
        code: String,

        /// Orbit centre latitude
        #[arg(long, default_value_t = 51.505, allow_negative_numbers = true)]
        lat: f64,

        /// Orbit centre longitude
        #[arg(long, default_value_t = -0.09, allow_negative_numbers = true)]
        lng: f64,

        /// Simulated duration (defaults to one full orbit)
        #[arg(long)]
        seconds: Option<f64>,

        /// Frames per second (defaults to orbit.fps)
        #[arg(long)]
        fps: Option<u32>,

        /// Heading throttle: grid or last_emission (defaults to orbit.throttle)
        #[arg(long)]
        throttle: Option<ThrottleMode>,

        /// Angular speed in radians per second (defaults to orbit.speed)
        #[arg(long)]
        speed: Option<f64>,

        /// Orbit radius in degrees of latitude (defaults to orbit.radius)
        #[arg(long)]
        radius: Option<f64>,

        /// Symbol size
        #[arg(long)]
        size: Option<f64>,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Render {
            code,
            size,
            options,
            format,
            png,
            scale,
            demo,
        } => commands::render::run(RenderArgs {
            code,
            size,
            options,
            format,
            png,
            scale,
            demo,
        }),
        Commands::Orbit {
            code,
            lat,
            lng,
            seconds,
            fps,
            throttle,
            speed,
            radius,
            size,
        } => commands::orbit::run(OrbitArgs {
            code,
            lat,
            lng,
            seconds,
            fps,
            throttle,
            speed,
            radius,
            size,
        }),
        Commands::Config { command } => commands::config::run(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_parses_repeated_options() {
        let cli = Cli::parse_from([
            "milmarker", "render", "SFGPUCA---MT", "-o", "fill=false", "-o", "fillOpacity=0.5",
        ]);
        match cli.command {
            Commands::Render { code, options, .. } => {
                assert_eq!(code.as_deref(), Some("SFGPUCA---MT"));
                assert_eq!(options.len(), 2);
                assert_eq!(options[1].1, OptionValue::Number(0.5));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_render_requires_code_or_demo() {
        assert!(Cli::try_parse_from(["milmarker", "render"]).is_err());
        assert!(Cli::try_parse_from(["milmarker", "render", "--demo"]).is_ok());
    }

    #[test]
    fn test_orbit_accepts_negative_longitude_and_throttle() {
        let cli = Cli::parse_from([
            "milmarker", "orbit", "SFGPEWRH--MT", "--lng", "-3.5", "--throttle", "grid",
        ]);
        match cli.command {
            Commands::Orbit { lng, throttle, .. } => {
                assert_eq!(lng, -3.5);
                assert_eq!(throttle, Some(ThrottleMode::Grid));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
