//! Radiation pattern of a linear phased array.
//!
//! Prints `angle,amplitude` rows for a sweep of the receiver around the array, or the transmitter
//! coordinates with `--positions`. Lengths on the command line are in mm except the receiver
//! distance, which is in metres; angles are in degrees.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use phased_array_lib::{
    config::{ArrayConfig, Grouping, Layout},
    geometry,
    pattern_chart::PatternChart,
    policy::LinearGroupShift,
    sweep::{sweep, RadiationPattern},
};
use tracing::{debug, info};

const DECIBEL_FLOOR: f64 = -60.;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    Centered,
    Left,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Layout {
        match arg {
            LayoutArg::Centered => Layout::Centered,
            LayoutArg::Left => Layout::LeftAligned,
        }
    }
}

#[derive(Parser)]
#[command(name = "array-pattern")]
#[command(author, version, about = "Far-field interference pattern of a linear phased array", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Wavelength in mm
    #[arg(long, default_value = "20")]
    wavelength: f64,

    /// Transmitter separation as a fraction of the wavelength
    #[arg(long, default_value = "0.5")]
    separation: f64,

    /// Number of transmitters (defaults to 5, or groups x per-group)
    #[arg(short, long)]
    transmitters: Option<usize>,

    /// Number of transmitter groups
    #[arg(long, requires = "per_group")]
    groups: Option<usize>,

    /// Transmitters in each group
    #[arg(long, requires = "groups")]
    per_group: Option<usize>,

    /// Beam steering angle in degrees from broadside
    #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
    steering: f64,

    /// Phase step between consecutive groups, in turns. Replaces per-element steering.
    #[arg(long, allow_hyphen_values = true)]
    group_shift: Option<f64>,

    /// Receiver distance in metres
    #[arg(short, long, default_value = "100")]
    distance: f64,

    /// Array layout (defaults to centered, or left-aligned when grouped)
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,

    /// First receiver angle of the sweep, in degrees
    #[arg(long, default_value = "-90", allow_hyphen_values = true)]
    from: f64,

    /// End of the sweep (exclusive), in degrees
    #[arg(long, default_value = "90", allow_hyphen_values = true)]
    to: f64,

    /// Number of samples in the sweep
    #[arg(short = 'n', long, default_value = "1000")]
    samples: usize,

    /// Add a column with power relative to the main lobe, in dB
    #[arg(long)]
    db: bool,

    /// Print transmitter coordinates instead of the pattern
    #[arg(long)]
    positions: bool,

    /// Also render the pattern as an SVG chart
    #[arg(long)]
    svg: Option<PathBuf>,
}

fn config_from_cli(cli: &Cli) -> ArrayConfig {
    let mut config = match (cli.groups, cli.per_group) {
        (Some(groups), Some(per_group)) => {
            let mut config = ArrayConfig::grouped(cli.wavelength, cli.separation, groups, per_group);
            if let Some(transmitters) = cli.transmitters {
                config.elements = transmitters;
            }
            config
        }
        _ => ArrayConfig::ungrouped(
            cli.wavelength,
            cli.separation,
            cli.transmitters.unwrap_or(5),
        ),
    }
    .with_steering_angle(cli.steering.to_radians())
    .with_distance(cli.distance * 1000.);

    if let Some(layout) = cli.layout {
        config = config.with_layout(layout.into());
    }
    if let Some(turns_per_group) = cli.group_shift {
        config = config.with_group_policy(LinearGroupShift { turns_per_group });
    }
    config
}

fn print_positions(config: &ArrayConfig) -> Result<()> {
    let geometry = geometry::build(config)?;
    println!("index,group,x,y");
    for t in geometry.transmitters.iter() {
        let group = t.slot.map(|slot| slot.group.to_string()).unwrap_or_default();
        println!("{},{},{},{}", t.index, group, t.pos.x, t.pos.y);
    }
    debug!(aperture = geometry.aperture(), "array laid out");
    Ok(())
}

fn print_pattern(pattern: &RadiationPattern, db: bool) {
    if db {
        println!("angle,amplitude,db");
        let decibels = pattern.normalized_decibels(DECIBEL_FLOOR);
        for (s, level) in pattern.iter().zip(decibels.iter()) {
            println!("{:.3},{:.6},{:.3}", s.angle, s.amplitude, level);
        }
    } else {
        println!("angle,amplitude");
        for s in pattern {
            println!("{:.3},{:.6}", s.angle, s.amplitude);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = config_from_cli(&cli);
    if let Some(Grouping { groups, per_group }) = config.grouping {
        info!(groups, per_group, "grouped array");
    }

    if cli.positions {
        return print_positions(&config);
    }

    let pattern = sweep(&config, cli.from..cli.to, cli.samples)?;
    if let Some(peak) = pattern.peak() {
        info!(
            angle = peak.angle,
            amplitude = peak.amplitude,
            "main lobe"
        );
    }

    print_pattern(&pattern, cli.db);

    if let Some(path) = cli.svg.as_ref() {
        let caption = format!(
            "{} transmitters, {}λ apart",
            config.elements, config.separation
        );
        PatternChart::new(&pattern)
            .with_caption(caption)
            .render_svg(path, (1024, 640))
            .with_context(|| format!("writing chart to {}", path.display()))?;
        info!(path = %path.display(), "chart written");
    }

    Ok(())
}
