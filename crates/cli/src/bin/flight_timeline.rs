use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tozemoon::config::{SceneConfig, load_site_config};
use tozemoon::export::summary::{SummaryBuilder, write_summary};
use tozemoon::export::timeline::{Record, write_header};
use tozemoon::export::writer_for_path;
use tozemoon::flight::{FrameInput, Sequencer, Viewport};

/// Upper bound on sampled frames; one hour at 60 fps.
const MAX_FRAMES: f64 = 216_000.0;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Sample the hero flight sequence at a fixed frame rate"
)]
struct Cli {
    /// Seconds of animation to sample
    #[arg(long, default_value_t = 20.0)]
    duration: f64,

    /// Frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Site configuration (TOML or YAML); built-in scene constants when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Output path (`-` for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Format {
    Csv,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if !(cli.fps.is_finite() && cli.fps > 0.0) {
        anyhow::bail!("--fps must be a positive finite number");
    }
    if !(cli.duration.is_finite() && cli.duration >= 0.0) {
        anyhow::bail!("--duration must be a non-negative finite number");
    }
    let frame_count = (cli.duration * cli.fps).floor();
    if frame_count > MAX_FRAMES {
        anyhow::bail!("--duration times --fps exceeds {MAX_FRAMES} frames");
    }
    let scene = match &cli.config {
        Some(path) => load_site_config(path)?.scene,
        None => SceneConfig::default(),
    };

    let mut sequencer = Sequencer::new(&scene);
    let viewport = Viewport {
        width: cli.width,
        height: cli.height,
    };
    let dt = 1.0 / cli.fps;
    let frames = frame_count as usize;

    let mut writer = writer_for_path(&cli.output)?;
    match cli.format {
        Format::Csv => {
            write_header(&mut *writer)?;
            for i in 0..=frames {
                let state = sequencer.tick(
                    FrameInput {
                        elapsed: i as f64 * dt,
                        dt,
                    },
                    viewport,
                );
                Record::new(&state).write_to(&mut *writer)?;
            }
        }
        Format::Json => {
            let geometry = sequencer.geometry();
            let mut summary = SummaryBuilder::new(geometry.earth_center, geometry.earth_radius);
            for i in 0..=frames {
                let state = sequencer.tick(
                    FrameInput {
                        elapsed: i as f64 * dt,
                        dt,
                    },
                    viewport,
                );
                summary.push(&state);
            }
            write_summary(&mut *writer, &summary.finish())?;
        }
    }
    writer.flush()?;
    Ok(())
}
