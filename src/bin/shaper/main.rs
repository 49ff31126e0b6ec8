//! shaper - waveshaping distortion from the command line
//!
//! Run with: cargo run -- <render|play|curves|presets>

mod play;
mod render;
mod ui;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result as EyreResult;
use tracing_subscriber::EnvFilter;

use waveshaper_dsp::{presets, CurveType, Params, ShaperError};

#[derive(Parser)]
#[command(name = "shaper", version, about = "Table-based waveshaping distortion")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process a WAV file (or a generated tone) offline
    Render(render::RenderArgs),
    /// Play a test tone through the shaper on the default output device
    Play(play::PlayArgs),
    /// Interactive transfer-curve and spectrum viewer
    Curves(ShapeArgs),
    /// List the factory presets
    Presets,
}

/// Parameter selection shared by every subcommand.
///
/// A preset is the starting point when given; individual flags override it.
#[derive(Args, Clone, Debug)]
pub struct ShapeArgs {
    /// Factory preset, by name or 1-based number
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Curve type key or label (e.g. "soft-clip")
    #[arg(short, long)]
    pub curve: Option<CurveType>,

    /// Threshold in dB (-100..=0)
    #[arg(long, allow_negative_numbers = true)]
    pub threshold: Option<f64>,

    /// Noise floor in dB (-80..=-20)
    #[arg(long, allow_negative_numbers = true)]
    pub noise_floor: Option<f64>,

    /// Parameter 1 (0..=100)
    #[arg(long)]
    pub param1: Option<f64>,

    /// Parameter 2 (0..=100)
    #[arg(long)]
    pub param2: Option<f64>,

    /// Extra passes for iterative curves (0..=5)
    #[arg(long)]
    pub repeats: Option<u32>,

    /// Enable the DC blocker
    #[arg(long)]
    pub dc_block: bool,
}

impl ShapeArgs {
    pub fn params(&self) -> Result<Params, ShaperError> {
        let mut params = match &self.preset {
            Some(name) => resolve_preset(name)?.params,
            None => Params::default(),
        };
        if let Some(curve) = self.curve {
            params.curve_type = curve;
        }
        if let Some(threshold) = self.threshold {
            params.threshold_db = threshold;
        }
        if let Some(floor) = self.noise_floor {
            params.noise_floor_db = floor;
        }
        if let Some(p1) = self.param1 {
            params.param1 = p1;
        }
        if let Some(p2) = self.param2 {
            params.param2 = p2;
        }
        if let Some(repeats) = self.repeats {
            params.repeats = repeats;
        }
        params.dc_block |= self.dc_block;

        params.validate()?;
        Ok(params)
    }
}

fn resolve_preset(name: &str) -> Result<&'static presets::Preset, ShaperError> {
    match name.trim().parse::<usize>() {
        Ok(number) => number
            .checked_sub(1)
            .and_then(presets::by_index)
            .ok_or_else(|| ShaperError::UnknownPreset(name.to_string())),
        Err(_) => presets::by_name(name),
    }
}

fn list_presets() {
    for (i, preset) in presets::FACTORY_PRESETS.iter().enumerate() {
        let p = &preset.params;
        println!(
            "{:>2}  {:<40} {:<16} thr {:>6.1} dB  p1 {:>5.1}  p2 {:>5.1}  rep {}{}",
            i + 1,
            preset.name,
            p.curve_type.key(),
            p.threshold_db,
            p.param1,
            p.param2,
            p.repeats,
            if p.dc_block { "  dc" } else { "" },
        );
    }
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // The curve viewer owns the terminal; keep log lines out of it
    if !matches!(cli.command, Command::Curves(_)) {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    match cli.command {
        Command::Render(args) => render::run(&args),
        Command::Play(args) => play::run(&args),
        Command::Curves(args) => ui::run(args.params()?),
        Command::Presets => {
            list_presets();
            Ok(())
        }
    }
}
