//! Offline rendering through the master instance

use clap::Args;
use color_eyre::eyre::{bail, Result as EyreResult, WrapErr};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use waveshaper_dsp::InstanceManager;

use crate::ShapeArgs;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Input WAV file (omit to use a generated sine)
    #[arg()]
    pub input: Option<PathBuf>,

    /// Output WAV file
    #[arg(short, long, default_value = "shaped.wav")]
    pub output: PathBuf,

    /// Frequency of the generated sine in Hz
    #[arg(long, default_value_t = 220.0)]
    pub tone: f32,

    /// Peak level of the generated sine
    #[arg(long, default_value_t = 0.8)]
    pub level: f32,

    /// Length of the generated sine in seconds
    #[arg(long, default_value_t = 2.0)]
    pub seconds: f32,

    /// Sample rate of the generated sine
    #[arg(long, default_value_t = 48_000)]
    pub sample_rate: u32,

    #[command(flatten)]
    pub shape: ShapeArgs,
}

/// Deinterleaved audio, one `Vec` per channel.
struct Audio {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

pub fn run(args: &RenderArgs) -> EyreResult<()> {
    let params = args.shape.params()?;

    let audio = match &args.input {
        Some(path) => read_wav(path)?,
        None => Audio {
            sample_rate: args.sample_rate,
            channels: vec![sine(args.tone, args.level, args.seconds, args.sample_rate)],
        },
    };

    info!(
        curve = params.curve_type.key(),
        channels = audio.channels.len(),
        sample_rate = audio.sample_rate,
        "rendering"
    );

    let start = Instant::now();
    let mut manager = InstanceManager::new();
    let mut shaped = Vec::with_capacity(audio.channels.len());
    for channel in &audio.channels {
        // Each channel gets a freshly initialized master, so no state leaks between them
        shaped.push(manager.render_offline(&params, audio.sample_rate as f32, channel)?);
    }
    manager.process_finalize();

    write_wav(&args.output, audio.sample_rate, &shaped)?;

    info!(
        output = %args.output.display(),
        frames = shaped.first().map_or(0, Vec::len),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "render finished"
    );
    Ok(())
}

pub fn sine(freq: f32, level: f32, seconds: f32, sample_rate: u32) -> Vec<f32> {
    let len = (seconds.max(0.0) * sample_rate as f32) as usize;
    let step = std::f32::consts::TAU * freq / sample_rate as f32;
    (0..len).map(|i| (step * i as f32).sin() * level).collect()
}

fn read_wav(path: &Path) -> EyreResult<Audio> {
    let mut reader = WavReader::open(path)
        .wrap_err_with(|| format!("failed to open WAV: {}", path.display()))?;
    let spec = reader.spec();
    if spec.channels == 0 {
        bail!("{} has no channels", path.display());
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .wrap_err("failed to decode float samples")?,
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                bail!("unsupported bit depth: {}", spec.bits_per_sample);
            }
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()
                .wrap_err("failed to decode integer samples")?
        }
    };

    let count = spec.channels as usize;
    let mut channels: Vec<Vec<f32>> = (0..count)
        .map(|_| Vec::with_capacity(interleaved.len() / count))
        .collect();
    for frame in interleaved.chunks_exact(count) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    Ok(Audio {
        sample_rate: spec.sample_rate,
        channels,
    })
}

fn write_wav(path: &Path, sample_rate: u32, channels: &[Vec<f32>]) -> EyreResult<()> {
    let spec = WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)
        .wrap_err_with(|| format!("failed to create WAV: {}", path.display()))?;

    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    for i in 0..frames {
        for channel in channels {
            writer.write_sample(channel[i])?;
        }
    }
    writer.finalize()?;
    Ok(())
}
