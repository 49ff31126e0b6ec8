//! Realtime playback: one processor per output channel

use clap::Args;
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::f32::consts::TAU;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info};

use waveshaper_dsp::engine::{params_channel, REALTIME_BLOCK_SIZE};
use waveshaper_dsp::InstanceManager;

use crate::ShapeArgs;

/// How often the sweep pushes a new snapshot
const SWEEP_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Frequency of the test tone in Hz
    #[arg(long, default_value_t = 110.0)]
    pub tone: f32,

    /// Peak level of the test tone
    #[arg(long, default_value_t = 0.5)]
    pub level: f32,

    /// Playback length in seconds
    #[arg(long, default_value_t = 10.0)]
    pub seconds: f32,

    /// Sweep param1 from 0 to 100 and back over `--sweep-period` seconds
    #[arg(long)]
    pub sweep: bool,

    #[arg(long, default_value_t = 4.0)]
    pub sweep_period: f32,

    #[command(flatten)]
    pub shape: ShapeArgs,
}

pub fn run(args: &PlayArgs) -> EyreResult<()> {
    let params = args.shape.params()?;

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let mut manager = InstanceManager::new();
    manager.realtime_initialize();
    for _ in 0..channels {
        manager.realtime_add_processor(sample_rate, &params)?;
    }
    let manager = Arc::new(Mutex::new(manager));

    info!(
        curve = params.curve_type.key(),
        sample_rate,
        channels,
        "playing; press Ctrl+C to stop"
    );

    let (mut handle, mut live) = params_channel(params);

    let step = TAU * args.tone / sample_rate;
    let level = args.level;
    let mut phase = 0.0f32;
    let mut dry = vec![0.0f32; REALTIME_BLOCK_SIZE];
    let mut wet = vec![0.0f32; REALTIME_BLOCK_SIZE];

    let audio_manager = manager.clone();
    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            // Never block the audio thread; emit silence if the control side holds the lock
            let Ok(mut manager) = audio_manager.try_lock() else {
                data.fill(0.0);
                return;
            };
            live.sync();
            let params = *live.current();

            let total_frames = data.len() / channels;
            let mut frames_written = 0;
            while frames_written < total_frames {
                let frames = (total_frames - frames_written).min(REALTIME_BLOCK_SIZE);

                for sample in dry[..frames].iter_mut() {
                    *sample = phase.sin() * level;
                    phase = (phase + step) % TAU;
                }

                let out_off = frames_written * channels;
                for ch in 0..channels {
                    let block = &mut wet[..frames];
                    if manager
                        .realtime_process(ch, &params, &dry[..frames], block)
                        .is_err()
                    {
                        block.fill(0.0);
                    }
                    for (i, &s) in block.iter().enumerate() {
                        data[out_off + i * channels + ch] = s;
                    }
                }

                frames_written += frames;
            }
        },
        |err| error!(%err, "audio stream error"),
        None,
    )?;

    stream.play()?;

    let start = Instant::now();
    let length = Duration::from_secs_f32(args.seconds.max(0.0));
    while start.elapsed() < length {
        if args.sweep {
            let p1 = triangle(start.elapsed().as_secs_f32(), args.sweep_period) * 100.0;
            // A full queue just drops this step; the next one catches up
            handle.send(params.with_param1(p1 as f64));
            thread::sleep(SWEEP_INTERVAL);
        } else {
            thread::sleep(Duration::from_millis(100));
        }
    }

    drop(stream);
    if let Ok(mut manager) = manager.lock() {
        manager.realtime_finalize();
    }
    Ok(())
}

/// 0 -> 1 -> 0 over one `period`.
fn triangle(t: f32, period: f32) -> f32 {
    if period <= 0.0 {
        return 0.0;
    }
    let phase = (t / period).fract();
    1.0 - (2.0 * phase - 1.0).abs()
}
