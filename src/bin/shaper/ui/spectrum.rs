//! Harmonic spectrum of a shaped sine
//!
//! The test tone sits exactly on FFT bin `FUNDAMENTAL_BIN`, so harmonic k
//! lands on bin k * FUNDAMENTAL_BIN and the x axis reads in harmonic numbers.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// FFT size and test signal length
pub const ANALYSIS_LEN: usize = 4096;
/// Bin of the test tone's fundamental
pub const FUNDAMENTAL_BIN: usize = 32;
/// Highest harmonic shown
const MAX_HARMONIC: usize = 16;
/// Lowest level plotted
const FLOOR_DB: f64 = -120.0;

pub struct HarmonicAnalyzer {
    /// Hann window coefficients
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (harmonic number, level in dB relative to the window's coherent gain)
    spectrum: Vec<(f64, f64)>,
}

impl HarmonicAnalyzer {
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(ANALYSIS_LEN);

        let denom = (ANALYSIS_LEN - 1) as f32;
        let window = (0..ANALYSIS_LEN)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        Self {
            window,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); ANALYSIS_LEN],
            spectrum: Vec::new(),
        }
    }

    /// Samples of a sine at `level` whose fundamental lands on `FUNDAMENTAL_BIN`.
    pub fn test_tone(level: f32) -> Vec<f32> {
        let step = std::f32::consts::TAU * FUNDAMENTAL_BIN as f32 / ANALYSIS_LEN as f32;
        (0..ANALYSIS_LEN)
            .map(|i| (step * i as f32).sin() * level)
            .collect()
    }

    /// Recompute the spectrum. Buffers of the wrong length are ignored.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != ANALYSIS_LEN {
            return;
        }

        for ((bin, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *bin = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        // Hann coherent gain is 0.5; a full-scale sine reads 0 dB
        let norm = 4.0 / ANALYSIS_LEN as f64;
        let last = FUNDAMENTAL_BIN * MAX_HARMONIC;
        self.spectrum.clear();
        for (index, bin) in self.scratch[..=last].iter().enumerate() {
            let magnitude = bin.norm() as f64 * norm;
            let db = (20.0 * magnitude.max(1e-12).log10()).max(FLOOR_DB);
            self.spectrum
                .push((index as f64 / FUNDAMENTAL_BIN as f64, db));
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

/// Render the harmonic spectrum
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default()
        .title(" Harmonics ")
        .borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, MAX_HARMONIC as f64])
                .labels(vec!["0", "4", "8", "12", "16"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec!["-120", "-60", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
