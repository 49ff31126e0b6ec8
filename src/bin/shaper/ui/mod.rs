//! Interactive curve viewer
//!
//! Shows the active transfer curve and the harmonics it adds to a sine.
//! Every edit rebuilds the table immediately; this is a control-rate view,
//! not an audio path, so there is no refresh lag to model.

mod curve;
mod spectrum;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use std::time::Duration;

use waveshaper_dsp::params::MAX_REPEATS;
use waveshaper_dsp::{presets, CurveType, InstanceManager, Params, ProcessingInstance};

use curve::{curve_data, render_curve};
use spectrum::{render_spectrum, HarmonicAnalyzer, ANALYSIS_LEN, FUNDAMENTAL_BIN};

/// Sample rate the harmonic test tone is rendered at
const ANALYSIS_RATE: f32 = 48_000.0;
/// Peak level of the harmonic test tone
const TEST_LEVEL: f32 = 0.8;
/// Step for param1/param2 keys
const PARAM_STEP: f64 = 5.0;
/// Step for threshold keys, dB
const THRESHOLD_STEP: f64 = 1.0;

pub fn run(params: Params) -> EyreResult<()> {
    let mut app = CurveApp::new(params)?;
    let mut terminal = ratatui::init();
    let res = app.run(&mut terminal);
    ratatui::restore();
    res
}

struct CurveApp {
    params: Params,
    /// Index into the factory presets of the last preset loaded
    preset: Option<usize>,
    instance: ProcessingInstance,
    analyzer: HarmonicAnalyzer,
    test_tone: Vec<f32>,
    raw: Vec<(f64, f64)>,
    transfer: Vec<(f64, f64)>,
    should_quit: bool,
}

impl CurveApp {
    fn new(params: Params) -> EyreResult<Self> {
        let instance = ProcessingInstance::new(ANALYSIS_RATE, &params)?;
        let mut app = Self {
            params,
            preset: None,
            instance,
            analyzer: HarmonicAnalyzer::new(),
            test_tone: HarmonicAnalyzer::test_tone(TEST_LEVEL),
            raw: Vec::new(),
            transfer: Vec::new(),
            should_quit: false,
        };
        app.refresh()?;
        Ok(app)
    }

    fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Rebuild the table and re-run the harmonic analysis
    fn refresh(&mut self) -> EyreResult<()> {
        self.params = self.params.clamped();
        self.instance.rebuild_table(&self.params);
        let (raw, transfer) = curve_data(&self.instance, &self.params);
        self.raw = raw;
        self.transfer = transfer;

        let mut manager = InstanceManager::new();
        let shaped = manager.render_offline(&self.params, ANALYSIS_RATE, &self.test_tone)?;
        self.analyzer.update(&shaped);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) -> EyreResult<()> {
        let p = &mut self.params;
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return Ok(());
            }
            KeyCode::Right => {
                let next = p.curve_type.next();
                set_curve(p, next);
            }
            KeyCode::Left => {
                let prev = p.curve_type.prev();
                set_curve(p, prev);
            }
            KeyCode::Up => p.param1 += PARAM_STEP,
            KeyCode::Down => p.param1 -= PARAM_STEP,
            KeyCode::PageUp | KeyCode::Char('+') => p.param2 += PARAM_STEP,
            KeyCode::PageDown | KeyCode::Char('-') => p.param2 -= PARAM_STEP,
            KeyCode::Char(']') => p.threshold_db += THRESHOLD_STEP,
            KeyCode::Char('[') => p.threshold_db -= THRESHOLD_STEP,
            KeyCode::Char('}') => p.noise_floor_db += THRESHOLD_STEP,
            KeyCode::Char('{') => p.noise_floor_db -= THRESHOLD_STEP,
            KeyCode::Char('r') => p.repeats = (p.repeats + 1) % (MAX_REPEATS + 1),
            // Only curves that introduce an offset offer DC blocking
            KeyCode::Char('d') if p.curve_type.controls().dc_block => p.dc_block = !p.dc_block,
            KeyCode::Char('p') => {
                let next = self.preset.map_or(0, |i| (i + 1) % presets::FACTORY_PRESETS.len());
                if let Some(preset) = presets::by_index(next) {
                    *p = preset.params;
                    self.preset = Some(next);
                }
            }
            _ => return Ok(()),
        }
        self.refresh()
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),   // Charts
                Constraint::Length(9), // Controls
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        render_curve(frame, charts[0], &self.raw, &self.transfer);
        render_spectrum(frame, charts[1], self.analyzer.data());

        let controls = Paragraph::new(self.control_lines())
            .block(Block::default().title(" Controls ").borders(Borders::ALL));
        frame.render_widget(controls, rows[1]);

        let help = Paragraph::new(
            " [Q] Quit  [←/→] Curve  [↑/↓] P1  [+/-] P2  [[/]] Threshold  [{/}] Floor  [R] Repeats  [D] DC  [P] Preset",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[2]);
    }

    fn control_lines(&self) -> Vec<Line<'static>> {
        let p = &self.params;
        let controls = p.curve_type.controls();
        let preset = self
            .preset
            .and_then(presets::by_index)
            .map_or("-", |preset| preset.name);

        let mut lines = vec![
            Line::from(format!(
                "Curve: {}   Preset: {}   Make-up gain: {:.3}",
                p.curve_type,
                preset,
                self.instance.makeup_gain()
            )),
            Line::from(format!(
                "Test tone: {:.0} Hz at {:.1}",
                FUNDAMENTAL_BIN as f32 * ANALYSIS_RATE / ANALYSIS_LEN as f32,
                TEST_LEVEL
            )),
        ];

        let mut push = |label: Option<&'static str>, value: String| {
            if let Some(label) = label {
                lines.push(Line::from(format!("{:<28} {}", label, value)));
            }
        };
        push(controls.threshold, format!("{:.1} dB", p.threshold_db));
        push(controls.noise_floor, format!("{:.1} dB", p.noise_floor_db));
        push(controls.param1, format!("{:.0}", p.param1));
        push(controls.param2, format!("{:.0}", p.param2));
        push(controls.repeats, p.repeats.to_string());
        if controls.dc_block {
            push(Some("DC blocking"), if p.dc_block { "on" } else { "off" }.to_string());
        }
        lines
    }
}

/// Switch curve; DC blocking is forced off for curves that don't offer it.
fn set_curve(params: &mut Params, curve: CurveType) {
    params.curve_type = curve;
    if !curve.controls().dc_block {
        params.dc_block = false;
    }
}
