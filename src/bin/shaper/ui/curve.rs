//! Transfer curve widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use waveshaper_dsp::dsp::table::knot_input;
use waveshaper_dsp::{Params, ProcessingInstance, STEPS, TABLE_SIZE};

/// Knots skipped between plotted points
const PLOT_STRIDE: usize = 8;

/// Points for the raw table and for the full per-sample transfer.
pub fn curve_data(instance: &ProcessingInstance, params: &Params) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let table = instance.table().as_slice();
    let raw = (0..TABLE_SIZE)
        .step_by(PLOT_STRIDE)
        .map(|n| (knot_input(n), table[n] as f64))
        .collect();
    let transfer = (0..TABLE_SIZE)
        .step_by(PLOT_STRIDE)
        .map(|n| {
            let x = knot_input(n);
            (x, instance.shape(params, x as f32) as f64)
        })
        .collect();
    (raw, transfer)
}

/// Render the table (dim) and the transfer including the output stage (bright)
pub fn render_curve(
    frame: &mut Frame,
    area: Rect,
    raw: &[(f64, f64)],
    transfer: &[(f64, f64)],
) {
    let block = Block::default()
        .title(format!(" Transfer ({} steps) ", STEPS))
        .borders(Borders::ALL);

    let peak = raw
        .iter()
        .chain(transfer)
        .map(|(_, y)| y.abs())
        .fold(1.0, f64::max);

    let datasets = vec![
        Dataset::default()
            .name("table")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(raw),
        Dataset::default()
            .name("output")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(transfer),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .labels(vec!["-1", "0", "1"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-peak, peak])
                .labels(vec![format!("{:.1}", -peak), "0".to_string(), format!("{:.1}", peak)])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
