//! Text rendering of calculator results

use calculators::{CalculatorId, Record};
use perf::{render_label, MetricsRecorder};
use std::fmt::Write as _;

/// Render `outputs` as aligned `field: value` lines, timed as `render_<id>`.
pub fn render_timed(recorder: &MetricsRecorder, id: &str, outputs: &Record) -> String {
    recorder
        .measure(render_label(id), || render(id, outputs))
        .result
}

pub fn render(id: &str, outputs: &Record) -> String {
    let title = match id.parse::<CalculatorId>() {
        Ok(known) => known.title(),
        Err(_) => id,
    };
    let width = outputs.keys().map(String::len).max().unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    for (field, value) in outputs {
        let _ = writeln!(out, "  {:width$}  {}", field, value, width = width);
    }
    out
}
