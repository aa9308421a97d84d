//! Vector PDF rendering of skill availability scaling curves.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stg_core::StgError;

use crate::points::ScalingSeries;

const POINTS_PER_INCH: f64 = 72.0;
const TICK_LENGTH: f64 = 3.5;
const TICK_PAD: f64 = 2.5;
const LABEL_PAD: f64 = 4.0;
const SUPERSCRIPT_SCALE: f64 = 0.7;
const LINE_COLOR: (f64, f64, f64) = (0.122, 0.467, 0.706);
const GRID_GRAY: f64 = 0.69;

/// Layout and styling of the scaling plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureConfig {
    /// Page width in inches.
    pub width_in: f64,
    /// Page height in inches.
    pub height_in: f64,
    /// Horizontal axis label.
    pub x_label: String,
    /// Vertical axis label.
    pub y_label: String,
    /// Marker diameter in points.
    pub marker_size: f64,
    /// Series line width in points.
    pub line_width: f64,
    /// Font size of tick labels in points.
    pub tick_font_size: f64,
    /// Font size of axis labels in points.
    pub label_font_size: f64,
    /// Whether major grid lines are drawn on both axes.
    pub grid: bool,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width_in: 3.0,
            height_in: 3.0,
            x_label: "Number of States".to_owned(),
            y_label: "Skills Available Per State".to_owned(),
            marker_size: 2.0,
            line_width: 1.5,
            tick_font_size: 7.0,
            label_font_size: 8.0,
            grid: true,
        }
    }
}

/// Renders `series` as a single-page PDF with a log-scaled x axis.
///
/// Points with a non-positive state count or a non-finite skill value are
/// not plotted. An empty series yields axes and grid over a default range.
/// Equal inputs produce byte-identical documents.
pub fn render_scaling_pdf(series: &ScalingSeries, config: &FigureConfig) -> Vec<u8> {
    let visible: Vec<(f64, f64)> = series
        .points()
        .iter()
        .filter(|point| point.num_states > 0 && point.avg_skills.is_finite())
        .map(|point| ((point.num_states as f64).log10(), point.avg_skills))
        .collect();

    let x_axis = LogAxis::fit(visible.iter().map(|(x, _)| *x));
    let y_axis = LinearAxis::fit(visible.iter().map(|(_, y)| *y));

    let width = (config.width_in * POINTS_PER_INCH).max(1.0);
    let height = (config.height_in * POINTS_PER_INCH).max(1.0);
    let tick_size = config.tick_font_size.max(1.0);
    let label_size = config.label_font_size.max(1.0);

    let y_labels: Vec<String> = y_axis.ticks.iter().map(|t| y_axis.format(*t)).collect();
    let widest_y = y_labels
        .iter()
        .map(|label| text_width(label, tick_size))
        .fold(0.0, f64::max);
    let left = LABEL_PAD + label_size + LABEL_PAD + widest_y + TICK_PAD + TICK_LENGTH;
    let bottom = LABEL_PAD
        + label_size
        + LABEL_PAD
        + tick_size * (1.0 + SUPERSCRIPT_SCALE * 0.5)
        + TICK_PAD
        + TICK_LENGTH;
    let frame = Frame {
        x0: left,
        y0: bottom,
        x1: (width - tick_size * 1.5).max(left + 1.0),
        y1: (height - tick_size).max(bottom + 1.0),
    };

    let mut content = String::new();
    let map_x = |value: f64| frame.x0 + x_axis.fraction(value) * frame.width();
    let map_y = |value: f64| frame.y0 + y_axis.fraction(value) * frame.height();

    if config.grid {
        let _ = writeln!(content, "{GRID_GRAY:.3} G 0.6 w");
        for tick in &x_axis.ticks {
            let x = map_x(*tick);
            line(&mut content, (x, frame.y0), (x, frame.y1));
        }
        for tick in &y_axis.ticks {
            let y = map_y(*tick);
            line(&mut content, (frame.x0, y), (frame.x1, y));
        }
    }

    let _ = writeln!(content, "0 G 0.8 w");
    let _ = writeln!(
        content,
        "{:.2} {:.2} {:.2} {:.2} re S",
        frame.x0,
        frame.y0,
        frame.width(),
        frame.height()
    );
    let _ = writeln!(content, "0 g");
    for tick in &x_axis.ticks {
        let x = map_x(*tick);
        line(&mut content, (x, frame.y0), (x, frame.y0 - TICK_LENGTH));
        let exponent = format!("{}", tick.round() as i64);
        let base_width = text_width("10", tick_size);
        let total = base_width + text_width(&exponent, tick_size * SUPERSCRIPT_SCALE);
        let baseline = frame.y0 - TICK_LENGTH - TICK_PAD - tick_size;
        text(&mut content, "10", tick_size, x - total / 2.0, baseline);
        text(
            &mut content,
            &exponent,
            tick_size * SUPERSCRIPT_SCALE,
            x - total / 2.0 + base_width,
            baseline + tick_size * 0.45,
        );
    }
    for (tick, label) in y_axis.ticks.iter().zip(&y_labels) {
        let y = map_y(*tick);
        line(&mut content, (frame.x0, y), (frame.x0 - TICK_LENGTH, y));
        let x = frame.x0 - TICK_LENGTH - TICK_PAD - text_width(label, tick_size);
        text(&mut content, label, tick_size, x, y - tick_size * 0.35);
    }

    let x_label_width = text_width(&config.x_label, label_size);
    text(
        &mut content,
        &config.x_label,
        label_size,
        frame.x0 + (frame.width() - x_label_width) / 2.0,
        LABEL_PAD + label_size * 0.2,
    );
    let y_label_width = text_width(&config.y_label, label_size);
    let _ = writeln!(
        content,
        "BT /F1 {:.2} Tf 0 1 -1 0 {:.2} {:.2} Tm ({}) Tj ET",
        label_size,
        LABEL_PAD + label_size * 0.8,
        frame.y0 + (frame.height() - y_label_width) / 2.0,
        escape_text(&config.y_label)
    );

    if !visible.is_empty() {
        let (r, g, b) = LINE_COLOR;
        let _ = writeln!(
            content,
            "q {:.2} {:.2} {:.2} {:.2} re W n",
            frame.x0,
            frame.y0,
            frame.width(),
            frame.height()
        );
        let _ = writeln!(
            content,
            "{r:.3} {g:.3} {b:.3} RG {r:.3} {g:.3} {b:.3} rg {:.2} w 1 J 1 j",
            config.line_width.max(0.0)
        );
        for (idx, (x, y)) in visible.iter().enumerate() {
            let op = if idx == 0 { "m" } else { "l" };
            let _ = writeln!(content, "{:.2} {:.2} {op}", map_x(*x), map_y(*y));
        }
        let _ = writeln!(content, "S");
        let radius = config.marker_size.max(0.0) / 2.0;
        if radius > 0.0 {
            for (x, y) in &visible {
                circle(&mut content, map_x(*x), map_y(*y), radius);
            }
        }
        let _ = writeln!(content, "Q");
    }

    assemble_document(width, height, &content)
}

/// Writes rendered figure bytes to `path`.
pub fn write_figure(path: &Path, bytes: &[u8]) -> Result<(), StgError> {
    fs::write(path, bytes).map_err(|err| StgError::io("write-figure", &err, path))
}

struct Frame {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Frame {
    fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// Axis over `log10` values with ticks at whole decades.
struct LogAxis {
    lo: f64,
    hi: f64,
    ticks: Vec<f64>,
}

impl LogAxis {
    fn fit(values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = bounds(values).unwrap_or((0.0, 2.0));
        let mut lo = min.floor();
        let mut hi = max.ceil();
        if hi <= lo {
            lo -= 0.5;
            hi += 0.5;
        }
        let pad = (hi - lo) * 0.05;
        let (lo, hi) = (lo.min(min - pad), hi.max(max + pad));
        let ticks = (lo.ceil() as i64..=hi.floor() as i64)
            .map(|exp| exp as f64)
            .collect();
        Self { lo, hi, ticks }
    }

    fn fraction(&self, value: f64) -> f64 {
        (value - self.lo) / (self.hi - self.lo)
    }
}

/// Linear axis with 1-2-5 tick spacing.
struct LinearAxis {
    lo: f64,
    hi: f64,
    step: f64,
    ticks: Vec<f64>,
}

impl LinearAxis {
    fn fit(values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = bounds(values).unwrap_or((0.0, 1.0));
        let (min, max) = if max - min <= f64::EPSILON * max.abs().max(1.0) {
            let half = (min.abs() * 0.1).max(0.5);
            (min - half, max + half)
        } else {
            (min, max)
        };
        let pad = (max - min) * 0.05;
        let (lo, hi) = (min - pad, max + pad);
        let step = nice_step((hi - lo) / 5.0);
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        let ticks = (first..=last)
            .map(|k| k as f64 * step)
            .map(|t| if t == 0.0 { 0.0 } else { t })
            .collect();
        Self {
            lo,
            hi,
            step,
            ticks,
        }
    }

    fn fraction(&self, value: f64) -> f64 {
        (value - self.lo) / (self.hi - self.lo)
    }

    fn format(&self, value: f64) -> String {
        let decimals = (-self.step.log10().floor()).max(0.0) as usize;
        format!("{value:.decimals$}")
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, value| match acc {
        None => Some((value, value)),
        Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
    })
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Approximate Helvetica advance width.
fn text_width(text: &str, size: f64) -> f64 {
    let units: f64 = text
        .chars()
        .map(|ch| match ch {
            '0'..='9' => 0.556,
            '.' | ',' | ' ' | 'i' | 'l' | 'j' | 'I' => 0.278,
            '-' | 'r' | '(' | ')' => 0.333,
            'f' | 't' => 0.278,
            'm' | 'M' | 'W' => 0.833,
            'w' => 0.722,
            'A'..='Z' => 0.667,
            _ => 0.556,
        })
        .sum();
    units * size
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ch if ch.is_ascii() && !ch.is_ascii_control() => escaped.push(ch),
            _ => escaped.push('?'),
        }
    }
    escaped
}

fn line(content: &mut String, from: (f64, f64), to: (f64, f64)) {
    let _ = writeln!(
        content,
        "{:.2} {:.2} m {:.2} {:.2} l S",
        from.0, from.1, to.0, to.1
    );
}

fn text(content: &mut String, body: &str, size: f64, x: f64, y: f64) {
    let _ = writeln!(
        content,
        "BT /F1 {size:.2} Tf {x:.2} {y:.2} Td ({}) Tj ET",
        escape_text(body)
    );
}

fn circle(content: &mut String, cx: f64, cy: f64, r: f64) {
    let k = 0.5523 * r;
    let _ = writeln!(content, "{:.2} {:.2} m", cx + r, cy);
    let _ = writeln!(
        content,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
        cx + r,
        cy + k,
        cx + k,
        cy + r,
        cx,
        cy + r
    );
    let _ = writeln!(
        content,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
        cx - k,
        cy + r,
        cx - r,
        cy + k,
        cx - r,
        cy
    );
    let _ = writeln!(
        content,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
        cx - r,
        cy - k,
        cx - k,
        cy - r,
        cx,
        cy - r
    );
    let _ = writeln!(
        content,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c f",
        cx + k,
        cy - r,
        cx + r,
        cy - k,
        cx + r,
        cy
    );
}

fn assemble_document(width: f64, height: f64, content: &str) -> Vec<u8> {
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_owned(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_owned(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {width:.2} {height:.2}] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_owned(),
        format!(
            "<< /Length {} >>\nstream\n{content}endstream",
            content.len()
        ),
    ];

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (idx, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        let _ = write!(out, "{} 0 obj\n{body}\nendobj\n", idx + 1);
    }
    let xref_offset = out.len();
    let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(out, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    );
    out.into_bytes()
}
