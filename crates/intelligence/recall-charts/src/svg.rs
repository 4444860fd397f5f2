//! SVG drawing of a [`Figure`].
//!
//! Output is a self-contained document with a white background, fixed
//! pixel coordinates and no external references, so identical figures
//! always serialize to identical markup.

use crate::figure::{Body, Figure, Series, Style, PALETTE};
use crate::stats::Histogram;

const FONT_FAMILY: &str = "DejaVu Sans, Liberation Sans, Arial, sans-serif";
const AXIS_COLOR: &str = "#333333";
const GRID_COLOR: &str = "#e5e5e5";
const TEXT_COLOR: &str = "#222222";
const DASH: &str = "6 4";
const MAX_LABEL_CHARS: usize = 28;

/// Minimal SVG writer
struct Canvas {
    width: u32,
    height: u32,
    body: String,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self {
            width,
            height,
            body: String::new(),
        };
        canvas.rect(0.0, 0.0, f64::from(width), f64::from(height), "#ffffff", 1.0, None);
        canvas
    }

    #[allow(clippy::too_many_arguments)]
    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, opacity: f64, stroke: Option<&str>) {
        let stroke = stroke
            .map(|s| format!(r#" stroke="{s}" stroke-width="1""#))
            .unwrap_or_default();
        self.body.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{fill}" fill-opacity="{opacity:.2}"{stroke}/>"#
        ));
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: &str, width: f64) {
        self.body.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{stroke}" stroke-width="{width:.1}"/>"#,
            from.0, from.1, to.0, to.1
        ));
    }

    fn polyline(&mut self, points: &[(f64, f64)], stroke: &str, width: f64, dashed: bool) {
        if points.len() < 2 {
            return;
        }
        let coords = points
            .iter()
            .map(|(x, y)| format!("{x:.1},{y:.1}"))
            .collect::<Vec<_>>()
            .join(" ");
        let dash = if dashed {
            format!(r#" stroke-dasharray="{DASH}""#)
        } else {
            String::new()
        };
        self.body.push_str(&format!(
            r#"<polyline points="{coords}" fill="none" stroke="{stroke}" stroke-width="{width:.1}" stroke-linejoin="round"{dash}/>"#
        ));
    }

    fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str) {
        self.body.push_str(&format!(
            r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="{fill}"/>"#
        ));
    }

    fn text(&mut self, x: f64, y: f64, content: &str, style: TextStyle) {
        let weight = if style.bold { r#" font-weight="bold""# } else { "" };
        let rotate = style
            .rotate
            .map(|deg| format!(r#" transform="rotate({deg:.0} {x:.1} {y:.1})""#))
            .unwrap_or_default();
        self.body.push_str(&format!(
            r#"<text x="{x:.1}" y="{y:.1}" font-size="{}" text-anchor="{}" fill="{TEXT_COLOR}"{weight}{rotate}>{}</text>"#,
            style.size,
            style.anchor,
            escape(content)
        ));
    }

    fn finish(self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{FONT_FAMILY}">{body}</svg>"#,
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    size: u32,
    anchor: &'static str,
    bold: bool,
    rotate: Option<f64>,
}

impl TextStyle {
    fn new(size: u32, anchor: &'static str) -> Self {
        Self {
            size,
            anchor,
            bold: false,
            rotate: None,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn rotated(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_string()
    } else {
        let head: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
        format!("{head}…")
    }
}

/// Data range mapped onto a pixel range, with tick positions
#[derive(Debug, Clone)]
struct Axis {
    lo: f64,
    hi: f64,
    step: f64,
    ticks: Vec<f64>,
}

impl Axis {
    /// Axis covering `lo..=hi` with roughly `target` ticks.
    ///
    /// `snap` widens the domain to whole steps. `integer` keeps steps >= 1.
    fn new(lo: f64, hi: f64, target: usize, integer: bool, snap: bool) -> Self {
        let (lo, hi) = if hi > lo { (lo, hi) } else { (lo, lo + 1.0) };
        let step = nice_step((hi - lo) / target.max(1) as f64, integer);
        let (lo, hi) = if snap {
            ((lo / step).floor() * step, (hi / step).ceil() * step)
        } else {
            (lo, hi)
        };

        let first = (lo / step).ceil() * step;
        let ticks = (0..100)
            .map(|k| first + step * f64::from(k))
            .take_while(|v| *v <= hi + step * 1e-9)
            .collect();

        Self { lo, hi, step, ticks }
    }

    fn map(&self, v: f64, range: (f64, f64)) -> f64 {
        range.0 + (v - self.lo) / (self.hi - self.lo) * (range.1 - range.0)
    }

    fn label(&self, v: f64) -> String {
        let v = if v.abs() < self.step * 1e-6 { 0.0 } else { v };
        if self.step.fract() == 0.0 {
            format!("{v:.0}")
        } else {
            let decimals = (-self.step.log10()).ceil().clamp(1.0, 4.0) as usize;
            format!("{v:.decimals$}")
        }
    }
}

fn nice_step(raw: f64, integer: bool) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let exp = raw.log10().floor() as i32;
    let mag = 10f64.powi(exp);
    let norm = raw / mag;
    let nice = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    let step = nice * mag;
    if integer {
        step.max(1.0)
    } else {
        step
    }
}

/// Pixel bounds of the plotting area
#[derive(Debug, Clone, Copy)]
struct Plot {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Plot {
    fn x_range(&self) -> (f64, f64) {
        (self.left, self.right)
    }

    fn y_range(&self) -> (f64, f64) {
        (self.bottom, self.top)
    }

    fn center_x(&self) -> f64 {
        (self.left + self.right) / 2.0
    }
}

/// Smallest canvas width that leaves a usable plot area
pub const MIN_WIDTH: u32 = 480;
/// Smallest canvas height that leaves a usable plot area, rotated bar labels included
pub const MIN_HEIGHT: u32 = 360;

/// Draw `figure` as an SVG document of the given pixel size
///
/// Callers are expected to pass at least [`MIN_WIDTH`] x [`MIN_HEIGHT`].
pub fn render(figure: &Figure, width: u32, height: u32) -> String {
    let (w, h) = (f64::from(width), f64::from(height));
    let bottom_margin = match figure.body {
        Body::Bars(_) => 170.0,
        _ => 70.0,
    };
    let plot = Plot {
        left: 80.0,
        top: 60.0,
        right: w - 30.0,
        bottom: h - bottom_margin,
    };

    let mut canvas = Canvas::new(width, height);
    canvas.text(w / 2.0, 34.0, &figure.title, TextStyle::new(18, "middle").bold());

    match &figure.body {
        Body::Bars(bars) => draw_bars(&mut canvas, plot, bars),
        Body::Histogram { histogram, density } => {
            draw_histogram(&mut canvas, plot, histogram, density.as_deref())
        }
        Body::Xy { series, legend } => {
            draw_xy(&mut canvas, plot, series);
            if *legend {
                draw_legend(&mut canvas, plot, series);
            }
        }
    }

    canvas.text(plot.center_x(), h - 16.0, &figure.x_label, TextStyle::new(14, "middle"));
    let mid_y = (plot.top + plot.bottom) / 2.0;
    canvas.text(22.0, mid_y, &figure.y_label, TextStyle::new(14, "middle").rotated(-90.0));

    canvas.finish()
}

fn draw_y_axis(canvas: &mut Canvas, plot: Plot, axis: &Axis) {
    for &tick in &axis.ticks {
        let y = axis.map(tick, plot.y_range());
        canvas.line((plot.left, y), (plot.right, y), GRID_COLOR, 1.0);
        canvas.text(plot.left - 8.0, y + 4.0, &axis.label(tick), TextStyle::new(12, "end"));
    }
}

fn draw_x_ticks(canvas: &mut Canvas, plot: Plot, axis: &Axis) {
    for &tick in &axis.ticks {
        let x = axis.map(tick, plot.x_range());
        canvas.line((x, plot.bottom), (x, plot.bottom + 5.0), AXIS_COLOR, 1.0);
        canvas.text(x, plot.bottom + 20.0, &axis.label(tick), TextStyle::new(12, "middle"));
    }
}

fn draw_frame(canvas: &mut Canvas, plot: Plot) {
    canvas.line((plot.left, plot.top), (plot.left, plot.bottom), AXIS_COLOR, 1.0);
    canvas.line((plot.left, plot.bottom), (plot.right, plot.bottom), AXIS_COLOR, 1.0);
}

fn draw_bars(canvas: &mut Canvas, plot: Plot, bars: &[(String, usize)]) {
    let max = bars.iter().map(|(_, c)| *c).max().unwrap_or(1) as f64;
    let y_axis = Axis::new(0.0, max, 5, true, true);
    draw_y_axis(canvas, plot, &y_axis);

    let band = (plot.right - plot.left) / bars.len().max(1) as f64;
    for (i, (label, count)) in bars.iter().enumerate() {
        let x = plot.left + band * i as f64;
        let y = y_axis.map(*count as f64, plot.y_range());
        let color = PALETTE[i % PALETTE.len()];
        canvas.rect(x + band * 0.1, y, band * 0.8, plot.bottom - y, color, 1.0, None);

        let cx = x + band / 2.0;
        let ly = plot.bottom + 14.0;
        canvas.text(cx, ly, &truncate_label(label), TextStyle::new(11, "end").rotated(-45.0));
    }

    draw_frame(canvas, plot);
}

fn draw_histogram(canvas: &mut Canvas, plot: Plot, histogram: &Histogram, density: Option<&[(f64, f64)]>) {
    let peak_density = density
        .map(|d| d.iter().map(|(_, y)| *y).fold(0.0, f64::max))
        .unwrap_or(0.0);
    let top = (histogram.max_count() as f64).max(peak_density);
    let y_axis = Axis::new(0.0, top, 5, false, true);
    let (lo, hi) = histogram.range();
    let x_axis = Axis::new(lo, hi, 8, false, false);

    draw_y_axis(canvas, plot, &y_axis);

    let color = PALETTE[0];
    for (i, &count) in histogram.counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let x0 = x_axis.map(histogram.edges[i], plot.x_range());
        let x1 = x_axis.map(histogram.edges[i + 1], plot.x_range());
        let y = y_axis.map(count as f64, plot.y_range());
        canvas.rect(x0, y, x1 - x0, plot.bottom - y, color, 0.6, Some("#ffffff"));
    }

    if let Some(curve) = density {
        let pixels: Vec<(f64, f64)> = curve
            .iter()
            .map(|&(x, y)| (x_axis.map(x, plot.x_range()), y_axis.map(y, plot.y_range())))
            .collect();
        canvas.polyline(&pixels, color, 2.0, false);
    }

    draw_x_ticks(canvas, plot, &x_axis);
    draw_frame(canvas, plot);
}

fn draw_xy(canvas: &mut Canvas, plot: Plot, series: &[Series]) {
    let points = series.iter().flat_map(|s| s.points.iter());
    let (mut x_lo, mut x_hi) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_lo, mut y_hi) = (0.0f64, f64::NEG_INFINITY);
    for &(x, y) in points {
        x_lo = x_lo.min(x);
        x_hi = x_hi.max(x);
        y_lo = y_lo.min(y);
        y_hi = y_hi.max(y);
    }
    if !x_lo.is_finite() {
        (x_lo, x_hi) = (0.0, 1.0);
    }
    if !y_hi.is_finite() {
        y_hi = 1.0;
    }

    let x_axis = Axis::new(x_lo - 0.5, x_hi + 0.5, 8, true, false);
    let y_axis = Axis::new(y_lo, y_hi, 5, false, true);

    draw_y_axis(canvas, plot, &y_axis);

    for s in series {
        let pixels: Vec<(f64, f64)> = s
            .points
            .iter()
            .map(|&(x, y)| (x_axis.map(x, plot.x_range()), y_axis.map(y, plot.y_range())))
            .collect();
        match s.style {
            Style::Line { dashed, markers } => {
                canvas.polyline(&pixels, s.color, 2.0, dashed);
                if markers {
                    for &(x, y) in &pixels {
                        canvas.circle(x, y, 3.5, s.color);
                    }
                }
            }
            Style::Scatter => {
                for &(x, y) in &pixels {
                    canvas.circle(x, y, 5.0, s.color);
                }
            }
        }
    }

    draw_x_ticks(canvas, plot, &x_axis);
    draw_frame(canvas, plot);
}

fn draw_legend(canvas: &mut Canvas, plot: Plot, series: &[Series]) {
    let longest = series.iter().map(|s| s.label.chars().count()).max().unwrap_or(0);
    let width = 48.0 + longest as f64 * 7.5;
    let height = 12.0 + 22.0 * series.len() as f64;
    let (x, y) = (plot.left + 12.0, plot.top + 12.0);

    canvas.rect(x, y, width, height, "#ffffff", 0.9, Some("#cccccc"));
    for (i, s) in series.iter().enumerate() {
        let row = y + 17.0 + 22.0 * i as f64;
        match s.style {
            Style::Line { dashed, markers } => {
                canvas.polyline(&[(x + 8.0, row), (x + 32.0, row)], s.color, 2.0, dashed);
                if markers {
                    canvas.circle(x + 20.0, row, 3.5, s.color);
                }
            }
            Style::Scatter => canvas.circle(x + 20.0, row, 5.0, s.color),
        }
        canvas.text(x + 40.0, row + 4.5, &s.label, TextStyle::new(12, "start"));
    }
}
