//! SVG charts
//!
//! Two standalone figures with embedded styles:
//! - regression: scatter of the data with the fitted line drawn across it
//! - critical values: Student's t density on [-5, 5] with the rejection
//!   regions shaded and dashed lines at the critical t values

use crate::critical::{CriticalValueResult, StudentT, TailMode};
use crate::error::Result;
use crate::regression::RegressionResult;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 420.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;

/// Density chart covers t in [-T_EXTENT, T_EXTENT]
const T_EXTENT: f64 = 5.0;
const DENSITY_SAMPLES: usize = 400;

const STYLES: &str = r#"
    text { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; font-size: 12px; fill: #333; }
    .title { font-size: 15px; font-weight: bold; }
    .axis { stroke: #333; stroke-width: 1; }
    .grid { stroke: #e5e5e5; stroke-width: 1; }
    .point { fill: #4a90d9; stroke: #2c5f93; stroke-width: 1; }
    .fit { stroke: #cc0000; stroke-width: 2; fill: none; }
    .density { stroke: #2c5f93; stroke-width: 2; fill: none; }
    .region { fill: #cc0000; fill-opacity: 0.35; stroke: none; }
    .critical { stroke: #cc0000; stroke-width: 1.5; stroke-dasharray: 6 4; }
    "#;

/// Escape XML special characters in labels
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Linear map from data coordinates onto the plot area
#[derive(Debug, Clone, Copy)]
struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    /// Frame around the given ranges with 5% padding, widening empty ranges
    fn padded(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        let (x_min, x_max) = pad_range(x_min, x_max);
        let (y_min, y_max) = pad_range(y_min, y_max);
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    fn px(&self, x: f64) -> f64 {
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        MARGIN_LEFT + (x - self.x_min) / (self.x_max - self.x_min) * plot_width
    }

    fn py(&self, y: f64) -> f64 {
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        HEIGHT - MARGIN_BOTTOM - (y - self.y_min) / (self.y_max - self.y_min) * plot_height
    }

    fn axes(&self, x_label: &str, y_label: &str) -> String {
        let mut svg = String::new();
        let left = MARGIN_LEFT;
        let right = WIDTH - MARGIN_RIGHT;
        let top = MARGIN_TOP;
        let bottom = HEIGHT - MARGIN_BOTTOM;

        for i in 0..=4 {
            let fraction = i as f64 / 4.0;
            let x = self.x_min + fraction * (self.x_max - self.x_min);
            let y = self.y_min + fraction * (self.y_max - self.y_min);
            let (gx, gy) = (self.px(x), self.py(y));

            svg.push_str(&format!(
                "  <line class=\"grid\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"/>\n",
                gx, top, gx, bottom
            ));
            svg.push_str(&format!(
                "  <line class=\"grid\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"/>\n",
                left, gy, right, gy
            ));
            svg.push_str(&format!(
                "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>\n",
                gx,
                bottom + 16.0,
                tick_label(x)
            ));
            svg.push_str(&format!(
                "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\">{}</text>\n",
                left - 6.0,
                gy + 4.0,
                tick_label(y)
            ));
        }

        svg.push_str(&format!(
            "  <line class=\"axis\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"/>\n",
            left, bottom, right, bottom
        ));
        svg.push_str(&format!(
            "  <line class=\"axis\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"/>\n",
            left, top, left, bottom
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>\n",
            (left + right) / 2.0,
            HEIGHT - 12.0,
            escape_xml(x_label)
        ));
        svg.push_str(&format!(
            "  <text x=\"16\" y=\"{:.2}\" text-anchor=\"middle\" transform=\"rotate(-90 16 {:.2})\">{}</text>\n",
            (top + bottom) / 2.0,
            (top + bottom) / 2.0,
            escape_xml(y_label)
        ));
        svg
    }
}

fn pad_range(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    if span > 0.0 {
        (min - 0.05 * span, max + 0.05 * span)
    } else {
        let half = min.abs().max(1.0) * 0.5;
        (min - half, max + half)
    }
}

fn tick_label(value: f64) -> String {
    let text = if value.abs() >= 1000.0 || value == value.trunc() {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    };
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

fn document(title: &str, body: &str) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = WIDTH,
        h = HEIGHT
    ));
    svg.push_str("  <style>");
    svg.push_str(STYLES);
    svg.push_str("</style>\n");
    svg.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text class=\"title\" x=\"{:.2}\" y=\"24\" text-anchor=\"middle\">{}</text>\n",
        WIDTH / 2.0,
        escape_xml(title)
    ));
    svg.push_str(body);
    svg.push_str("</svg>\n");
    svg
}

/// Scatter plot of the data with the fitted line
pub fn regression_chart(result: &RegressionResult) -> String {
    let (x_min, x_max) = min_max(result.rows.iter().map(|row| row.x));
    let line_ends = [result.line.predict(x_min), result.line.predict(x_max)];
    let (y_min, y_max) = min_max(result.rows.iter().map(|row| row.y).chain(line_ends));
    let frame = Frame::padded(x_min, x_max, y_min, y_max);

    let mut body = frame.axes("x", "y");
    body.push_str(&format!(
        "  <line class=\"fit\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"/>\n",
        frame.px(x_min),
        frame.py(line_ends[0]),
        frame.px(x_max),
        frame.py(line_ends[1])
    ));
    for row in &result.rows {
        body.push_str(&format!(
            "  <circle class=\"point\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"4\"/>\n",
            frame.px(row.x),
            frame.py(row.y)
        ));
    }

    document(&format!("Best-fit line: {}", result.equation(4)), &body)
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min.is_finite() && max.is_finite() {
        (min, max)
    } else {
        (0.0, 1.0)
    }
}

/// Student's t density with shaded rejection regions
///
/// # Errors
/// Propagates an invalid degrees-of-freedom value from the distribution.
pub fn critical_chart(result: &CriticalValueResult) -> Result<String> {
    let distribution = StudentT::new(result.df as f64)?;
    let peak = distribution.pdf(0.0);
    let frame = Frame {
        x_min: -T_EXTENT,
        x_max: T_EXTENT,
        y_min: 0.0,
        y_max: peak * 1.1,
    };

    let mut body = frame.axes("t", "density");

    for region in result.rejection_regions() {
        let lower = region.lower.max(-T_EXTENT);
        let upper = region.upper.min(T_EXTENT);
        if lower < upper {
            body.push_str(&format!(
                "  <path class=\"region\" d=\"{}\"/>\n",
                area_path(&frame, &distribution, lower, upper)
            ));
        }
    }

    body.push_str(&format!(
        "  <path class=\"density\" d=\"{}\"/>\n",
        curve_path(&frame, &distribution, -T_EXTENT, T_EXTENT)
    ));

    let mut critical_lines = vec![result.t_critical];
    if result.tail == TailMode::TwoTailed {
        critical_lines.push(-result.t_critical);
    }
    for t in critical_lines.into_iter().filter(|t| t.abs() <= T_EXTENT) {
        body.push_str(&format!(
            "  <line class=\"critical\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"/>\n",
            frame.px(t),
            frame.py(0.0),
            frame.px(t),
            frame.py(frame.y_max)
        ));
        body.push_str(&format!(
            "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">t = {:.3}</text>\n",
            frame.px(t),
            MARGIN_TOP - 4.0,
            t
        ));
    }

    let title = format!(
        "t distribution, df = {}, α = {} ({})",
        result.df, result.alpha, result.tail
    );
    Ok(document(&title, &body))
}

/// Polyline through the density from `from` to `to`
fn curve_path(frame: &Frame, distribution: &StudentT, from: f64, to: f64) -> String {
    let mut path = String::new();
    for (i, t) in sample_points(from, to).enumerate() {
        let command = if i == 0 { 'M' } else { 'L' };
        path.push_str(&format!(
            "{}{:.2},{:.2} ",
            command,
            frame.px(t),
            frame.py(distribution.pdf(t))
        ));
    }
    path.trim_end().to_string()
}

/// Closed area between the density and the t axis on [from, to]
fn area_path(frame: &Frame, distribution: &StudentT, from: f64, to: f64) -> String {
    let mut path = format!("M{:.2},{:.2} ", frame.px(from), frame.py(0.0));
    for t in sample_points(from, to) {
        path.push_str(&format!(
            "L{:.2},{:.2} ",
            frame.px(t),
            frame.py(distribution.pdf(t))
        ));
    }
    path.push_str(&format!("L{:.2},{:.2} Z", frame.px(to), frame.py(0.0)));
    path
}

/// Evenly spaced points covering [from, to], endpoints included
fn sample_points(from: f64, to: f64) -> impl Iterator<Item = f64> {
    let steps = ((to - from) / (2.0 * T_EXTENT) * DENSITY_SAMPLES as f64)
        .ceil()
        .max(1.0) as usize;
    (0..=steps).map(move |i| from + (to - from) * i as f64 / steps as f64)
}
