//! Plain-text worked solutions
//!
//! Renders a regression analysis as the step-by-step calculation a student
//! would write out by hand, and a critical-value lookup with the formulas
//! behind it.

use crate::critical::{CriticalValueResult, TailMode};
use crate::format::format_value;
use crate::regression::{FitMethod, RegressionResult, SumStatistics};

const UNDERSTANDING_R: &[&str] = &[
    "r ranges from -1 to +1",
    "r > 0: y tends to increase as x increases",
    "r < 0: y tends to decrease as x increases",
    "r = 0: no linear relationship",
    "|r| >= 0.9 very strong, >= 0.7 strong, >= 0.5 moderate, >= 0.3 weak, otherwise very weak",
    "r² is the share of the variance in y explained by the line",
];

/// Title with an underline of matching width
fn heading(title: &str) -> String {
    format!("{}\n{}\n", title, "=".repeat(title.chars().count()))
}

/// Full worked solution for a regression analysis
pub fn regression_summary(result: &RegressionResult, decimals: usize) -> String {
    let fmt = |v: f64| format_value(v, decimals);
    let mut out = String::new();

    out.push_str(&heading(&format!("Linear Regression ({})", result.method)));
    out.push('\n');
    out.push_str(&render_table(result, decimals));
    out.push('\n');

    let s = &result.sums;
    out.push_str("Step 1: Compute necessary values\n");
    out.push_str(&format!("  n   = {}\n", s.n));
    out.push_str(&format!("  Σx  = {}\n", fmt(s.sum_x)));
    out.push_str(&format!("  Σy  = {}\n", fmt(s.sum_y)));
    out.push_str(&format!("  Σxy = {}\n", fmt(s.sum_xy)));
    out.push_str(&format!("  Σx² = {}\n", fmt(s.sum_x2)));
    out.push_str(&format!("  Σy² = {}\n", fmt(s.sum_y2)));
    out.push('\n');

    out.push_str("Step 2: Compute slope (b)\n");
    out.push_str(&render_slope_step(result, decimals));
    out.push('\n');

    out.push_str("Step 3: Compute intercept (a)\n");
    out.push_str("  a = [Σy − bΣx] / n\n");
    out.push_str(&format!(
        "    = [{} − {} × {}] / {}\n",
        fmt(s.sum_y),
        fmt(result.line.slope),
        fmt(s.sum_x),
        s.n
    ));
    out.push_str(&format!("    = {}\n", fmt(result.line.intercept)));
    out.push('\n');

    out.push_str(&format!("Best-fit line: {}\n", result.equation(decimals)));

    if result.line.degenerate {
        out.push_str(
            "Note: all x values are identical, so the slope is taken as 0 and the intercept as mean(y).\n",
        );
    }

    if let Some(correlation) = &result.correlation {
        out.push('\n');
        out.push_str("Correlation coefficient (r)\n");
        out.push_str("  r = [nΣxy − ΣxΣy] / sqrt([nΣx² − (Σx)²][nΣy² − (Σy)²])\n");
        out.push_str(&format!(
            "    = {} / {}\n",
            fmt(correlation.numerator),
            fmt(correlation.denominator)
        ));
        out.push_str(&format!("    = {}\n", fmt(correlation.r)));
        out.push_str(&format!("  r² = {}\n", fmt(correlation.r_squared())));
        out.push_str(&format!("  Interpretation: {}\n", correlation.strength));
        if correlation.degenerate {
            out.push_str("  Note: x or y has zero variance, so r is taken as 0.\n");
        }

        out.push('\n');
        out.push_str("Understanding r\n");
        for line in UNDERSTANDING_R {
            out.push_str(&format!("  - {}\n", line));
        }
    }

    out
}

/// `x y x² y² xy` table with a totals row
fn render_table(result: &RegressionResult, decimals: usize) -> String {
    let header = ["x", "y", "x²", "y²", "xy"];
    let mut cells: Vec<[String; 5]> = result
        .rows
        .iter()
        .map(|row| {
            [row.x, row.y, row.x2, row.y2, row.xy].map(|v| format_value(v, decimals))
        })
        .collect();
    let s = &result.sums;
    cells.push([s.sum_x, s.sum_y, s.sum_x2, s.sum_y2, s.sum_xy].map(|v| format_value(v, decimals)));

    let mut widths = header.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_row = |label: &str, row: &[String]| {
        let body: Vec<String> = row
            .iter()
            .zip(widths.iter())
            .map(|(cell, &w)| format!("{:>w$}", cell, w = w))
            .collect();
        format!("{:<5} {}\n", label, body.join("  "))
    };

    let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    let mut out = render_row("", &header[..]);
    let total_width = widths.iter().sum::<usize>() + 2 * (widths.len() - 1) + 6;
    out.push_str(&format!("{}\n", "-".repeat(total_width)));

    let (totals, points) = cells.split_last().map_or((None, &cells[..]), |(t, p)| (Some(t), p));
    for row in points {
        out.push_str(&render_row("", &row[..]));
    }
    if let Some(totals) = totals {
        out.push_str(&format!("{}\n", "-".repeat(total_width)));
        out.push_str(&render_row("Σ", &totals[..]));
    }
    out
}

fn render_slope_step(result: &RegressionResult, decimals: usize) -> String {
    let fmt = |v: f64| format_value(v, decimals);
    let s: &SumStatistics = &result.sums;
    let mut out = String::new();

    match result.method {
        FitMethod::NormalEquation => {
            out.push_str("  b = [nΣxy − ΣxΣy] / [nΣx² − (Σx)²]\n");
            out.push_str(&format!(
                "    = [{} × {} − {} × {}] / [{} × {} − {}²]\n",
                s.n,
                fmt(s.sum_xy),
                fmt(s.sum_x),
                fmt(s.sum_y),
                s.n,
                fmt(s.sum_x2),
                fmt(s.sum_x)
            ));
            out.push_str(&format!(
                "    = {} / {}\n",
                fmt(s.cross_term()),
                fmt(s.x_spread())
            ));
        }
        FitMethod::LeastSquares => {
            let mean_x = s.mean_x().unwrap_or(0.0);
            let mean_y = s.mean_y().unwrap_or(0.0);
            out.push_str("  b = Σ(x − x̄)(y − ȳ) / Σ(x − x̄)²\n");
            out.push_str(&format!(
                "    with x̄ = {}, ȳ = {}\n",
                fmt(mean_x),
                fmt(mean_y)
            ));
            let n = s.count();
            out.push_str(&format!(
                "    = {} / {}\n",
                fmt(s.cross_term() / n),
                fmt(s.x_spread() / n)
            ));
        }
    }
    out.push_str(&format!("    = {}\n", fmt(result.line.slope)));
    out
}

/// Critical-value lookup with rejection regions and formulas
pub fn critical_summary(result: &CriticalValueResult, decimals: usize) -> String {
    let fmt = |v: f64| format_value(v, decimals);
    let mut out = String::new();

    out.push_str(&heading("Critical Values of Pearson's r"));
    out.push('\n');
    out.push_str(&format!("  Sample size (n):         {}\n", result.n));
    out.push_str(&format!("  Degrees of freedom (df): {}\n", result.df));
    out.push_str(&format!("  Significance level (α):  {}\n", fmt(result.alpha)));
    out.push_str(&format!("  Test:                    {}\n", result.tail));
    out.push('\n');

    let sign = match result.tail {
        TailMode::OneTailed => "",
        TailMode::TwoTailed => "±",
    };
    out.push_str(&format!("  Critical t: {}{}\n", sign, fmt(result.t_critical)));
    out.push_str(&format!("  Critical r: {}{}\n", sign, fmt(result.r_critical)));
    out.push('\n');

    out.push_str("Rejection regions (reject H₀: ρ = 0)\n");
    for region in result.rejection_regions() {
        let bound = if region.lower.is_infinite() {
            format!("t < {}", fmt(region.upper))
        } else {
            format!("t > {}", fmt(region.lower))
        };
        out.push_str(&format!(
            "  {:<16} probability {}\n",
            bound,
            fmt(region.probability)
        ));
    }
    out.push('\n');

    out.push_str("Formulas\n");
    out.push_str("  df = n − 2\n");
    match result.tail {
        TailMode::OneTailed => out.push_str("  t  = t(1 − α; df)\n"),
        TailMode::TwoTailed => out.push_str("  t  = t(1 − α/2; df)\n"),
    }
    out.push_str("  r  = t / sqrt(t² + df)\n");

    out
}
