// Ordinary least-squares line fitting
//
// Two algorithms produce the same line for well-conditioned data:
// - the closed-form normal equations over raw sums (as shown in the
//   worked-example table)
// - a centered two-pass least-squares solve of the degree-1 polynomial,
//   which loses less precision when x values are large relative to their spread
//
// Both share one degenerate-input policy: zero variance in x never raises,
// it resolves to slope = 0 and intercept = mean(y).

use super::statistics::compute_sums;
use crate::dataset::Dataset;
use crate::error::{CalcError, Result};
use serde::{Deserialize, Serialize};

/// Algorithm used to solve for slope and intercept
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum FitMethod {
    /// b = (nΣxy − ΣxΣy) / (nΣx² − (Σx)²), a = (Σy − bΣx) / n
    #[default]
    NormalEquation,
    /// Centered least-squares fit of a degree-1 polynomial
    LeastSquares,
}

impl std::fmt::Display for FitMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitMethod::NormalEquation => write!(f, "normal-equation"),
            FitMethod::LeastSquares => write!(f, "least-squares"),
        }
    }
}

/// Best-fit line y = intercept + slope·x
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FittedLine {
    pub slope: f64,
    pub intercept: f64,
    /// Set when x had zero variance and the fallback line was used
    pub degenerate: bool,
}

impl FittedLine {
    /// Evaluate the line at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Σ(yᵢ − ŷᵢ)² over the dataset
    pub fn residual_sum_of_squares(&self, dataset: &Dataset) -> f64 {
        dataset
            .iter()
            .map(|p| {
                let residual = p.y - self.predict(p.x);
                residual * residual
            })
            .sum()
    }

    fn fallback(mean_y: f64) -> Self {
        Self {
            slope: 0.0,
            intercept: mean_y,
            degenerate: true,
        }
    }
}

/// Fit a line to the dataset with the chosen method
///
/// # Errors
/// [`CalcError::EmptyDataset`] when the dataset has no points, and
/// [`CalcError::InvalidInput`] when the coordinates are so large that the
/// sums, the slope or the intercept overflow `f64`.
pub fn fit_line(dataset: &Dataset, method: FitMethod) -> Result<FittedLine> {
    if dataset.is_empty() {
        return Err(CalcError::EmptyDataset);
    }

    let line = match method {
        FitMethod::NormalEquation => fit_normal_equation(dataset)?,
        FitMethod::LeastSquares => fit_least_squares(dataset)?,
    };
    ensure_finite(&[("slope", line.slope), ("intercept", line.intercept)])?;

    if line.degenerate {
        tracing::debug!(
            %method,
            intercept = line.intercept,
            "zero x-variance, using slope = 0 fallback"
        );
    } else {
        tracing::debug!(%method, slope = line.slope, intercept = line.intercept, "fitted line");
    }
    Ok(line)
}

/// Reject intermediate or final values that left the finite range
fn ensure_finite(values: &[(&str, f64)]) -> Result<()> {
    match values.iter().find(|(_, v)| !v.is_finite()) {
        Some((name, v)) => Err(CalcError::InvalidInput(format!(
            "{name} evaluates to {v}: the coordinates are too large to fit in f64 arithmetic"
        ))),
        None => Ok(()),
    }
}

fn fit_normal_equation(dataset: &Dataset) -> Result<FittedLine> {
    let sums = compute_sums(dataset);
    let n = sums.count();
    let denominator = sums.x_spread();

    if denominator == 0.0 || dataset.has_constant_x() {
        return Ok(FittedLine::fallback(sums.sum_y / n));
    }

    let cross = sums.cross_term();
    ensure_finite(&[
        ("Σx", sums.sum_x),
        ("Σy", sums.sum_y),
        ("Σx²", sums.sum_x2),
        ("Σxy", sums.sum_xy),
        ("nΣx² − (Σx)²", denominator),
        ("nΣxy − ΣxΣy", cross),
    ])?;

    let slope = cross / denominator;
    Ok(FittedLine {
        slope,
        intercept: (sums.sum_y - slope * sums.sum_x) / n,
        degenerate: false,
    })
}

fn fit_least_squares(dataset: &Dataset) -> Result<FittedLine> {
    let n = dataset.len() as f64;
    let mean_x = dataset.xs().sum::<f64>() / n;
    let mean_y = dataset.ys().sum::<f64>() / n;

    let (sxx, sxy) = dataset.iter().fold((0.0, 0.0), |(sxx, sxy), p| {
        let dx = p.x - mean_x;
        (sxx + dx * dx, sxy + dx * (p.y - mean_y))
    });

    if sxx == 0.0 || dataset.has_constant_x() {
        return Ok(FittedLine::fallback(mean_y));
    }
    ensure_finite(&[("mean(x)", mean_x), ("mean(y)", mean_y), ("Sxx", sxx), ("Sxy", sxy)])?;

    let slope = sxy / sxx;
    Ok(FittedLine {
        slope,
        intercept: mean_y - slope * mean_x,
        degenerate: false,
    })
}
