// Pearson correlation coefficient and its plain-language interpretation
//
// r = [nΣxy − ΣxΣy] / sqrt([nΣx² − (Σx)²][nΣy² − (Σy)²])
//
// A zero denominator (constant x or constant y) yields r = 0 rather than an
// error. Rounding can push |r| a hair past 1 for collinear data; excursions
// within R_TOLERANCE are clamped, anything larger is rejected.

use super::statistics::compute_sums;
use crate::dataset::Dataset;
use crate::error::{CalcError, Result};
use serde::Serialize;
use std::fmt;

/// Largest excursion beyond ±1 accepted as rounding noise
const R_TOLERANCE: f64 = 1e-12;

/// Correlation coefficient together with the terms of its formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correlation {
    /// Pearson r in [-1, 1]
    pub r: f64,
    /// nΣxy − ΣxΣy
    pub numerator: f64,
    /// sqrt([nΣx² − (Σx)²][nΣy² − (Σy)²]), zero for degenerate data
    pub denominator: f64,
    pub strength: CorrelationStrength,
    /// Set when the denominator vanished and r fell back to 0
    pub degenerate: bool,
}

impl Correlation {
    /// Coefficient of determination
    pub fn r_squared(&self) -> f64 {
        self.r * self.r
    }
}

/// Strength bins on |r|, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrengthTier {
    None,
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl StrengthTier {
    pub fn label(&self) -> &'static str {
        match self {
            StrengthTier::None => "No",
            StrengthTier::VeryWeak => "Very weak",
            StrengthTier::Weak => "Weak",
            StrengthTier::Moderate => "Moderate",
            StrengthTier::Strong => "Strong",
            StrengthTier::VeryStrong => "Very strong",
        }
    }
}

/// Sign of a non-zero correlation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Positive,
    Negative,
}

/// Qualitative reading of r, e.g. "Strong negative correlation"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CorrelationStrength {
    pub tier: StrengthTier,
    /// `None` when r is exactly zero
    pub direction: Option<Direction>,
}

impl CorrelationStrength {
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            None => write!(f, "No correlation"),
            Some(Direction::Positive) => write!(f, "{} positive correlation", self.tier.label()),
            Some(Direction::Negative) => write!(f, "{} negative correlation", self.tier.label()),
        }
    }
}

/// Map r onto the strength ladder
///
/// Bins are half-open on |r| with boundaries belonging to the stronger bin:
/// ≥0.9 very strong, ≥0.7 strong, ≥0.5 moderate, ≥0.3 weak, >0 very weak,
/// 0 none. A NaN input maps to no correlation.
pub fn classify_strength(r: f64) -> CorrelationStrength {
    let magnitude = r.abs();
    let tier = if magnitude >= 0.9 {
        StrengthTier::VeryStrong
    } else if magnitude >= 0.7 {
        StrengthTier::Strong
    } else if magnitude >= 0.5 {
        StrengthTier::Moderate
    } else if magnitude >= 0.3 {
        StrengthTier::Weak
    } else if magnitude > 0.0 {
        StrengthTier::VeryWeak
    } else {
        StrengthTier::None
    };

    let direction = match tier {
        StrengthTier::None => None,
        _ if r > 0.0 => Some(Direction::Positive),
        _ => Some(Direction::Negative),
    };

    CorrelationStrength { tier, direction }
}

/// Pearson correlation coefficient of the dataset
///
/// # Errors
/// - [`CalcError::EmptyDataset`] for an empty dataset
/// - [`CalcError::InvalidInput`] when the sums overflow, or when r lies
///   outside [-1, 1] by more than rounding noise
pub fn correlation_coefficient(dataset: &Dataset) -> Result<Correlation> {
    if dataset.is_empty() {
        return Err(CalcError::EmptyDataset);
    }

    let sums = compute_sums(dataset);
    let numerator = sums.cross_term();
    let product = sums.x_spread() * sums.y_spread();

    if product <= 0.0 || dataset.has_constant_x() || dataset.has_constant_y() {
        tracing::debug!(numerator, product, "zero variance, using r = 0 fallback");
        return Ok(Correlation {
            r: 0.0,
            numerator,
            denominator: product.max(0.0).sqrt(),
            strength: classify_strength(0.0),
            degenerate: true,
        });
    }

    if !numerator.is_finite() || !product.is_finite() {
        return Err(CalcError::InvalidInput(format!(
            "correlation sums overflow f64 (numerator {numerator}, spread product {product})"
        )));
    }

    let denominator = product.sqrt();
    let raw = numerator / denominator;

    if !raw.is_finite() || raw.abs() > 1.0 + R_TOLERANCE {
        return Err(CalcError::InvalidInput(format!(
            "correlation coefficient {} is outside [-1, 1]; the data is too ill-conditioned",
            raw
        )));
    }

    if raw.abs() > 1.0 {
        tracing::warn!(raw, "correlation exceeded [-1, 1] by rounding, clamping");
    }
    let r = raw.clamp(-1.0, 1.0);
    tracing::debug!(r, numerator, denominator, "computed correlation");

    Ok(Correlation {
        r,
        numerator,
        denominator,
        strength: classify_strength(r),
        degenerate: false,
    })
}
