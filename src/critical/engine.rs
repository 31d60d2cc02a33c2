// Critical t and r values for testing the significance of a Pearson r
//
// df = n − 2
// one-tailed:  t = Q(1 − α; df)
// two-tailed:  t = Q(1 − α/2; df)
// r = t / sqrt(t² + df)
//
// The quantile is taken in the upper tail directly (P(T > t) = α or α/2).

use super::student_t::StudentT;
use crate::error::{CalcError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One- or two-tailed hypothesis test
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum TailMode {
    /// Single rejection region of mass α above t
    #[serde(rename = "1-tailed")]
    #[value(name = "1-tailed")]
    OneTailed,
    /// Two rejection regions of mass α/2 beyond ±t
    #[default]
    #[serde(rename = "2-tailed")]
    #[value(name = "2-tailed")]
    TwoTailed,
}

impl TailMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TailMode::OneTailed => "1-tailed",
            TailMode::TwoTailed => "2-tailed",
        }
    }

    /// Probability mass of each rejection region
    pub fn tail_probability(&self, alpha: f64) -> f64 {
        match self {
            TailMode::OneTailed => alpha,
            TailMode::TwoTailed => alpha / 2.0,
        }
    }
}

impl fmt::Display for TailMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TailMode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1-tailed" => Ok(TailMode::OneTailed),
            "2-tailed" => Ok(TailMode::TwoTailed),
            other => Err(CalcError::invalid_parameter(
                "tail",
                other,
                "expected \"1-tailed\" or \"2-tailed\"",
            )),
        }
    }
}

/// Parameters of a critical-value lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalValueInput {
    /// Significance level, strictly within (0, 1)
    pub alpha: f64,
    /// Sample size, at least 3
    pub n: usize,
    pub tail: TailMode,
}

impl CriticalValueInput {
    pub fn new(alpha: f64, n: usize, tail: TailMode) -> Self {
        Self { alpha, n, tail }
    }

    /// Check the input, returning the degrees of freedom
    ///
    /// # Errors
    /// - [`CalcError::InsufficientSampleSize`] when n < 3
    /// - [`CalcError::InvalidParameter`] when alpha is not strictly within (0, 1),
    ///   or so small that the per-tail mass underflows to zero
    pub fn validate(&self) -> Result<usize> {
        if self.n < 3 {
            return Err(CalcError::InsufficientSampleSize { n: self.n });
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(CalcError::invalid_parameter(
                "alpha",
                self.alpha,
                "significance level must lie strictly within (0, 1)",
            ));
        }
        if self.tail.tail_probability(self.alpha) <= 0.0 {
            return Err(CalcError::invalid_parameter(
                "alpha",
                self.alpha,
                format!("{} tail mass underflows to zero", self.tail),
            ));
        }
        Ok(self.n - 2)
    }

    pub fn compute(&self) -> Result<CriticalValueResult> {
        critical_values(self.alpha, self.n, self.tail)
    }
}

/// Rejection region of the t statistic, `lower` may be −∞ and `upper` +∞
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RejectionRegion {
    pub lower: f64,
    pub upper: f64,
    /// Probability mass under the t density
    pub probability: f64,
}

/// Immutable outcome of one critical-value lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriticalValueResult {
    pub alpha: f64,
    pub n: usize,
    pub tail: TailMode,
    pub df: usize,
    /// Critical t, the upper-tail quantile at α (one-tailed) or α/2 (two-tailed)
    ///
    /// Positive except for one-tailed α > 0.5, where Q(1 − α) falls below
    /// the median and the threshold is negative.
    pub t_critical: f64,
    /// Critical r with the same sign as `t_critical`
    pub r_critical: f64,
}

impl CriticalValueResult {
    /// Regions of the t axis where H₀ (ρ = 0) is rejected
    pub fn rejection_regions(&self) -> Vec<RejectionRegion> {
        let mass = self.tail.tail_probability(self.alpha);
        let upper = RejectionRegion {
            lower: self.t_critical,
            upper: f64::INFINITY,
            probability: mass,
        };
        match self.tail {
            TailMode::OneTailed => vec![upper],
            TailMode::TwoTailed => vec![
                RejectionRegion {
                    lower: f64::NEG_INFINITY,
                    upper: -self.t_critical,
                    probability: mass,
                },
                upper,
            ],
        }
    }

    /// Whether an observed r from a sample of this size is significant
    ///
    /// One-tailed tests look for a positive correlation.
    pub fn rejects(&self, r: f64) -> bool {
        match self.tail {
            TailMode::OneTailed => r >= self.r_critical,
            TailMode::TwoTailed => r.abs() >= self.r_critical,
        }
    }
}

/// Critical t and r for significance level `alpha`, sample size `n`, and tail mode
///
/// # Errors
/// - [`CalcError::InsufficientSampleSize`] when n < 3 (df = n − 2 must be positive)
/// - [`CalcError::InvalidParameter`] when alpha is not strictly within (0, 1)
///
/// # Example
/// ```
/// use statcalc::critical::{critical_values, TailMode};
///
/// let result = critical_values(0.05, 14, TailMode::TwoTailed).unwrap();
/// assert_eq!(result.df, 12);
/// assert!((result.t_critical - 2.179).abs() < 1e-3);
/// assert!((result.r_critical - 0.532).abs() < 1e-3);
/// ```
pub fn critical_values(alpha: f64, n: usize, tail: TailMode) -> Result<CriticalValueResult> {
    let df = CriticalValueInput::new(alpha, n, tail).validate()?;

    let distribution = StudentT::new(df as f64)?;
    let t_critical = distribution.upper_quantile(tail.tail_probability(alpha))?;
    let r_critical = r_from_t(t_critical, df as f64);

    tracing::debug!(alpha, n, df, %tail, t_critical, r_critical, "computed critical values");

    Ok(CriticalValueResult {
        alpha,
        n,
        tail,
        df,
        t_critical,
        r_critical,
    })
}

/// r = t / sqrt(t² + df)
pub fn r_from_t(t: f64, df: f64) -> f64 {
    let scale = df.sqrt();
    if t.abs() > scale {
        // t² may overflow: r = sign(t) / sqrt(1 + df/t²)
        let ratio = scale / t;
        t.signum() / (1.0 + ratio * ratio).sqrt()
    } else {
        t / (t * t + df).sqrt()
    }
}

/// t = r·sqrt(df) / sqrt(1 − r²), the inverse of [`r_from_t`]
///
/// # Errors
/// [`CalcError::InvalidParameter`] unless |r| < 1 and df > 0.
pub fn t_from_r(r: f64, df: f64) -> Result<f64> {
    if !(r.abs() < 1.0) {
        return Err(CalcError::invalid_parameter(
            "r",
            r,
            "must lie strictly within (-1, 1)",
        ));
    }
    if !(df > 0.0) || !df.is_finite() {
        return Err(CalcError::invalid_parameter(
            "df",
            df,
            "degrees of freedom must be finite and positive",
        ));
    }
    Ok(r * df.sqrt() / (1.0 - r * r).sqrt())
}
