// RegressionEngine: one entry point over both fitting variants
//
// Callers pick the fitting algorithm and whether the correlation analysis
// is wanted; the result carries every intermediate sum so a worked example
// can be reproduced from it.

use super::correlation::{correlation_coefficient, Correlation};
use super::fit::{fit_line, FitMethod, FittedLine};
use super::statistics::{compute_sums, derived_rows, DerivedRow, SumStatistics};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::format::format_value;
use serde::Serialize;

/// Stateless regression calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegressionEngine {
    method: FitMethod,
    correlation: bool,
}

impl Default for RegressionEngine {
    fn default() -> Self {
        Self {
            method: FitMethod::NormalEquation,
            correlation: true,
        }
    }
}

impl RegressionEngine {
    pub fn new(method: FitMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Enable or disable the correlation coefficient and its interpretation
    pub fn with_correlation(mut self, enabled: bool) -> Self {
        self.correlation = enabled;
        self
    }

    pub fn method(&self) -> FitMethod {
        self.method
    }

    pub fn computes_correlation(&self) -> bool {
        self.correlation
    }

    /// Run the full analysis on a dataset
    ///
    /// # Errors
    /// Propagates [`crate::CalcError::EmptyDataset`] and, when correlation is
    /// enabled, [`crate::CalcError::InvalidInput`] for ill-conditioned data.
    ///
    /// # Example
    /// ```
    /// use statcalc::{Dataset, RegressionEngine};
    ///
    /// let data: Dataset = "[(1, 3), (2, 5), (3, 7)]".parse().unwrap();
    /// let result = RegressionEngine::default().analyze(&data).unwrap();
    /// assert!((result.line.slope - 2.0).abs() < 1e-12);
    /// assert!((result.line.intercept - 1.0).abs() < 1e-12);
    /// ```
    pub fn analyze(&self, dataset: &Dataset) -> Result<RegressionResult> {
        let line = fit_line(dataset, self.method)?;
        let correlation = if self.correlation {
            Some(correlation_coefficient(dataset)?)
        } else {
            None
        };

        Ok(RegressionResult {
            method: self.method,
            sums: compute_sums(dataset),
            rows: derived_rows(dataset),
            line,
            correlation,
        })
    }
}

/// Immutable outcome of one regression analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionResult {
    pub method: FitMethod,
    pub sums: SumStatistics,
    pub rows: Vec<DerivedRow>,
    pub line: FittedLine,
    /// Present only when the engine was asked for correlation analysis
    pub correlation: Option<Correlation>,
}

impl RegressionResult {
    pub fn n(&self) -> usize {
        self.sums.n
    }

    /// Line equation in `y = a + bx` form with the given decimal places
    pub fn equation(&self, decimals: usize) -> String {
        let a = self.line.intercept;
        let b = self.line.slope;
        let sign = if b < 0.0 { '-' } else { '+' };
        format!(
            "y = {} {} {}x",
            format_value(a, decimals),
            sign,
            format_value(b.abs(), decimals)
        )
    }

    /// One-line plain-language reading of the fit
    pub fn interpretation(&self) -> String {
        let equation = self.equation(4);
        match &self.correlation {
            Some(c) => format!("{} (r = {:.4}); {}", c.strength, c.r, equation),
            None => format!("Best-fit line {}", equation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regression::StrengthTier;

    #[test]
    fn test_engine_defaults() {
        let engine = RegressionEngine::default();
        assert_eq!(engine.method(), FitMethod::NormalEquation);
        assert!(engine.computes_correlation());
    }

    #[test]
    fn test_analyze_without_correlation() {
        let ds = Dataset::from_pairs(&[(1.0, 2.0), (2.0, 4.0)]).unwrap();
        let result = RegressionEngine::new(FitMethod::LeastSquares)
            .with_correlation(false)
            .analyze(&ds)
            .unwrap();
        assert!(result.correlation.is_none());
        assert_eq!(result.method, FitMethod::LeastSquares);
        assert!(result.interpretation().starts_with("Best-fit line y ="));
    }

    #[test]
    fn test_analyze_with_correlation() {
        let ds = Dataset::from_pairs(&[(1.0, 2.0), (2.0, 4.1), (3.0, 5.9)]).unwrap();
        let result = RegressionEngine::default().analyze(&ds).unwrap();
        let c = result.correlation.unwrap();
        assert_eq!(c.strength.tier, StrengthTier::VeryStrong);
        assert!(result.interpretation().contains("Very strong positive correlation"));
        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.n(), 3);
    }

    #[test]
    fn test_equation_formatting() {
        let ds = Dataset::from_pairs(&[(0.0, 1.0), (1.0, -1.0)]).unwrap();
        let result = RegressionEngine::default().analyze(&ds).unwrap();
        assert_eq!(result.equation(2), "y = 1.00 - 2.00x");
    }

    #[test]
    fn test_equation_never_shows_negative_zero() {
        // intercept is about -1e-7
        let ds = Dataset::from_pairs(&[(1.0, 3.0), (2.0, 6.000_000_1)]).unwrap();
        let result = RegressionEngine::default().analyze(&ds).unwrap();
        assert!(result.line.intercept < 0.0);
        assert_eq!(result.equation(2), "y = 0.00 + 3.00x");
    }

    #[test]
    fn test_empty_dataset_propagates() {
        assert!(RegressionEngine::default().analyze(&Dataset::default()).is_err());
    }
}
