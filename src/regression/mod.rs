// Linear regression on (x, y) pairs
//
// Closed-form ordinary least squares over raw sums, the Pearson correlation
// coefficient, and a qualitative strength label for r. Everything here is a
// pure function of the dataset.
//
// Degenerate inputs never raise: zero x-variance gives slope = 0 and
// intercept = mean(y), zero variance in either axis gives r = 0. Results
// carry a `degenerate` flag so renderers can mention it.

mod correlation;
mod engine;
mod fit;
mod statistics;

pub use correlation::{
    classify_strength, correlation_coefficient, Correlation, CorrelationStrength, Direction,
    StrengthTier,
};
pub use engine::{RegressionEngine, RegressionResult};
pub use fit::{fit_line, FitMethod, FittedLine};
pub use statistics::{compute_sums, derived_rows, DerivedRow, SumStatistics};
