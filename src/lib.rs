//! statcalc - linear regression and critical values of Pearson's r
//!
//! This library provides two pure calculators with worked-solution output:
//! ordinary least-squares line fitting with the Pearson correlation
//! coefficient, and critical t / r values for testing the significance of a
//! correlation via the Student's t distribution.
//!
//! # Example
//! ```
//! use statcalc::{Dataset, RegressionEngine};
//!
//! let data = Dataset::parse("[(1, 2), (2, 4), (3, 6)]").unwrap();
//! let result = RegressionEngine::default().analyze(&data).unwrap();
//! assert_eq!(result.equation(1), "y = 0.0 + 2.0x");
//! ```

pub mod cli;
pub mod config;
pub mod critical;
pub mod dataset;
pub mod error;
pub mod format;
pub mod regression;
pub mod report;

pub use critical::{critical_values, CriticalValueInput, CriticalValueResult, TailMode};
pub use dataset::{DataPoint, Dataset};
pub use error::{CalcError, Result};
pub use regression::{FitMethod, RegressionEngine, RegressionResult};
