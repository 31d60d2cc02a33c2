//! Rendering of analysis results
//!
//! - [`text`]: worked step-by-step solutions
//! - [`json`]: machine-readable documents
//! - [`svg`]: scatter/fit and t-density charts

pub mod json;
pub mod svg;
pub mod text;

pub use json::{JsonCriticalReport, JsonRegressionReport};
pub use text::{critical_summary, regression_summary};
