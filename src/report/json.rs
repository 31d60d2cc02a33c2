//! JSON output for regression and critical-value results
//!
//! Both documents carry a `format` tag so consumers can detect schema changes.

use crate::critical::CriticalValueResult;
use crate::regression::RegressionResult;
use serde::Serialize;

/// Schema tag written into every document
pub const FORMAT: &str = "statcalc-json-v1";

/// Regression analysis with its rendered equation
#[derive(Debug, Serialize)]
pub struct JsonRegressionReport<'a> {
    pub format: &'static str,
    pub analysis: &'static str,
    /// `y = a + bx` at the requested precision
    pub equation: String,
    pub interpretation: String,
    #[serde(flatten)]
    pub result: &'a RegressionResult,
}

impl<'a> JsonRegressionReport<'a> {
    pub fn new(result: &'a RegressionResult, decimals: usize) -> Self {
        Self {
            format: FORMAT,
            analysis: "regression",
            equation: result.equation(decimals),
            interpretation: result.interpretation(),
            result,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Rejection region with unbounded sides written as `null`
#[derive(Debug, Clone, Serialize)]
pub struct JsonRejectionRegion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
    pub probability: f64,
}

/// Critical-value lookup with its rejection regions
#[derive(Debug, Serialize)]
pub struct JsonCriticalReport<'a> {
    pub format: &'static str,
    pub analysis: &'static str,
    #[serde(flatten)]
    pub result: &'a CriticalValueResult,
    pub rejection_regions: Vec<JsonRejectionRegion>,
}

impl<'a> JsonCriticalReport<'a> {
    pub fn new(result: &'a CriticalValueResult) -> Self {
        let rejection_regions = result
            .rejection_regions()
            .into_iter()
            .map(|region| JsonRejectionRegion {
                lower: region.lower.is_finite().then_some(region.lower),
                upper: region.upper.is_finite().then_some(region.upper),
                probability: region.probability,
            })
            .collect();

        Self {
            format: FORMAT,
            analysis: "critical",
            result,
            rejection_regions,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
