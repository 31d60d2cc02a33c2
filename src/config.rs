// Calculator defaults loaded from TOML
//
// [regression]
// method = "normal-equation"   # or "least-squares"
// correlation = true
// decimals = 4
// data = "[(2, 7), (4, 11), (5, 13), (6, 20)]"
//
// [critical]
// alpha = 0.05
// sample_size = 14
// tail = "2-tailed"            # or "1-tailed"
// decimals = 4
//
// Missing keys and sections fall back to the built-in defaults. Command-line
// flags override whatever the file says.

use crate::critical::{CriticalValueInput, TailMode};
use crate::dataset::Dataset;
use crate::regression::{FitMethod, RegressionEngine};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Dataset shown when the user supplies none
pub const DEFAULT_DATASET: &str = "[(2, 7), (4, 11), (5, 13), (6, 20)]";

/// Upper bound on rendered decimal places
pub const MAX_DECIMALS: usize = 12;

/// Settings for the regression calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegressionSettings {
    pub method: FitMethod,
    /// Compute Pearson r alongside the fitted line
    pub correlation: bool,
    /// Decimal places in rendered output
    pub decimals: usize,
    /// Dataset text in any form accepted by [`Dataset::parse`]
    pub data: String,
}

impl Default for RegressionSettings {
    fn default() -> Self {
        Self {
            method: FitMethod::NormalEquation,
            correlation: true,
            decimals: 4,
            data: DEFAULT_DATASET.to_string(),
        }
    }
}

impl RegressionSettings {
    pub fn engine(&self) -> RegressionEngine {
        RegressionEngine::new(self.method).with_correlation(self.correlation)
    }
}

/// Settings for the critical-value calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CriticalSettings {
    /// Significance level (α)
    pub alpha: f64,
    /// Sample size (n)
    pub sample_size: usize,
    pub tail: TailMode,
    /// Decimal places in rendered output
    pub decimals: usize,
}

impl Default for CriticalSettings {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            sample_size: 14,
            tail: TailMode::TwoTailed,
            decimals: 4,
        }
    }
}

impl CriticalSettings {
    pub fn input(&self) -> CriticalValueInput {
        CriticalValueInput::new(self.alpha, self.sample_size, self.tail)
    }
}

/// Top-level configuration file
///
/// # Example
/// ```
/// use statcalc::config::CalcConfig;
///
/// let config = CalcConfig::default();
/// assert_eq!(config.critical.alpha, 0.05);
/// assert_eq!(config.critical.sample_size, 14);
/// assert_eq!(config.regression.decimals, 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalcConfig {
    pub regression: RegressionSettings,
    pub critical: CriticalSettings,
}

impl CalcConfig {
    /// Load and validate a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;

        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;

        tracing::debug!(path = %path.as_ref().display(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CalcConfig =
            toml::from_str(content).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// The default dataset must parse, α must be a usable significance
    /// level, and the sample size must leave at least one degree of freedom.
    pub fn validate(&self) -> Result<()> {
        for (key, decimals) in [
            ("regression.decimals", self.regression.decimals),
            ("critical.decimals", self.critical.decimals),
        ] {
            if decimals > MAX_DECIMALS {
                anyhow::bail!("{} must be <= {}, got {}", key, MAX_DECIMALS, decimals);
            }
        }

        Dataset::parse(&self.regression.data).context("regression.data is not a valid dataset")?;

        self.critical
            .input()
            .validate()
            .context("critical section is invalid")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CalcConfig::default();
        assert_eq!(config.regression.method, FitMethod::NormalEquation);
        assert!(config.regression.correlation);
        assert_eq!(config.regression.decimals, 4);
        assert_eq!(config.regression.data, DEFAULT_DATASET);
        assert_eq!(config.critical.alpha, 0.05);
        assert_eq!(config.critical.sample_size, 14);
        assert_eq!(config.critical.tail, TailMode::TwoTailed);
        assert_eq!(config.critical.decimals, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = CalcConfig::from_toml_str("").unwrap();
        assert_eq!(config, CalcConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = CalcConfig::from_toml_str(
            r#"
[critical]
alpha = 0.01
tail = "1-tailed"
"#,
        )
        .unwrap();

        assert_eq!(config.critical.alpha, 0.01);
        assert_eq!(config.critical.tail, TailMode::OneTailed);
        assert_eq!(config.critical.sample_size, 14);
        assert_eq!(config.regression, RegressionSettings::default());
    }

    #[test]
    fn test_full_toml() {
        let config = CalcConfig::from_toml_str(
            r#"
[regression]
method = "least-squares"
correlation = false
decimals = 2
data = "1 2\n2 4\n3 6"

[critical]
alpha = 0.10
sample_size = 30
tail = "2-tailed"
"#,
        )
        .unwrap();

        assert_eq!(config.regression.method, FitMethod::LeastSquares);
        assert!(!config.regression.correlation);
        assert_eq!(config.regression.decimals, 2);
        assert!(!config.regression.engine().computes_correlation());
        assert_eq!(config.critical.sample_size, 30);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(CalcConfig::from_toml_str("[critical]\nbeta = 0.2\n").is_err());
    }

    #[test]
    fn test_bad_tail_rejected() {
        assert!(CalcConfig::from_toml_str("[critical]\ntail = \"3-tailed\"\n").is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_alpha() {
        let mut config = CalcConfig::default();
        config.critical.alpha = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_sample_size() {
        let mut config = CalcConfig::default();
        config.critical.sample_size = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_dataset() {
        let mut config = CalcConfig::default();
        config.regression.data = "[(1, 2), (3,".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_too_many_decimals() {
        let mut config = CalcConfig::default();
        config.regression.decimals = 40;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sections_keep_their_own_decimals() {
        let config =
            CalcConfig::from_toml_str("[regression]\ndecimals = 2\n\n[critical]\ndecimals = 6\n")
                .unwrap();
        assert_eq!(config.regression.decimals, 2);
        assert_eq!(config.critical.decimals, 6);

        let config = CalcConfig::from_toml_str("[regression]\ndecimals = 2\n").unwrap();
        assert_eq!(config.critical.decimals, 4);
    }

    #[test]
    fn test_too_many_critical_decimals() {
        let err = CalcConfig::from_toml_str("[critical]\ndecimals = 13\n").unwrap_err();
        assert!(err.to_string().contains("critical.decimals"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[regression]\ndecimals = 3").unwrap();

        let config = CalcConfig::from_file(file.path()).unwrap();
        assert_eq!(config.regression.decimals, 3);
    }

    #[test]
    fn test_from_missing_file() {
        let err = CalcConfig::from_file("/nonexistent/statcalc.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
