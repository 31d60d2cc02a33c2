//! CLI argument parsing for statcalc

use crate::config::{CriticalSettings, RegressionSettings};
use crate::critical::TailMode;
use crate::regression::FitMethod;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for results printed to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Worked step-by-step solution (default)
    #[default]
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "statcalc")]
#[command(version)]
#[command(
    about = "Linear regression and critical values of Pearson's r, with worked solutions",
    long_about = None
)]
pub struct Cli {
    /// Enable debug tracing output to stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    /// Load defaults from a TOML configuration file
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fit a least-squares line and compute Pearson's r
    Regress(RegressArgs),
    /// Critical t and r values for a significance test of Pearson's r
    Critical(CriticalArgs),
}

/// Where rendered output goes besides stdout
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Decimal places in rendered numbers
    #[arg(long = "decimals", value_name = "N")]
    pub decimals: Option<usize>,

    /// Also write the text summary to this file
    #[arg(long = "save-text", value_name = "PATH")]
    pub save_text: Option<PathBuf>,

    /// Also write an SVG chart to this file
    #[arg(long = "save-chart", value_name = "PATH")]
    pub save_chart: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RegressArgs {
    /// Dataset text, e.g. "[(2, 7), (4, 11), (5, 13), (6, 20)]"
    #[arg(long = "data", value_name = "TEXT", conflicts_with = "file")]
    pub data: Option<String>,

    /// Read the dataset from a file ("-" for stdin)
    #[arg(long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Fitting algorithm
    #[arg(long = "method", value_enum)]
    pub method: Option<FitMethod>,

    /// Skip the correlation analysis
    #[arg(long = "no-correlation")]
    pub no_correlation: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl RegressArgs {
    /// Overlay command-line flags on configured settings
    ///
    /// The dataset source (`--data` / `--file`) is resolved separately since
    /// reading it may touch the filesystem.
    pub fn settings(&self, base: &RegressionSettings) -> RegressionSettings {
        let mut settings = base.clone();
        if let Some(method) = self.method {
            settings.method = method;
        }
        if self.no_correlation {
            settings.correlation = false;
        }
        if let Some(decimals) = self.output.decimals {
            settings.decimals = decimals;
        }
        if let Some(data) = &self.data {
            settings.data = data.clone();
        }
        settings
    }

    /// True when the dataset is read from standard input
    pub fn reads_stdin(&self) -> bool {
        self.file.as_deref().is_some_and(|p| p.as_os_str() == "-")
    }
}

#[derive(Args, Debug, Clone)]
pub struct CriticalArgs {
    /// Significance level (α), strictly within (0, 1)
    #[arg(long = "alpha", value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Sample size, at least 3
    #[arg(short = 'n', long = "sample-size", value_name = "N")]
    pub sample_size: Option<usize>,

    /// One- or two-tailed test
    #[arg(long = "tail", value_enum)]
    pub tail: Option<TailMode>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl CriticalArgs {
    /// Overlay command-line flags on configured settings
    pub fn settings(&self, base: &CriticalSettings) -> CriticalSettings {
        CriticalSettings {
            alpha: self.alpha.unwrap_or(base.alpha),
            sample_size: self.sample_size.unwrap_or(base.sample_size),
            tail: self.tail.unwrap_or(base.tail),
            decimals: self.output.decimals.unwrap_or(base.decimals),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CalcConfig, DEFAULT_DATASET};

    fn regress(args: &[&str]) -> RegressArgs {
        let cli = Cli::parse_from(std::iter::once("statcalc").chain(args.iter().copied()));
        match cli.command {
            Command::Regress(args) => args,
            other => panic!("expected regress, got {other:?}"),
        }
    }

    fn critical(args: &[&str]) -> CriticalArgs {
        let cli = Cli::parse_from(std::iter::once("statcalc").chain(args.iter().copied()));
        match cli.command {
            Command::Critical(args) => args,
            other => panic!("expected critical, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["statcalc"]).is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from(["statcalc", "critical", "--debug", "--config", "calc.toml"]);
        assert!(cli.debug);
        assert_eq!(cli.config, Some(PathBuf::from("calc.toml")));
    }

    #[test]
    fn test_regress_defaults_come_from_config() {
        let args = regress(&["regress"]);
        let settings = args.settings(&RegressionSettings::default());

        assert_eq!(settings.method, FitMethod::NormalEquation);
        assert!(settings.correlation);
        assert_eq!(settings.decimals, 4);
        assert_eq!(settings.data, DEFAULT_DATASET);
        assert_eq!(args.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_regress_flags_override() {
        let args = regress(&[
            "regress",
            "--data",
            "1 2\n3 4",
            "--method",
            "least-squares",
            "--no-correlation",
            "--decimals",
            "2",
            "--format",
            "json",
        ]);
        let settings = args.settings(&RegressionSettings::default());

        assert_eq!(settings.method, FitMethod::LeastSquares);
        assert!(!settings.correlation);
        assert_eq!(settings.decimals, 2);
        assert_eq!(settings.data, "1 2\n3 4");
        assert_eq!(args.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_regress_data_conflicts_with_file() {
        let result =
            Cli::try_parse_from(["statcalc", "regress", "--data", "1 2", "--file", "d.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_regress_stdin() {
        assert!(regress(&["regress", "--file", "-"]).reads_stdin());
        assert!(!regress(&["regress", "--file", "data.txt"]).reads_stdin());
        assert!(!regress(&["regress"]).reads_stdin());
    }

    #[test]
    fn test_regress_invalid_method() {
        assert!(Cli::try_parse_from(["statcalc", "regress", "--method", "ridge"]).is_err());
    }

    #[test]
    fn test_critical_defaults() {
        let settings = critical(&["critical"]).settings(&CalcConfig::default().critical);
        assert_eq!(settings.alpha, 0.05);
        assert_eq!(settings.sample_size, 14);
        assert_eq!(settings.tail, TailMode::TwoTailed);
        assert_eq!(settings.decimals, 4);
    }

    #[test]
    fn test_critical_flags_override() {
        let args = critical(&[
            "critical", "--alpha", "0.01", "-n", "30", "--tail", "1-tailed", "--decimals", "6",
        ]);
        let settings = args.settings(&CriticalSettings::default());
        assert_eq!(settings.alpha, 0.01);
        assert_eq!(settings.sample_size, 30);
        assert_eq!(settings.tail, TailMode::OneTailed);
        assert_eq!(settings.decimals, 6);
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_critical_decimals_ignore_regression_section() {
        let mut config = CalcConfig::default();
        config.regression.decimals = 1;
        config.critical.decimals = 5;
        let settings = critical(&["critical"]).settings(&config.critical);
        assert_eq!(settings.decimals, 5);
    }

    #[test]
    fn test_critical_invalid_tail() {
        assert!(Cli::try_parse_from(["statcalc", "critical", "--tail", "3-tailed"]).is_err());
    }

    #[test]
    fn test_save_paths() {
        let args = critical(&[
            "critical",
            "--save-text",
            "out.txt",
            "--save-chart",
            "out.svg",
        ]);
        assert_eq!(args.output.save_text, Some(PathBuf::from("out.txt")));
        assert_eq!(args.output.save_chart, Some(PathBuf::from("out.svg")));
    }
}
