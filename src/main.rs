use anyhow::{Context, Result};
use clap::Parser;
use statcalc::cli::{Cli, Command, CriticalArgs, OutputArgs, OutputFormat, RegressArgs};
use statcalc::config::{CalcConfig, MAX_DECIMALS};
use statcalc::report::{self, JsonCriticalReport, JsonRegressionReport};
use statcalc::Dataset;
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn check_decimals(decimals: usize) -> Result<()> {
    if decimals > MAX_DECIMALS {
        anyhow::bail!(
            "Invalid value for --decimals: {} (must be <= {})",
            decimals,
            MAX_DECIMALS
        );
    }
    Ok(())
}

/// Dataset text from --file, stdin, or the resolved --data/config value
fn read_dataset_text(args: &RegressArgs, fallback: &str) -> Result<String> {
    if args.reads_stdin() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read dataset from stdin")?;
        return Ok(text);
    }
    match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset file: {}", path.display())),
        None => Ok(fallback.to_string()),
    }
}

fn write_export(path: &Path, contents: &str, what: &str) -> Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {} to {}", what, path.display()))?;
    tracing::info!(path = %path.display(), "saved {}", what);
    Ok(())
}

/// Print the result and write any requested exports
fn emit(
    output: &OutputArgs,
    text: &str,
    json: impl FnOnce() -> Result<String>,
    chart: impl FnOnce() -> Result<String>,
) -> Result<()> {
    match output.format {
        OutputFormat::Text => print!("{}", text),
        OutputFormat::Json => println!("{}", json()?),
    }

    if let Some(path) = &output.save_text {
        write_export(path, text, "text summary")?;
    }
    if let Some(path) = &output.save_chart {
        write_export(path, &chart()?, "chart")?;
    }
    Ok(())
}

fn run_regress(args: &RegressArgs, config: &CalcConfig) -> Result<()> {
    let settings = args.settings(&config.regression);
    check_decimals(settings.decimals)?;

    let text = read_dataset_text(args, &settings.data)?;
    let dataset = Dataset::parse(&text).context("Invalid dataset")?;
    let result = settings.engine().analyze(&dataset)?;

    let summary = report::regression_summary(&result, settings.decimals);
    emit(
        &args.output,
        &summary,
        || JsonRegressionReport::new(&result, settings.decimals).to_json(),
        || Ok(report::svg::regression_chart(&result)),
    )
}

fn run_critical(args: &CriticalArgs, config: &CalcConfig) -> Result<()> {
    let settings = args.settings(&config.critical);
    check_decimals(settings.decimals)?;

    let result = settings.input().compute()?;

    let summary = report::critical_summary(&result, settings.decimals);
    emit(
        &args.output,
        &summary,
        || JsonCriticalReport::new(&result).to_json(),
        || Ok(report::svg::critical_chart(&result)?),
    )
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = match &args.config {
        Some(path) => CalcConfig::from_file(path)?,
        None => CalcConfig::default(),
    };

    match &args.command {
        Command::Regress(regress) => run_regress(regress, &config),
        Command::Critical(critical) => run_critical(critical, &config),
    }
}
