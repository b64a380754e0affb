use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::error;

use patch_report_parser::config::Config;
use patch_report_parser::metrics::{self, OutputMetrics};
use patch_report_parser::{convert_file, logging};

#[derive(Parser)]
#[command(name = "patch_report_parser")]
#[command(about = "Flatten a Qualys patch report into one CSV row per host/patch pair")]
#[command(version)]
#[command(
    after_help = "example: patch_report_parser --input=some_patch_report.csv --output=converted_patch_report.csv"
)]
struct Cli {
    /// Patch report to convert
    #[arg(long, value_name = "patch_report", value_parser = trimmed_path)]
    input: PathBuf,

    /// Where to write the flattened CSV
    #[arg(long, value_name = "output_file", value_parser = trimmed_path)]
    output: PathBuf,

    /// TOML config file (defaults to $PATCH_REPORT_CONFIG when set)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write the run summary as JSON to this path
    #[arg(long, value_name = "path")]
    summary_json: Option<PathBuf>,
}

/// Surrounding whitespace in a path argument is dropped
fn trimmed_path(value: &str) -> Result<PathBuf, String> {
    match value.trim() {
        "" => Err("path must not be empty".to_string()),
        path => Ok(PathBuf::from(path)),
    }
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Usage errors exit with status 2 here, before any work is done
    let cli = Cli::parse();

    let config = Config::resolve(cli.config.as_deref()).context("Failed to load configuration")?;
    let _log_guard = logging::init_logging(&config.logging);

    if config.metrics.textfile.is_some() {
        metrics::init_metrics();
    }

    let summary = match convert_file(&cli.input, &cli.output, &config) {
        Ok(summary) => summary,
        Err(e) => {
            OutputMetrics::record_conversion_failure();
            error!("Conversion failed: {}", e);
            return Err(e).with_context(|| {
                format!(
                    "Failed to convert \"{}\" to \"{}\"",
                    cli.input.display(),
                    cli.output.display()
                )
            });
        }
    };

    if let Some(path) = &cli.summary_json {
        summary
            .write_json(path)
            .with_context(|| format!("Failed to write summary to \"{}\"", path.display()))?;
    }

    if let Some(path) = &config.metrics.textfile {
        metrics::write_textfile(path)
            .with_context(|| format!("Failed to write metrics to \"{}\"", path.display()))?;
    }

    println!(
        "\n SUCCESS! File \"{}\" has been mapped and outputted to \"{}\"\n",
        cli.input.display(),
        cli.output.display()
    );
    println!("All done. No Errors");
    Ok(())
}
