//! Reporting Engine CLI
//!
//! Runs the summary calculation against a JSON input file and prints the
//! 28-row table. Stands in for the HTTP layer that owns ingestion and
//! persistence in the full dashboard.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use reporting_engine::engine::RowUnit;
use reporting_engine::{export, SummaryCalculationInput, SummaryCalculationResult, SummaryCalculator};
use std::fs::File;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "reporting-engine", version, about = "Claims & expense summary calculation")]
struct Cli {
    /// Path to a JSON file containing the calculation input
    input: PathBuf,

    /// Write the computed table to a CSV file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the full structured result as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let raw = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let input: SummaryCalculationInput =
        serde_json::from_str(&raw).context("failed to parse calculation input")?;

    let result = SummaryCalculator::default().calculate(&input);

    for warning in &result.warnings {
        log::warn!("{warning}");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        if !result.success {
            std::process::exit(1);
        }
        return Ok(());
    }

    if !result.success {
        for error in &result.errors {
            eprintln!("error: {error}");
        }
        std::process::exit(1);
    }

    print_table(&result);

    if let Some(path) = &cli.output {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        export::write_summary_csv(file, &result).map_err(|e| anyhow!("{e}"))?;
        println!("\nFull table written to: {}", path.display());
    }

    Ok(())
}

fn format_value(value: Option<f64>, unit: RowUnit) -> String {
    match value {
        None => "-".to_string(),
        Some(v) => match unit {
            RowUnit::Count => format!("{:.0}", v),
            RowUnit::Currency => format!("{:.2}", v),
            RowUnit::Percent => format!("{:.2}%", v),
        },
    }
}

fn print_table(result: &SummaryCalculationResult) {
    let metadata = &result.metadata;
    println!(
        "Summary for {} to {} ({} months, generated {})",
        metadata.period_start, metadata.period_end, metadata.month_count, metadata.generated_at
    );

    let months = metadata.months();
    print!("{:>3} {:<30}", "#", "Row");
    for month in &months {
        print!(" {:>14}", month.to_string());
    }
    println!(" {:>16}", "Period Total");
    println!("{}", "-".repeat(35 + 15 * months.len() + 17));

    let Some(rows) = &result.rows else {
        return;
    };
    for (index, row) in rows.iter().enumerate() {
        let unit = row.id.unit();
        print!("{:>3} {:<30}", index + 1, row.label);
        for value in &row.values {
            print!(" {:>14}", format_value(*value, unit));
        }
        print!(" {:>16}", format_value(row.total, unit));
        if let Some(band) = row.band {
            print!("  [{:?}]", band);
        }
        println!();
    }
}
