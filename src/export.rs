//! CSV rendering of a computed summary table
//!
//! Write-side only; ingestion of upstream files is the calling layer's job.

use crate::engine::{RowUnit, SummaryCalculationResult};
use std::error::Error;
use std::io;

/// Format one cell according to its row unit; undefined metrics are blank
fn format_cell(value: Option<f64>, unit: RowUnit) -> String {
    match value {
        None => String::new(),
        Some(v) => match unit {
            RowUnit::Count => format!("{:.0}", v),
            RowUnit::Currency => format!("{:.2}", v),
            RowUnit::Percent => format!("{:.2}", v),
        },
    }
}

/// Write a successful result as CSV: one line per summary row, one column
/// per month plus the period total
pub fn write_summary_csv<W: io::Write>(
    writer: W,
    result: &SummaryCalculationResult,
) -> Result<(), Box<dyn Error>> {
    let rows = result
        .rows
        .as_ref()
        .ok_or("result contains no row data to export")?;

    let months = result.metadata.months();
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["Item".to_string(), "Row".to_string()];
    header.extend(months.iter().map(|m| m.to_string()));
    header.push("Period Total".to_string());
    csv_writer.write_record(&header)?;

    for (index, row) in rows.iter().enumerate() {
        let unit = row.id.unit();
        let mut record = vec![(index + 1).to_string(), row.label.clone()];
        record.extend(row.values.iter().map(|v| format_cell(*v, unit)));
        record.push(format_cell(row.total, unit));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Render a successful result to a CSV string
pub fn summary_csv_string(result: &SummaryCalculationResult) -> Result<String, Box<dyn Error>> {
    let mut buffer = Vec::new();
    write_summary_csv(&mut buffer, result)?;
    Ok(String::from_utf8(buffer)?)
}
