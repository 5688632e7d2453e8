//! Structural validation of the calculation input
//!
//! Fatal problems abort the calculation; data-quality findings are recorded
//! as warnings and the pipeline proceeds with documented fallbacks
//! (zero-fill, last-row-wins). Pure function of its input.

use crate::input::SummaryCalculationInput;
use std::collections::BTreeSet;

/// Outcome of validating a [`SummaryCalculationInput`]
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Fatal problems; any entry aborts the calculation
    pub errors: Vec<String>,

    /// Non-fatal findings; the calculation proceeds best-effort
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_fatal(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Validate structural completeness of the three input collections and the
/// reporting period
pub fn validate(input: &SummaryCalculationInput) -> ValidationReport {
    let mut report = ValidationReport::default();
    let period = &input.reporting_period;

    if input.experience_data.is_empty() {
        report.errors.push("No experience data provided".to_string());
    }

    if period.end < period.start {
        report.errors.push(format!(
            "Reporting period end {} precedes start {}",
            period.end, period.start
        ));
    }

    for row in &input.experience_data {
        if row.min_amount() < 0.0 {
            report.errors.push(format!(
                "Negative claims or premium amount in experience data for {} ({})",
                row.period, row.category
            ));
        }
    }

    // Duplicate (period, category) rows: last one wins downstream
    let mut seen = BTreeSet::new();
    for row in &input.experience_data {
        if !seen.insert((row.period, row.category.clone())) {
            report.warnings.push(format!(
                "Duplicate experience data for {} ({}); the last row wins",
                row.period, row.category
            ));
        }
    }

    let out_of_period: Vec<_> = input
        .experience_data
        .iter()
        .filter(|r| !period.contains(r.period))
        .map(|r| r.period)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if !out_of_period.is_empty() {
        report.warnings.push(format!(
            "Experience data outside the reporting period ignored: {}",
            join_periods(&out_of_period)
        ));
    }

    let covered: BTreeSet<_> = input
        .experience_data
        .iter()
        .map(|r| r.period)
        .collect();
    let missing: Vec<_> = period
        .months()
        .into_iter()
        .filter(|m| !covered.contains(m))
        .collect();
    if !missing.is_empty() {
        report.warnings.push(format!(
            "No experience data for {}; treated as zero",
            join_periods(&missing)
        ));
    }

    for fee in &input.fee_structures {
        if fee.status.is_active() && !fee.overlaps(period) {
            report.warnings.push(format!(
                "Fee structure '{}' ({} to {}) does not overlap the reporting period; ignored",
                fee.name, fee.effective_start, fee.effective_end
            ));
        }
    }

    let stray_claimants = input
        .high_cost_claimants
        .iter()
        .filter(|c| !period.contains(c.incurred_period))
        .count();
    if stray_claimants > 0 {
        report.warnings.push(format!(
            "{} high-cost claimant record(s) incurred outside the reporting period ignored",
            stray_claimants
        ));
    }

    report
}

fn join_periods(periods: &[crate::input::Period]) -> String {
    periods
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
