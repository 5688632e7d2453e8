//! Engine orchestration: validation through result assembly
//!
//! Data flows strictly forward through validate → allocate fees → aggregate
//! → derive metrics → build table; no stage reads back from a later one.
//! Every failure mode ends up inside the returned result.

use crate::error::EngineError;
use crate::input::SummaryCalculationInput;
use super::aggregate::{aggregate_months, rollup_experience};
use super::fees::allocate;
use super::metrics::{compute_metrics, RatioBandThresholds};
use super::rows::{CompleteSummaryRow, SummaryCalculationResult, SummaryMetadata};
use super::table::build_table;
use super::validate::validate;
use chrono::{DateTime, Utc};

/// Calculation policy knobs
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Loss-ratio banding thresholds
    pub bands: RatioBandThresholds,
}

/// The summary calculation engine
///
/// Stateless: one invocation consumes one input and produces one result,
/// with nothing retained between calls.
#[derive(Debug, Clone, Default)]
pub struct SummaryCalculator {
    config: EngineConfig,
}

impl SummaryCalculator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Run the full calculation, stamping the current time
    pub fn calculate(&self, input: &SummaryCalculationInput) -> SummaryCalculationResult {
        self.calculate_at(input, Utc::now())
    }

    /// Run the full calculation with a caller-supplied timestamp
    ///
    /// Identical inputs and timestamp produce byte-identical serialized
    /// results.
    pub fn calculate_at(
        &self,
        input: &SummaryCalculationInput,
        generated_at: DateTime<Utc>,
    ) -> SummaryCalculationResult {
        let report = validate(input);
        if report.is_fatal() {
            log::debug!("calculation aborted: {} validation error(s)", report.errors.len());
            return SummaryCalculationResult::failed(
                report.errors,
                report.warnings,
                self.metadata(input, 0, generated_at),
            );
        }

        let mut warnings = report.warnings;
        match self.run_pipeline(input, &mut warnings) {
            Ok(rows) => {
                let metadata = self.metadata(input, rows.len(), generated_at);
                SummaryCalculationResult::succeeded(rows, metadata, warnings)
            }
            Err(err) => {
                // Defect class: bad pipeline state, not bad input
                log::error!("summary table assembly failed: {err}");
                SummaryCalculationResult::failed(
                    vec![err.to_string()],
                    warnings,
                    self.metadata(input, 0, generated_at),
                )
            }
        }
    }

    fn run_pipeline(
        &self,
        input: &SummaryCalculationInput,
        warnings: &mut Vec<String>,
    ) -> Result<Vec<CompleteSummaryRow>, EngineError> {
        let period = &input.reporting_period;

        let rollup = rollup_experience(&input.experience_data, period);
        log::debug!(
            "rolled {} experience rows into {} months",
            input.experience_data.len(),
            rollup.len()
        );

        let allocation = allocate(&input.fee_structures, period, &rollup);
        let aggregates =
            aggregate_months(&rollup, &input.high_cost_claimants, &allocation, period);
        let metrics = compute_metrics(&aggregates, &period.budget, &self.config.bands);
        warnings.extend(metrics.warnings.iter().cloned());

        build_table(&aggregates, &allocation, &metrics, &period.budget)
    }

    fn metadata(
        &self,
        input: &SummaryCalculationInput,
        row_count: usize,
        generated_at: DateTime<Utc>,
    ) -> SummaryMetadata {
        SummaryMetadata {
            period_start: input.reporting_period.start,
            period_end: input.reporting_period.end,
            row_count,
            month_count: input.reporting_period.month_count(),
            generated_at,
        }
    }
}
