//! Monthly aggregation of experience data, claimant adjustments, and fees
//!
//! Months are processed independently and reassembled in month order, so the
//! result is identical whether the fold runs sequentially or across worker
//! threads.

use crate::input::{ExperienceDataRow, HighCostClaimant, Period, ReportingPeriod};
use super::fees::FeeAllocation;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Experience totals for one month, before claimant and fee adjustments
///
/// This is the rollup the fee allocator prices against.
#[derive(Debug, Clone)]
pub struct MonthlyExperience {
    pub period: Period,
    pub enrolled_members: u32,
    pub medical_claims: f64,
    pub pharmacy_claims: f64,
    pub premium_equivalent: f64,
}

impl MonthlyExperience {
    /// An all-zero record for a month with no experience data
    fn zero(period: Period) -> Self {
        Self {
            period,
            enrolled_members: 0,
            medical_claims: 0.0,
            pharmacy_claims: 0.0,
            premium_equivalent: 0.0,
        }
    }
}

/// Fully aggregated figures for one month of the reporting period
#[derive(Debug, Clone)]
pub struct MonthlyAggregate {
    pub period: Period,
    pub enrolled_members: u32,
    pub premium_equivalent: f64,
    pub medical_claims: f64,
    pub pharmacy_claims: f64,
    /// Medical plus pharmacy claims
    pub gross_claims: f64,
    /// Eligible high-cost recoveries, capped at the month's gross claims
    pub stop_loss_reimbursement: f64,
    /// Gross claims less reimbursement
    pub net_claims: f64,
    pub total_fees: f64,
    /// Net claims plus total fees
    pub total_expenses: f64,
    /// Premium equivalent less total expenses
    pub net_result: f64,
}

/// Roll experience rows up to one record per month of the period
///
/// Duplicate `(period, category)` rows collapse to the last one seen, rows
/// outside the period are dropped, and months with no data are zero-filled.
/// Enrollment in zero-filled months stays zero; no carry-forward.
pub fn rollup_experience(
    rows: &[ExperienceDataRow],
    period: &ReportingPeriod,
) -> Vec<MonthlyExperience> {
    // Last write wins per (period, category)
    let mut latest: BTreeMap<(Period, &str), &ExperienceDataRow> = BTreeMap::new();
    for row in rows.iter().filter(|r| period.contains(r.period)) {
        latest.insert((row.period, row.category.as_str()), row);
    }

    let mut by_month: BTreeMap<Period, MonthlyExperience> = period
        .months()
        .into_iter()
        .map(|m| (m, MonthlyExperience::zero(m)))
        .collect();

    for ((month, _), row) in latest {
        if let Some(entry) = by_month.get_mut(&month) {
            entry.enrolled_members += row.enrolled_members;
            entry.medical_claims += row.medical_claims();
            entry.pharmacy_claims += row.pharmacy_claims;
            entry.premium_equivalent += row.premium_equivalent;
        }
    }

    by_month.into_values().collect()
}

/// Fold claimant reimbursements and allocated fees into per-month aggregates
pub fn aggregate_months(
    rollup: &[MonthlyExperience],
    claimants: &[HighCostClaimant],
    fees: &FeeAllocation,
    period: &ReportingPeriod,
) -> Vec<MonthlyAggregate> {
    let mut eligible_by_month: BTreeMap<Period, f64> = BTreeMap::new();
    for claimant in claimants {
        if claimant.reimbursement_eligible && period.contains(claimant.incurred_period) {
            *eligible_by_month.entry(claimant.incurred_period).or_insert(0.0) +=
                claimant.total_paid;
        }
    }

    rollup
        .par_iter()
        .enumerate()
        .map(|(index, month)| {
            let gross_claims = month.medical_claims + month.pharmacy_claims;

            // A reimbursement can never exceed what it offsets
            let eligible = eligible_by_month.get(&month.period).copied().unwrap_or(0.0);
            let stop_loss_reimbursement = eligible.min(gross_claims);

            let net_claims = gross_claims - stop_loss_reimbursement;
            let total_fees = fees.total_for_month(index);
            let total_expenses = net_claims + total_fees;

            MonthlyAggregate {
                period: month.period,
                enrolled_members: month.enrolled_members,
                premium_equivalent: month.premium_equivalent,
                medical_claims: month.medical_claims,
                pharmacy_claims: month.pharmacy_claims,
                gross_claims,
                stop_loss_reimbursement,
                net_claims,
                total_fees,
                total_expenses,
                net_result: month.premium_equivalent - total_expenses,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fees::allocate;
    use crate::input::BudgetAssumptions;
    use approx::assert_relative_eq;

    fn p(s: &str) -> Period {
        s.parse().unwrap()
    }

    fn reporting(start: &str, end: &str) -> ReportingPeriod {
        ReportingPeriod::new(p(start), p(end), BudgetAssumptions::default())
    }

    fn row(period: &str, category: &str, medical: f64, premium: f64) -> ExperienceDataRow {
        ExperienceDataRow {
            period: p(period),
            category: category.to_string(),
            enrolled_members: 500,
            domestic_facility_claims: medical,
            non_domestic_facility_claims: 0.0,
            non_hospital_claims: 0.0,
            pharmacy_claims: 0.0,
            premium_equivalent: premium,
        }
    }

    fn claimant(period: &str, paid: f64, eligible: bool) -> HighCostClaimant {
        HighCostClaimant {
            claimant_id: "HCC-1".to_string(),
            incurred_period: p(period),
            total_paid: paid,
            reimbursement_eligible: eligible,
        }
    }

    fn no_fees(period: &ReportingPeriod, rollup: &[MonthlyExperience]) -> FeeAllocation {
        allocate(&[], period, rollup)
    }

    #[test]
    fn test_rollup_sums_categories_per_month() {
        let period = reporting("2024-01", "2024-01");
        let rollup = rollup_experience(
            &[
                row("2024-01", "PPO", 40_000.0, 60_000.0),
                row("2024-01", "HDHP", 20_000.0, 30_000.0),
            ],
            &period,
        );
        assert_eq!(rollup.len(), 1);
        assert_eq!(rollup[0].enrolled_members, 1_000);
        assert_relative_eq!(rollup[0].medical_claims, 60_000.0);
        assert_relative_eq!(rollup[0].premium_equivalent, 90_000.0);
    }

    #[test]
    fn test_rollup_last_duplicate_wins() {
        let period = reporting("2024-01", "2024-01");
        let rollup = rollup_experience(
            &[
                row("2024-01", "PPO", 40_000.0, 60_000.0),
                row("2024-01", "PPO", 45_000.0, 62_000.0),
            ],
            &period,
        );
        assert_relative_eq!(rollup[0].medical_claims, 45_000.0);
        assert_relative_eq!(rollup[0].premium_equivalent, 62_000.0);
        assert_eq!(rollup[0].enrolled_members, 500);
    }

    #[test]
    fn test_rollup_zero_fills_missing_months() {
        let period = reporting("2024-01", "2024-03");
        let rollup = rollup_experience(&[row("2024-01", "PPO", 40_000.0, 60_000.0)], &period);
        assert_eq!(rollup.len(), 3);
        assert_eq!(rollup[1].enrolled_members, 0);
        assert_relative_eq!(rollup[1].premium_equivalent, 0.0);
        assert_relative_eq!(rollup[2].medical_claims, 0.0);
    }

    #[test]
    fn test_rollup_drops_out_of_period_rows() {
        let period = reporting("2024-01", "2024-02");
        let rollup = rollup_experience(
            &[
                row("2024-01", "PPO", 40_000.0, 60_000.0),
                row("2023-12", "PPO", 99_000.0, 99_000.0),
            ],
            &period,
        );
        assert_relative_eq!(rollup[0].medical_claims, 40_000.0);
        assert_relative_eq!(rollup[1].medical_claims, 0.0);
    }

    #[test]
    fn test_reimbursement_capped_at_gross_claims() {
        let period = reporting("2024-01", "2024-01");
        let rollup = rollup_experience(&[row("2024-01", "PPO", 30_000.0, 60_000.0)], &period);
        let fees = no_fees(&period, &rollup);

        let aggregates = aggregate_months(
            &rollup,
            &[claimant("2024-01", 80_000.0, true)],
            &fees,
            &period,
        );
        assert_relative_eq!(aggregates[0].stop_loss_reimbursement, 30_000.0);
        assert_relative_eq!(aggregates[0].net_claims, 0.0);
    }

    #[test]
    fn test_ineligible_claimants_do_not_offset() {
        let period = reporting("2024-01", "2024-01");
        let rollup = rollup_experience(&[row("2024-01", "PPO", 30_000.0, 60_000.0)], &period);
        let fees = no_fees(&period, &rollup);

        let aggregates = aggregate_months(
            &rollup,
            &[claimant("2024-01", 20_000.0, false)],
            &fees,
            &period,
        );
        assert_relative_eq!(aggregates[0].stop_loss_reimbursement, 0.0);
        assert_relative_eq!(aggregates[0].net_claims, 30_000.0);
    }

    #[test]
    fn test_aggregate_expense_identities() {
        let period = reporting("2024-01", "2024-02");
        let rollup = rollup_experience(
            &[
                row("2024-01", "PPO", 30_000.0, 60_000.0),
                row("2024-02", "PPO", 35_000.0, 61_000.0),
            ],
            &period,
        );
        let fees = no_fees(&period, &rollup);
        let aggregates = aggregate_months(
            &rollup,
            &[claimant("2024-01", 10_000.0, true)],
            &fees,
            &period,
        );

        for agg in &aggregates {
            assert_relative_eq!(agg.gross_claims, agg.medical_claims + agg.pharmacy_claims);
            assert_relative_eq!(agg.net_claims, agg.gross_claims - agg.stop_loss_reimbursement);
            assert_relative_eq!(agg.total_expenses, agg.net_claims + agg.total_fees);
            assert_relative_eq!(agg.net_result, agg.premium_equivalent - agg.total_expenses);
        }
        assert_relative_eq!(aggregates[0].net_claims, 20_000.0);
        assert_relative_eq!(aggregates[1].net_claims, 35_000.0);
    }

    #[test]
    fn test_aggregates_preserve_month_order() {
        let period = reporting("2024-01", "2024-06");
        let rows: Vec<_> = (1..=6)
            .map(|m| row(&format!("2024-{:02}", m), "PPO", 1_000.0 * m as f64, 5_000.0))
            .collect();
        let rollup = rollup_experience(&rows, &period);
        let fees = no_fees(&period, &rollup);
        let aggregates = aggregate_months(&rollup, &[], &fees, &period);

        let months: Vec<_> = aggregates.iter().map(|a| a.period.to_string()).collect();
        assert_eq!(months, vec!["2024-01", "2024-02", "2024-03", "2024-04", "2024-05", "2024-06"]);
    }
}
