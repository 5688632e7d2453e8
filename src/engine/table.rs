//! Assembly of the fixed 28-row summary table
//!
//! Money rows are emitted on cents, and derived money rows (gross/net
//! claims, fee and expense totals, net results, variances) are computed from
//! the rounded components so every column of the printed table is additive.
//! Ratio and PEPM rows come from the metric calculator, which works on the
//! full-precision aggregates.

use crate::error::EngineError;
use crate::input::{BudgetAssumptions, FeeCategory};
use super::aggregate::MonthlyAggregate;
use super::fees::FeeAllocation;
use super::metrics::{round_cents, MetricSet, RatioBand};
use super::rows::{CompleteSummaryRow, SummaryRowId};
use std::collections::BTreeMap;

/// Build the 28 table rows from the aggregated and derived figures
///
/// Fails only on pipeline invariant violations (month-count mismatches, a
/// missing fee category), never on user input.
pub fn build_table(
    aggregates: &[MonthlyAggregate],
    fees: &FeeAllocation,
    metrics: &MetricSet,
    budget: &BudgetAssumptions,
) -> Result<Vec<CompleteSummaryRow>, EngineError> {
    let month_count = aggregates.len();
    if month_count == 0 {
        return Err(EngineError::EmptyPeriod);
    }
    check_months("fee allocation", month_count, fees.month_count())?;
    check_months("monthly metrics", month_count, metrics.monthly.len())?;

    // Rounded per-month base series; everything money-valued below derives
    // from these
    let members: Vec<f64> = aggregates.iter().map(|a| a.enrolled_members as f64).collect();
    let premium: Vec<f64> = rounded(aggregates, |a| a.premium_equivalent);
    let medical: Vec<f64> = rounded(aggregates, |a| a.medical_claims);
    let pharmacy: Vec<f64> = rounded(aggregates, |a| a.pharmacy_claims);
    let reimbursement: Vec<f64> = rounded(aggregates, |a| a.stop_loss_reimbursement);

    let gross: Vec<f64> = zip_with(&medical, &pharmacy, |m, p| m + p);
    let net: Vec<f64> = zip_with(&gross, &reimbursement, |g, r| g - r);

    let mut fee_rows: BTreeMap<SummaryRowId, Vec<f64>> = BTreeMap::new();
    for category in FeeCategory::ALL {
        let values = fees
            .category(category)
            .ok_or(EngineError::MissingFeeCategory(category))?;
        check_months("fee category allocation", month_count, values.len())?;
        fee_rows.insert(
            SummaryRowId::for_fee_category(category),
            values.iter().map(|v| round_cents(*v)).collect(),
        );
    }
    let total_fees: Vec<f64> = (0..month_count)
        .map(|i| round_cents(fee_rows.values().map(|v| v[i]).sum()))
        .collect();

    let total_expenses: Vec<f64> = zip_with(&net, &total_fees, |n, f| n + f);
    let cumulative_expenses = running_total(&total_expenses);
    let net_result: Vec<f64> = zip_with(&premium, &total_expenses, |p, e| p - e);
    let cumulative_net_result = running_total(&net_result);

    let budgeted_premium = vec![round_cents(budget.monthly_premium); month_count];
    let budgeted_expenses = vec![round_cents(budget.monthly_expenses); month_count];
    let premium_variance: Vec<f64> = zip_with(&premium, &budgeted_premium, |a, b| a - b);
    let expense_variance: Vec<f64> = zip_with(&total_expenses, &budgeted_expenses, |a, b| a - b);

    let rows = SummaryRowId::ALL
        .iter()
        .map(|id| {
            let row = match id {
                SummaryRowId::AdministrationFees
                | SummaryRowId::NetworkFees
                | SummaryRowId::ConsultingFees
                | SummaryRowId::WellnessFees
                | SummaryRowId::StopLossPremium
                | SummaryRowId::OtherFees => {
                    let values = fee_rows
                        .get(id)
                        .ok_or_else(|| missing_fee_category(*id))?;
                    sum_row(*id, values)
                }
                SummaryRowId::EnrolledMembers => sum_row(*id, &members),
                SummaryRowId::PremiumIncome => sum_row(*id, &premium),
                SummaryRowId::MedicalClaims => sum_row(*id, &medical),
                SummaryRowId::PharmacyClaims => sum_row(*id, &pharmacy),
                SummaryRowId::GrossClaims => sum_row(*id, &gross),
                SummaryRowId::StopLossReimbursement => sum_row(*id, &reimbursement),
                SummaryRowId::NetClaims => sum_row(*id, &net),
                SummaryRowId::TotalFees => sum_row(*id, &total_fees),
                SummaryRowId::TotalExpenses => sum_row(*id, &total_expenses),
                SummaryRowId::CumulativeExpenses => last_value_row(*id, &cumulative_expenses),
                SummaryRowId::NetResult => sum_row(*id, &net_result),
                SummaryRowId::CumulativeNetResult => last_value_row(*id, &cumulative_net_result),
                SummaryRowId::MonthlyLossRatio => metric_row(
                    *id,
                    metrics.monthly.iter().map(|m| m.loss_ratio).collect(),
                    metrics.period.loss_ratio,
                    metrics.period.loss_ratio_band,
                ),
                SummaryRowId::CumulativeLossRatio => metric_row(
                    *id,
                    metrics.monthly.iter().map(|m| m.cumulative_loss_ratio).collect(),
                    metrics.period.loss_ratio,
                    metrics.period.loss_ratio_band,
                ),
                SummaryRowId::PepmNetClaims => metric_row(
                    *id,
                    metrics.monthly.iter().map(|m| m.pepm_net_claims).collect(),
                    metrics.period.pepm_net_claims,
                    None,
                ),
                SummaryRowId::PepmTotalExpenses => metric_row(
                    *id,
                    metrics.monthly.iter().map(|m| m.pepm_total_expenses).collect(),
                    metrics.period.pepm_total_expenses,
                    None,
                ),
                SummaryRowId::BudgetedPremium => sum_row(*id, &budgeted_premium),
                SummaryRowId::PremiumVariance => sum_row(*id, &premium_variance),
                SummaryRowId::PremiumVariancePct => metric_row(
                    *id,
                    metrics.monthly.iter().map(|m| m.premium_variance_pct).collect(),
                    metrics.period.premium_variance_pct,
                    None,
                ),
                SummaryRowId::BudgetedExpenses => sum_row(*id, &budgeted_expenses),
                SummaryRowId::ExpenseVariance => sum_row(*id, &expense_variance),
                SummaryRowId::ExpenseVariancePct => metric_row(
                    *id,
                    metrics.monthly.iter().map(|m| m.expense_variance_pct).collect(),
                    metrics.period.expense_variance_pct,
                    None,
                ),
            };
            Ok(row)
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    Ok(rows)
}

/// Maps a fee row id back to its category for the invariant-violation error
fn missing_fee_category(id: SummaryRowId) -> EngineError {
    let category = FeeCategory::ALL
        .iter()
        .copied()
        .find(|c| SummaryRowId::for_fee_category(*c) == id)
        .unwrap_or(FeeCategory::Other);
    EngineError::MissingFeeCategory(category)
}

fn check_months(what: &'static str, expected: usize, actual: usize) -> Result<(), EngineError> {
    if expected == actual {
        Ok(())
    } else {
        Err(EngineError::MonthCountMismatch { what, expected, actual })
    }
}

fn rounded(aggregates: &[MonthlyAggregate], f: impl Fn(&MonthlyAggregate) -> f64) -> Vec<f64> {
    aggregates.iter().map(|a| round_cents(f(a))).collect()
}

fn zip_with(a: &[f64], b: &[f64], f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| round_cents(f(*x, *y))).collect()
}

fn running_total(values: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    values
        .iter()
        .map(|v| {
            total = round_cents(total + v);
            total
        })
        .collect()
}

/// A money/count row whose period total is the sum of its months
fn sum_row(id: SummaryRowId, values: &[f64]) -> CompleteSummaryRow {
    let total = round_cents(values.iter().sum());
    CompleteSummaryRow {
        id,
        label: id.label().to_string(),
        values: values.iter().map(|v| Some(*v)).collect(),
        total: Some(total),
        band: None,
    }
}

/// A running-total row whose period total is the final month's value
fn last_value_row(id: SummaryRowId, values: &[f64]) -> CompleteSummaryRow {
    CompleteSummaryRow {
        id,
        label: id.label().to_string(),
        values: values.iter().map(|v| Some(*v)).collect(),
        total: values.last().copied(),
        band: None,
    }
}

/// A derived-metric row; undefined months stay `None`
fn metric_row(
    id: SummaryRowId,
    values: Vec<Option<f64>>,
    total: Option<f64>,
    band: Option<RatioBand>,
) -> CompleteSummaryRow {
    CompleteSummaryRow {
        id,
        label: id.label().to_string(),
        values: values.into_iter().map(|v| v.map(round_cents)).collect(),
        total: total.map(round_cents),
        band,
    }
}
