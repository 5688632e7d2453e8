//! Derived financial metrics: loss ratios, PEPM rates, budget variances
//!
//! All metrics are computed from full-precision aggregates; rounding to two
//! decimals happens once, at the point of output. Zero-denominator cases
//! yield `None` and are reported as one warning per metric kind per
//! calculation, not one per offending month.

use crate::input::BudgetAssumptions;
use super::aggregate::MonthlyAggregate;
use serde::{Deserialize, Serialize};

/// Round a value to two decimals for output
pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Loss-ratio banding thresholds, in percentage points
///
/// Lower bounds are inclusive: a loss ratio equal to `caution` classifies as
/// caution, equal to `critical` as critical.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RatioBandThresholds {
    pub caution: f64,
    pub critical: f64,
}

impl Default for RatioBandThresholds {
    fn default() -> Self {
        Self { caution: 85.0, critical: 95.0 }
    }
}

/// Discrete classification of a loss ratio for downstream display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatioBand {
    Favorable,
    Caution,
    Critical,
}

impl RatioBand {
    /// Classify a loss-ratio percentage against the thresholds
    pub fn classify(loss_ratio_pct: f64, thresholds: &RatioBandThresholds) -> Self {
        if loss_ratio_pct < thresholds.caution {
            RatioBand::Favorable
        } else if loss_ratio_pct < thresholds.critical {
            RatioBand::Caution
        } else {
            RatioBand::Critical
        }
    }
}

/// Derived metrics for one month
#[derive(Debug, Clone, Default)]
pub struct MonthlyMetrics {
    pub loss_ratio: Option<f64>,
    pub cumulative_loss_ratio: Option<f64>,
    pub pepm_net_claims: Option<f64>,
    pub pepm_total_expenses: Option<f64>,
    pub premium_variance_pct: Option<f64>,
    pub expense_variance_pct: Option<f64>,
}

/// Derived metrics for the period-total column
#[derive(Debug, Clone, Default)]
pub struct PeriodMetrics {
    pub loss_ratio: Option<f64>,
    pub loss_ratio_band: Option<RatioBand>,
    pub pepm_net_claims: Option<f64>,
    pub pepm_total_expenses: Option<f64>,
    pub premium_variance_pct: Option<f64>,
    pub expense_variance_pct: Option<f64>,
}

/// Monthly and period metrics plus the degenerate-condition warnings
#[derive(Debug, Clone, Default)]
pub struct MetricSet {
    pub monthly: Vec<MonthlyMetrics>,
    pub period: PeriodMetrics,
    pub warnings: Vec<String>,
}

/// Tracks which degenerate conditions occurred anywhere in the calculation
#[derive(Debug, Clone, Copy, Default)]
struct DegenerateConditions {
    zero_premium: bool,
    zero_members: bool,
    zero_budget: bool,
}

impl DegenerateConditions {
    fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.zero_premium {
            warnings.push(
                "Loss ratio undefined for months with zero premium equivalent".to_string(),
            );
        }
        if self.zero_members {
            warnings.push("PEPM metrics undefined for months with zero enrollment".to_string());
        }
        if self.zero_budget {
            warnings
                .push("Variance percentage undefined where the budget amount is zero".to_string());
        }
        warnings
    }
}

/// numerator ÷ denominator × 100, or `None` on a zero denominator
fn pct(numerator: f64, denominator: f64, flag: &mut bool) -> Option<f64> {
    if denominator == 0.0 {
        *flag = true;
        None
    } else {
        Some(numerator / denominator * 100.0)
    }
}

/// Plain ratio with the same zero-denominator policy
fn per_unit(amount: f64, count: f64, flag: &mut bool) -> Option<f64> {
    if count == 0.0 {
        *flag = true;
        None
    } else {
        Some(amount / count)
    }
}

/// Compute all derived metrics for the aggregated months
pub fn compute_metrics(
    aggregates: &[MonthlyAggregate],
    budget: &BudgetAssumptions,
    thresholds: &RatioBandThresholds,
) -> MetricSet {
    let mut flags = DegenerateConditions::default();
    let mut monthly = Vec::with_capacity(aggregates.len());

    let mut cumulative_net_claims = 0.0;
    let mut cumulative_premium = 0.0;

    for agg in aggregates {
        cumulative_net_claims += agg.net_claims;
        cumulative_premium += agg.premium_equivalent;
        let members = agg.enrolled_members as f64;

        monthly.push(MonthlyMetrics {
            loss_ratio: pct(agg.net_claims, agg.premium_equivalent, &mut flags.zero_premium),
            cumulative_loss_ratio: pct(
                cumulative_net_claims,
                cumulative_premium,
                &mut flags.zero_premium,
            ),
            pepm_net_claims: per_unit(agg.net_claims, members, &mut flags.zero_members),
            pepm_total_expenses: per_unit(agg.total_expenses, members, &mut flags.zero_members),
            premium_variance_pct: pct(
                agg.premium_equivalent - budget.monthly_premium,
                budget.monthly_premium,
                &mut flags.zero_budget,
            ),
            expense_variance_pct: pct(
                agg.total_expenses - budget.monthly_expenses,
                budget.monthly_expenses,
                &mut flags.zero_budget,
            ),
        });
    }

    let total_net_claims: f64 = aggregates.iter().map(|a| a.net_claims).sum();
    let total_expenses: f64 = aggregates.iter().map(|a| a.total_expenses).sum();
    let total_premium: f64 = aggregates.iter().map(|a| a.premium_equivalent).sum();
    let member_months: f64 = aggregates.iter().map(|a| a.enrolled_members as f64).sum();
    let months = aggregates.len() as f64;
    let budget_premium_total = budget.monthly_premium * months;
    let budget_expenses_total = budget.monthly_expenses * months;

    let loss_ratio = pct(total_net_claims, total_premium, &mut flags.zero_premium);
    let period = PeriodMetrics {
        loss_ratio,
        loss_ratio_band: loss_ratio.map(|lr| RatioBand::classify(lr, thresholds)),
        pepm_net_claims: per_unit(total_net_claims, member_months, &mut flags.zero_members),
        pepm_total_expenses: per_unit(total_expenses, member_months, &mut flags.zero_members),
        premium_variance_pct: pct(
            total_premium - budget_premium_total,
            budget_premium_total,
            &mut flags.zero_budget,
        ),
        expense_variance_pct: pct(
            total_expenses - budget_expenses_total,
            budget_expenses_total,
            &mut flags.zero_budget,
        ),
    };

    MetricSet {
        monthly,
        period,
        warnings: flags.warnings(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Period;
    use approx::assert_relative_eq;

    fn aggregate(net_claims: f64, premium: f64, members: u32) -> MonthlyAggregate {
        MonthlyAggregate {
            period: Period::new(2024, 1).unwrap(),
            enrolled_members: members,
            premium_equivalent: premium,
            medical_claims: net_claims,
            pharmacy_claims: 0.0,
            gross_claims: net_claims,
            stop_loss_reimbursement: 0.0,
            net_claims,
            total_fees: 0.0,
            total_expenses: net_claims,
            net_result: premium - net_claims,
        }
    }

    fn defaults() -> (BudgetAssumptions, RatioBandThresholds) {
        (BudgetAssumptions::default(), RatioBandThresholds::default())
    }

    #[test]
    fn test_loss_ratio_percentages() {
        let budget = BudgetAssumptions { monthly_premium: 105_000.0, monthly_expenses: 0.0 };
        let thresholds = RatioBandThresholds::default();
        let aggregates = vec![
            aggregate(80_000.0, 100_000.0, 1_000),
            aggregate(90_000.0, 110_000.0, 1_050),
        ];

        let metrics = compute_metrics(&aggregates, &budget, &thresholds);
        assert_relative_eq!(metrics.monthly[0].loss_ratio.unwrap(), 80.0);
        assert_relative_eq!(round_cents(metrics.monthly[1].loss_ratio.unwrap()), 81.82);
        // Cumulative: 170k / 210k
        assert_relative_eq!(
            metrics.monthly[1].cumulative_loss_ratio.unwrap(),
            170_000.0 / 210_000.0 * 100.0
        );
        assert_relative_eq!(metrics.period.loss_ratio.unwrap(), 170_000.0 / 210_000.0 * 100.0);
    }

    #[test]
    fn test_zero_premium_yields_none_and_one_warning() {
        let (budget, thresholds) = defaults();
        let aggregates = vec![
            aggregate(10_000.0, 0.0, 100),
            aggregate(12_000.0, 0.0, 100),
        ];

        let metrics = compute_metrics(&aggregates, &budget, &thresholds);
        assert!(metrics.monthly[0].loss_ratio.is_none());
        assert!(metrics.monthly[1].loss_ratio.is_none());
        assert!(metrics.period.loss_ratio.is_none());
        assert!(metrics.period.loss_ratio_band.is_none());

        let premium_warnings: Vec<_> = metrics
            .warnings
            .iter()
            .filter(|w| w.contains("premium equivalent"))
            .collect();
        assert_eq!(premium_warnings.len(), 1);
    }

    #[test]
    fn test_pepm_rates() {
        let (budget, thresholds) = defaults();
        let aggregates = vec![aggregate(50_000.0, 100_000.0, 1_000)];

        let metrics = compute_metrics(&aggregates, &budget, &thresholds);
        assert_relative_eq!(metrics.monthly[0].pepm_net_claims.unwrap(), 50.0);
        assert_relative_eq!(metrics.period.pepm_net_claims.unwrap(), 50.0);
    }

    #[test]
    fn test_zero_enrollment_yields_none_with_one_warning() {
        let (budget, thresholds) = defaults();
        let aggregates = vec![aggregate(50_000.0, 100_000.0, 0)];

        let metrics = compute_metrics(&aggregates, &budget, &thresholds);
        assert!(metrics.monthly[0].pepm_net_claims.is_none());
        let enrollment_warnings: Vec<_> = metrics
            .warnings
            .iter()
            .filter(|w| w.contains("enrollment"))
            .collect();
        assert_eq!(enrollment_warnings.len(), 1);
    }

    #[test]
    fn test_variance_percentages() {
        let budget = BudgetAssumptions { monthly_premium: 105_000.0, monthly_expenses: 80_000.0 };
        let thresholds = RatioBandThresholds::default();
        let aggregates = vec![aggregate(84_000.0, 100_000.0, 1_000)];

        let metrics = compute_metrics(&aggregates, &budget, &thresholds);
        // (100k - 105k) / 105k
        assert_relative_eq!(
            metrics.monthly[0].premium_variance_pct.unwrap(),
            -5_000.0 / 105_000.0 * 100.0
        );
        // (84k - 80k) / 80k
        assert_relative_eq!(metrics.monthly[0].expense_variance_pct.unwrap(), 5.0);
    }

    #[test]
    fn test_zero_budget_yields_none_with_warning() {
        let (budget, thresholds) = defaults();
        let aggregates = vec![aggregate(84_000.0, 100_000.0, 1_000)];

        let metrics = compute_metrics(&aggregates, &budget, &thresholds);
        assert!(metrics.monthly[0].premium_variance_pct.is_none());
        assert!(metrics.period.expense_variance_pct.is_none());
        assert!(metrics.warnings.iter().any(|w| w.contains("budget")));
    }

    #[test]
    fn test_band_boundaries() {
        let thresholds = RatioBandThresholds::default();
        assert_eq!(RatioBand::classify(84.99, &thresholds), RatioBand::Favorable);
        assert_eq!(RatioBand::classify(85.0, &thresholds), RatioBand::Caution);
        assert_eq!(RatioBand::classify(94.99, &thresholds), RatioBand::Caution);
        assert_eq!(RatioBand::classify(95.0, &thresholds), RatioBand::Critical);
        assert_eq!(RatioBand::classify(120.0, &thresholds), RatioBand::Critical);
    }

    #[test]
    fn test_round_cents() {
        assert_relative_eq!(round_cents(81.8181818), 81.82);
        assert_relative_eq!(round_cents(123.456), 123.46);
        assert_relative_eq!(round_cents(-4.761904), -4.76);
    }
}
