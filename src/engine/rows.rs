//! Summary table row taxonomy and result structures
//!
//! [`SummaryRowId`] is the single source of truth for the row set: its
//! variant order is the table order and `ALL.len()` is the row count.

use crate::input::{FeeCategory, Period};
use super::metrics::RatioBand;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of one semantic row of the summary table, in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SummaryRowId {
    EnrolledMembers,
    PremiumIncome,
    MedicalClaims,
    PharmacyClaims,
    GrossClaims,
    StopLossReimbursement,
    NetClaims,
    AdministrationFees,
    NetworkFees,
    ConsultingFees,
    WellnessFees,
    StopLossPremium,
    OtherFees,
    TotalFees,
    TotalExpenses,
    CumulativeExpenses,
    NetResult,
    CumulativeNetResult,
    MonthlyLossRatio,
    CumulativeLossRatio,
    PepmNetClaims,
    PepmTotalExpenses,
    BudgetedPremium,
    PremiumVariance,
    PremiumVariancePct,
    BudgetedExpenses,
    ExpenseVariance,
    ExpenseVariancePct,
}

/// How a row's values should be formatted downstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowUnit {
    Count,
    Currency,
    Percent,
}

impl SummaryRowId {
    /// All rows in table order
    pub const ALL: [SummaryRowId; 28] = [
        SummaryRowId::EnrolledMembers,
        SummaryRowId::PremiumIncome,
        SummaryRowId::MedicalClaims,
        SummaryRowId::PharmacyClaims,
        SummaryRowId::GrossClaims,
        SummaryRowId::StopLossReimbursement,
        SummaryRowId::NetClaims,
        SummaryRowId::AdministrationFees,
        SummaryRowId::NetworkFees,
        SummaryRowId::ConsultingFees,
        SummaryRowId::WellnessFees,
        SummaryRowId::StopLossPremium,
        SummaryRowId::OtherFees,
        SummaryRowId::TotalFees,
        SummaryRowId::TotalExpenses,
        SummaryRowId::CumulativeExpenses,
        SummaryRowId::NetResult,
        SummaryRowId::CumulativeNetResult,
        SummaryRowId::MonthlyLossRatio,
        SummaryRowId::CumulativeLossRatio,
        SummaryRowId::PepmNetClaims,
        SummaryRowId::PepmTotalExpenses,
        SummaryRowId::BudgetedPremium,
        SummaryRowId::PremiumVariance,
        SummaryRowId::PremiumVariancePct,
        SummaryRowId::BudgetedExpenses,
        SummaryRowId::ExpenseVariance,
        SummaryRowId::ExpenseVariancePct,
    ];

    /// Display label for the row
    pub fn label(&self) -> &'static str {
        match self {
            SummaryRowId::EnrolledMembers => "Enrolled Members",
            SummaryRowId::PremiumIncome => "Premium Income",
            SummaryRowId::MedicalClaims => "Medical Claims",
            SummaryRowId::PharmacyClaims => "Pharmacy Claims",
            SummaryRowId::GrossClaims => "Gross Claims",
            SummaryRowId::StopLossReimbursement => "Stop-Loss Reimbursement",
            SummaryRowId::NetClaims => "Net Claims",
            SummaryRowId::AdministrationFees => "Administration Fees",
            SummaryRowId::NetworkFees => "Network Access Fees",
            SummaryRowId::ConsultingFees => "Consulting Fees",
            SummaryRowId::WellnessFees => "Wellness Program Fees",
            SummaryRowId::StopLossPremium => "Stop-Loss Premium",
            SummaryRowId::OtherFees => "Other Fees",
            SummaryRowId::TotalFees => "Total Fees",
            SummaryRowId::TotalExpenses => "Total Claims & Expenses",
            SummaryRowId::CumulativeExpenses => "Cumulative Claims & Expenses",
            SummaryRowId::NetResult => "Net Result",
            SummaryRowId::CumulativeNetResult => "Cumulative Net Result",
            SummaryRowId::MonthlyLossRatio => "Loss Ratio %",
            SummaryRowId::CumulativeLossRatio => "Cumulative Loss Ratio %",
            SummaryRowId::PepmNetClaims => "Net Claims PEPM",
            SummaryRowId::PepmTotalExpenses => "Total Expenses PEPM",
            SummaryRowId::BudgetedPremium => "Budgeted Premium",
            SummaryRowId::PremiumVariance => "Premium Variance",
            SummaryRowId::PremiumVariancePct => "Premium Variance %",
            SummaryRowId::BudgetedExpenses => "Budgeted Expenses",
            SummaryRowId::ExpenseVariance => "Expense Variance",
            SummaryRowId::ExpenseVariancePct => "Expense Variance %",
        }
    }

    /// Formatting unit for the row's values
    pub fn unit(&self) -> RowUnit {
        match self {
            SummaryRowId::EnrolledMembers => RowUnit::Count,
            SummaryRowId::MonthlyLossRatio
            | SummaryRowId::CumulativeLossRatio
            | SummaryRowId::PremiumVariancePct
            | SummaryRowId::ExpenseVariancePct => RowUnit::Percent,
            _ => RowUnit::Currency,
        }
    }

    /// The row a fee category's allocation rolls into
    pub fn for_fee_category(category: FeeCategory) -> Self {
        match category {
            FeeCategory::Administration => SummaryRowId::AdministrationFees,
            FeeCategory::Network => SummaryRowId::NetworkFees,
            FeeCategory::Consulting => SummaryRowId::ConsultingFees,
            FeeCategory::Wellness => SummaryRowId::WellnessFees,
            FeeCategory::StopLossPremium => SummaryRowId::StopLossPremium,
            FeeCategory::Other => SummaryRowId::OtherFees,
        }
    }
}

/// One row of the computed summary table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteSummaryRow {
    /// Row identity; position in [`SummaryRowId::ALL`] is the table order
    pub id: SummaryRowId,

    /// Display label
    pub label: String,

    /// One value per month of the reporting period; `None` marks an
    /// undefined metric (zero-denominator)
    pub values: Vec<Option<f64>>,

    /// Period-total column
    pub total: Option<f64>,

    /// Band classification of the period total; loss-ratio rows only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<RatioBand>,
}

/// Metadata describing one calculation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMetadata {
    pub period_start: Period,
    pub period_end: Period,
    pub row_count: usize,
    pub month_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl SummaryMetadata {
    /// Months covered by the reporting period, in column order
    pub fn months(&self) -> Vec<Period> {
        let mut months = Vec::with_capacity(self.month_count);
        let mut current = self.period_start;
        while current <= self.period_end {
            months.push(current);
            current = current.succ();
        }
        months
    }
}

/// The packaged outcome of one engine invocation
///
/// Every failure mode is representable here; the engine never panics or
/// returns a bare error to its caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryCalculationResult {
    pub success: bool,

    /// The 28 table rows; present only on success
    #[serde(rename = "data", skip_serializing_if = "Option::is_none", default)]
    pub rows: Option<Vec<CompleteSummaryRow>>,

    pub metadata: SummaryMetadata,

    /// Data-quality and degenerate-condition findings
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,

    /// Fatal problems; present only on failure
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<String>,
}

impl SummaryCalculationResult {
    /// A successful result carrying the table rows
    pub fn succeeded(
        rows: Vec<CompleteSummaryRow>,
        metadata: SummaryMetadata,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            success: true,
            rows: Some(rows),
            metadata,
            warnings,
            errors: Vec::new(),
        }
    }

    /// A failed result carrying the error list and no row data
    pub fn failed(errors: Vec<String>, warnings: Vec<String>, metadata: SummaryMetadata) -> Self {
        Self {
            success: false,
            rows: None,
            metadata,
            warnings,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_row_set_is_28_distinct_rows() {
        assert_eq!(SummaryRowId::ALL.len(), 28);
        for (i, a) in SummaryRowId::ALL.iter().enumerate() {
            for b in SummaryRowId::ALL.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_row_order_spot_checks() {
        assert_eq!(SummaryRowId::ALL[0], SummaryRowId::EnrolledMembers);
        assert_eq!(SummaryRowId::ALL[6], SummaryRowId::NetClaims);
        assert_eq!(SummaryRowId::ALL[13], SummaryRowId::TotalFees);
        assert_eq!(SummaryRowId::ALL[27], SummaryRowId::ExpenseVariancePct);
    }

    #[test]
    fn test_every_fee_category_maps_to_a_fee_row() {
        let fee_rows: Vec<_> = FeeCategory::ALL
            .iter()
            .map(|c| SummaryRowId::for_fee_category(*c))
            .collect();
        for row in &fee_rows {
            assert!(SummaryRowId::ALL.contains(row));
            assert_eq!(row.unit(), RowUnit::Currency);
        }
        // Distinct rows per category
        for (i, a) in fee_rows.iter().enumerate() {
            for b in fee_rows.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_units() {
        assert_eq!(SummaryRowId::EnrolledMembers.unit(), RowUnit::Count);
        assert_eq!(SummaryRowId::NetClaims.unit(), RowUnit::Currency);
        assert_eq!(SummaryRowId::MonthlyLossRatio.unit(), RowUnit::Percent);
        assert_eq!(SummaryRowId::ExpenseVariancePct.unit(), RowUnit::Percent);
    }

    #[test]
    fn test_failure_serialization_omits_data() {
        let metadata = SummaryMetadata {
            period_start: "2024-01".parse().unwrap(),
            period_end: "2024-03".parse().unwrap(),
            row_count: 0,
            month_count: 3,
            generated_at: Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
        };
        let result = SummaryCalculationResult::failed(
            vec!["No experience data provided".to_string()],
            Vec::new(),
            metadata,
        );

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(!json.contains("\"data\""));
        assert!(!json.contains("\"warnings\""));
        assert!(json.contains("\"errors\""));
    }
}
