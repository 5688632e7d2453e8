//! Input records consumed by the summary calculation engine
//!
//! These mirror the payload the upstream request layer assembles from its
//! store: monthly experience data, fee configuration, and high-cost-claimant
//! records. The engine treats all of them as read-only.

use super::period::{Period, ReportingPeriod};
use serde::{Deserialize, Serialize};

/// Basis on which a fee rate is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateBasis {
    /// Rate × enrolled member count for the month
    PerMemberPerMonth,
    /// Rate (a percentage, e.g. 2.5 = 2.5%) × the month's premium equivalent
    PercentOfPremium,
    /// Fixed amount spread evenly across the months the structure covers
    /// within the reporting period
    FlatPerPeriod,
}

/// Closed set of fee categories; each maps to exactly one summary table row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeeCategory {
    /// TPA / claims administration
    Administration,
    /// Network access
    Network,
    /// Consulting and brokerage
    Consulting,
    /// Wellness programs
    Wellness,
    /// Stop-loss coverage premium
    StopLossPremium,
    /// Anything that fits no other bucket
    Other,
}

impl FeeCategory {
    /// All categories in summary table row order
    pub const ALL: [FeeCategory; 6] = [
        FeeCategory::Administration,
        FeeCategory::Network,
        FeeCategory::Consulting,
        FeeCategory::Wellness,
        FeeCategory::StopLossPremium,
        FeeCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeeCategory::Administration => "Administration",
            FeeCategory::Network => "Network",
            FeeCategory::Consulting => "Consulting",
            FeeCategory::Wellness => "Wellness",
            FeeCategory::StopLossPremium => "Stop-Loss Premium",
            FeeCategory::Other => "Other",
        }
    }
}

/// Whether a fee structure participates in allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeStatus {
    Active,
    Inactive,
}

impl FeeStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, FeeStatus::Active)
    }
}

/// One month of raw claims/premium activity for one plan category
///
/// Uniquely keyed by `(period, category)`; when duplicates arrive the last
/// one wins and a data-quality warning is recorded. Medical claims arrive
/// split the way the carrier feed reports them; `medical_claims()` is the
/// total the table works with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceDataRow {
    /// Incurred month
    pub period: Period,

    /// Plan/coverage label, e.g. "PPO" or "HDHP"
    pub category: String,

    /// Enrolled member count for the month
    pub enrolled_members: u32,

    /// Domestic facility claims (inpatient/outpatient)
    pub domestic_facility_claims: f64,

    /// Non-domestic facility claims (inpatient/outpatient)
    #[serde(default)]
    pub non_domestic_facility_claims: f64,

    /// Professional and other non-hospital medical claims
    #[serde(default)]
    pub non_hospital_claims: f64,

    /// Pharmacy claims
    pub pharmacy_claims: f64,

    /// Premium-equivalent income for the month
    pub premium_equivalent: f64,
}

impl ExperienceDataRow {
    /// Total medical claims across the component split
    pub fn medical_claims(&self) -> f64 {
        self.domestic_facility_claims + self.non_domestic_facility_claims + self.non_hospital_claims
    }

    /// Smallest claims or premium amount on the row, used by validation to
    /// detect negative inputs
    pub fn min_amount(&self) -> f64 {
        self.domestic_facility_claims
            .min(self.non_domestic_facility_claims)
            .min(self.non_hospital_claims)
            .min(self.pharmacy_claims)
            .min(self.premium_equivalent)
    }
}

/// A fee rule: what to charge, on what basis, and when it applies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeStructure {
    /// Display label, e.g. "TPA Claims Administration"
    pub name: String,

    /// Summary table row this fee rolls into
    pub category: FeeCategory,

    /// How the rate is applied
    pub rate_basis: RateBasis,

    /// Numeric rate; dollars for PMPM and flat bases, a percentage for
    /// PercentOfPremium
    pub rate: f64,

    /// First month the rule is effective (inclusive)
    pub effective_start: Period,

    /// Last month the rule is effective (inclusive)
    pub effective_end: Period,

    /// Inactive structures are skipped entirely
    pub status: FeeStatus,
}

impl FeeStructure {
    /// Whether the structure covers a given month
    pub fn covers(&self, period: Period) -> bool {
        self.effective_start <= period && period <= self.effective_end
    }

    /// Months of the reporting period this structure is effective in
    pub fn covered_months(&self, period: &ReportingPeriod) -> Vec<Period> {
        period
            .months()
            .into_iter()
            .filter(|m| self.covers(*m))
            .collect()
    }

    /// Whether the effective range overlaps the reporting period at all
    pub fn overlaps(&self, period: &ReportingPeriod) -> bool {
        self.effective_start <= period.end && self.effective_end >= period.start
    }
}

/// A high-cost claimant record, used only in aggregate to offset claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighCostClaimant {
    /// Opaque claimant identifier; never surfaced in output
    pub claimant_id: String,

    /// Month the claims were incurred
    pub incurred_period: Period,

    /// Total paid for the claimant in that month
    pub total_paid: f64,

    /// Whether the amount is eligible for stop-loss reimbursement
    pub reimbursement_eligible: bool,
}

/// The aggregate root handed to the engine by the request layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryCalculationInput {
    /// Raw monthly experience rows; must be non-empty
    pub experience_data: Vec<ExperienceDataRow>,

    /// Fee configuration; may be empty
    #[serde(default)]
    pub fee_structures: Vec<FeeStructure>,

    /// High-cost-claimant records; may be empty
    #[serde(default)]
    pub high_cost_claimants: Vec<HighCostClaimant>,

    /// The month range and budget the table covers
    pub reporting_period: ReportingPeriod,
}
