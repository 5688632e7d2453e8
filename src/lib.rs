//! Reporting Engine - Summary calculation engine for claims & expense reporting
//!
//! This library provides:
//! - Structural validation of monthly experience, fee, and claimant inputs
//! - Fee allocation across rate bases (PMPM, percent-of-premium, flat)
//! - Monthly aggregation with stop-loss reimbursement offsets
//! - Derived metrics (loss ratios, PEPM rates, budget variances)
//! - Assembly of the fixed 28-row summary table with warnings and errors
//!   packaged into a single structured result

pub mod engine;
pub mod error;
pub mod export;
pub mod input;

// Re-export commonly used types
pub use engine::{
    CompleteSummaryRow, EngineConfig, RatioBand, RatioBandThresholds, SummaryCalculationResult,
    SummaryCalculator, SummaryMetadata, SummaryRowId,
};
pub use error::EngineError;
pub use input::{
    BudgetAssumptions, ExperienceDataRow, FeeCategory, FeeStatus, FeeStructure, HighCostClaimant,
    Period, RateBasis, ReportingPeriod, SummaryCalculationInput,
};
