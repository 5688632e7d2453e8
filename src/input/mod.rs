//! Input data model for the summary calculation engine

mod data;
mod period;

pub use data::{
    ExperienceDataRow, FeeCategory, FeeStatus, FeeStructure, HighCostClaimant, RateBasis,
    SummaryCalculationInput,
};
pub use period::{BudgetAssumptions, ParsePeriodError, Period, ReportingPeriod};
