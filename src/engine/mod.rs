//! The summary calculation pipeline
//!
//! Stages run strictly forward: validation, fee allocation, monthly
//! aggregation, metric derivation, table assembly, result packaging.

pub mod aggregate;
pub mod calculator;
pub mod fees;
pub mod metrics;
pub mod rows;
pub mod table;
pub mod validate;

pub use aggregate::{MonthlyAggregate, MonthlyExperience};
pub use calculator::{EngineConfig, SummaryCalculator};
pub use fees::FeeAllocation;
pub use metrics::{MetricSet, MonthlyMetrics, PeriodMetrics, RatioBand, RatioBandThresholds};
pub use rows::{
    CompleteSummaryRow, RowUnit, SummaryCalculationResult, SummaryMetadata, SummaryRowId,
};
pub use validate::{validate, ValidationReport};
