//! Defect-class errors raised by the calculation pipeline
//!
//! These indicate a bug in the pipeline rather than bad user input: after
//! validation and zero-fill every month and fee category must have a value.
//! They are recovered at the result-assembler boundary and reported as an
//! unexpected failure, never allowed to escape as a panic.

use crate::input::FeeCategory;
use thiserror::Error;

/// Invariant violations surfaced while assembling the summary table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The reporting period resolved to zero months after validation passed
    #[error("internal error: reporting period resolved to zero months")]
    EmptyPeriod,

    /// A per-month series does not span the reporting period
    #[error("internal error: {what} has {actual} months, expected {expected}")]
    MonthCountMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The fee allocation is missing a category that must always be present
    #[error("internal error: no fee allocation for category {0:?}")]
    MissingFeeCategory(FeeCategory),
}
