//! Fee allocation across the reporting period
//!
//! Resolves, for each calendar month and each active fee structure covering
//! it, the allocated fee amount per category. Allocation is keyed by
//! category and month, never by insertion order: structures are folded in a
//! canonical order so any permutation of the input produces an identical
//! allocation.

use crate::input::{FeeCategory, FeeStructure, Period, RateBasis, ReportingPeriod};
use super::aggregate::MonthlyExperience;
use std::collections::BTreeMap;

/// Allocated fee amounts per category, one value per month of the period
///
/// Every [`FeeCategory`] is always present; categories with no matching
/// structures carry zero-valued vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeAllocation {
    by_category: BTreeMap<FeeCategory, Vec<f64>>,
    month_count: usize,
}

impl FeeAllocation {
    fn zeroed(month_count: usize) -> Self {
        let by_category = FeeCategory::ALL
            .iter()
            .map(|c| (*c, vec![0.0; month_count]))
            .collect();
        Self { by_category, month_count }
    }

    /// Per-month amounts for one category
    pub fn category(&self, category: FeeCategory) -> Option<&[f64]> {
        self.by_category.get(&category).map(|v| v.as_slice())
    }

    /// Total allocated fees across all categories for one month
    pub fn total_for_month(&self, index: usize) -> f64 {
        self.by_category
            .values()
            .filter_map(|v| v.get(index))
            .sum()
    }

    pub fn month_count(&self) -> usize {
        self.month_count
    }
}

/// Sort key covering every field that influences an allocated amount, so
/// equal keys imply equal contributions and the fold is order-independent
fn canonical_key(fee: &FeeStructure) -> (FeeCategory, u8, u64, Period, Period, String) {
    let basis_rank = match fee.rate_basis {
        RateBasis::PerMemberPerMonth => 0,
        RateBasis::PercentOfPremium => 1,
        RateBasis::FlatPerPeriod => 2,
    };
    (
        fee.category,
        basis_rank,
        fee.rate.to_bits(),
        fee.effective_start,
        fee.effective_end,
        fee.name.clone(),
    )
}

/// Allocate all active, overlapping fee structures across the period
///
/// `experience` must be the month-aligned rollup for the same period; PMPM
/// rates multiply its member counts and percent-of-premium rates its premium
/// equivalents. Flat-per-period rates spread evenly over the months the
/// structure covers within the period.
pub fn allocate(
    structures: &[FeeStructure],
    period: &ReportingPeriod,
    experience: &[MonthlyExperience],
) -> FeeAllocation {
    let months = period.months();
    let mut allocation = FeeAllocation::zeroed(months.len());

    let mut active: Vec<&FeeStructure> = structures
        .iter()
        .filter(|f| f.status.is_active() && f.overlaps(period))
        .collect();
    active.sort_by_key(|f| canonical_key(f));

    for fee in active {
        let covered = fee.covered_months(period);
        if covered.is_empty() {
            continue;
        }
        let flat_share = fee.rate / covered.len() as f64;

        for month in covered {
            let Some(index) = period.index_of(month) else {
                continue;
            };
            let amount = match fee.rate_basis {
                RateBasis::PerMemberPerMonth => {
                    let members = experience.get(index).map_or(0.0, |e| e.enrolled_members as f64);
                    fee.rate * members
                }
                RateBasis::PercentOfPremium => {
                    let premium = experience.get(index).map_or(0.0, |e| e.premium_equivalent);
                    fee.rate / 100.0 * premium
                }
                RateBasis::FlatPerPeriod => flat_share,
            };
            if let Some(values) = allocation.by_category.get_mut(&fee.category) {
                values[index] += amount;
            }
        }
    }

    allocation
}
