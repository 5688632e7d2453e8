//! Generate a sample calculation input for exercising the CLI
//!
//! Writes a plausible plan year of experience data, fee structures, and
//! high-cost claimants as JSON to the given path (or stdout).

use anyhow::{Context, Result};
use reporting_engine::{
    BudgetAssumptions, ExperienceDataRow, FeeCategory, FeeStatus, FeeStructure, HighCostClaimant,
    Period, RateBasis, ReportingPeriod, SummaryCalculationInput,
};

fn period(month: u8) -> Result<Period> {
    Period::new(2024, month).map_err(|e| anyhow::anyhow!("{e}"))
}

fn build_input() -> Result<SummaryCalculationInput> {
    let mut experience_data = Vec::new();
    for month in 1..=12u8 {
        let m = month as f64;
        // Mild seasonality: claims drift up through the year
        experience_data.push(ExperienceDataRow {
            period: period(month)?,
            category: "PPO".to_string(),
            enrolled_members: 820 + (month as u32 % 5) * 7,
            domestic_facility_claims: 38_000.0 + m * 1_150.0,
            non_domestic_facility_claims: 1_900.0 + m * 85.0,
            non_hospital_claims: 17_500.0 + m * 420.0,
            pharmacy_claims: 12_300.0 + m * 310.0,
            premium_equivalent: 86_000.0 + m * 900.0,
        });
        experience_data.push(ExperienceDataRow {
            period: period(month)?,
            category: "HDHP".to_string(),
            enrolled_members: 240 + (month as u32 % 3) * 4,
            domestic_facility_claims: 8_400.0 + m * 260.0,
            non_domestic_facility_claims: 0.0,
            non_hospital_claims: 4_100.0 + m * 130.0,
            pharmacy_claims: 2_700.0 + m * 90.0,
            premium_equivalent: 21_000.0 + m * 250.0,
        });
    }

    let fee_structures = vec![
        FeeStructure {
            name: "TPA Claims Administration".to_string(),
            category: FeeCategory::Administration,
            rate_basis: RateBasis::PerMemberPerMonth,
            rate: 5.25,
            effective_start: period(1)?,
            effective_end: period(12)?,
            status: FeeStatus::Active,
        },
        FeeStructure {
            name: "Network Access".to_string(),
            category: FeeCategory::Network,
            rate_basis: RateBasis::PercentOfPremium,
            rate: 1.4,
            effective_start: period(1)?,
            effective_end: period(12)?,
            status: FeeStatus::Active,
        },
        FeeStructure {
            name: "Benefits Consulting Retainer".to_string(),
            category: FeeCategory::Consulting,
            rate_basis: RateBasis::FlatPerPeriod,
            rate: 54_000.0,
            effective_start: period(1)?,
            effective_end: period(12)?,
            status: FeeStatus::Active,
        },
        FeeStructure {
            name: "Individual Stop-Loss Premium".to_string(),
            category: FeeCategory::StopLossPremium,
            rate_basis: RateBasis::PerMemberPerMonth,
            rate: 41.80,
            effective_start: period(1)?,
            effective_end: period(12)?,
            status: FeeStatus::Active,
        },
        FeeStructure {
            name: "Legacy Wellness Vendor".to_string(),
            category: FeeCategory::Wellness,
            rate_basis: RateBasis::FlatPerPeriod,
            rate: 18_000.0,
            effective_start: period(1)?,
            effective_end: period(6)?,
            status: FeeStatus::Inactive,
        },
    ];

    let high_cost_claimants = vec![
        HighCostClaimant {
            claimant_id: "HCC-2024-004".to_string(),
            incurred_period: period(3)?,
            total_paid: 212_000.0,
            reimbursement_eligible: true,
        },
        HighCostClaimant {
            claimant_id: "HCC-2024-011".to_string(),
            incurred_period: period(8)?,
            total_paid: 96_500.0,
            reimbursement_eligible: true,
        },
        HighCostClaimant {
            claimant_id: "HCC-2024-013".to_string(),
            incurred_period: period(9)?,
            total_paid: 61_200.0,
            reimbursement_eligible: false,
        },
    ];

    Ok(SummaryCalculationInput {
        experience_data,
        fee_structures,
        high_cost_claimants,
        reporting_period: ReportingPeriod::new(
            period(1)?,
            period(12)?,
            BudgetAssumptions { monthly_premium: 112_000.0, monthly_expenses: 105_000.0 },
        ),
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let input = build_input()?;
    let json = serde_json::to_string_pretty(&input)?;

    match std::env::args().nth(1) {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("failed to write {path}"))?;
            println!("Sample input written to: {path}");
        }
        None => println!("{json}"),
    }

    Ok(())
}
