//! Contribution recalculation.
//!
//! This module recomputes the pension contribution (field 182), the
//! life-expectancy contribution (field 756) and the prorated unemployment
//! base (field 740). All arithmetic is exact decimal; results are rounded
//! to whole pesos with midpoint-to-even.
//!
//! The life-expectancy contribution has three bases:
//!
//! | Subsidy | Days | Base                                                    |
//! |---------|------|---------------------------------------------------------|
//! | no      | -    | `min(unemployment_base, ceiling)`                       |
//! | yes     | 0    | `min(income, ceiling) + min(unemployment_base, ceiling)` |
//! | yes     | > 0  | `min(income + round(base * days / 30), ceiling)`         |
//!
//! Note that the last two cap differently: each addend separately when the
//! day count is unknown, the combined sum when it is known.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::AuditStep;

/// Additional pension contribution rate applied to capped income (0.1%).
pub const PENSION_SURCHARGE_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

/// Life-expectancy contribution rate (0.9%).
pub const LIFE_EXPECTANCY_RATE: Decimal = Decimal::from_parts(9, 0, 0, false, 3);

/// Days in the reference month used for proration.
pub const PRORATION_MONTH_DAYS: i64 = 30;

/// Rounds to a whole amount, midpoint to even.
///
/// # Example
///
/// ```
/// use contribution_rewriter::calculation::round_amount;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_amount(Decimal::from_str("4.5").unwrap()), 4);
/// assert_eq!(round_amount(Decimal::from_str("5.5").unwrap()), 6);
/// assert_eq!(round_amount(Decimal::from_str("5.51").unwrap()), 6);
/// ```
pub fn round_amount(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i64()
        .unwrap_or(0)
}

fn cap(value: i64, ceiling: Option<i64>) -> i64 {
    ceiling.map_or(value, |ceiling| value.min(ceiling))
}

/// Inputs of a main record relevant to contribution calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContributionInputs {
    /// Taxable pension income (field 174).
    pub taxable_income: i64,
    /// Reported pension contribution (field 182).
    pub pension_contribution: i64,
    /// Unemployment insurance base (field 805).
    pub unemployment_base: i64,
    /// Whether the movement code marks a subsidy.
    pub has_subsidy: bool,
    /// Inclusive subsidy day count; 0 when unknown or proration is off.
    pub subsidy_days: i64,
}

/// The recomputed pension contribution.
#[derive(Debug, Clone)]
pub struct PensionContributionResult {
    /// Income after capping.
    pub effective_income: i64,
    /// The new contribution amount.
    pub amount: i64,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Recomputes the pension contribution:
/// `round(min(income, ceiling) * 0.001 + contribution)`.
///
/// # Example
///
/// ```
/// use contribution_rewriter::calculation::calculate_pension_contribution;
///
/// let result = calculate_pension_contribution(3_000_000, 30_000, Some(2_460_000), 1);
/// assert_eq!(result.amount, 32_460);
/// assert_eq!(result.effective_income, 2_460_000);
/// ```
pub fn calculate_pension_contribution(
    taxable_income: i64,
    pension_contribution: i64,
    ceiling: Option<i64>,
    step_number: u32,
) -> PensionContributionResult {
    let effective_income = cap(taxable_income, ceiling);
    let amount = round_amount(
        Decimal::from(effective_income) * PENSION_SURCHARGE_RATE
            + Decimal::from(pension_contribution),
    );

    let reasoning = if effective_income < taxable_income {
        format!(
            "{} (capped from {}) x {} + {} = {}",
            effective_income,
            taxable_income,
            PENSION_SURCHARGE_RATE.normalize(),
            pension_contribution,
            amount
        )
    } else {
        format!(
            "{} x {} + {} = {}",
            effective_income,
            PENSION_SURCHARGE_RATE.normalize(),
            pension_contribution,
            amount
        )
    };

    PensionContributionResult {
        effective_income,
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "pension_contribution".to_string(),
            rule_name: "Pension Contribution".to_string(),
            field_ref: "182".to_string(),
            input: serde_json::json!({
                "taxable_income": taxable_income,
                "pension_contribution": pension_contribution,
                "ceiling": ceiling
            }),
            output: serde_json::json!({
                "effective_income": effective_income,
                "amount": amount
            }),
            reasoning,
        },
    }
}

/// Prorates the unemployment base by subsidy days:
/// `round(base * days / 30)`.
///
/// # Example
///
/// ```
/// use contribution_rewriter::calculation::calculate_proportional_base;
///
/// assert_eq!(calculate_proportional_base(600_000, 15), 300_000);
/// assert_eq!(calculate_proportional_base(100_000, 1), 3_333);
/// ```
pub fn calculate_proportional_base(unemployment_base: i64, subsidy_days: i64) -> i64 {
    round_amount(
        Decimal::from(unemployment_base) * Decimal::from(subsidy_days)
            / Decimal::from(PRORATION_MONTH_DAYS),
    )
}

/// Which base the life-expectancy contribution was computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeExpectancyBasis {
    /// No subsidy: the capped unemployment base alone.
    UnemploymentBase,
    /// Subsidy without a day count: income and base capped separately.
    IndependentCaps,
    /// Subsidy with a day count: income plus prorated base, capped together.
    ProratedSum,
}

/// The recomputed life-expectancy contribution.
#[derive(Debug, Clone)]
pub struct LifeExpectancyResult {
    /// The branch taken.
    pub basis: LifeExpectancyBasis,
    /// The amount the rate was applied to.
    pub contribution_base: i64,
    /// The prorated unemployment base, for the prorated branch.
    pub proportional_base: Option<i64>,
    /// The new contribution amount.
    pub amount: i64,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Recomputes the life-expectancy contribution.
///
/// # Example
///
/// ```
/// use contribution_rewriter::calculation::{
///     ContributionInputs, LifeExpectancyBasis, calculate_life_expectancy_contribution,
/// };
///
/// let inputs = ContributionInputs {
///     taxable_income: 1_000_000,
///     unemployment_base: 600_000,
///     has_subsidy: true,
///     subsidy_days: 15,
///     ..ContributionInputs::default()
/// };
/// let result = calculate_life_expectancy_contribution(&inputs, Some(2_460_000), 1);
///
/// assert_eq!(result.basis, LifeExpectancyBasis::ProratedSum);
/// assert_eq!(result.proportional_base, Some(300_000));
/// assert_eq!(result.amount, 11_700);
/// ```
pub fn calculate_life_expectancy_contribution(
    inputs: &ContributionInputs,
    ceiling: Option<i64>,
    step_number: u32,
) -> LifeExpectancyResult {
    let (basis, contribution_base, proportional_base, derivation) = if !inputs.has_subsidy {
        let base = cap(inputs.unemployment_base, ceiling);
        (
            LifeExpectancyBasis::UnemploymentBase,
            base,
            None,
            format!("min({}, ceiling) = {}", inputs.unemployment_base, base),
        )
    } else if inputs.subsidy_days <= 0 {
        let income = cap(inputs.taxable_income, ceiling);
        let base = cap(inputs.unemployment_base, ceiling);
        (
            LifeExpectancyBasis::IndependentCaps,
            income + base,
            None,
            format!(
                "min({}, ceiling) + min({}, ceiling) = {} + {}",
                inputs.taxable_income, inputs.unemployment_base, income, base
            ),
        )
    } else {
        let proportional =
            calculate_proportional_base(inputs.unemployment_base, inputs.subsidy_days);
        let sum = inputs.taxable_income + proportional;
        let capped = cap(sum, ceiling);
        (
            LifeExpectancyBasis::ProratedSum,
            capped,
            Some(proportional),
            format!(
                "min({} + round({} x {} / {}), ceiling) = min({}, ceiling) = {}",
                inputs.taxable_income,
                inputs.unemployment_base,
                inputs.subsidy_days,
                PRORATION_MONTH_DAYS,
                sum,
                capped
            ),
        )
    };

    let amount = round_amount(Decimal::from(contribution_base) * LIFE_EXPECTANCY_RATE);

    LifeExpectancyResult {
        basis,
        contribution_base,
        proportional_base,
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "life_expectancy_contribution".to_string(),
            rule_name: "Life-Expectancy Contribution".to_string(),
            field_ref: "756".to_string(),
            input: serde_json::json!({
                "taxable_income": inputs.taxable_income,
                "unemployment_base": inputs.unemployment_base,
                "has_subsidy": inputs.has_subsidy,
                "subsidy_days": inputs.subsidy_days,
                "ceiling": ceiling
            }),
            output: serde_json::json!({
                "basis": basis,
                "contribution_base": contribution_base,
                "proportional_base": proportional_base,
                "amount": amount
            }),
            reasoning: format!(
                "{}; {} x {} = {}",
                derivation,
                contribution_base,
                LIFE_EXPECTANCY_RATE.normalize(),
                amount
            ),
        },
    }
}

/// The value to write into field 740, if it is written at all.
///
/// Only subsidized records with a positive unemployment base touch the
/// field: the prorated base when the day count is known, the raw base
/// otherwise.
///
/// # Example
///
/// ```
/// use contribution_rewriter::calculation::{ContributionInputs, unemployment_base_field_value};
///
/// let mut inputs = ContributionInputs {
///     unemployment_base: 600_000,
///     has_subsidy: true,
///     subsidy_days: 15,
///     ..ContributionInputs::default()
/// };
/// assert_eq!(unemployment_base_field_value(&inputs), Some(300_000));
///
/// inputs.has_subsidy = false;
/// assert_eq!(unemployment_base_field_value(&inputs), None);
/// ```
pub fn unemployment_base_field_value(inputs: &ContributionInputs) -> Option<i64> {
    if !inputs.has_subsidy || inputs.unemployment_base <= 0 {
        return None;
    }
    if inputs.subsidy_days > 0 {
        Some(calculate_proportional_base(
            inputs.unemployment_base,
            inputs.subsidy_days,
        ))
    } else {
        Some(inputs.unemployment_base)
    }
}
