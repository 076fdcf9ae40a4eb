//! Margin classification rules.
//!
//! Classification is an ordered decision table: the first rule whose guard
//! matches decides the health tier and the pricing action.

use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{HealthStatus, MarginTrend, PricingAction};

/// Margin percent at or above which a customer is healthy.
pub const HEALTHY_MARGIN_THRESHOLD: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// Margin the price recommendation aims for, as a fraction (0.30).
pub const TARGET_MARGIN: Decimal = Decimal::from_parts(30, 0, 0, false, 2);

/// Revenue below which a losing customer is a termination candidate.
pub const TERMINATION_REVENUE_CEILING: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Margin change, in percentage points, that counts as a trend.
pub const TREND_TOLERANCE: Decimal = Decimal::ONE;

const MONEY_DP: u32 = 2;

/// Values a rule guard looks at.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput {
    /// Margin percent.
    pub margin_percent: Decimal,
    /// Revenue.
    pub total_revenue: Decimal,
    /// Trend against the prior period.
    pub trend: MarginTrend,
}

/// One row of the decision table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Short name for logs and audits.
    pub name: &'static str,
    /// Guard.
    pub applies: fn(&RuleInput) -> bool,
    /// Resulting tier.
    pub health: HealthStatus,
    /// Resulting action.
    pub action: PricingAction,
}

fn healthy_margin(input: &RuleInput) -> bool {
    input.margin_percent >= HEALTHY_MARGIN_THRESHOLD
}

fn thin_margin(input: &RuleInput) -> bool {
    input.margin_percent >= Decimal::ZERO && input.margin_percent < HEALTHY_MARGIN_THRESHOLD
}

fn thin_and_declining(input: &RuleInput) -> bool {
    thin_margin(input) && input.trend == MarginTrend::Declining
}

fn small_losing_account(input: &RuleInput) -> bool {
    input.margin_percent < Decimal::ZERO && input.total_revenue < TERMINATION_REVENUE_CEILING
}

fn losing_account(input: &RuleInput) -> bool {
    input.margin_percent < Decimal::ZERO
}

/// The decision table, in evaluation order.
pub static RULES: [Rule; 5] = [
    Rule {
        name: "healthy_margin",
        applies: healthy_margin,
        health: HealthStatus::Healthy,
        action: PricingAction::Maintain,
    },
    Rule {
        name: "thin_and_declining",
        applies: thin_and_declining,
        health: HealthStatus::Warning,
        action: PricingAction::RaisePrices,
    },
    Rule {
        name: "thin_margin",
        applies: thin_margin,
        health: HealthStatus::Warning,
        action: PricingAction::Monitor,
    },
    Rule {
        name: "small_losing_account",
        applies: small_losing_account,
        health: HealthStatus::Critical,
        action: PricingAction::ConsiderTermination,
    },
    Rule {
        name: "losing_account",
        applies: losing_account,
        health: HealthStatus::Critical,
        action: PricingAction::UrgentRaisePrices,
    },
];

/// Returns the first matching rule.
///
/// The guards cover every margin, so a rule always matches; the final rule is
/// returned otherwise.
#[must_use]
pub fn first_match(input: &RuleInput) -> &'static Rule {
    RULES
        .iter()
        .find(|rule| (rule.applies)(input))
        .unwrap_or(&RULES[RULES.len() - 1])
}

/// Gross profit as a percentage of revenue; zero without revenue.
#[must_use]
pub fn margin_percent(total_revenue: Decimal, gross_profit: Decimal) -> Decimal {
    if total_revenue.is_zero() {
        return Decimal::ZERO;
    }
    gross_profit / total_revenue * Decimal::ONE_HUNDRED
}

/// Compares the current margin with the prior period's.
#[must_use]
pub fn margin_trend(current: Decimal, prior: Option<Decimal>) -> MarginTrend {
    match prior {
        None => MarginTrend::Unknown,
        Some(prior) if current - prior > TREND_TOLERANCE => MarginTrend::Improving,
        Some(prior) if prior - current > TREND_TOLERANCE => MarginTrend::Declining,
        Some(_) => MarginTrend::Stable,
    }
}

/// Termination candidate: small revenue and a negative margin.
#[must_use]
pub fn is_fire_list_candidate(total_revenue: Decimal, margin_percent: Decimal) -> bool {
    total_revenue < TERMINATION_REVENUE_CEILING && margin_percent < Decimal::ZERO
}

/// Additional revenue needed to reach the target margin at current cost.
///
/// Returns `(amount, percent_of_revenue)`, both rounded to cents, or `None`
/// when there is no revenue to raise.
#[must_use]
pub fn recommended_increase(
    total_revenue: Decimal,
    total_cost: Decimal,
) -> Option<(Decimal, Decimal)> {
    if total_revenue.is_zero() {
        return None;
    }
    let required_revenue = total_cost.checked_div(Decimal::ONE - TARGET_MARGIN)?;
    let increase = required_revenue.checked_sub(total_revenue)?;
    let pct = increase.checked_div(total_revenue)?.checked_mul(Decimal::ONE_HUNDRED)?;

    Some((round_money(increase), round_money(pct)))
}

/// Rounds to two decimal places, halves away from zero.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}
