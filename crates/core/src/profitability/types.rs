//! Profitability types.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::PartyNo;

use super::period::ResolvedPeriod;

/// Aggregated sales of one customer over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSalesFacts {
    /// Customer number.
    pub customer_no: PartyNo,
    /// Customer name.
    pub customer_name: String,
    /// Revenue in the period.
    pub total_revenue: Decimal,
    /// Cost of sales in the period.
    pub total_cost: Decimal,
    /// Labor hours billed in the period.
    pub total_hours: Decimal,
    /// Distinct invoices in the period.
    pub invoice_count: u64,
    /// Revenue in the preceding period of equal length.
    pub prior_revenue: Option<Decimal>,
    /// Cost in the preceding period of equal length.
    pub prior_cost: Option<Decimal>,
}

/// Margin health tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Margin at or above the healthy threshold.
    Healthy,
    /// Positive margin below the healthy threshold.
    Warning,
    /// Negative margin.
    Critical,
}

impl HealthStatus {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommended pricing action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PricingAction {
    /// Keep current pricing.
    #[serde(rename = "Maintain")]
    Maintain,
    /// Watch the account.
    #[serde(rename = "Monitor")]
    Monitor,
    /// Raise prices towards the target margin.
    #[serde(rename = "Raise Prices")]
    RaisePrices,
    /// The account loses money; raise prices now.
    #[serde(rename = "Urgent - Raise Prices")]
    UrgentRaisePrices,
    /// Small account losing money.
    #[serde(rename = "Consider Termination")]
    ConsiderTermination,
}

impl PricingAction {
    /// Returns the display label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Maintain => "Maintain",
            Self::Monitor => "Monitor",
            Self::RaisePrices => "Raise Prices",
            Self::UrgentRaisePrices => "Urgent - Raise Prices",
            Self::ConsiderTermination => "Consider Termination",
        }
    }

    /// True for actions that come with a recommended price increase.
    #[must_use]
    pub const fn implies_price_change(self) -> bool {
        matches!(self, Self::RaisePrices | Self::UrgentRaisePrices)
    }
}

impl fmt::Display for PricingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of the margin against the prior period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginTrend {
    /// Margin rose by more than the tolerance.
    Improving,
    /// Margin moved within the tolerance.
    Stable,
    /// Margin fell by more than the tolerance.
    Declining,
    /// No prior-period revenue to compare against.
    Unknown,
}

/// Classified profitability of one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfitability {
    /// Customer number.
    pub customer_no: PartyNo,
    /// Customer name.
    pub customer_name: String,
    /// Revenue.
    pub total_revenue: Decimal,
    /// Cost.
    pub total_cost: Decimal,
    /// Labor hours.
    pub total_hours: Decimal,
    /// Invoice count.
    pub invoice_count: u64,
    /// Revenue minus cost.
    pub gross_profit: Decimal,
    /// Gross profit as a percentage of revenue; zero without revenue.
    pub margin_percent: Decimal,
    /// Health tier.
    pub health_status: HealthStatus,
    /// Pricing action.
    pub action: PricingAction,
    /// Revenue needed on top of current revenue to reach the target margin.
    pub recommended_increase: Option<Decimal>,
    /// Recommended increase as a percentage of current revenue.
    pub recommended_increase_pct: Option<Decimal>,
    /// Margin in the preceding period.
    pub prior_margin_percent: Option<Decimal>,
    /// Margin direction.
    pub trend: MarginTrend,
}

/// Portfolio totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitabilitySummary {
    /// Number of customers.
    pub total_customers: usize,
    /// Healthy customers.
    pub healthy_count: usize,
    /// Warning customers.
    pub warning_count: usize,
    /// Critical customers.
    pub critical_count: usize,
    /// Healthy share of customers, in percent.
    pub healthy_pct: Decimal,
    /// Warning share of customers, in percent.
    pub warning_pct: Decimal,
    /// Critical share of customers, in percent.
    pub critical_pct: Decimal,
    /// Revenue across all customers.
    pub total_revenue: Decimal,
    /// Cost across all customers.
    pub total_cost: Decimal,
    /// Portfolio margin in percent.
    pub overall_margin: Decimal,
    /// Revenue from customers with a negative margin.
    pub revenue_at_risk: Decimal,
}

/// Customer profitability for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitabilityReport {
    /// Report type identifier.
    pub report_type: String,
    /// Period the facts cover.
    pub period: ResolvedPeriod,
    /// Portfolio totals.
    pub summary: ProfitabilitySummary,
    /// All customers, by revenue descending.
    pub customers: Vec<CustomerProfitability>,
    /// Termination candidates, worst margin first.
    pub fire_list: Vec<CustomerProfitability>,
}
