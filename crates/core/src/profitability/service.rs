//! Profitability analysis.

use rayon::prelude::*;
use rust_decimal::Decimal;
use tracing::debug;

use super::period::ResolvedPeriod;
use super::rules::{self, RuleInput};
use super::types::{
    CustomerProfitability, CustomerSalesFacts, HealthStatus, ProfitabilityReport,
    ProfitabilitySummary,
};

/// Service for customer profitability reports.
pub struct ProfitabilityService;

impl ProfitabilityService {
    /// Classifies one customer.
    #[must_use]
    pub fn evaluate(facts: CustomerSalesFacts) -> CustomerProfitability {
        let gross_profit = facts.total_revenue - facts.total_cost;
        let margin_percent = rules::margin_percent(facts.total_revenue, gross_profit);

        let prior_margin_percent = facts
            .prior_revenue
            .filter(|revenue| !revenue.is_zero())
            .map(|revenue| {
                let cost = facts.prior_cost.unwrap_or(Decimal::ZERO);
                rules::margin_percent(revenue, revenue - cost)
            });
        let trend = rules::margin_trend(margin_percent, prior_margin_percent);

        let rule = rules::first_match(&RuleInput {
            margin_percent,
            total_revenue: facts.total_revenue,
            trend,
        });

        let (recommended_increase, recommended_increase_pct) = if rule.action.implies_price_change() {
            rules::recommended_increase(facts.total_revenue, facts.total_cost)
                .map_or((None, None), |(amount, pct)| (Some(amount), Some(pct)))
        } else {
            (None, None)
        };

        CustomerProfitability {
            customer_no: facts.customer_no,
            customer_name: facts.customer_name,
            total_revenue: facts.total_revenue,
            total_cost: facts.total_cost,
            total_hours: facts.total_hours,
            invoice_count: facts.invoice_count,
            gross_profit,
            margin_percent,
            health_status: rule.health,
            action: rule.action,
            recommended_increase,
            recommended_increase_pct,
            prior_margin_percent,
            trend,
        }
    }

    /// Builds the profitability report for a period.
    ///
    /// Customers are classified in parallel; the summary is a reduction over
    /// the classified rows.
    #[must_use]
    pub fn analyze(period: ResolvedPeriod, facts: Vec<CustomerSalesFacts>) -> ProfitabilityReport {
        let mut customers: Vec<CustomerProfitability> =
            facts.into_par_iter().map(Self::evaluate).collect();
        customers.sort_by(|a, b| {
            b.total_revenue
                .cmp(&a.total_revenue)
                .then_with(|| a.customer_no.cmp(&b.customer_no))
        });

        let summary = Self::summarize(&customers);
        let fire_list = Self::fire_list(&customers);

        debug!(
            period_start = %period.start,
            period_end = %period.end,
            customers = customers.len(),
            fire_list = fire_list.len(),
            "Built profitability report"
        );

        ProfitabilityReport {
            report_type: "customer_profitability".to_string(),
            period,
            summary,
            customers,
            fire_list,
        }
    }

    /// Termination candidates, worst margin first.
    #[must_use]
    pub fn fire_list(customers: &[CustomerProfitability]) -> Vec<CustomerProfitability> {
        let mut candidates: Vec<CustomerProfitability> = customers
            .iter()
            .filter(|c| rules::is_fire_list_candidate(c.total_revenue, c.margin_percent))
            .cloned()
            .collect();
        candidates.sort_by(|a, b| {
            a.margin_percent
                .cmp(&b.margin_percent)
                .then_with(|| a.customer_no.cmp(&b.customer_no))
        });
        candidates
    }

    /// Portfolio totals over classified customers.
    #[must_use]
    pub fn summarize(customers: &[CustomerProfitability]) -> ProfitabilitySummary {
        let mut summary = customers
            .iter()
            .fold(ProfitabilitySummary::default(), |mut acc, c| {
                match c.health_status {
                    HealthStatus::Healthy => acc.healthy_count += 1,
                    HealthStatus::Warning => acc.warning_count += 1,
                    HealthStatus::Critical => acc.critical_count += 1,
                }
                acc.total_revenue += c.total_revenue;
                acc.total_cost += c.total_cost;
                if c.margin_percent < Decimal::ZERO {
                    acc.revenue_at_risk += c.total_revenue;
                }
                acc
            });

        summary.total_customers = customers.len();
        summary.healthy_pct = Self::share(summary.healthy_count, summary.total_customers);
        summary.warning_pct = Self::share(summary.warning_count, summary.total_customers);
        summary.critical_pct = Self::share(summary.critical_count, summary.total_customers);
        summary.overall_margin = rules::margin_percent(
            summary.total_revenue,
            summary.total_revenue - summary.total_cost,
        );
        summary
    }

    fn share(count: usize, total: usize) -> Decimal {
        if total == 0 {
            return Decimal::ZERO;
        }
        rules::round_money(Decimal::from(count) / Decimal::from(total) * Decimal::ONE_HUNDRED)
    }
}
