//! Customer profitability routes.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_core::profitability::{
    CustomerProfitability, HealthStatus, MarginTrend, PricingAction, ProfitabilityPeriod,
    ProfitabilityReport, ProfitabilityService, ProfitabilitySummary,
};
use tally_db::SalesFactRepository;
use tally_shared::AppError;

use super::format_money;
use crate::AppState;
use crate::error::{error_response, join_error};

/// Creates the profitability routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/reports/customer-profitability",
        get(get_customer_profitability),
    )
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for the profitability report.
///
/// Either a trailing window (`months`) or an explicit range (`from` and `to`).
#[derive(Debug, Default, Deserialize)]
pub struct ProfitabilityParams {
    /// Trailing window in months.
    pub months: Option<u32>,
    /// Start date.
    pub from: Option<NaiveDate>,
    /// End date.
    pub to: Option<NaiveDate>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for the profitability report.
#[derive(Debug, Serialize)]
pub struct ProfitabilityResponse {
    /// Report type.
    pub report_type: String,
    /// Period start.
    pub period_start: String,
    /// Period end.
    pub period_end: String,
    /// Portfolio totals.
    pub summary: SummaryResponse,
    /// Customers by revenue.
    pub customers: Vec<CustomerResponse>,
    /// Termination candidates, worst first.
    pub fire_list: Vec<CustomerResponse>,
}

/// Summary in response.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Customers.
    pub total_customers: usize,
    /// Healthy customers.
    pub healthy_count: usize,
    /// Warning customers.
    pub warning_count: usize,
    /// Critical customers.
    pub critical_count: usize,
    /// Healthy share.
    pub healthy_pct: String,
    /// Warning share.
    pub warning_pct: String,
    /// Critical share.
    pub critical_pct: String,
    /// Revenue.
    pub total_revenue: String,
    /// Cost.
    pub total_cost: String,
    /// Portfolio margin.
    pub overall_margin: String,
    /// Revenue from losing customers.
    pub revenue_at_risk: String,
}

/// Customer row in response.
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    /// Customer number.
    pub customer_no: String,
    /// Customer name.
    pub customer_name: String,
    /// Revenue.
    pub total_revenue: String,
    /// Cost.
    pub total_cost: String,
    /// Labor hours.
    pub total_hours: String,
    /// Invoices.
    pub invoice_count: u64,
    /// Gross profit.
    pub gross_profit: String,
    /// Margin percent.
    pub margin_percent: String,
    /// Health tier.
    pub health_status: HealthStatus,
    /// Pricing action.
    pub action: PricingAction,
    /// Recommended increase.
    pub recommended_increase: Option<String>,
    /// Recommended increase percent.
    pub recommended_increase_pct: Option<String>,
    /// Prior-period margin.
    pub prior_margin_percent: Option<String>,
    /// Margin trend.
    pub trend: MarginTrend,
}

impl From<&ProfitabilitySummary> for SummaryResponse {
    fn from(s: &ProfitabilitySummary) -> Self {
        Self {
            total_customers: s.total_customers,
            healthy_count: s.healthy_count,
            warning_count: s.warning_count,
            critical_count: s.critical_count,
            healthy_pct: format_money(s.healthy_pct),
            warning_pct: format_money(s.warning_pct),
            critical_pct: format_money(s.critical_pct),
            total_revenue: format_money(s.total_revenue),
            total_cost: format_money(s.total_cost),
            overall_margin: format_money(s.overall_margin),
            revenue_at_risk: format_money(s.revenue_at_risk),
        }
    }
}

impl From<&CustomerProfitability> for CustomerResponse {
    fn from(c: &CustomerProfitability) -> Self {
        Self {
            customer_no: c.customer_no.to_string(),
            customer_name: c.customer_name.clone(),
            total_revenue: format_money(c.total_revenue),
            total_cost: format_money(c.total_cost),
            total_hours: format_money(c.total_hours),
            invoice_count: c.invoice_count,
            gross_profit: format_money(c.gross_profit),
            margin_percent: format_money(c.margin_percent),
            health_status: c.health_status,
            action: c.action,
            recommended_increase: c.recommended_increase.map(format_money),
            recommended_increase_pct: c.recommended_increase_pct.map(format_money),
            prior_margin_percent: c.prior_margin_percent.map(format_money),
            trend: c.trend,
        }
    }
}

impl From<&ProfitabilityReport> for ProfitabilityResponse {
    fn from(report: &ProfitabilityReport) -> Self {
        Self {
            report_type: report.report_type.clone(),
            period_start: report.period.start.to_string(),
            period_end: report.period.end.to_string(),
            summary: SummaryResponse::from(&report.summary),
            customers: report.customers.iter().map(CustomerResponse::from).collect(),
            fire_list: report.fire_list.iter().map(CustomerResponse::from).collect(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Customer profitability for a trailing window or a date range.
async fn get_customer_profitability(
    State(state): State<AppState>,
    params: Result<Query<ProfitabilityParams>, QueryRejection>,
) -> Response {
    match build_profitability(&state, params).await {
        Ok(report) => Json(ProfitabilityResponse::from(&report)).into_response(),
        Err(err) => error_response(&err),
    }
}

async fn build_profitability(
    state: &AppState,
    params: Result<Query<ProfitabilityParams>, QueryRejection>,
) -> Result<ProfitabilityReport, AppError> {
    let Query(params) = params.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let period = ProfitabilityPeriod::from_params(
        params.months,
        params.from,
        params.to,
        state.reporting.default_trailing_months,
    )?
    .resolve(state.clock.today())?;

    let facts = SalesFactRepository::new((*state.db).clone())
        .customer_facts(&period)
        .await?;

    tokio::task::spawn_blocking(move || ProfitabilityService::analyze(period, facts))
        .await
        .map_err(|e| join_error(&e))
}
