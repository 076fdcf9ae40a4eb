//! Aging report routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_core::aging::{AgedInvoice, BucketTable, BucketTotal, PartyAging};
use tally_core::ledger::{DataWarning, LedgerType};
use tally_core::reports::{AgingQuery, AgingReport, AgingService, InvoiceSort};
use tally_db::{LedgerFilter, LedgerRepository};
use tally_shared::AppError;
use tally_shared::types::PartyNo;

use super::format_money;
use crate::AppState;
use crate::error::{error_response, join_error};

/// Creates the aging report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/aging/{ledger}", get(get_aging))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for the aging report.
#[derive(Debug, Default, Deserialize)]
pub struct AgingParams {
    /// Reference date (defaults to today).
    pub as_of: Option<NaiveDate>,
    /// Customer or vendor number.
    pub party: Option<String>,
    /// Bucket labels to list (comma-separated).
    pub buckets: Option<String>,
    /// Invoice order: days_old, balance, due_date or invoice_no.
    pub sort: Option<String>,
}

impl AgingParams {
    /// Turns request parameters into a report query.
    pub fn into_query(self, ledger_type: LedgerType) -> Result<AgingQuery, AppError> {
        let sort = match self.sort.as_deref() {
            Some(s) => s.parse::<InvoiceSort>()?,
            None => InvoiceSort::default(),
        };

        let mut query = AgingQuery::new(ledger_type).sorted_by(sort);
        query.as_of_date = self.as_of;
        query.party_no = self
            .party
            .map(PartyNo::new)
            .filter(|p| !p.as_str().is_empty());
        query.buckets = self.buckets.map(|list| parse_list(&list));
        Ok(query)
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for the aging report.
#[derive(Debug, Serialize)]
pub struct AgingResponse {
    /// Report type.
    pub report_type: String,
    /// Ledger, `ar` or `ap`.
    pub ledger_type: LedgerType,
    /// Reference date.
    pub as_of_date: String,
    /// Whether the as-of date is a past-date approximation.
    pub as_of_is_approximate: bool,
    /// Bucket totals in table order.
    pub buckets: Vec<BucketResponse>,
    /// Sum of all buckets.
    pub grand_total: String,
    /// Number of open invoices.
    pub total_count: usize,
    /// Listed invoices.
    pub invoices: Vec<InvoiceResponse>,
    /// Per-party subtotals.
    pub party_totals: Vec<PartyTotalResponse>,
    /// Invoices netted to zero.
    pub settled_count: usize,
    /// Rows skipped while building the report.
    pub warnings: Vec<DataWarning>,
}

/// Bucket total in response.
#[derive(Debug, Serialize)]
pub struct BucketResponse {
    /// Bucket label.
    pub label: String,
    /// Invoice count.
    pub count: usize,
    /// Total.
    pub total: String,
}

/// Aged invoice in response.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    /// Invoice number.
    pub invoice_no: String,
    /// Customer or vendor number.
    pub party_no: String,
    /// Earliest due date.
    pub due_date: Option<String>,
    /// Days past due.
    pub days_old: Option<i64>,
    /// Bucket label.
    pub bucket: String,
    /// Net balance.
    pub net_balance: String,
    /// Entries netted.
    pub entry_count: usize,
}

/// Party subtotal in response.
#[derive(Debug, Serialize)]
pub struct PartyTotalResponse {
    /// Customer or vendor number.
    pub party_no: String,
    /// Per-bucket totals.
    pub buckets: Vec<BucketResponse>,
    /// Party total.
    pub total: String,
    /// Open invoices.
    pub invoice_count: usize,
}

impl From<&BucketTotal> for BucketResponse {
    fn from(bucket: &BucketTotal) -> Self {
        Self {
            label: bucket.label.clone(),
            count: bucket.count,
            total: format_money(bucket.total),
        }
    }
}

impl From<&AgedInvoice> for InvoiceResponse {
    fn from(aged: &AgedInvoice) -> Self {
        Self {
            invoice_no: aged.invoice.invoice_no.to_string(),
            party_no: aged.invoice.party_no.to_string(),
            due_date: aged.invoice.due_date.map(|d| d.to_string()),
            days_old: aged.days_old,
            bucket: aged.bucket.clone(),
            net_balance: format_money(aged.invoice.net_balance),
            entry_count: aged.invoice.entry_count,
        }
    }
}

impl From<&PartyAging> for PartyTotalResponse {
    fn from(party: &PartyAging) -> Self {
        Self {
            party_no: party.party_no.to_string(),
            buckets: party.buckets.iter().map(BucketResponse::from).collect(),
            total: format_money(party.total),
            invoice_count: party.invoice_count,
        }
    }
}

impl From<AgingReport> for AgingResponse {
    fn from(report: AgingReport) -> Self {
        Self {
            report_type: report.report_type,
            ledger_type: report.ledger_type,
            as_of_date: report.as_of_date.to_string(),
            as_of_is_approximate: report.as_of_is_approximate,
            buckets: report.buckets.iter().map(BucketResponse::from).collect(),
            grand_total: format_money(report.grand_total),
            total_count: report.total_count,
            invoices: report.invoices.iter().map(InvoiceResponse::from).collect(),
            party_totals: report
                .party_totals
                .iter()
                .map(PartyTotalResponse::from)
                .collect(),
            settled_count: report.settled_count,
            warnings: report.warnings,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Aging report for `ar` or `ap`.
async fn get_aging(
    State(state): State<AppState>,
    Path(ledger): Path<String>,
    params: Result<Query<AgingParams>, QueryRejection>,
) -> Response {
    match build_aging(&state, &ledger, params).await {
        Ok(report) => Json(AgingResponse::from(report)).into_response(),
        Err(err) => error_response(&err),
    }
}

async fn build_aging(
    state: &AppState,
    ledger: &str,
    params: Result<Query<AgingParams>, QueryRejection>,
) -> Result<AgingReport, AppError> {
    let Query(params) = params.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let ledger_type: LedgerType = ledger.parse().map_err(AppError::Validation)?;
    let query = params.into_query(ledger_type)?;
    AgingService::validate(&query, &BucketTable::for_ledger(ledger_type))?;

    let today = state.clock.today();
    let read = LedgerRepository::new((*state.db).clone())
        .read(&LedgerFilter::from(&query))
        .await?;

    tokio::task::spawn_blocking(move || {
        AgingService::build(&query, &read.entries, today, read.warnings)
    })
    .await
    .map_err(|e| join_error(&e))?
    .map_err(AppError::from)
}
