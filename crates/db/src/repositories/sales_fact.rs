//! Sales fact reader.
//!
//! Aggregates invoice-level sales facts into per-customer totals for a
//! profitability period and the period before it.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use tally_core::profitability::{CustomerSalesFacts, ResolvedPeriod};
use tally_shared::AppError;
use tally_shared::types::PartyNo;
use tracing::debug;

use crate::entities::sales_facts;

/// Error types for sales fact reads.
#[derive(Debug, thiserror::Error)]
pub enum SalesFactError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl SalesFactError {
    /// True when the store could not be reached at all.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(
            self,
            Self::Database(DbErr::Conn(_) | DbErr::ConnectionAcquire(_))
        )
    }
}

impl From<SalesFactError> for AppError {
    fn from(err: SalesFactError) -> Self {
        if err.is_unreachable() {
            Self::StoreUnavailable(err.to_string())
        } else {
            Self::Database(err.to_string())
        }
    }
}

/// Per-customer sums over one period.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct CustomerTotalsRow {
    /// Customer number.
    pub customer_no: String,
    /// Customer name.
    pub customer_name: Option<String>,
    /// Sum of revenue.
    pub total_revenue: Option<Decimal>,
    /// Sum of cost.
    pub total_cost: Option<Decimal>,
    /// Sum of labor hours.
    pub total_hours: Option<Decimal>,
    /// Distinct invoices.
    pub invoice_count: i64,
}

/// Sales fact repository.
#[derive(Debug, Clone)]
pub struct SalesFactRepository {
    db: DatabaseConnection,
}

impl SalesFactRepository {
    /// Creates a new sales fact repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Per-customer facts for `period`, with prior-period revenue and cost.
    ///
    /// Only customers with sales in `period` are returned.
    pub async fn customer_facts(
        &self,
        period: &ResolvedPeriod,
    ) -> Result<Vec<CustomerSalesFacts>, SalesFactError> {
        let current = self.totals(period).await?;
        let prior = match period.prior() {
            Some(prior) => self.totals(&prior).await?,
            None => Vec::new(),
        };

        debug!(
            period_start = %period.start,
            period_end = %period.end,
            customers = current.len(),
            prior_customers = prior.len(),
            "Read customer sales facts"
        );
        Ok(merge_periods(current, prior))
    }

    /// Per-customer totals for one period.
    pub async fn totals(
        &self,
        period: &ResolvedPeriod,
    ) -> Result<Vec<CustomerTotalsRow>, SalesFactError> {
        Ok(Self::select_totals(period)
            .into_model::<CustomerTotalsRow>()
            .all(&self.db)
            .await?)
    }

    pub(crate) fn select_totals(period: &ResolvedPeriod) -> Select<sales_facts::Entity> {
        sales_facts::Entity::find()
            .select_only()
            .column(sales_facts::Column::CustomerNo)
            .column_as(sales_facts::Column::CustomerName.max(), "customer_name")
            .column_as(sales_facts::Column::Revenue.sum(), "total_revenue")
            .column_as(sales_facts::Column::Cost.sum(), "total_cost")
            .column_as(sales_facts::Column::LaborHours.sum(), "total_hours")
            .column_as(
                Expr::cust(r#"COUNT(DISTINCT "sales_facts"."invoice_no")"#),
                "invoice_count",
            )
            .filter(sales_facts::Column::InvoiceDate.between(period.start, period.end))
            .group_by(sales_facts::Column::CustomerNo)
            .order_by_asc(sales_facts::Column::CustomerNo)
    }
}

/// Joins current-period totals with the prior period's revenue and cost.
pub fn merge_periods(
    current: Vec<CustomerTotalsRow>,
    prior: Vec<CustomerTotalsRow>,
) -> Vec<CustomerSalesFacts> {
    let prior: HashMap<String, CustomerTotalsRow> = prior
        .into_iter()
        .map(|row| (row.customer_no.clone(), row))
        .collect();

    current
        .into_iter()
        .map(|row| {
            let previous = prior.get(&row.customer_no);
            let customer_no = PartyNo::new(&row.customer_no);
            CustomerSalesFacts {
                customer_name: row
                    .customer_name
                    .unwrap_or_else(|| customer_no.to_string()),
                customer_no,
                total_revenue: row.total_revenue.unwrap_or_default(),
                total_cost: row.total_cost.unwrap_or_default(),
                total_hours: row.total_hours.unwrap_or_default(),
                invoice_count: u64::try_from(row.invoice_count).unwrap_or(0),
                prior_revenue: previous.map(|p| p.total_revenue.unwrap_or_default()),
                prior_cost: previous.map(|p| p.total_cost.unwrap_or_default()),
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "sales_fact_tests.rs"]
mod tests;
