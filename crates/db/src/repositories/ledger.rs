//! Ledger reader.
//!
//! Reads active AR/AP detail rows for a report and maps them into core
//! ledger entries. Rows that cannot be mapped are skipped and returned as
//! warnings instead of failing the report.

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::{Alias, Expr, Func};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tally_core::ledger::{DataWarning, EntryType, LedgerEntry, LedgerType};
use tally_core::reports::AgingQuery;
use tally_shared::AppError;
use tally_shared::types::{InvoiceNo, PartyNo};
use tracing::{debug, warn};

use crate::entities::{ledger_entries, sea_orm_active_enums};

/// Error types for ledger reads.
#[derive(Debug, thiserror::Error)]
pub enum LedgerReadError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl LedgerReadError {
    /// True when the store could not be reached at all.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(
            self,
            Self::Database(DbErr::Conn(_) | DbErr::ConnectionAcquire(_))
        )
    }
}

impl From<LedgerReadError> for AppError {
    fn from(err: LedgerReadError) -> Self {
        if err.is_unreachable() {
            Self::StoreUnavailable(err.to_string())
        } else {
            Self::Database(err.to_string())
        }
    }
}

/// Which rows to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerFilter {
    /// Receivables or payables.
    pub ledger_type: LedgerType,
    /// Only entries booked on or before this date.
    pub as_of_date: Option<NaiveDate>,
    /// Only entries of this party.
    pub party_no: Option<PartyNo>,
}

impl From<&AgingQuery> for LedgerFilter {
    fn from(query: &AgingQuery) -> Self {
        Self {
            ledger_type: query.ledger_type,
            as_of_date: query.as_of_date,
            party_no: query.party_no.clone(),
        }
    }
}

/// Rows read for one report.
#[derive(Debug, Clone, Default)]
pub struct LedgerRead {
    /// Mapped entries, by id.
    pub entries: Vec<LedgerEntry>,
    /// Rows that were skipped.
    pub warnings: Vec<DataWarning>,
}

/// Ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reads the active entries matching `filter`.
    ///
    /// Active means not historical (false or null) and not deleted. With an
    /// as-of date, entries booked after it are left out.
    pub async fn read(&self, filter: &LedgerFilter) -> Result<LedgerRead, LedgerReadError> {
        let rows = Self::select(filter).all(&self.db).await?;
        let row_count = rows.len();

        let mut read = LedgerRead {
            entries: Vec::with_capacity(row_count),
            warnings: Vec::new(),
        };
        for row in rows {
            match to_ledger_entry(row) {
                Ok(entry) => read.entries.push(entry),
                Err(warning) => {
                    warn!(warning = %warning, "Skipping unreadable ledger row");
                    read.warnings.push(warning);
                }
            }
        }

        debug!(
            ledger_type = %filter.ledger_type,
            rows = row_count,
            skipped = read.warnings.len(),
            "Read ledger entries"
        );
        Ok(read)
    }

    pub(crate) fn select(filter: &LedgerFilter) -> Select<ledger_entries::Entity> {
        let ledger_type = sea_orm_active_enums::LedgerType::from(filter.ledger_type);

        let mut query = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::LedgerType.eq(ledger_type))
            .filter(ledger_entries::Column::IsDeleted.is_null())
            .filter(
                Condition::any()
                    .add(ledger_entries::Column::IsHistorical.eq(false))
                    .add(ledger_entries::Column::IsHistorical.is_null()),
            );

        if let Some(as_of) = filter.as_of_date {
            query = query.filter(ledger_entries::Column::EntryDate.lte(as_of));
        }
        if let Some(party_no) = &filter.party_no {
            // Stored keys may carry fixed-width padding; `PartyNo` is trimmed.
            let stored = Func::cust(Alias::new("TRIM")).arg(Expr::col((
                ledger_entries::Entity,
                ledger_entries::Column::PartyNo,
            )));
            query = query.filter(Expr::expr(stored).eq(party_no.as_str()));
        }

        query.order_by_asc(ledger_entries::Column::Id)
    }
}

/// Maps a stored row into a ledger entry.
///
/// A blank invoice number maps to `None`, which the aggregator reports.
/// An unknown entry type or a blank party number makes the row unreadable.
pub fn to_ledger_entry(row: ledger_entries::Model) -> Result<LedgerEntry, DataWarning> {
    let entry_type: EntryType = row.entry_type.parse().map_err(|reason| {
        DataWarning::UnreadableRow {
            entry_id: Some(row.id),
            reason,
        }
    })?;

    let party_no = PartyNo::new(&row.party_no);
    if party_no.as_str().is_empty() {
        return Err(DataWarning::UnreadableRow {
            entry_id: Some(row.id),
            reason: "blank party number".to_string(),
        });
    }

    let invoice_no = row
        .invoice_no
        .as_deref()
        .map(InvoiceNo::new)
        .filter(|no| !no.as_str().is_empty());

    Ok(LedgerEntry {
        entry_id: row.id,
        invoice_no,
        party_no,
        entry_type,
        amount: row.amount,
        due_date: row.due_date,
        entry_date: row.entry_date,
        is_historical: row.is_historical,
        is_deleted: row.is_deleted.map(|at| at.with_timezone(&Utc)),
    })
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
