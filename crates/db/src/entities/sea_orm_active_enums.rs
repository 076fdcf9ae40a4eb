//! `SeaORM` active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `ledger_type` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ledger_type")]
pub enum LedgerType {
    /// Accounts receivable.
    #[sea_orm(string_value = "ar")]
    Ar,
    /// Accounts payable.
    #[sea_orm(string_value = "ap")]
    Ap,
}

impl From<tally_core::ledger::LedgerType> for LedgerType {
    fn from(value: tally_core::ledger::LedgerType) -> Self {
        match value {
            tally_core::ledger::LedgerType::Ar => Self::Ar,
            tally_core::ledger::LedgerType::Ap => Self::Ap,
        }
    }
}

impl From<LedgerType> for tally_core::ledger::LedgerType {
    fn from(value: LedgerType) -> Self {
        match value {
            LedgerType::Ar => Self::Ar,
            LedgerType::Ap => Self::Ap,
        }
    }
}
