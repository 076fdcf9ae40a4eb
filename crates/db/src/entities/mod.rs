//! `SeaORM` entity definitions.

pub mod prelude;

pub mod ledger_entries;
pub mod sales_facts;
pub mod sea_orm_active_enums;
