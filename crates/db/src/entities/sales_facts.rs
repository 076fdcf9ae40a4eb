//! `SeaORM` Entity for sales_facts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_facts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub customer_no: String,
    pub customer_name: String,
    pub invoice_no: String,
    pub invoice_date: Date,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub revenue: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub labor_hours: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
