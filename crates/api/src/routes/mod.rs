//! API route definitions.

use axum::Router;
use rust_decimal::Decimal;
use tally_core::profitability::rules::round_money;

use crate::AppState;

pub mod aging;
pub mod health;
pub mod profitability;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(aging::routes())
        .merge(profitability::routes())
}

/// Formats a Decimal as a string with 2 decimal places.
pub(crate) fn format_money(amount: Decimal) -> String {
    format!("{:.2}", round_money(amount))
}
