//! Customer profitability.
//!
//! Classifies each customer's gross margin for a reporting period into a
//! health tier with a pricing action, and flags small unprofitable accounts
//! for the fire list.

pub mod period;
pub mod rules;
pub mod service;
pub mod types;


pub use period::{ProfitabilityPeriod, ResolvedPeriod};
pub use rules::{
    HEALTHY_MARGIN_THRESHOLD, TARGET_MARGIN, TERMINATION_REVENUE_CEILING, TREND_TOLERANCE,
};
pub use service::ProfitabilityService;
pub use types::*;
