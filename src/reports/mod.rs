//! Reports module for county-budget
//!
//! Read-only summaries over stored budgets and allocations: overall
//! statistics, per-method totals, top counties and one county's history.

pub mod budget_stats;
pub mod county_history;
pub mod method_stats;
pub mod top_counties;

pub use budget_stats::BudgetStatsReport;
pub use county_history::CountyHistoryReport;
pub use method_stats::{MethodStats, MethodStatsReport};
pub use top_counties::TopCountiesReport;
