//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for counties, budgets and allocation
//! results. Amounts are printed with the configured currency symbol.

pub mod budget;
pub mod county;

pub use budget::{
    format_allocation_summary, format_budget_details, format_budget_list, format_comparison,
};
pub use county::{format_county_details, format_county_list};
