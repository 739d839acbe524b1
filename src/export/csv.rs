//! CSV Export functionality
//!
//! Writes one row per allocation of a budget.

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::services::BudgetDetails;

const HEADER: [&str; 7] = [
    "budget_id",
    "budget_name",
    "allocation_method",
    "county_id",
    "county_name",
    "amount",
    "percentage",
];

/// Export a budget's allocations to CSV
///
/// Amounts are plain decimals with two places; percentages are of the
/// budget total.
pub fn export_budget_csv<W: Write>(details: &BudgetDetails, writer: W) -> BudgetResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;

    let budget = &details.budget;
    for row in &details.allocations {
        let allocation = &row.allocation;
        csv_writer.write_record([
            budget.id.get().to_string(),
            budget.name.clone(),
            budget.allocation_method.to_string(),
            allocation.county_id.get().to_string(),
            row.county_name.clone(),
            format!("{:.2}", allocation.amount.as_f64()),
            format!("{:.2}", allocation.percentage_of_budget(budget.total_amount)),
        ])?;
    }

    csv_writer
        .flush()
        .map_err(|e| BudgetError::Export(format!("Failed to write CSV: {}", e)))?;
    Ok(())
}
