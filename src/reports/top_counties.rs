//! Top Counties Report
//!
//! Counties ranked by the total they have been allocated across all budgets.

use serde::Serialize;

use crate::error::BudgetResult;
use crate::storage::{CountyTotal, Storage};

/// Default number of counties shown
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct TopCountiesReport {
    pub rows: Vec<CountyTotal>,
}

impl TopCountiesReport {
    pub fn generate(storage: &Storage, limit: usize) -> BudgetResult<Self> {
        Ok(Self {
            rows: storage.allocations().totals_by_county(limit)?,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str("Top Counties by Total Allocation\n");
        output.push_str(&"=".repeat(66));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No allocations yet.\n");
            return output;
        }

        output.push_str(&format!(
            "{:>4}  {:<30} {:>20} {:>8}\n",
            "#", "County", "Total", "Budgets"
        ));
        output.push_str(&"-".repeat(66));
        output.push('\n');

        for (rank, row) in self.rows.iter().enumerate() {
            output.push_str(&format!(
                "{:>4}  {:<30} {:>20} {:>8}\n",
                rank + 1,
                row.county_name,
                row.total_allocated.format_with_symbol(currency),
                row.allocation_count
            ));
        }

        output
    }
}
