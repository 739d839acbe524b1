//! County Allocation History
//!
//! Every allocation one county has received, newest first.

use serde::Serialize;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{County, CountyId, Money};
use crate::storage::{CountyAllocationRow, Storage};

#[derive(Debug, Clone, Serialize)]
pub struct CountyHistoryReport {
    pub county: County,
    pub rows: Vec<CountyAllocationRow>,
    pub total_received: Money,
}

impl CountyHistoryReport {
    pub fn generate(storage: &Storage, county_id: CountyId) -> BudgetResult<Self> {
        let county = storage
            .counties()
            .get(county_id)?
            .ok_or_else(|| BudgetError::county_not_found(county_id.to_string()))?;

        let rows = storage.allocations().for_county(county_id)?;
        let total_received = rows.iter().map(|row| row.allocation.amount).sum();

        Ok(Self {
            county,
            rows,
            total_received,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Allocation History: {}\n", self.county));
        output.push_str(&"=".repeat(84));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No allocations for this county.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<10} {:<28} {:<16} {:>18} {:>8}\n",
            "Date", "Budget", "Method", "Amount", "Share"
        ));
        output.push_str(&"-".repeat(84));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<10} {:<28} {:<16} {:>18} {:>7.2}%\n",
                row.allocation.created_at.format("%Y-%m-%d"),
                truncate(&row.budget_name, 28),
                row.allocation_method.title(),
                row.allocation.amount.format_with_symbol(currency),
                row.allocation.percentage_of_budget(row.budget_total)
            ));
        }

        output.push_str(&"-".repeat(84));
        output.push('\n');
        output.push_str(&format!(
            "Total received: {} across {} budget(s)\n",
            self.total_received.format_with_symbol(currency),
            self.rows.len()
        ));

        output
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}
