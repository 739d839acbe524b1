//! Method Comparison Report
//!
//! How much has been budgeted under each allocation method.

use serde::Serialize;

use crate::error::BudgetResult;
use crate::models::{AllocationMethod, Money};
use crate::storage::Storage;

use super::budget_stats::average;

/// Figures for one method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodStats {
    pub method: AllocationMethod,
    pub budget_count: usize,
    pub total_amount: Money,
    pub average_amount: Money,
    pub allocation_count: usize,
}

/// One row per method, in `AllocationMethod::ALL` order
#[derive(Debug, Clone, Serialize)]
pub struct MethodStatsReport {
    pub rows: Vec<MethodStats>,
}

impl MethodStatsReport {
    pub fn generate(storage: &Storage) -> BudgetResult<Self> {
        let rows = AllocationMethod::ALL
            .into_iter()
            .map(|method| {
                let budgets = storage.budgets().by_method(method)?;
                let total_amount: Money = budgets.iter().map(|b| b.total_amount).sum();
                Ok(MethodStats {
                    method,
                    budget_count: budgets.len(),
                    total_amount,
                    average_amount: average(total_amount, budgets.len()),
                    allocation_count: storage.allocations().count_by_method(method)?,
                })
            })
            .collect::<BudgetResult<Vec<_>>>()?;

        Ok(Self { rows })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str("Allocation Methods\n");
        output.push_str(&"=".repeat(78));
        output.push('\n');
        output.push_str(&format!(
            "{:<16} {:>8} {:>20} {:>20} {:>10}\n",
            "Method", "Budgets", "Total", "Average", "Allocs"
        ));
        output.push_str(&"-".repeat(78));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<16} {:>8} {:>20} {:>20} {:>10}\n",
                row.method.title(),
                row.budget_count,
                row.total_amount.format_with_symbol(currency),
                row.average_amount.format_with_symbol(currency),
                row.allocation_count
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::BudgetService;
    use crate::storage::seed_sample_counties;

    #[test]
    fn test_generate_report() {
        let storage = Storage::open_in_memory().unwrap();
        seed_sample_counties(&storage).unwrap();
        let service = BudgetService::new(&storage);
        service
            .create_with_allocations("A", Money::from_units(100), AllocationMethod::GdpPerCapita)
            .unwrap();
        service
            .create_with_allocations("B", Money::from_units(300), AllocationMethod::GdpPerCapita)
            .unwrap();

        let report = MethodStatsReport::generate(&storage).unwrap();
        assert_eq!(report.rows.len(), 3);

        let gdp = &report.rows[1];
        assert_eq!(gdp.method, AllocationMethod::GdpPerCapita);
        assert_eq!(gdp.budget_count, 2);
        assert_eq!(gdp.total_amount, Money::from_units(400));
        assert_eq!(gdp.average_amount, Money::from_units(200));
        assert_eq!(gdp.allocation_count, 12);

        assert_eq!(report.rows[0].budget_count, 0);
        assert!(report.format_terminal("$").contains("Gdp Per Capita"));
    }
}
