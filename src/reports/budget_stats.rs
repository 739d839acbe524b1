//! Budget Statistics Report
//!
//! Totals across every stored budget, with a per-method breakdown.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::BudgetResult;
use crate::models::{AllocationMethod, Money};
use crate::storage::Storage;

/// Aggregate figures over all budgets
#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatsReport {
    pub county_count: usize,
    pub budget_count: usize,
    pub allocation_count: usize,
    /// Sum of every budget's total amount
    pub total_budgeted: Money,
    /// Mean budget size; zero when there are no budgets
    pub average_budget: Money,
    /// Budget count per method; all three methods are always present
    pub budgets_by_method: BTreeMap<AllocationMethod, usize>,
}

impl BudgetStatsReport {
    pub fn generate(storage: &Storage) -> BudgetResult<Self> {
        let budgets = storage.budgets().get_all()?;

        let mut budgets_by_method: BTreeMap<AllocationMethod, usize> =
            AllocationMethod::ALL.into_iter().map(|m| (m, 0)).collect();
        for budget in &budgets {
            *budgets_by_method.entry(budget.allocation_method).or_default() += 1;
        }

        let total_budgeted: Money = budgets.iter().map(|b| b.total_amount).sum();

        Ok(Self {
            county_count: storage.counties().count()?,
            budget_count: budgets.len(),
            allocation_count: storage.allocations().count()?,
            total_budgeted,
            average_budget: average(total_budgeted, budgets.len()),
            budgets_by_method,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str("Budget Statistics\n");
        output.push_str(&"=".repeat(40));
        output.push('\n');
        output.push_str(&format!("Counties:        {:>20}\n", self.county_count));
        output.push_str(&format!("Budgets:         {:>20}\n", self.budget_count));
        output.push_str(&format!("Allocations:     {:>20}\n", self.allocation_count));
        output.push_str(&format!(
            "Total budgeted:  {:>20}\n",
            self.total_budgeted.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "Average budget:  {:>20}\n",
            self.average_budget.format_with_symbol(currency)
        ));
        output.push('\n');
        output.push_str("Budgets by method:\n");
        for (method, count) in &self.budgets_by_method {
            output.push_str(&format!("  {:<16} {:>5}\n", method.title(), count));
        }

        output
    }
}

/// Mean of `count` amounts totalling `total`, rounded to the cent
pub(crate) fn average(total: Money, count: usize) -> Money {
    if count == 0 {
        return Money::zero();
    }
    Money::from_f64_rounded(total.as_f64() / count as f64)
}
