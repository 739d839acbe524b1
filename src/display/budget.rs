//! Budget display formatting
//!
//! Budget tables, allocation breakdowns and the method comparison view.

use crate::allocation::{AllocationLine, AllocationSummary, MethodComparison, MethodOutcome};
use crate::models::Budget;
use crate::services::BudgetDetails;

/// Format a list of budgets as a table
pub fn format_budget_list(budgets: &[Budget], currency: &str) -> String {
    if budgets.is_empty() {
        return "No budgets found.".to_string();
    }

    let name_width = budgets
        .iter()
        .map(|b| b.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8}  {:<name_width$}  {:>20}  {:<16}  {}\n",
        "ID",
        "Name",
        "Total",
        "Method",
        "Created",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<8}  {:-<name_width$}  {:->20}  {:-<16}  {:-<16}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for budget in budgets {
        output.push_str(&format!(
            "{:<8}  {:<name_width$}  {:>20}  {:<16}  {}\n",
            budget.id.to_string(),
            budget.name,
            budget.total_amount.format_with_symbol(currency),
            budget.allocation_method.title(),
            budget.created_at.format("%Y-%m-%d %H:%M"),
            name_width = name_width,
        ));
    }

    output
}

/// Format a stored budget with its allocations
pub fn format_budget_details(details: &BudgetDetails, currency: &str) -> String {
    let budget = &details.budget;
    let mut output = String::new();

    output.push_str(&format!("Budget: {}\n", budget.name));
    output.push_str(&format!("  ID:         {}\n", budget.id));
    output.push_str(&format!(
        "  Total:      {}\n",
        budget.total_amount.format_with_symbol(currency)
    ));
    output.push_str(&format!("  Method:     {}\n", budget.allocation_method.title()));
    output.push_str(&format!(
        "  Created:    {}\n",
        budget.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push('\n');

    if details.allocations.is_empty() {
        output.push_str("No allocations.\n");
    } else {
        output.push_str(&format!("{:<30} {:>20} {:>9}\n", "County", "Amount", "Share"));
        output.push_str(&"-".repeat(61));
        output.push('\n');
        for row in &details.allocations {
            output.push_str(&format!(
                "{:<30} {:>20} {:>8.2}%\n",
                row.county_name,
                row.allocation.amount.format_with_symbol(currency),
                row.allocation.percentage_of_budget(budget.total_amount)
            ));
        }
        output.push_str(&"-".repeat(61));
        output.push('\n');
    }

    output.push_str(&format!(
        "{:<30} {:>20}\n",
        "Total allocated",
        details.total_allocated.format_with_symbol(currency)
    ));
    output.push_str(&format!(
        "{:<30} {:>20}\n",
        "Remaining",
        details.remaining.format_with_symbol(currency)
    ));

    output
}

/// Format the result of one allocation method
pub fn format_allocation_summary(summary: &AllocationSummary, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} allocation of {} across {} counties\n",
        summary.method.title(),
        summary.total_budget.format_with_symbol(currency),
        summary.num_counties
    ));
    output.push_str(&"-".repeat(72));
    output.push('\n');

    for line in &summary.allocations {
        output.push_str(&format!(
            "{:<30} {:>20} {:>8.2}%  {}\n",
            line.county_name,
            line.amount.format_with_symbol(currency),
            line.percentage,
            line_detail(line)
        ));
    }

    output.push_str(&"-".repeat(72));
    output.push('\n');
    output.push_str(&format!(
        "{:<30} {:>20}\n",
        "Total allocated",
        summary.total_allocated.format_with_symbol(currency)
    ));
    output.push_str(&format!(
        "{:<30} {:>20}\n",
        "Remaining",
        summary.remaining.format_with_symbol(currency)
    ));

    output
}

fn line_detail(line: &AllocationLine) -> String {
    match (line.gdp_per_capita, line.project_score) {
        (Some(gdp), _) => format!("GDP/capita {:.2}", gdp),
        (None, Some(score)) => format!("score {}", score),
        (None, None) => String::new(),
    }
}

/// Format all three methods side by side, then each in full
pub fn format_comparison(comparison: &MethodComparison, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Comparing allocation methods for {} across {} counties\n",
        comparison.budget_amount.format_with_symbol(currency),
        comparison.num_counties
    ));
    output.push_str(&"=".repeat(72));
    output.push('\n');

    for (method, outcome) in &comparison.methods {
        output.push('\n');
        match outcome {
            MethodOutcome::Completed(summary) => {
                output.push_str(&format_allocation_summary(summary, currency));
            }
            MethodOutcome::Failed { error } => {
                output.push_str(&format!("{}: failed: {}\n", method.title(), error));
            }
        }
    }

    output
}
