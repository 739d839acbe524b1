//! Side-by-side comparison of all allocation methods
//!
//! Runs every method against the same calculator. A method that fails is
//! recorded with its error message instead of aborting the comparison, so the
//! result always has one entry per method.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::calculator::{AllocationCalculator, AllocationSummary, CountyProfile};
use crate::error::BudgetResult;
use crate::models::{AllocationMethod, Money};

/// Outcome of one method within a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MethodOutcome {
    Completed(AllocationSummary),
    Failed { error: String },
}

impl MethodOutcome {
    pub fn summary(&self) -> Option<&AllocationSummary> {
        match self {
            Self::Completed(summary) => Some(summary),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Completed(_) => None,
            Self::Failed { error } => Some(error),
        }
    }
}

/// All three methods run against one budget amount and county set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodComparison {
    pub budget_amount: Money,
    pub num_counties: usize,
    pub methods: BTreeMap<AllocationMethod, MethodOutcome>,
}

impl MethodComparison {
    pub fn outcome(&self, method: AllocationMethod) -> Option<&MethodOutcome> {
        self.methods.get(&method)
    }
}

/// Run every method on an existing calculator
pub fn compare_methods<C: CountyProfile>(calculator: &AllocationCalculator<'_, C>) -> MethodComparison {
    let methods = AllocationMethod::ALL
        .into_iter()
        .map(|method| {
            let outcome = match calculator.summary(method) {
                Ok(summary) => MethodOutcome::Completed(summary),
                Err(e) => MethodOutcome::Failed {
                    error: e.to_string(),
                },
            };
            (method, outcome)
        })
        .collect();

    MethodComparison {
        budget_amount: calculator.budget_amount(),
        num_counties: calculator.num_counties(),
        methods,
    }
}

/// Build a calculator and compare every method
///
/// # Errors
///
/// Only the calculator's own input validation can fail; per-method failures
/// are recorded in the result.
pub fn compare_allocation_methods<C: CountyProfile>(
    budget_amount: Money,
    counties: &[C],
) -> BudgetResult<MethodComparison> {
    let calculator = AllocationCalculator::new(budget_amount, counties)?;
    Ok(compare_methods(&calculator))
}
