//! Budget service
//!
//! Creating a budget runs the allocation calculator over every county and
//! stores the budget together with its allocations in one transaction.

use serde::Serialize;

use crate::allocation::{
    compare_allocation_methods, AllocationCalculator, AllocationSummary, MethodComparison,
};
use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    normalize_budget_name, Allocation, AllocationMethod, Budget, BudgetId, Money, NewBudget,
};
use crate::storage::{AllocationRepository, BudgetAllocationRow, BudgetRepository, Storage};

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// A freshly created budget with what was written for it
#[derive(Debug, Clone)]
pub struct CreatedBudget {
    pub budget: Budget,
    pub allocations: Vec<Allocation>,
    /// The calculation the allocations came from
    pub summary: AllocationSummary,
}

/// A stored budget with its allocations and totals
#[derive(Debug, Clone, Serialize)]
pub struct BudgetDetails {
    pub budget: Budget,
    pub allocations: Vec<BudgetAllocationRow>,
    pub total_allocated: Money,
    pub remaining: Money,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a budget and allocate it across all counties
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a bad name or amount or when no counties exist,
    /// `DivisionByZero` when the method cannot weigh the counties, and
    /// `Persistence` if the write fails. Nothing is stored on any error.
    pub fn create_with_allocations(
        &self,
        name: &str,
        total_amount: Money,
        method: AllocationMethod,
    ) -> BudgetResult<CreatedBudget> {
        let counties = self.storage.counties().get_all()?;
        let draft = NewBudget::new(name, total_amount, method)?;

        let summary = AllocationCalculator::new(draft.total_amount, &counties)?.summary(method)?;

        let (budget, allocations) = self
            .storage
            .persist_budget_and_allocations(&draft, &summary.allocations)?;

        Ok(CreatedBudget {
            budget,
            allocations,
            summary,
        })
    }

    /// Compute one method over all counties without storing anything
    pub fn preview(
        &self,
        total_amount: Money,
        method: AllocationMethod,
    ) -> BudgetResult<AllocationSummary> {
        let counties = self.storage.counties().get_all()?;
        AllocationCalculator::new(total_amount, &counties)?.summary(method)
    }

    /// Run every method over all counties without storing anything
    pub fn compare(&self, total_amount: Money) -> BudgetResult<MethodComparison> {
        let counties = self.storage.counties().get_all()?;
        compare_allocation_methods(total_amount, &counties)
    }

    pub fn get(&self, id: BudgetId) -> BudgetResult<Option<Budget>> {
        self.storage.budgets().get(id)
    }

    pub fn require(&self, id: BudgetId) -> BudgetResult<Budget> {
        self.get(id)?
            .ok_or_else(|| BudgetError::budget_not_found(id.to_string()))
    }

    /// A budget with its allocations, totals and shortfall from rounding
    pub fn details(&self, id: BudgetId) -> BudgetResult<BudgetDetails> {
        let budget = self.require(id)?;
        let allocations = self.storage.allocations().for_budget(id)?;
        let total_allocated: Money = allocations.iter().map(|row| row.allocation.amount).sum();

        Ok(BudgetDetails {
            remaining: budget.total_amount - total_allocated,
            budget,
            allocations,
            total_allocated,
        })
    }

    /// All budgets, newest first
    pub fn list(&self) -> BudgetResult<Vec<Budget>> {
        self.storage.budgets().get_all()
    }

    pub fn by_method(&self, method: AllocationMethod) -> BudgetResult<Vec<Budget>> {
        self.storage.budgets().by_method(method)
    }

    pub fn rename(&self, id: BudgetId, new_name: &str) -> BudgetResult<Budget> {
        let before = self.require(id)?;
        let name = normalize_budget_name(new_name)?;

        self.storage.budgets().rename(id, &name)?;
        let after = Budget {
            name,
            ..before.clone()
        };

        self.storage.log_update(
            EntityType::Budget,
            id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        )?;

        Ok(after)
    }

    /// Delete a budget and its allocations
    ///
    /// Returns the deleted budget and how many allocations went with it.
    pub fn delete(&self, id: BudgetId) -> BudgetResult<(Budget, usize)> {
        let budget = self.require(id)?;

        let removed = self.storage.with_transaction(|tx| {
            let removed = AllocationRepository::new(tx).count_for_budget(id)?;
            BudgetRepository::new(tx).delete(id)?;
            Ok(removed)
        })?;

        self.storage.log_delete(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.name.clone()),
            &budget,
        )?;

        Ok((budget, removed))
    }
}
