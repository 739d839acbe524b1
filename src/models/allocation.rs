//! Allocation model
//!
//! The amount of one budget assigned to one county.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AllocationId, BudgetId, CountyId};
use super::money::Money;

/// An allocation row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: AllocationId,
    pub budget_id: BudgetId,
    pub county_id: CountyId,

    /// Never negative
    pub amount: Money,

    pub created_at: DateTime<Utc>,
}

impl Allocation {
    /// Share of the owning budget's total, in percent (0 if the total is 0)
    pub fn percentage_of_budget(&self, budget_total: Money) -> f64 {
        self.amount.percentage_of(budget_total)
    }
}

/// A validated allocation that has not been persisted yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAllocation {
    pub budget_id: BudgetId,
    pub county_id: CountyId,
    pub amount: Money,
}

impl NewAllocation {
    pub fn new(
        budget_id: BudgetId,
        county_id: CountyId,
        amount: Money,
    ) -> Result<Self, AllocationValidationError> {
        if amount.is_negative() {
            return Err(AllocationValidationError::NegativeAmount(amount));
        }
        Ok(Self {
            budget_id,
            county_id,
            amount,
        })
    }
}

/// Validation errors for allocations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationValidationError {
    NegativeAmount(Money),
}

impl fmt::Display for AllocationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "Allocation amount cannot be negative (got {})", amount)
            }
        }
    }
}

impl std::error::Error for AllocationValidationError {}
