//! Budget model
//!
//! A budget is a named pool of money distributed across counties under one
//! allocation method.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BudgetId;
use super::method::AllocationMethod;
use super::money::Money;

/// Maximum budget name length, in characters
pub const MAX_BUDGET_NAME_LEN: usize = 200;

/// Largest accepted budget total: one trillion units
///
/// Amounts are stored as REAL, so every cent up to this total survives the
/// round trip through SQLite, and summing the shares cannot overflow.
pub const MAX_BUDGET_AMOUNT: Money = Money::from_units(1_000_000_000_000);

/// A budget as stored in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    /// Trimmed display name
    pub name: String,

    /// Amount to distribute, always positive
    pub total_amount: Money,

    /// Rule used to produce the allocations
    pub allocation_method: AllocationMethod,

    /// When the budget was created
    pub created_at: DateTime<Utc>,
}

impl Budget {
    /// Attach a row id and timestamp to a validated draft
    pub fn from_draft(id: BudgetId, draft: NewBudget, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            total_amount: draft.total_amount,
            allocation_method: draft.allocation_method,
            created_at,
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// A validated budget that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBudget {
    pub name: String,
    pub total_amount: Money,
    pub allocation_method: AllocationMethod,
}

impl NewBudget {
    /// Validate the name and amount
    pub fn new(
        name: &str,
        total_amount: Money,
        allocation_method: AllocationMethod,
    ) -> Result<Self, BudgetValidationError> {
        let name = normalize_budget_name(name)?;

        if !total_amount.is_positive() {
            return Err(BudgetValidationError::NonPositiveAmount(total_amount));
        }
        if total_amount > MAX_BUDGET_AMOUNT {
            return Err(BudgetValidationError::AmountTooLarge(total_amount));
        }

        Ok(Self {
            name,
            total_amount,
            allocation_method,
        })
    }
}

/// Trim and bound-check a budget name
pub fn normalize_budget_name(name: &str) -> Result<String, BudgetValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(BudgetValidationError::EmptyName);
    }

    let len = trimmed.chars().count();
    if len > MAX_BUDGET_NAME_LEN {
        return Err(BudgetValidationError::NameTooLong(len));
    }

    Ok(trimmed.to_string())
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    EmptyName,
    NameTooLong(usize),
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Budget name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "Budget name cannot exceed {} characters (got {})",
                MAX_BUDGET_NAME_LEN, len
            ),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Total budget amount must be greater than 0 (got {})", amount)
            }
            Self::AmountTooLarge(amount) => write!(
                f,
                "Total budget amount cannot exceed {} (got {})",
                MAX_BUDGET_AMOUNT, amount
            ),
        }
    }
}

impl std::error::Error for BudgetValidationError {}
