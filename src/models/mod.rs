//! Core data models for county-budget
//!
//! Counties, budgets and the allocations that connect them, plus the value
//! types (IDs, money, allocation method) they are built from.

pub mod allocation;
pub mod budget;
pub mod county;
pub mod ids;
pub mod method;
pub mod money;

pub use allocation::{Allocation, AllocationValidationError, NewAllocation};
pub use budget::{
    normalize_budget_name, Budget, BudgetValidationError, NewBudget, MAX_BUDGET_AMOUNT,
};
pub use county::{County, CountyValidationError, NewCounty};
pub use ids::{AllocationId, BudgetId, CountyId};
pub use method::AllocationMethod;
pub use money::{Money, MoneyParseError};
