//! Service layer for county-budget
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, duplicate checks, audit logging and the
//! budget-creation workflow.

pub mod budget;
pub mod county;

pub use budget::{BudgetDetails, BudgetService, CreatedBudget};
pub use county::{CountyService, CountyUpdate, SortOrder};
