//! Custom error types for county-budget
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for county-budget operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Invalid input to the allocation core or a model constructor
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Allocation method outside the supported set
    #[error("Unknown allocation method: '{0}'. Valid methods: equal, gdp_per_capita, project_based")]
    UnknownMethod(String),

    /// A weight total that should never be zero turned out to be zero
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage-layer errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Audit log failures, including ones after a write already committed
    #[error("Audit log error: {0}")]
    Audit(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl BudgetError {
    /// Create a "not found" error for counties
    pub fn county_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "County",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an invalid input error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<rusqlite::Error> for BudgetError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

// Model validation failures all surface as invalid input

impl From<crate::models::CountyValidationError> for BudgetError {
    fn from(err: crate::models::CountyValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<crate::models::BudgetValidationError> for BudgetError {
    fn from(err: crate::models::BudgetValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<crate::models::AllocationValidationError> for BudgetError {
    fn from(err: crate::models::AllocationValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<crate::models::MoneyParseError> for BudgetError {
    fn from(err: crate::models::MoneyParseError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Result type alias for county-budget operations
pub type BudgetResult<T> = Result<T, BudgetError>;
