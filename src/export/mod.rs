//! Export module for county-budget
//!
//! Writes a stored budget and its allocations in one of two formats:
//! - CSV: one row per allocation (spreadsheet-compatible)
//! - JSON: the whole budget document with a schema version

pub mod csv;
pub mod json;

pub use self::csv::export_budget_csv;
pub use self::json::{export_budget_json, BudgetExport, EXPORT_SCHEMA_VERSION};

use std::fmt;
use std::str::FromStr;

use crate::error::BudgetError;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(BudgetError::Export(format!(
                "Unknown export format '{}'. Valid formats: csv, json",
                other
            ))),
        }
    }
}
