//! JSON Export functionality
//!
//! Exports one budget with its allocations, stamped with a schema version.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Budget, CountyId, Money};
use crate::services::BudgetDetails;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A budget export document
#[derive(Debug, Clone, Serialize)]
pub struct BudgetExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    /// Version of county-budget that wrote the file
    pub app_version: String,
    pub budget: Budget,
    pub allocations: Vec<ExportedAllocation>,
    pub total_allocated: Money,
    pub remaining: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedAllocation {
    pub county_id: CountyId,
    pub county_name: String,
    pub amount: Money,
    pub percentage: f64,
}

impl BudgetExport {
    pub fn from_details(details: &BudgetDetails) -> Self {
        let allocations = details
            .allocations
            .iter()
            .map(|row| ExportedAllocation {
                county_id: row.allocation.county_id,
                county_name: row.county_name.clone(),
                amount: row.allocation.amount,
                percentage: crate::allocation::calculator::round2(
                    row.allocation.percentage_of_budget(details.budget.total_amount),
                ),
            })
            .collect();

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            budget: details.budget.clone(),
            allocations,
            total_allocated: details.total_allocated,
            remaining: details.remaining,
        }
    }
}

/// Export a budget and its allocations as pretty-printed JSON
pub fn export_budget_json<W: Write>(details: &BudgetDetails, mut writer: W) -> BudgetResult<()> {
    serde_json::to_writer_pretty(&mut writer, &BudgetExport::from_details(details))
        .map_err(|e| BudgetError::Export(format!("Failed to write JSON: {}", e)))?;

    writeln!(writer)
        .and_then(|_| writer.flush())
        .map_err(|e| BudgetError::Export(format!("Failed to write JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AllocationMethod;
    use crate::services::BudgetService;
    use crate::storage::{seed_sample_counties, Storage};

    #[test]
    fn test_json_export() {
        let storage = Storage::open_in_memory().unwrap();
        seed_sample_counties(&storage).unwrap();
        let service = BudgetService::new(&storage);
        let created = service
            .create_with_allocations("Health", Money::from_units(1_000), AllocationMethod::Equal)
            .unwrap();
        let details = service.details(created.budget.id).unwrap();

        let mut buf = Vec::new();
        export_budget_json(&details, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["schema_version"], EXPORT_SCHEMA_VERSION);
        assert_eq!(value["budget"]["name"], "Health");
        assert_eq!(value["budget"]["allocation_method"], "equal");
        assert_eq!(value["allocations"].as_array().unwrap().len(), 6);
        assert_eq!(value["allocations"][0]["county_name"], "Nairobi");
        assert_eq!(value["allocations"][0]["percentage"], 16.67);
        // 1000 / 6 rounds to 166.67, six of those overshoot by 2 cents
        assert_eq!(value["remaining"], serde_json::json!(-2));
    }
}
