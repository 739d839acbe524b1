//! Storage layer for county-budget
//!
//! A single SQLite database holds counties, budgets and allocations. The
//! `Storage` coordinator owns the connection, hands out repositories that
//! borrow it, and wraps multi-statement writes in transactions.

pub mod allocations;
pub mod budgets;
mod codec;
pub mod counties;
pub mod init;

pub use allocations::{AllocationRepository, BudgetAllocationRow, CountyAllocationRow, CountyTotal};
pub use budgets::BudgetRepository;
pub use counties::CountyRepository;
pub use init::{initialize_schema, seed_sample_counties};

use chrono::Utc;
use rusqlite::{Connection, Transaction};
use serde::Serialize;

use crate::allocation::AllocationLine;
use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::{AppPaths, Settings};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Allocation, Budget, NewAllocation, NewBudget};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    conn: Connection,
    audit: AuditLogger,
}

impl Storage {
    /// Open (creating if needed) the database under `paths`
    pub fn open(paths: &AppPaths, settings: &Settings) -> BudgetResult<Self> {
        paths.ensure_directories()?;

        let conn = Connection::open(paths.database_file())?;
        initialize_schema(&conn)?;

        let audit = if settings.audit_enabled {
            AuditLogger::new(paths.audit_log())
        } else {
            AuditLogger::disabled(paths.audit_log())
        };

        Ok(Self { conn, audit })
    }

    /// An in-memory database with auditing off
    pub fn open_in_memory() -> BudgetResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            audit: AuditLogger::disabled(std::path::PathBuf::from("audit.log")),
        })
    }

    pub fn counties(&self) -> CountyRepository<'_> {
        CountyRepository::new(&self.conn)
    }

    pub fn budgets(&self) -> BudgetRepository<'_> {
        BudgetRepository::new(&self.conn)
    }

    pub fn allocations(&self) -> AllocationRepository<'_> {
        AllocationRepository::new(&self.conn)
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Run `f` inside a transaction
    ///
    /// Commits when `f` returns `Ok`. On `Err` (or a panic) the transaction
    /// is dropped uncommitted, which rolls back every write made through it.
    /// Transactions do not nest.
    pub fn with_transaction<T, F>(&self, f: F) -> BudgetResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> BudgetResult<T>,
    {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Insert a budget and one allocation per line, all or nothing
    pub fn persist_budget_and_allocations(
        &self,
        draft: &NewBudget,
        lines: &[AllocationLine],
    ) -> BudgetResult<(Budget, Vec<Allocation>)> {
        let (budget, allocations) = self.with_transaction(|tx| {
            let created_at = Utc::now();
            let budget = BudgetRepository::new(tx).insert(draft, created_at)?;

            let repo = AllocationRepository::new(tx);
            let allocations = lines
                .iter()
                .map(|line| {
                    let new = NewAllocation::new(budget.id, line.county_id, line.amount)?;
                    repo.insert(&new, created_at)
                })
                .collect::<BudgetResult<Vec<_>>>()?;

            Ok((budget, allocations))
        })?;

        let mut entries = vec![AuditEntry::create(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.name.clone()),
            &budget,
        )];
        entries.extend(allocations.iter().map(|allocation| {
            AuditEntry::create(
                EntityType::Allocation,
                allocation.id.to_string(),
                None,
                allocation,
            )
        }));
        // The budget is committed at this point
        self.audit.log_batch(&entries).map_err(|e| {
            BudgetError::Audit(format!(
                "{} was saved, but its audit entries could not be written: {}",
                budget, e
            ))
        })?;

        Ok((budget, allocations))
    }

    /// Log an entity creation to the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> BudgetResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Log an entity update, with a diff of the changed fields
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> BudgetResult<()> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    /// Log an entity deletion
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> BudgetResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::AllocationCalculator;
    use crate::models::{AllocationMethod, CountyId, Money, NewCounty};
    use tempfile::TempDir;

    fn seeded() -> Storage {
        let storage = Storage::open_in_memory().unwrap();
        seed_sample_counties(&storage).unwrap();
        storage
    }

    fn table_counts(storage: &Storage) -> (usize, usize) {
        (
            storage.budgets().count().unwrap(),
            storage.allocations().count().unwrap(),
        )
    }

    #[test]
    fn test_open_creates_database_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(&paths, &Settings::default()).unwrap();

        assert!(paths.is_initialized());
        assert!(storage.audit().is_enabled());
        assert_eq!(storage.counties().count().unwrap(), 0);
    }

    #[test]
    fn test_data_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        {
            let storage = Storage::open(&paths, &Settings::default()).unwrap();
            seed_sample_counties(&storage).unwrap();
        }
        let storage = Storage::open(&paths, &Settings::default()).unwrap();
        assert_eq!(storage.counties().count().unwrap(), 6);
        assert_eq!(storage.audit().read_all().unwrap().len(), 6);
    }

    #[test]
    fn test_persist_budget_and_allocations() {
        let storage = seeded();
        let counties = storage.counties().get_all().unwrap();
        let calc = AllocationCalculator::new(Money::from_units(6_000_000), &counties).unwrap();
        let summary = calc.summary(AllocationMethod::Equal).unwrap();

        let draft = NewBudget::new("Health", summary.total_budget, summary.method).unwrap();
        let (budget, allocations) = storage
            .persist_budget_and_allocations(&draft, &summary.allocations)
            .unwrap();

        assert_eq!(allocations.len(), 6);
        assert!(allocations.iter().all(|a| a.budget_id == budget.id));
        assert!(allocations
            .iter()
            .all(|a| a.amount == Money::from_units(1_000_000)));
        assert_eq!(table_counts(&storage), (1, 6));
    }

    #[test]
    fn test_failed_allocation_insert_rolls_back_everything() {
        let storage = seeded();
        let counties = storage.counties().get_all().unwrap();
        let calc = AllocationCalculator::new(Money::from_units(1_000), &counties).unwrap();
        let mut lines = calc.equal_allocation();
        lines[1].county_id = CountyId::new(9_999);

        let draft = NewBudget::new("Broken", Money::from_units(1_000), AllocationMethod::Equal)
            .unwrap();
        let result = storage.persist_budget_and_allocations(&draft, &lines);

        assert!(matches!(result, Err(BudgetError::Persistence(_))));
        assert_eq!(table_counts(&storage), (0, 0));
    }

    #[test]
    fn test_audit_failure_after_commit_reports_saved_budget() {
        let temp_dir = TempDir::new().unwrap();
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        // A directory cannot be opened for appending
        let storage = Storage {
            conn,
            audit: AuditLogger::new(temp_dir.path().to_path_buf()),
        };
        storage
            .counties()
            .insert(&NewCounty::new("Turkana", 926_976, 9e7, 8).unwrap())
            .unwrap();

        let counties = storage.counties().get_all().unwrap();
        let summary = AllocationCalculator::new(Money::from_units(100), &counties)
            .unwrap()
            .summary(AllocationMethod::Equal)
            .unwrap();
        let draft = NewBudget::new("Roads", summary.total_budget, summary.method).unwrap();

        let err = storage
            .persist_budget_and_allocations(&draft, &summary.allocations)
            .unwrap_err();

        assert!(matches!(err, BudgetError::Audit(_)));
        assert!(err.to_string().contains("Roads (bgt-1) was saved"));
        assert_eq!(table_counts(&storage), (1, 1));
    }

    #[test]
    fn test_with_transaction_commits_and_rolls_back() {
        let storage = Storage::open_in_memory().unwrap();
        let draft = NewCounty::new("Turkana", 926_976, 9e7, 8).unwrap();

        let rolled_back: BudgetResult<()> = storage.with_transaction(|tx| {
            CountyRepository::new(tx).insert(&draft)?;
            Err(BudgetError::InvalidInput("abort".into()))
        });
        assert!(rolled_back.is_err());
        assert_eq!(storage.counties().count().unwrap(), 0);

        storage
            .with_transaction(|tx| CountyRepository::new(tx).insert(&draft))
            .unwrap();
        assert_eq!(storage.counties().count().unwrap(), 1);
    }

    #[test]
    fn test_budget_delete_cascades() {
        let storage = seeded();
        let counties = storage.counties().get_all().unwrap();
        let summary = AllocationCalculator::new(Money::from_units(600), &counties)
            .unwrap()
            .summary(AllocationMethod::ProjectBased)
            .unwrap();
        let draft = NewBudget::new("Schools", summary.total_budget, summary.method).unwrap();
        let (budget, _) = storage
            .persist_budget_and_allocations(&draft, &summary.allocations)
            .unwrap();

        assert!(storage.budgets().delete(budget.id).unwrap());
        assert_eq!(table_counts(&storage), (0, 0));
    }
}
