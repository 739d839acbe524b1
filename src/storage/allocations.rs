//! Allocation repository
//!
//! Besides plain inserts this answers the joined queries used by budget
//! details and the reports.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::Serialize;

use crate::error::BudgetResult;
use crate::models::{Allocation, AllocationId, AllocationMethod, BudgetId, CountyId, Money, NewAllocation};

/// An allocation with its county's name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAllocationRow {
    #[serde(flatten)]
    pub allocation: Allocation,
    pub county_name: String,
}

/// An allocation with the budget it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountyAllocationRow {
    #[serde(flatten)]
    pub allocation: Allocation,
    pub budget_name: String,
    pub allocation_method: AllocationMethod,
    pub budget_total: Money,
}

/// Total received by one county across all budgets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountyTotal {
    pub county_id: CountyId,
    pub county_name: String,
    pub total_allocated: Money,
    pub allocation_count: usize,
}

/// Repository for allocation persistence
pub struct AllocationRepository<'c> {
    conn: &'c Connection,
}

impl<'c> AllocationRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(
        &self,
        draft: &NewAllocation,
        created_at: DateTime<Utc>,
    ) -> BudgetResult<Allocation> {
        self.conn.execute(
            "INSERT INTO allocations (budget_id, county_id, amount, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![draft.budget_id, draft.county_id, draft.amount, created_at],
        )?;

        Ok(Allocation {
            id: AllocationId::new(self.conn.last_insert_rowid()),
            budget_id: draft.budget_id,
            county_id: draft.county_id,
            amount: draft.amount,
            created_at,
        })
    }

    /// A budget's allocations in the order they were written
    pub fn for_budget(&self, budget_id: BudgetId) -> BudgetResult<Vec<BudgetAllocationRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.budget_id, a.county_id, a.amount, a.created_at, c.name
             FROM allocations a JOIN counties c ON c.id = a.county_id
             WHERE a.budget_id = ?1
             ORDER BY a.id",
        )?;
        let rows = stmt
            .query_map([budget_id], |row| {
                Ok(BudgetAllocationRow {
                    allocation: allocation_from_row(row)?,
                    county_name: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// A county's allocation history, newest first
    pub fn for_county(&self, county_id: CountyId) -> BudgetResult<Vec<CountyAllocationRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.budget_id, a.county_id, a.amount, a.created_at,
                    b.name, b.allocation_method, b.total_amount
             FROM allocations a JOIN budgets b ON b.id = a.budget_id
             WHERE a.county_id = ?1
             ORDER BY a.created_at DESC, a.id DESC",
        )?;
        let rows = stmt
            .query_map([county_id], |row| {
                Ok(CountyAllocationRow {
                    allocation: allocation_from_row(row)?,
                    budget_name: row.get(5)?,
                    allocation_method: row.get(6)?,
                    budget_total: row.get(7)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Counties ranked by total allocated, largest first
    ///
    /// Counties that never received an allocation are left out.
    pub fn totals_by_county(&self, limit: usize) -> BudgetResult<Vec<CountyTotal>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.name, SUM(a.amount) AS total, COUNT(a.id)
             FROM counties c JOIN allocations a ON a.county_id = c.id
             GROUP BY c.id, c.name
             ORDER BY total DESC, c.id
             LIMIT ?1",
        )?;
        let rows = stmt
            .query_map([limit], |row| {
                Ok(CountyTotal {
                    county_id: row.get(0)?,
                    county_name: row.get(1)?,
                    total_allocated: row.get(2)?,
                    allocation_count: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn count_for_budget(&self, budget_id: BudgetId) -> BudgetResult<usize> {
        let count: usize = self.conn.query_row(
            "SELECT COUNT(*) FROM allocations WHERE budget_id = ?1",
            [budget_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn count_for_county(&self, county_id: CountyId) -> BudgetResult<usize> {
        let count: usize = self.conn.query_row(
            "SELECT COUNT(*) FROM allocations WHERE county_id = ?1",
            [county_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Number of allocations per method, over all budgets
    pub fn count_by_method(&self, method: AllocationMethod) -> BudgetResult<usize> {
        let count: usize = self.conn.query_row(
            "SELECT COUNT(*) FROM allocations a JOIN budgets b ON b.id = a.budget_id
             WHERE b.allocation_method = ?1",
            [method],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn count(&self) -> BudgetResult<usize> {
        let count: usize = self
            .conn
            .query_row("SELECT COUNT(*) FROM allocations", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn allocation_from_row(row: &Row<'_>) -> rusqlite::Result<Allocation> {
    Ok(Allocation {
        id: row.get(0)?,
        budget_id: row.get(1)?,
        county_id: row.get(2)?,
        amount: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewBudget;
    use crate::models::NewCounty;
    use crate::storage::budgets::BudgetRepository;
    use crate::storage::counties::CountyRepository;
    use crate::storage::init::initialize_schema;

    struct Fixture {
        conn: Connection,
        counties: Vec<CountyId>,
        budget: BudgetId,
    }

    fn fixture() -> Fixture {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let counties = {
            let repo = CountyRepository::new(&conn);
            ["Kisumu", "Siaya"]
                .iter()
                .map(|name| {
                    repo.insert(&NewCounty::new(name, 1000, 1e6, 5).unwrap())
                        .unwrap()
                        .id
                })
                .collect()
        };
        let budget = BudgetRepository::new(&conn)
            .insert(
                &NewBudget::new("Water", Money::from_units(900), AllocationMethod::Equal).unwrap(),
                Utc::now(),
            )
            .unwrap()
            .id;

        Fixture {
            conn,
            counties,
            budget,
        }
    }

    fn allocate(fx: &Fixture, county: CountyId, units: i64) -> Allocation {
        AllocationRepository::new(&fx.conn)
            .insert(
                &NewAllocation::new(fx.budget, county, Money::from_units(units)).unwrap(),
                Utc::now(),
            )
            .unwrap()
    }

    #[test]
    fn test_for_budget_joins_county_names() {
        let fx = fixture();
        allocate(&fx, fx.counties[1], 500);
        allocate(&fx, fx.counties[0], 400);

        let rows = AllocationRepository::new(&fx.conn).for_budget(fx.budget).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.county_name.as_str()).collect();
        assert_eq!(names, vec!["Siaya", "Kisumu"]);
        assert_eq!(rows[0].allocation.amount, Money::from_units(500));
    }

    #[test]
    fn test_unknown_county_is_rejected() {
        let fx = fixture();
        let repo = AllocationRepository::new(&fx.conn);
        let result = repo.insert(
            &NewAllocation::new(fx.budget, CountyId::new(404), Money::from_units(1)).unwrap(),
            Utc::now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_cascade_from_budget_and_county() {
        let fx = fixture();
        allocate(&fx, fx.counties[0], 450);
        allocate(&fx, fx.counties[1], 450);
        let repo = AllocationRepository::new(&fx.conn);
        assert_eq!(repo.count().unwrap(), 2);

        CountyRepository::new(&fx.conn).delete(fx.counties[0]).unwrap();
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.count_for_county(fx.counties[0]).unwrap(), 0);

        BudgetRepository::new(&fx.conn).delete(fx.budget).unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_totals_and_history() {
        let fx = fixture();
        allocate(&fx, fx.counties[0], 100);
        allocate(&fx, fx.counties[1], 800);

        let repo = AllocationRepository::new(&fx.conn);
        let totals = repo.totals_by_county(10).unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].county_name, "Siaya");
        assert_eq!(totals[0].total_allocated, Money::from_units(800));
        assert_eq!(repo.totals_by_county(1).unwrap().len(), 1);

        let history = repo.for_county(fx.counties[0]).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].budget_name, "Water");
        assert_eq!(history[0].budget_total, Money::from_units(900));

        assert_eq!(repo.count_for_budget(fx.budget).unwrap(), 2);
        assert_eq!(repo.count_by_method(AllocationMethod::Equal).unwrap(), 2);
        assert_eq!(repo.count_by_method(AllocationMethod::GdpPerCapita).unwrap(), 0);
    }
}
