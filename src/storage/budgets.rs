//! Budget repository

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::BudgetResult;
use crate::models::{AllocationMethod, Budget, BudgetId, NewBudget};

const COLUMNS: &str = "id, name, total_amount, allocation_method, created_at";

/// Repository for budget persistence
pub struct BudgetRepository<'c> {
    conn: &'c Connection,
}

impl<'c> BudgetRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, draft: &NewBudget, created_at: DateTime<Utc>) -> BudgetResult<Budget> {
        self.conn.execute(
            "INSERT INTO budgets (name, total_amount, allocation_method, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                draft.name,
                draft.total_amount,
                draft.allocation_method,
                created_at
            ],
        )?;

        let id = BudgetId::new(self.conn.last_insert_rowid());
        Ok(Budget::from_draft(id, draft.clone(), created_at))
    }

    pub fn get(&self, id: BudgetId) -> BudgetResult<Option<Budget>> {
        let budget = self
            .conn
            .query_row(
                &format!("SELECT {} FROM budgets WHERE id = ?1", COLUMNS),
                [id],
                budget_from_row,
            )
            .optional()?;
        Ok(budget)
    }

    /// All budgets, newest first
    pub fn get_all(&self) -> BudgetResult<Vec<Budget>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM budgets ORDER BY created_at DESC, id DESC",
            COLUMNS
        ))?;
        let budgets = stmt
            .query_map([], budget_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(budgets)
    }

    /// Budgets created with one method, newest first
    pub fn by_method(&self, method: AllocationMethod) -> BudgetResult<Vec<Budget>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM budgets WHERE allocation_method = ?1
             ORDER BY created_at DESC, id DESC",
            COLUMNS
        ))?;
        let budgets = stmt
            .query_map([method], budget_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(budgets)
    }

    pub fn rename(&self, id: BudgetId, name: &str) -> BudgetResult<bool> {
        let changed = self.conn.execute(
            "UPDATE budgets SET name = ?2 WHERE id = ?1",
            params![id, name],
        )?;
        Ok(changed > 0)
    }

    /// Delete a budget and, by cascade, its allocations
    pub fn delete(&self, id: BudgetId) -> BudgetResult<bool> {
        let changed = self.conn.execute("DELETE FROM budgets WHERE id = ?1", [id])?;
        Ok(changed > 0)
    }

    pub fn count(&self) -> BudgetResult<usize> {
        let count: usize = self
            .conn
            .query_row("SELECT COUNT(*) FROM budgets", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn budget_from_row(row: &Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: row.get("id")?,
        name: row.get("name")?,
        total_amount: row.get("total_amount")?,
        allocation_method: row.get("allocation_method")?,
        created_at: row.get("created_at")?,
    })
}
