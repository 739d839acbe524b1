//! County repository
//!
//! Queries against the `counties` table. Borrows a connection, so the same
//! repository works on a plain connection or inside a transaction.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::BudgetResult;
use crate::models::{County, CountyId, NewCounty};

const COLUMNS: &str = "id, name, population, economic_output, project_score";

/// Repository for county persistence
pub struct CountyRepository<'c> {
    conn: &'c Connection,
}

impl<'c> CountyRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Insert a validated county and return it with its new id
    pub fn insert(&self, draft: &NewCounty) -> BudgetResult<County> {
        self.conn.execute(
            "INSERT INTO counties (name, population, economic_output, project_score)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                draft.name,
                draft.population,
                draft.economic_output,
                draft.project_score
            ],
        )?;

        let id = CountyId::new(self.conn.last_insert_rowid());
        Ok(County::from_draft(id, draft.clone()))
    }

    /// Get a county by ID
    pub fn get(&self, id: CountyId) -> BudgetResult<Option<County>> {
        let county = self
            .conn
            .query_row(
                &format!("SELECT {} FROM counties WHERE id = ?1", COLUMNS),
                [id],
                county_from_row,
            )
            .optional()?;
        Ok(county)
    }

    /// All counties in insertion order
    pub fn get_all(&self) -> BudgetResult<Vec<County>> {
        self.query(&format!("SELECT {} FROM counties ORDER BY id", COLUMNS), [])
    }

    /// Get a county by exact name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> BudgetResult<Option<County>> {
        let county = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM counties WHERE lower(name) = lower(?1)",
                    COLUMNS
                ),
                [name.trim()],
                county_from_row,
            )
            .optional()?;
        Ok(county)
    }

    /// Counties whose name contains `fragment` (case-insensitive), by name
    pub fn search(&self, fragment: &str) -> BudgetResult<Vec<County>> {
        self.query(
            &format!(
                "SELECT {} FROM counties WHERE instr(lower(name), lower(?1)) > 0 ORDER BY name",
                COLUMNS
            ),
            [fragment.trim()],
        )
    }

    /// Counties with `min <= population <= max`, smallest first
    pub fn by_population_range(&self, min: u64, max: u64) -> BudgetResult<Vec<County>> {
        self.query(
            &format!(
                "SELECT {} FROM counties WHERE population BETWEEN ?1 AND ?2
                 ORDER BY population, id",
                COLUMNS
            ),
            [min, max],
        )
    }

    /// Counties with a project score in `min..=max`, highest score first
    pub fn by_project_score_range(&self, min: u8, max: u8) -> BudgetResult<Vec<County>> {
        self.query(
            &format!(
                "SELECT {} FROM counties WHERE project_score BETWEEN ?1 AND ?2
                 ORDER BY project_score DESC, id",
                COLUMNS
            ),
            [min, max],
        )
    }

    /// Overwrite every field of an existing county
    ///
    /// Returns false if no row has this id.
    pub fn update(&self, county: &County) -> BudgetResult<bool> {
        let changed = self.conn.execute(
            "UPDATE counties
             SET name = ?2, population = ?3, economic_output = ?4, project_score = ?5
             WHERE id = ?1",
            params![
                county.id,
                county.name,
                county.population,
                county.economic_output,
                county.project_score
            ],
        )?;
        Ok(changed > 0)
    }

    /// Delete a county; its allocations go with it
    pub fn delete(&self, id: CountyId) -> BudgetResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM counties WHERE id = ?1", [id])?;
        Ok(changed > 0)
    }

    /// Check if a county name is already taken (case-insensitive)
    pub fn name_exists(&self, name: &str, exclude_id: Option<CountyId>) -> BudgetResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(
                 SELECT 1 FROM counties
                 WHERE lower(name) = lower(?1) AND (?2 IS NULL OR id != ?2)
             )",
            params![name.trim(), exclude_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn count(&self) -> BudgetResult<usize> {
        let count: usize = self
            .conn
            .query_row("SELECT COUNT(*) FROM counties", [], |row| row.get(0))?;
        Ok(count)
    }

    fn query<P: rusqlite::Params>(&self, sql: &str, params: P) -> BudgetResult<Vec<County>> {
        let mut stmt = self.conn.prepare(sql)?;
        let counties = stmt
            .query_map(params, county_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(counties)
    }
}

fn county_from_row(row: &Row<'_>) -> rusqlite::Result<County> {
    Ok(County {
        id: row.get("id")?,
        name: row.get("name")?,
        population: row.get("population")?,
        economic_output: row.get("economic_output")?,
        project_score: row.get("project_score")?,
    })
}
