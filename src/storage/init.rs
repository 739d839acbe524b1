//! Schema creation and sample data

use rusqlite::Connection;

use crate::error::BudgetResult;
use crate::models::{County, NewCounty};

use super::counties::CountyRepository;
use super::Storage;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS counties (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT    NOT NULL UNIQUE,
    population      INTEGER NOT NULL CHECK (population > 0),
    economic_output REAL    NOT NULL CHECK (economic_output >= 0),
    project_score   INTEGER NOT NULL CHECK (project_score BETWEEN 1 AND 10)
);

CREATE TABLE IF NOT EXISTS budgets (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    name              TEXT    NOT NULL,
    total_amount      REAL    NOT NULL CHECK (total_amount > 0),
    allocation_method TEXT    NOT NULL,
    created_at        TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS allocations (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    budget_id  INTEGER NOT NULL REFERENCES budgets(id) ON DELETE CASCADE,
    county_id  INTEGER NOT NULL REFERENCES counties(id) ON DELETE CASCADE,
    amount     REAL    NOT NULL CHECK (amount >= 0),
    created_at TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_allocations_budget ON allocations(budget_id);
CREATE INDEX IF NOT EXISTS idx_allocations_county ON allocations(county_id);
";

/// Enable foreign keys and create any missing tables
///
/// Safe to run on every open.
pub fn initialize_schema(conn: &Connection) -> BudgetResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// The six counties `init --seed` loads:
/// (name, population, economic output, project score)
pub const SAMPLE_COUNTIES: [(&str, i64, f64, i64); 6] = [
    ("Nairobi", 4_397_073, 2_500_000_000.0, 9),
    ("Mombasa", 1_208_333, 800_000_000.0, 8),
    ("Kiambu", 2_417_735, 600_000_000.0, 7),
    ("Nakuru", 2_162_202, 450_000_000.0, 6),
    ("Machakos", 1_421_932, 300_000_000.0, 5),
    ("Kajiado", 1_117_840, 200_000_000.0, 6),
];

/// Insert the sample counties in one transaction
///
/// Does nothing when any county already exists; returns the inserted rows.
pub fn seed_sample_counties(storage: &Storage) -> BudgetResult<Vec<County>> {
    if storage.counties().count()? > 0 {
        return Ok(Vec::new());
    }

    let drafts = SAMPLE_COUNTIES
        .iter()
        .map(|&(name, population, output, score)| NewCounty::new(name, population, output, score))
        .collect::<Result<Vec<_>, _>>()?;

    let counties: Vec<County> = storage.with_transaction(|tx| {
        let repo = CountyRepository::new(tx);
        drafts.iter().map(|draft| repo.insert(draft)).collect()
    })?;

    for county in &counties {
        storage.log_create(
            crate::audit::EntityType::County,
            county.id.to_string(),
            Some(county.name.clone()),
            county,
        )?;
    }

    Ok(counties)
}
