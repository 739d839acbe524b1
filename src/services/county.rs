//! County service
//!
//! Business logic for county management: validated CRUD, lookups, listing
//! filters and bulk CSV import.

use std::io::Read;

use serde::Deserialize;

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{County, CountyId, NewCounty};
use crate::storage::{AllocationRepository, CountyRepository, Storage};

/// Service for county management
pub struct CountyService<'a> {
    storage: &'a Storage,
}

/// Fields to change on an existing county; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct CountyUpdate {
    pub name: Option<String>,
    pub population: Option<i64>,
    pub economic_output: Option<f64>,
    pub project_score: Option<i64>,
}

impl CountyUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.population.is_none()
            && self.economic_output.is_none()
            && self.project_score.is_none()
    }
}

/// Sort direction for GDP-per-capita listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// One row of a county import file
#[derive(Debug, Deserialize)]
struct CountyRecord {
    name: String,
    population: i64,
    economic_output: f64,
    project_score: i64,
}

impl<'a> CountyService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a county
    ///
    /// The name is trimmed and title-cased before the duplicate check.
    pub fn create(
        &self,
        name: &str,
        population: i64,
        economic_output: f64,
        project_score: i64,
    ) -> BudgetResult<County> {
        let draft = NewCounty::new(name, population, economic_output, project_score)?;

        if self.storage.counties().name_exists(&draft.name, None)? {
            return Err(BudgetError::Duplicate {
                entity_type: "County",
                identifier: draft.name,
            });
        }

        let county = self.storage.counties().insert(&draft)?;

        self.storage.log_create(
            EntityType::County,
            county.id.to_string(),
            Some(county.name.clone()),
            &county,
        )?;

        Ok(county)
    }

    pub fn get(&self, id: CountyId) -> BudgetResult<Option<County>> {
        self.storage.counties().get(id)
    }

    /// Find a county by name or ID string ("Nairobi", "3" or "cty-3")
    pub fn find(&self, identifier: &str) -> BudgetResult<Option<County>> {
        if let Some(county) = self.storage.counties().get_by_name(identifier)? {
            return Ok(Some(county));
        }

        if let Ok(id) = identifier.parse::<CountyId>() {
            return self.storage.counties().get(id);
        }

        Ok(None)
    }

    /// Like [`find`](Self::find), but a missing county is an error
    pub fn require(&self, identifier: &str) -> BudgetResult<County> {
        self.find(identifier)?
            .ok_or_else(|| BudgetError::county_not_found(identifier))
    }

    /// All counties in insertion order
    pub fn list(&self) -> BudgetResult<Vec<County>> {
        self.storage.counties().get_all()
    }

    /// Case-insensitive substring search on the name
    pub fn search(&self, fragment: &str) -> BudgetResult<Vec<County>> {
        if fragment.trim().is_empty() {
            return Err(BudgetError::InvalidInput(
                "Search text cannot be empty".into(),
            ));
        }
        self.storage.counties().search(fragment)
    }

    /// Counties with a population in `min..=max`
    pub fn by_population_range(&self, min: u64, max: u64) -> BudgetResult<Vec<County>> {
        if min > max {
            return Err(BudgetError::InvalidInput(format!(
                "Minimum population {} is greater than maximum {}",
                min, max
            )));
        }
        self.storage.counties().by_population_range(min, max)
    }

    /// Counties with a project score in `min..=max`, highest first
    pub fn by_project_score_range(&self, min: u8, max: u8) -> BudgetResult<Vec<County>> {
        if min > max {
            return Err(BudgetError::InvalidInput(format!(
                "Minimum project score {} is greater than maximum {}",
                min, max
            )));
        }
        self.storage.counties().by_project_score_range(min, max)
    }

    /// All counties ordered by GDP per capita; ties keep insertion order
    pub fn sorted_by_gdp_per_capita(&self, order: SortOrder) -> BudgetResult<Vec<County>> {
        let mut counties = self.list()?;
        counties.sort_by(|a, b| {
            let ord = a.gdp_per_capita().total_cmp(&b.gdp_per_capita());
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
        Ok(counties)
    }

    /// Apply a partial update, revalidating every field
    pub fn update(&self, id: CountyId, changes: &CountyUpdate) -> BudgetResult<County> {
        let before = self
            .get(id)?
            .ok_or_else(|| BudgetError::county_not_found(id.to_string()))?;

        if changes.is_empty() {
            return Ok(before);
        }

        let current = before.to_draft();
        let draft = NewCounty::new(
            changes.name.as_deref().unwrap_or(&current.name),
            changes
                .population
                .unwrap_or_else(|| i64::try_from(current.population).unwrap_or(i64::MAX)),
            changes.economic_output.unwrap_or(current.economic_output),
            changes
                .project_score
                .unwrap_or(i64::from(current.project_score)),
        )?;

        if self.storage.counties().name_exists(&draft.name, Some(id))? {
            return Err(BudgetError::Duplicate {
                entity_type: "County",
                identifier: draft.name,
            });
        }

        let after = County::from_draft(id, draft);
        self.storage.counties().update(&after)?;

        self.storage.log_update(
            EntityType::County,
            id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        )?;

        Ok(after)
    }

    /// Number of allocations that deleting this county would remove
    pub fn allocation_count(&self, id: CountyId) -> BudgetResult<usize> {
        self.storage.allocations().count_for_county(id)
    }

    /// Delete a county and, by cascade, its allocations
    ///
    /// Returns the deleted county and how many allocations went with it.
    pub fn delete(&self, id: CountyId) -> BudgetResult<(County, usize)> {
        let county = self
            .get(id)?
            .ok_or_else(|| BudgetError::county_not_found(id.to_string()))?;

        let removed = self.storage.with_transaction(|tx| {
            let removed = AllocationRepository::new(tx).count_for_county(id)?;
            CountyRepository::new(tx).delete(id)?;
            Ok(removed)
        })?;

        self.storage.log_delete(
            EntityType::County,
            county.id.to_string(),
            Some(county.name.clone()),
            &county,
        )?;

        Ok((county, removed))
    }

    /// Import counties from CSV with the header
    /// `name,population,economic_output,project_score`
    ///
    /// Every row is validated before anything is written, and all rows are
    /// inserted in one transaction: either the whole file is imported or
    /// nothing is.
    pub fn import_csv<R: Read>(&self, reader: R) -> BudgetResult<Vec<County>> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut drafts: Vec<NewCounty> = Vec::new();
        for (index, record) in csv_reader.deserialize::<CountyRecord>().enumerate() {
            // Header is line 1
            let line = index + 2;
            let record = record.map_err(|e| BudgetError::Csv(format!("Line {}: {}", line, e)))?;

            let draft = NewCounty::new(
                &record.name,
                record.population,
                record.economic_output,
                record.project_score,
            )
            .map_err(|e| BudgetError::InvalidInput(format!("Line {}: {}", line, e)))?;

            if drafts.iter().any(|d| d.name.eq_ignore_ascii_case(&draft.name))
                || self.storage.counties().name_exists(&draft.name, None)?
            {
                return Err(BudgetError::Duplicate {
                    entity_type: "County",
                    identifier: format!("{} (line {})", draft.name, line),
                });
            }

            drafts.push(draft);
        }

        if drafts.is_empty() {
            return Err(BudgetError::InvalidInput(
                "Import file contains no counties".into(),
            ));
        }

        let counties: Vec<County> = self.storage.with_transaction(|tx| {
            let repo = CountyRepository::new(tx);
            drafts.iter().map(|draft| repo.insert(draft)).collect()
        })?;

        for county in &counties {
            self.storage.log_create(
                EntityType::County,
                county.id.to_string(),
                Some(county.name.clone()),
                county,
            )?;
        }

        Ok(counties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed_sample_counties;

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_normalizes_and_rejects_duplicates() {
        let storage = create_test_storage();
        let service = CountyService::new(&storage);

        let county = service.create("  taita taveta ", 340_671, 4.5e7, 4).unwrap();
        assert_eq!(county.name, "Taita Taveta");

        let err = service.create("TAITA TAVETA", 1, 1.0, 1).unwrap_err();
        assert!(matches!(err, BudgetError::Duplicate { .. }));
    }

    #[test]
    fn test_create_validation() {
        let storage = create_test_storage();
        let service = CountyService::new(&storage);

        assert!(service.create("", 10, 1.0, 5).unwrap_err().is_invalid_input());
        assert!(service.create("Lamu", 0, 1.0, 5).unwrap_err().is_invalid_input());
        assert!(service.create("Lamu", 10, -1.0, 5).unwrap_err().is_invalid_input());
        assert!(service.create("Lamu", 10, 1.0, 11).unwrap_err().is_invalid_input());
        assert_eq!(service.list().unwrap().len(), 0);
    }

    #[test]
    fn test_find_by_name_or_id() {
        let storage = create_test_storage();
        let service = CountyService::new(&storage);
        let county = service.create("Kericho", 901_777, 1.2e8, 6).unwrap();

        assert_eq!(service.find("kericho").unwrap(), Some(county.clone()));
        assert_eq!(service.find(&county.id.to_string()).unwrap(), Some(county.clone()));
        assert!(service.find("Bomet").unwrap().is_none());
        assert!(service.require("Bomet").unwrap_err().is_not_found());
    }

    #[test]
    fn test_sorted_by_gdp_per_capita() {
        let storage = create_test_storage();
        seed_sample_counties(&storage).unwrap();
        let service = CountyService::new(&storage);

        let ascending = service.sorted_by_gdp_per_capita(SortOrder::Ascending).unwrap();
        assert_eq!(ascending[0].name, "Kajiado");

        let descending = service.sorted_by_gdp_per_capita(SortOrder::Descending).unwrap();
        assert_eq!(descending[0].name, "Mombasa");
    }

    #[test]
    fn test_range_filters_reject_inverted_bounds() {
        let storage = create_test_storage();
        let service = CountyService::new(&storage);

        assert!(service.by_population_range(10, 1).unwrap_err().is_invalid_input());
        assert!(service.by_project_score_range(9, 2).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_partial_update() {
        let storage = create_test_storage();
        let service = CountyService::new(&storage);
        let county = service.create("Embu", 608_599, 7e7, 5).unwrap();
        service.create("Meru", 1_545_714, 1.5e8, 7).unwrap();

        let updated = service
            .update(
                county.id,
                &CountyUpdate {
                    project_score: Some(8),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.project_score, 8);
        assert_eq!(updated.population, 608_599);
        assert_eq!(updated.name, "Embu");

        let rename_clash = CountyUpdate {
            name: Some("meru".into()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(county.id, &rename_clash).unwrap_err(),
            BudgetError::Duplicate { .. }
        ));

        let bad_score = CountyUpdate {
            project_score: Some(0),
            ..Default::default()
        };
        assert!(service.update(county.id, &bad_score).unwrap_err().is_invalid_input());
        assert_eq!(service.get(county.id).unwrap().unwrap().project_score, 8);
    }

    #[test]
    fn test_delete_missing_county() {
        let storage = create_test_storage();
        let service = CountyService::new(&storage);
        assert!(service.delete(CountyId::new(1)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_import_csv() {
        let storage = create_test_storage();
        let service = CountyService::new(&storage);

        let data = "name,population,economic_output,project_score\n\
                    kisii, 1266860, 95000000, 5\n\
                    Nyamira,605576,40000000,4\n";
        let counties = service.import_csv(data.as_bytes()).unwrap();

        assert_eq!(counties.len(), 2);
        assert_eq!(counties[0].name, "Kisii");
        assert_eq!(service.list().unwrap().len(), 2);
    }

    #[test]
    fn test_import_csv_is_all_or_nothing() {
        let storage = create_test_storage();
        let service = CountyService::new(&storage);

        let data = "name,population,economic_output,project_score\n\
                    Vihiga,590013,30000000,4\n\
                    Bungoma,1670570,90000000,12\n";
        let err = service.import_csv(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Line 3"));
        assert!(service.list().unwrap().is_empty());

        let dup = "name,population,economic_output,project_score\n\
                   Vihiga,590013,30000000,4\n\
                   VIHIGA,590013,30000000,4\n";
        assert!(matches!(
            service.import_csv(dup.as_bytes()).unwrap_err(),
            BudgetError::Duplicate { .. }
        ));
        assert!(service.list().unwrap().is_empty());
    }
}
