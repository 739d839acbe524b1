//! County model
//!
//! A county is an administrative region that receives budget funds. Its
//! economic attributes drive the GDP-per-capita and project-based methods.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CountyId;

/// Maximum county name length, in characters
pub const MAX_COUNTY_NAME_LEN: usize = 100;

/// Inclusive bounds of a project score
pub const PROJECT_SCORE_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// A county as stored in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct County {
    pub id: CountyId,

    /// Title-cased, unique name
    pub name: String,

    /// Number of residents, always positive
    pub population: u64,

    /// Total economic output in currency units
    pub economic_output: f64,

    /// Project need/readiness rating, 1-10
    pub project_score: u8,
}

impl County {
    /// Attach a row id to a validated draft
    pub fn from_draft(id: CountyId, draft: NewCounty) -> Self {
        Self {
            id,
            name: draft.name,
            population: draft.population,
            economic_output: draft.economic_output,
            project_score: draft.project_score,
        }
    }

    /// Economic output per resident (0 when population is 0)
    pub fn gdp_per_capita(&self) -> f64 {
        gdp_per_capita(self.economic_output, self.population)
    }

    /// The draft this county would be rebuilt from, for revalidation on update
    pub fn to_draft(&self) -> NewCounty {
        NewCounty {
            name: self.name.clone(),
            population: self.population,
            economic_output: self.economic_output,
            project_score: self.project_score,
        }
    }
}

impl fmt::Display for County {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

fn gdp_per_capita(economic_output: f64, population: u64) -> f64 {
    if population == 0 {
        return 0.0;
    }
    economic_output / population as f64
}

/// A validated county that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCounty {
    pub name: String,
    pub population: u64,
    pub economic_output: f64,
    pub project_score: u8,
}

impl NewCounty {
    /// Validate every field and normalize the name
    ///
    /// Population is taken as `i64` so that negative input from the command
    /// line or a CSV file is reported as a validation error rather than a
    /// parse error.
    pub fn new(
        name: &str,
        population: i64,
        economic_output: f64,
        project_score: i64,
    ) -> Result<Self, CountyValidationError> {
        let name = normalize_county_name(name)?;

        if population <= 0 {
            return Err(CountyValidationError::NonPositivePopulation(population));
        }

        if !economic_output.is_finite() || economic_output < 0.0 {
            return Err(CountyValidationError::InvalidEconomicOutput(economic_output));
        }

        let project_score = u8::try_from(project_score)
            .ok()
            .filter(|score| PROJECT_SCORE_RANGE.contains(score))
            .ok_or(CountyValidationError::ProjectScoreOutOfRange(project_score))?;

        Ok(Self {
            name,
            population: population as u64,
            economic_output,
            project_score,
        })
    }

    /// Economic output per resident
    pub fn gdp_per_capita(&self) -> f64 {
        gdp_per_capita(self.economic_output, self.population)
    }
}

/// Trim, bound-check and title-case a county name
pub fn normalize_county_name(name: &str) -> Result<String, CountyValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CountyValidationError::EmptyName);
    }

    let len = trimmed.chars().count();
    if len > MAX_COUNTY_NAME_LEN {
        return Err(CountyValidationError::NameTooLong(len));
    }

    Ok(title_case(trimmed))
}

/// Upper-case the first letter of every run of letters, lower-case the rest
///
/// "mURANG'A north" becomes "Murang'A North".
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Validation errors for counties
#[derive(Debug, Clone, PartialEq)]
pub enum CountyValidationError {
    EmptyName,
    NameTooLong(usize),
    NonPositivePopulation(i64),
    InvalidEconomicOutput(f64),
    ProjectScoreOutOfRange(i64),
}

impl fmt::Display for CountyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "County name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "County name cannot exceed {} characters (got {})",
                MAX_COUNTY_NAME_LEN, len
            ),
            Self::NonPositivePopulation(p) => {
                write!(f, "Population must be greater than 0 (got {})", p)
            }
            Self::InvalidEconomicOutput(v) => {
                write!(f, "Economic output must be a non-negative number (got {})", v)
            }
            Self::ProjectScoreOutOfRange(s) => {
                write!(f, "Project score must be an integer between 1 and 10 (got {})", s)
            }
        }
    }
}

impl std::error::Error for CountyValidationError {}
