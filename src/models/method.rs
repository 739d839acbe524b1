//! Allocation method enumeration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BudgetError;

/// The rule used to split a budget across counties
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMethod {
    /// Every county receives the same share
    Equal,
    /// Counties with lower GDP per capita receive more
    GdpPerCapita,
    /// Shares proportional to the county's project score
    ProjectBased,
}

impl AllocationMethod {
    /// All methods, in the order they are compared and reported
    pub const ALL: [AllocationMethod; 3] = [Self::Equal, Self::GdpPerCapita, Self::ProjectBased];

    /// The canonical name stored in the database and accepted on the command line
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::GdpPerCapita => "gdp_per_capita",
            Self::ProjectBased => "project_based",
        }
    }

    /// Human-readable title, e.g. "Gdp Per Capita"
    pub fn title(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for AllocationMethod {
    fn default() -> Self {
        Self::Equal
    }
}

impl fmt::Display for AllocationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllocationMethod {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equal" => Ok(Self::Equal),
            "gdp_per_capita" => Ok(Self::GdpPerCapita),
            "project_based" => Ok(Self::ProjectBased),
            other => Err(BudgetError::UnknownMethod(other.to_string())),
        }
    }
}
