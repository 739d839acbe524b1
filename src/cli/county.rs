//! County CLI commands
//!
//! Implements CLI commands for county management.

use std::fs::File;
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::display::county::{format_county_details, format_county_list};
use crate::error::{BudgetError, BudgetResult};
use crate::services::{CountyService, CountyUpdate, SortOrder};
use crate::storage::Storage;

/// Direction for `county list --sort-gdp`
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GdpSort {
    Asc,
    Desc,
}

impl From<GdpSort> for SortOrder {
    fn from(sort: GdpSort) -> Self {
        match sort {
            GdpSort::Asc => SortOrder::Ascending,
            GdpSort::Desc => SortOrder::Descending,
        }
    }
}

/// County subcommands
#[derive(Subcommand)]
pub enum CountyCommands {
    /// Add a new county
    Add {
        /// County name
        name: String,
        /// Number of residents
        #[arg(short, long, allow_negative_numbers = true)]
        population: i64,
        /// Total economic output
        #[arg(short, long, allow_negative_numbers = true)]
        economic_output: f64,
        /// Project score from 1 to 10
        #[arg(short = 's', long, allow_negative_numbers = true)]
        project_score: i64,
    },
    /// List counties, optionally filtered or sorted
    List {
        /// Only counties with at least this population
        #[arg(long, conflicts_with_all = ["min_score", "max_score", "sort_gdp"])]
        min_population: Option<u64>,
        /// Only counties with at most this population
        #[arg(long, conflicts_with_all = ["min_score", "max_score", "sort_gdp"])]
        max_population: Option<u64>,
        /// Only counties scoring at least this (sorted by score)
        #[arg(long, conflicts_with = "sort_gdp")]
        min_score: Option<u8>,
        /// Only counties scoring at most this (sorted by score)
        #[arg(long, conflicts_with = "sort_gdp")]
        max_score: Option<u8>,
        /// Sort by GDP per capita
        #[arg(long, value_enum)]
        sort_gdp: Option<GdpSort>,
    },
    /// Show county details
    Show {
        /// County name or ID
        county: String,
    },
    /// Find counties whose name contains the given text
    Search {
        /// Text to look for (case-insensitive)
        text: String,
    },
    /// Change one or more fields of a county
    Update {
        /// County name or ID
        county: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New population
        #[arg(short, long, allow_negative_numbers = true)]
        population: Option<i64>,
        /// New economic output
        #[arg(short, long, allow_negative_numbers = true)]
        economic_output: Option<f64>,
        /// New project score
        #[arg(short = 's', long, allow_negative_numbers = true)]
        project_score: Option<i64>,
    },
    /// Delete a county and its allocations
    Delete {
        /// County name or ID
        county: String,
        /// Confirm deleting a county that has allocations
        #[arg(short, long)]
        yes: bool,
    },
    /// Import counties from a CSV file
    ///
    /// Expected header: name,population,economic_output,project_score
    Import {
        /// Path to CSV file
        file: PathBuf,
    },
}

/// Handle a county command
pub fn handle_county_command(storage: &Storage, cmd: CountyCommands) -> BudgetResult<()> {
    let service = CountyService::new(storage);

    match cmd {
        CountyCommands::Add {
            name,
            population,
            economic_output,
            project_score,
        } => {
            let county = service.create(&name, population, economic_output, project_score)?;

            println!("Created county: {}", county.name);
            println!("  Population: {}", county.population);
            println!("  GDP per Capita: {:.2}", county.gdp_per_capita());
            println!("  Project Score: {}", county.project_score);
            println!("  ID: {}", county.id);
        }

        CountyCommands::List {
            min_population,
            max_population,
            min_score,
            max_score,
            sort_gdp,
        } => {
            let counties = if min_population.is_some() || max_population.is_some() {
                service.by_population_range(
                    min_population.unwrap_or(0),
                    max_population.unwrap_or(i64::MAX as u64),
                )?
            } else if min_score.is_some() || max_score.is_some() {
                service.by_project_score_range(min_score.unwrap_or(1), max_score.unwrap_or(10))?
            } else if let Some(sort) = sort_gdp {
                service.sorted_by_gdp_per_capita(sort.into())?
            } else {
                service.list()?
            };
            print!("{}", format_county_list(&counties));
        }

        CountyCommands::Show { county } => {
            let found = service.require(&county)?;
            let allocation_count = service.allocation_count(found.id)?;
            print!("{}", format_county_details(&found, allocation_count));
        }

        CountyCommands::Search { text } => {
            let counties = service.search(&text)?;
            print!("{}", format_county_list(&counties));
        }

        CountyCommands::Update {
            county,
            name,
            population,
            economic_output,
            project_score,
        } => {
            let found = service.require(&county)?;
            let changes = CountyUpdate {
                name,
                population,
                economic_output,
                project_score,
            };

            if changes.is_empty() {
                println!(
                    "No changes specified. Use --name, --population, --economic-output or --project-score."
                );
                return Ok(());
            }

            let updated = service.update(found.id, &changes)?;
            println!("Updated county: {}", updated);
        }

        CountyCommands::Delete { county, yes } => {
            let found = service.require(&county)?;
            let allocation_count = service.allocation_count(found.id)?;

            if allocation_count > 0 && !yes {
                return Err(BudgetError::InvalidInput(format!(
                    "{} has {} allocation(s) that would be deleted with it. Re-run with --yes to confirm.",
                    found.name, allocation_count
                )));
            }

            let (deleted, removed) = service.delete(found.id)?;
            println!("Deleted county: {}", deleted);
            if removed > 0 {
                println!("  Removed {} allocation(s)", removed);
            }
        }

        CountyCommands::Import { file } => {
            let reader = File::open(&file).map_err(|e| {
                BudgetError::Io(format!("Failed to open {}: {}", file.display(), e))
            })?;

            let imported = service.import_csv(reader)?;
            println!("Imported {} county(ies) from {}", imported.len(), file.display());
            for county in &imported {
                println!("  {}", county);
            }
        }
    }

    Ok(())
}
