//! Export CLI commands

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Subcommand;

use crate::config::AppPaths;
use crate::error::{BudgetError, BudgetResult};
use crate::export::{export_budget_csv, export_budget_json, ExportFormat};
use crate::services::BudgetService;
use crate::storage::Storage;

use super::budget::parse_budget_id;

/// Export subcommands
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export one budget with its allocations
    Budget {
        /// Budget ID
        id: String,
        /// Output format: csv or json
        #[arg(short, long, default_value = "csv")]
        format: String,
        /// Output file (defaults to the exports directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle an export command
pub fn handle_export_command(
    storage: &Storage,
    paths: &AppPaths,
    cmd: ExportCommands,
) -> BudgetResult<()> {
    match cmd {
        ExportCommands::Budget { id, format, output } => {
            let format: ExportFormat = format.parse()?;
            let details = BudgetService::new(storage).details(parse_budget_id(&id)?)?;

            let path = output.unwrap_or_else(|| {
                paths.export_dir().join(format!(
                    "budget-{}.{}",
                    details.budget.id.get(),
                    format.extension()
                ))
            });

            let file = File::create(&path).map_err(|e| {
                BudgetError::Export(format!("Failed to create {}: {}", path.display(), e))
            })?;
            let writer = BufWriter::new(file);

            match format {
                ExportFormat::Csv => export_budget_csv(&details, writer)?,
                ExportFormat::Json => export_budget_json(&details, writer)?,
            }

            println!(
                "Exported {} ({} allocations) to {}",
                details.budget,
                details.allocations.len(),
                path.display()
            );
        }
    }

    Ok(())
}
