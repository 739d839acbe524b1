//! Report CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::error::BudgetResult;
use crate::reports::top_counties::DEFAULT_LIMIT;
use crate::reports::{BudgetStatsReport, CountyHistoryReport, MethodStatsReport, TopCountiesReport};
use crate::services::CountyService;
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Overall budget statistics
    Stats,
    /// Counties ranked by total allocation
    TopCounties {
        /// Number of counties to show
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
    /// Totals per allocation method
    Methods,
    /// Allocation history of one county
    County {
        /// County name or ID
        county: String,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> BudgetResult<()> {
    let currency = settings.currency_symbol.as_str();

    let output = match cmd {
        ReportCommands::Stats => BudgetStatsReport::generate(storage)?.format_terminal(currency),
        ReportCommands::TopCounties { limit } => {
            TopCountiesReport::generate(storage, limit)?.format_terminal(currency)
        }
        ReportCommands::Methods => MethodStatsReport::generate(storage)?.format_terminal(currency),
        ReportCommands::County { county } => {
            let found = CountyService::new(storage).require(&county)?;
            CountyHistoryReport::generate(storage, found.id)?.format_terminal(currency)
        }
    };

    print!("{}", output);
    Ok(())
}
