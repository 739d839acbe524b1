//! Budget CLI commands
//!
//! Implements CLI commands for creating budgets, comparing allocation
//! methods and managing stored budgets.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::budget::{
    format_allocation_summary, format_budget_details, format_budget_list, format_comparison,
};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{AllocationMethod, BudgetId, Money};
use crate::services::BudgetService;
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a budget and allocate it across all counties
    Create {
        /// Budget name
        name: String,
        /// Total amount (e.g., "1000000" or "1,000,000.00")
        #[arg(short, long, allow_hyphen_values = true)]
        amount: String,
        /// Allocation method: equal, gdp_per_capita or project_based
        /// (defaults to the configured method)
        #[arg(short, long)]
        method: Option<String>,
        /// Show the allocation without saving it
        #[arg(long)]
        dry_run: bool,
    },
    /// List all budgets, newest first
    List,
    /// Show a budget with its allocations
    Show {
        /// Budget ID
        id: String,
    },
    /// Compare every allocation method for an amount
    Compare {
        /// Amount to allocate
        #[arg(short, long, allow_hyphen_values = true)]
        amount: String,
    },
    /// Rename a budget
    Rename {
        /// Budget ID
        id: String,
        /// New name
        name: String,
    },
    /// Delete a budget and its allocations
    Delete {
        /// Budget ID
        id: String,
    },
    /// List budgets created with one method
    ByMethod {
        /// Allocation method: equal, gdp_per_capita or project_based
        method: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> BudgetResult<()> {
    let service = BudgetService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Create {
            name,
            amount,
            method,
            dry_run,
        } => {
            let method = match method {
                Some(m) => m.parse::<AllocationMethod>()?,
                None => settings.default_method,
            };
            let amount = parse_amount(&amount)?;

            if dry_run {
                let summary = service.preview(amount, method)?;
                print!("{}", format_allocation_summary(&summary, currency));
                println!("(dry run, nothing saved)");
                return Ok(());
            }

            let created = service.create_with_allocations(&name, amount, method)?;
            println!("Created budget: {}", created.budget);
            println!();
            print!("{}", format_allocation_summary(&created.summary, currency));
        }

        BudgetCommands::List => {
            let budgets = service.list()?;
            print!("{}", format_budget_list(&budgets, currency));
        }

        BudgetCommands::Show { id } => {
            let details = service.details(parse_budget_id(&id)?)?;
            print!("{}", format_budget_details(&details, currency));
        }

        BudgetCommands::Compare { amount } => {
            let comparison = service.compare(parse_amount(&amount)?)?;
            print!("{}", format_comparison(&comparison, currency));
        }

        BudgetCommands::Rename { id, name } => {
            let renamed = service.rename(parse_budget_id(&id)?, &name)?;
            println!("Renamed budget: {}", renamed);
        }

        BudgetCommands::Delete { id } => {
            let (deleted, removed) = service.delete(parse_budget_id(&id)?)?;
            println!("Deleted budget: {}", deleted);
            println!("  Removed {} allocation(s)", removed);
        }

        BudgetCommands::ByMethod { method } => {
            let method: AllocationMethod = method.parse()?;
            let budgets = service.by_method(method)?;
            print!("{}", format_budget_list(&budgets, currency));
        }
    }

    Ok(())
}

pub(crate) fn parse_amount(input: &str) -> BudgetResult<Money> {
    Money::parse(input).map_err(|e| {
        BudgetError::InvalidInput(format!(
            "Invalid amount: '{}'. Use a format like '1000000' or '1,000,000.00'. Error: {}",
            input, e
        ))
    })
}

pub(crate) fn parse_budget_id(input: &str) -> BudgetResult<BudgetId> {
    input
        .parse()
        .map_err(|_| BudgetError::budget_not_found(input))
}
