use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use county_budget::cli::{
    handle_audit_command, handle_budget_command, handle_county_command, handle_export_command,
    handle_report_command,
};
use county_budget::config::{AppPaths, Settings};
use county_budget::reports::BudgetStatsReport;
use county_budget::storage::{seed_sample_counties, Storage};

#[derive(Parser)]
#[command(
    name = "county-budget",
    version,
    about = "Allocate budgets across counties",
    long_about = "county-budget distributes a budget across a set of counties using one \
                  of three methods (equal shares, inverse GDP per capita, or project \
                  score) and keeps every budget and its allocations in a local SQLite \
                  database."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and default settings
    Init {
        /// Also load six sample counties
        #[arg(long)]
        seed: bool,
    },

    /// Show counts and totals
    Status,

    /// Show current configuration and paths
    Config,

    /// County management commands
    #[command(subcommand)]
    County(county_budget::cli::CountyCommands),

    /// Budget creation and management commands
    #[command(subcommand)]
    Budget(county_budget::cli::BudgetCommands),

    /// Reports over stored budgets
    #[command(subcommand)]
    Report(county_budget::cli::ReportCommands),

    /// Export data to files
    #[command(subcommand)]
    Export(county_budget::cli::ExportCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = AppPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("county-budget - allocate budgets across counties");
            println!();
            println!("Run 'county-budget --help' for usage information.");
            println!("Run 'county-budget init --seed' to get started with sample counties.");
            return Ok(());
        }
    };

    match command {
        Commands::Init { seed } => {
            println!("Initializing county-budget at: {}", paths.base_dir().display());
            let storage = Storage::open(&paths, &settings)?;
            if !paths.settings_file().exists() {
                settings.save(&paths)?;
            }
            println!("Database: {}", paths.database_file().display());

            if seed {
                let seeded = seed_sample_counties(&storage)?;
                if seeded.is_empty() {
                    println!("Counties already exist; sample data not loaded.");
                } else {
                    println!("Loaded {} sample counties:", seeded.len());
                    for county in &seeded {
                        println!("  {}", county);
                    }
                }
            }

            println!("Initialization complete!");
        }
        Commands::Config => {
            println!("county-budget Configuration");
            println!("===========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Database:         {}", paths.database_file().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Default method:  {}", settings.default_method);
            println!("  Audit enabled:   {}", settings.audit_enabled);
        }
        Commands::Status => {
            let storage = open_storage(&paths, &settings)?;
            let stats = BudgetStatsReport::generate(&storage)?;
            println!("Counties:       {}", stats.county_count);
            println!("Budgets:        {}", stats.budget_count);
            println!("Allocations:    {}", stats.allocation_count);
            println!(
                "Total budgeted: {}",
                stats.total_budgeted.format_with_symbol(&settings.currency_symbol)
            );
        }
        Commands::County(cmd) => handle_county_command(&open_storage(&paths, &settings)?, cmd)?,
        Commands::Budget(cmd) => {
            handle_budget_command(&open_storage(&paths, &settings)?, &settings, cmd)?
        }
        Commands::Report(cmd) => {
            handle_report_command(&open_storage(&paths, &settings)?, &settings, cmd)?
        }
        Commands::Export(cmd) => {
            handle_export_command(&open_storage(&paths, &settings)?, &paths, cmd)?
        }
        Commands::Audit { limit } => {
            handle_audit_command(&open_storage(&paths, &settings)?, limit)?
        }
    }

    Ok(())
}

/// Open the database, refusing to create one outside `init`
fn open_storage(paths: &AppPaths, settings: &Settings) -> Result<Storage> {
    if !paths.is_initialized() {
        bail!("county-budget is not initialized. Run 'county-budget init' first.");
    }
    Ok(Storage::open(paths, settings)?)
}
