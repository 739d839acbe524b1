//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod budget;
pub mod county;
pub mod export;
pub mod report;

pub use audit::handle_audit_command;
pub use budget::{handle_budget_command, BudgetCommands};
pub use county::{handle_county_command, CountyCommands};
pub use export::{handle_export_command, ExportCommands};
pub use report::{handle_report_command, ReportCommands};
