//! county-budget - allocate budgets across counties
//!
//! This library distributes a budget across a set of counties using one of
//! three methods (equal shares, inverse GDP per capita, or proportional to a
//! project score) and stores budgets with their allocations in SQLite.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `allocation`: The allocation calculator and method comparison (pure)
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (counties, budgets, allocations, money)
//! - `storage`: SQLite storage layer with transactional writes
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `reports`: Read-only summaries
//! - `export`: CSV and JSON export
//! - `display`, `cli`: Terminal output and command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use county_budget::config::{AppPaths, Settings};
//! use county_budget::models::{AllocationMethod, Money};
//! use county_budget::services::BudgetService;
//! use county_budget::storage::Storage;
//!
//! let paths = AppPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(&paths, &settings)?;
//!
//! let created = BudgetService::new(&storage).create_with_allocations(
//!     "Health 2026",
//!     Money::from_units(1_000_000),
//!     AllocationMethod::GdpPerCapita,
//! )?;
//! ```

pub mod allocation;
pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
