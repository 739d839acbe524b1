//! Audit logging system for county-budget
//!
//! Records every create, update and delete of counties and budgets (and the
//! allocation batches written with a budget) in an append-only JSONL log.
//!
//! # Example
//!
//! ```rust,ignore
//! use county_budget::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let entry = AuditEntry::create(
//!     EntityType::County,
//!     county.id.to_string(),
//!     Some(county.name.clone()),
//!     &county,
//! );
//! logger.log(&entry)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
