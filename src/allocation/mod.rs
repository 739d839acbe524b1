//! Budget allocation core
//!
//! Pure computation: nothing in this module touches storage. Callers fetch
//! counties, hand them to an [`AllocationCalculator`], and persist whatever
//! comes back.
//!
//! # Example
//!
//! ```rust,ignore
//! use county_budget::allocation::AllocationCalculator;
//! use county_budget::models::{AllocationMethod, Money};
//!
//! let calculator = AllocationCalculator::new(Money::from_units(1_000_000), &counties)?;
//! let summary = calculator.summary(AllocationMethod::GdpPerCapita)?;
//! println!("remaining after rounding: {}", summary.remaining);
//! ```

pub mod calculator;
pub mod compare;

pub use calculator::{AllocationCalculator, AllocationLine, AllocationSummary, CountyProfile};
pub use compare::{compare_allocation_methods, compare_methods, MethodComparison, MethodOutcome};
