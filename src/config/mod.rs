//! Configuration module for county-budget
//!
//! This module provides configuration management including:
//! - Base directory resolution with an environment override
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::Settings;
