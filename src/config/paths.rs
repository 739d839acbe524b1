//! Path management for county-budget
//!
//! Resolves where the database, settings and audit log live.
//!
//! ## Path Resolution Order
//!
//! 1. `COUNTY_BUDGET_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`$XDG_CONFIG_HOME` or `~/.config` on
//!    Linux, `~/Library/Application Support` on macOS, `%APPDATA%` on
//!    Windows) joined with `county-budget`

use std::path::PathBuf;

use crate::error::BudgetError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "COUNTY_BUDGET_DATA_DIR";

/// Manages all paths used by county-budget
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Base directory for all county-budget data
    base_dir: PathBuf,
}

impl AppPaths {
    /// Create a new AppPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and the
    /// override variable is not set.
    pub fn new() -> Result<Self, BudgetError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) => PathBuf::from(custom),
            None => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create AppPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the SQLite database
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Default destination for exports
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn database_file(&self) -> PathBuf {
        self.data_dir().join("budget_allocation.db")
    }

    /// Ensure the base, data and export directories exist
    pub fn ensure_directories(&self) -> Result<(), BudgetError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BudgetError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BudgetError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.export_dir())
            .map_err(|e| BudgetError::Io(format!("Failed to create export directory: {}", e)))?;

        Ok(())
    }

    /// Check if the database has been created
    pub fn is_initialized(&self) -> bool {
        self.database_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, BudgetError> {
    let dirs = directories::BaseDirs::new().ok_or_else(|| {
        BudgetError::Config(format!(
            "Could not determine a home directory; set {} instead",
            DATA_DIR_ENV
        ))
    })?;
    Ok(dirs.config_dir().join("county-budget"))
}
