//! Audit log CLI command

use crate::error::BudgetResult;
use crate::storage::Storage;

/// Print the most recent audit entries, oldest first
pub fn handle_audit_command(storage: &Storage, limit: usize) -> BudgetResult<()> {
    let audit = storage.audit();

    if !audit.is_enabled() {
        println!("Audit logging is disabled (audit_enabled = false in config.json).");
    }

    let entries = audit.read_recent(limit)?;
    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
