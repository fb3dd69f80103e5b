//! Storage initialization
//!
//! First-run setup: directories plus an empty file per record type, so a
//! fresh data directory looks the same as one that has been written to.

use crate::config::paths::FaturaPaths;
use crate::error::FaturaResult;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation. Existing files are kept.
pub fn initialize_storage(paths: &FaturaPaths) -> FaturaResult<()> {
    paths.ensure_directories()?;

    let empty_files = [
        (paths.cards_file(), "cards"),
        (paths.purchases_file(), "purchases"),
        (paths.installments_file(), "installments"),
        (paths.paid_invoices_file(), "paid_invoices"),
        (paths.recurring_file(), "markers"),
    ];

    for (path, key) in empty_files {
        if !path.exists() {
            let mut empty = serde_json::Map::new();
            empty.insert(key.to_string(), serde_json::Value::Array(Vec::new()));
            write_json_atomic(&path, &empty)?;
        }
    }

    Ok(())
}

pub fn needs_initialization(paths: &FaturaPaths) -> bool {
    !paths.cards_file().exists()
}
