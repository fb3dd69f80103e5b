//! JSON file helpers with atomic writes
//!
//! A write either fully replaces the target file or leaves it untouched.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{FaturaError, FaturaResult};

/// Read JSON from a file, returning the default value if the file doesn't exist
///
/// Records that fail to deserialize (including malformed dates) are reported
/// as storage errors naming the file.
pub fn read_json<T, P>(path: P) -> FaturaResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| FaturaError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| FaturaError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to `path` through a sibling temp file and a rename
pub fn write_json_atomic<T, P>(path: P, data: &T) -> FaturaResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            FaturaError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| FaturaError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| FaturaError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| FaturaError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| FaturaError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        FaturaError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CardId, Money, Purchase};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
    struct PurchaseFile {
        purchases: Vec<Purchase>,
    }

    #[test]
    fn test_missing_file_reads_default() {
        let temp_dir = TempDir::new().unwrap();
        let data: PurchaseFile = read_json(temp_dir.path().join("purchases.json")).unwrap();
        assert!(data.purchases.is_empty());
    }

    #[test]
    fn test_write_then_read_purchases() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("purchases.json");

        let purchase = Purchase::on_card(
            CardId::new(),
            NaiveDate::from_ymd_opt(2025, 6, 9).unwrap(),
            Money::from_cents(20000),
            "Mercado",
        );
        let data = PurchaseFile {
            purchases: vec![purchase.clone()],
        };

        write_json_atomic(&path, &data).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let loaded: PurchaseFile = read_json(&path).unwrap();
        assert_eq!(loaded.purchases[0].id, purchase.id);
        assert_eq!(loaded.purchases[0].amount, Money::from_cents(20000));
    }

    #[test]
    fn test_malformed_date_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("purchases.json");
        let text = format!(
            concat!(
                r#"{{"purchases": [{{"id": "{}", "valor": 100, "data": "2025-02-30", "#,
                r#""created_at": "2025-01-01T00:00:00Z", "updated_at": "2025-01-01T00:00:00Z"}}]}}"#
            ),
            uuid::Uuid::new_v4()
        );
        fs::write(&path, text).unwrap();

        let result: FaturaResult<PurchaseFile> = read_json(&path);
        assert!(matches!(result, Err(FaturaError::Storage(_))));
    }
}
