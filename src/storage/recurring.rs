//! Recurring marker repository for JSON storage
//!
//! Manages recurring.json. At most one marker per purchase.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{FaturaError, FaturaResult};
use crate::models::{PurchaseId, RecurringMarker};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct RecurringData {
    markers: Vec<RecurringMarker>,
}

pub struct RecurringRepository {
    path: PathBuf,
    data: RwLock<HashMap<PurchaseId, RecurringMarker>>,
}

impl RecurringRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> FaturaResult<()> {
        let file_data: RecurringData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for marker in file_data.markers {
            data.insert(marker.purchase_id, marker);
        }

        Ok(())
    }

    pub fn save(&self) -> FaturaResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut markers: Vec<_> = data.values().copied().collect();
        markers.sort_by_key(|m| (m.year, m.month, m.purchase_id));
        write_json_atomic(&self.path, &RecurringData { markers })
    }

    pub fn get(&self, purchase_id: PurchaseId) -> FaturaResult<Option<RecurringMarker>> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&purchase_id).copied())
    }

    /// Copy of all markers keyed by purchase
    pub fn get_all(&self) -> FaturaResult<HashMap<PurchaseId, RecurringMarker>> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.clone())
    }

    /// Set the marker for a purchase, returning the previous one
    pub fn upsert(&self, marker: RecurringMarker) -> FaturaResult<Option<RecurringMarker>> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.insert(marker.purchase_id, marker))
    }

    pub fn delete(&self, purchase_id: PurchaseId) -> FaturaResult<Option<RecurringMarker>> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&purchase_id))
    }
}
