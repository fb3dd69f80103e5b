//! Purchase repository for JSON storage
//!
//! Manages loading and saving purchases to purchases.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{FaturaError, FaturaResult};
use crate::models::{CardId, Purchase, PurchaseId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct PurchaseData {
    purchases: Vec<Purchase>,
}

/// Repository for purchase persistence
pub struct PurchaseRepository {
    path: PathBuf,
    data: RwLock<HashMap<PurchaseId, Purchase>>,
}

impl PurchaseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> FaturaResult<()> {
        let file_data: PurchaseData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for purchase in file_data.purchases {
            data.insert(purchase.id, purchase);
        }

        Ok(())
    }

    pub fn save(&self) -> FaturaResult<()> {
        let file_data = PurchaseData {
            purchases: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: PurchaseId) -> FaturaResult<Option<Purchase>> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Resolve a full or short purchase ID
    pub fn find(&self, reference: &str) -> FaturaResult<Option<Purchase>> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().find(|p| p.id.matches(reference)).cloned())
    }

    /// All purchases, newest first
    pub fn get_all(&self) -> FaturaResult<Vec<Purchase>> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut purchases: Vec<_> = data.values().cloned().collect();
        purchases.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        Ok(purchases)
    }

    /// Purchases charged to a card, newest first
    pub fn get_by_card(&self, card_id: CardId) -> FaturaResult<Vec<Purchase>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|p| p.card_id == Some(card_id))
            .collect())
    }

    pub fn upsert(&self, purchase: Purchase) -> FaturaResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(purchase.id, purchase);
        Ok(())
    }

    pub fn delete(&self, id: PurchaseId) -> FaturaResult<Option<Purchase>> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id))
    }

    pub fn count(&self) -> FaturaResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
