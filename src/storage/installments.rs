//! Installment repository for JSON storage
//!
//! Manages loading and saving installments to installments.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{FaturaError, FaturaResult};
use crate::models::{CardId, Installment, InstallmentId, PurchaseId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct InstallmentData {
    installments: Vec<Installment>,
}

/// Repository for installment persistence
pub struct InstallmentRepository {
    path: PathBuf,
    data: RwLock<HashMap<InstallmentId, Installment>>,
}

impl InstallmentRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> FaturaResult<()> {
        let file_data: InstallmentData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for installment in file_data.installments {
            data.insert(installment.id, installment);
        }

        Ok(())
    }

    pub fn save(&self) -> FaturaResult<()> {
        let file_data = InstallmentData {
            installments: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: InstallmentId) -> FaturaResult<Option<Installment>> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Resolve a full or short installment ID
    pub fn find(&self, reference: &str) -> FaturaResult<Option<Installment>> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().find(|i| i.id.matches(reference)).cloned())
    }

    /// All installments by due date, then position in the plan
    pub fn get_all(&self) -> FaturaResult<Vec<Installment>> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut installments: Vec<_> = data.values().cloned().collect();
        installments.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then(a.number.cmp(&b.number))
                .then(a.id.cmp(&b.id))
        });
        Ok(installments)
    }

    pub fn get_by_card(&self, card_id: CardId) -> FaturaResult<Vec<Installment>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|i| i.card_id == card_id)
            .collect())
    }

    pub fn get_by_purchase(&self, purchase_id: PurchaseId) -> FaturaResult<Vec<Installment>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|i| i.purchase_id == Some(purchase_id))
            .collect())
    }

    pub fn upsert(&self, installment: Installment) -> FaturaResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(installment.id, installment);
        Ok(())
    }

    /// Remove every installment generated from a purchase
    pub fn delete_by_purchase(&self, purchase_id: PurchaseId) -> FaturaResult<Vec<Installment>> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let ids: Vec<_> = data
            .values()
            .filter(|i| i.purchase_id == Some(purchase_id))
            .map(|i| i.id)
            .collect();

        Ok(ids.iter().filter_map(|id| data.remove(id)).collect())
    }

    /// Remove every installment charged to a card
    pub fn delete_by_card(&self, card_id: CardId) -> FaturaResult<Vec<Installment>> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let ids: Vec<_> = data
            .values()
            .filter(|i| i.card_id == card_id)
            .map(|i| i.id)
            .collect();

        Ok(ids.iter().filter_map(|id| data.remove(id)).collect())
    }

    pub fn count(&self) -> FaturaResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
