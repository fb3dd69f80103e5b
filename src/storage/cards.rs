//! Card repository for JSON storage
//!
//! Manages loading and saving cards to cards.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{FaturaError, FaturaResult};
use crate::models::{Card, CardId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CardData {
    cards: Vec<Card>,
}

/// Repository for card persistence
pub struct CardRepository {
    path: PathBuf,
    data: RwLock<HashMap<CardId, Card>>,
}

impl CardRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load cards from disk, replacing whatever is in memory
    pub fn load(&self) -> FaturaResult<()> {
        let file_data: CardData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for card in file_data.cards {
            data.insert(card.id, card);
        }

        Ok(())
    }

    /// Save cards to disk, sorted by name for stable diffs
    pub fn save(&self) -> FaturaResult<()> {
        let file_data = CardData {
            cards: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: CardId) -> FaturaResult<Option<Card>> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// All cards ordered by name
    pub fn get_all(&self) -> FaturaResult<Vec<Card>> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut cards: Vec<_> = data.values().cloned().collect();
        cards.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        Ok(cards)
    }

    /// Case-insensitive lookup by name
    pub fn get_by_name(&self, name: &str) -> FaturaResult<Option<Card>> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name_lower = name.trim().to_lowercase();
        Ok(data
            .values()
            .find(|c| c.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Look a card up by name, full ID or short ID
    pub fn find(&self, reference: &str) -> FaturaResult<Option<Card>> {
        if let Some(card) = self.get_by_name(reference)? {
            return Ok(Some(card));
        }

        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().find(|c| c.id.matches(reference)).cloned())
    }

    pub fn upsert(&self, card: Card) -> FaturaResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(card.id, card);
        Ok(())
    }

    /// Remove a card, returning it if it existed
    pub fn delete(&self, id: CardId) -> FaturaResult<Option<Card>> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id))
    }

    /// Check if a name is taken by a card other than `exclude_id`
    pub fn name_exists(&self, name: &str, exclude_id: Option<CardId>) -> FaturaResult<bool> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name_lower = name.trim().to_lowercase();
        Ok(data
            .values()
            .any(|c| c.name.to_lowercase() == name_lower && Some(c.id) != exclude_id))
    }

    pub fn count(&self) -> FaturaResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
