//! Card service
//!
//! Card CRUD with validation, duplicate-name checks and cascading deletes.

use crate::audit::EntityType;
use crate::error::{FaturaError, FaturaResult};
use crate::models::{Card, CardId, Money};
use crate::storage::Storage;

/// Service for card management
pub struct CardService<'a> {
    storage: &'a Storage,
}

/// Optional changes applied by [`CardService::update`]
#[derive(Debug, Clone, Default)]
pub struct CardUpdate {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub limit: Option<Money>,
    pub closing_day: Option<u32>,
    pub due_day: Option<u32>,
    pub color: Option<String>,
}

impl CardUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.brand.is_none()
            && self.limit.is_none()
            && self.closing_day.is_none()
            && self.due_day.is_none()
            && self.color.is_none()
    }
}

/// What a card delete removed along with the card
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDeletion {
    pub purchases: usize,
    pub installments: usize,
    pub paid_invoices: usize,
}

impl<'a> CardService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new card
    pub fn create(
        &self,
        name: &str,
        limit: Money,
        closing_day: u32,
        due_day: u32,
        brand: Option<&str>,
    ) -> FaturaResult<Card> {
        let name = name.trim();
        if self.storage.cards.name_exists(name, None)? {
            return Err(FaturaError::Duplicate {
                entity_type: "Card",
                identifier: name.to_string(),
            });
        }

        let mut card = Card::new(name, limit, closing_day, due_day);
        if let Some(brand) = brand {
            card.brand = brand.trim().to_string();
        }

        card.validate()
            .map_err(|e| FaturaError::Validation(e.to_string()))?;

        self.storage.cards.upsert(card.clone())?;
        self.storage.cards.save()?;

        self.storage.log_create(
            EntityType::Card,
            card.id.to_string(),
            Some(card.name.clone()),
            &card,
        )?;
        tracing::info!(card = %card.id, name = %card.name, "Created card");

        Ok(card)
    }

    pub fn get(&self, id: CardId) -> FaturaResult<Option<Card>> {
        self.storage.cards.get(id)
    }

    /// Find a card by name or ID
    pub fn find(&self, reference: &str) -> FaturaResult<Option<Card>> {
        self.storage.cards.find(reference)
    }

    /// Like [`find`](Self::find), but a missing card is an error
    pub fn resolve(&self, reference: &str) -> FaturaResult<Card> {
        self.find(reference)?
            .ok_or_else(|| FaturaError::card_not_found(reference))
    }

    pub fn list(&self) -> FaturaResult<Vec<Card>> {
        self.storage.cards.get_all()
    }

    /// Apply `changes` to a card
    pub fn update(&self, id: CardId, changes: CardUpdate) -> FaturaResult<Card> {
        let mut card = self
            .storage
            .cards
            .get(id)?
            .ok_or_else(|| FaturaError::card_not_found(id.to_string()))?;

        if changes.is_empty() {
            return Ok(card);
        }

        let before = card.clone();

        if let Some(name) = changes.name {
            let name = name.trim();
            if self.storage.cards.name_exists(name, Some(id))? {
                return Err(FaturaError::Duplicate {
                    entity_type: "Card",
                    identifier: name.to_string(),
                });
            }
            card.name = name.to_string();
        }
        if let Some(brand) = changes.brand {
            card.brand = brand;
        }
        if let Some(color) = changes.color {
            card.color = color;
        }
        if let Some(limit) = changes.limit {
            card.set_limit(limit);
        }
        if changes.closing_day.is_some() || changes.due_day.is_some() {
            card.set_billing_days(
                changes.closing_day.unwrap_or(card.closing_day),
                changes.due_day.unwrap_or(card.due_day),
            );
        }
        card.updated_at = chrono::Utc::now();

        card.validate()
            .map_err(|e| FaturaError::Validation(e.to_string()))?;

        self.storage.cards.upsert(card.clone())?;
        self.storage.cards.save()?;

        self.storage.log_update(
            EntityType::Card,
            card.id.to_string(),
            Some(card.name.clone()),
            &before,
            &card,
        )?;
        tracing::info!(card = %card.id, "Updated card");

        Ok(card)
    }

    /// Delete a card.
    ///
    /// A card with purchases, installments or payment records is only
    /// deleted when `cascade` is set, in which case all of them go too.
    pub fn delete(&self, id: CardId, cascade: bool) -> FaturaResult<(Card, CardDeletion)> {
        let card = self
            .storage
            .cards
            .get(id)?
            .ok_or_else(|| FaturaError::card_not_found(id.to_string()))?;

        let purchases = self.storage.purchases.get_by_card(id)?;
        let installment_count = self.storage.installments.get_by_card(id)?.len();
        let paid_count = self.storage.paid_invoices.records_for_card(id)?.len();

        if !cascade && (!purchases.is_empty() || installment_count > 0 || paid_count > 0) {
            return Err(FaturaError::Validation(format!(
                "Card '{}' has {} purchase(s), {} installment(s) and {} paid invoice(s); \
                 delete with cascade to remove them",
                card.name,
                purchases.len(),
                installment_count,
                paid_count
            )));
        }

        for purchase in &purchases {
            self.storage.purchases.delete(purchase.id)?;
            if let Some(marker) = self.storage.recurring.delete(purchase.id)? {
                self.storage.log_delete(
                    EntityType::RecurringMarker,
                    purchase.id.to_string(),
                    None,
                    &marker,
                )?;
            }
            self.storage.log_delete(
                EntityType::Purchase,
                purchase.id.to_string(),
                Some(purchase.description.clone()),
                purchase,
            )?;
        }

        let installments = self.storage.installments.delete_by_card(id)?;
        for installment in &installments {
            self.storage.log_delete(
                EntityType::Installment,
                installment.id.to_string(),
                Some(installment.to_string()),
                installment,
            )?;
        }

        let paid = self.storage.paid_invoices.delete_by_card(id)?;
        for record in &paid {
            self.storage.log_delete(
                EntityType::PaidInvoice,
                record.id.to_string(),
                record.period().map(|p| p.key()),
                record,
            )?;
        }

        self.storage.cards.delete(id)?;
        self.storage.save_all()?;

        self.storage.log_delete(
            EntityType::Card,
            card.id.to_string(),
            Some(card.name.clone()),
            &card,
        )?;

        let deletion = CardDeletion {
            purchases: purchases.len(),
            installments: installments.len(),
            paid_invoices: paid.len(),
        };
        tracing::info!(card = %card.id, ?deletion, "Deleted card");

        Ok((card, deletion))
    }
}
