//! Installment service
//!
//! Listing and paying individual installments. A paid installment no longer
//! appears in invoices and no longer uses credit.

use chrono::{Local, NaiveDate};

use crate::audit::EntityType;
use crate::error::{FaturaError, FaturaResult};
use crate::models::{CardId, Installment};
use crate::storage::Storage;

pub struct InstallmentService<'a> {
    storage: &'a Storage,
}

impl<'a> InstallmentService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Installments of a card by due date
    pub fn list(&self, card_id: CardId, include_paid: bool) -> FaturaResult<Vec<Installment>> {
        Ok(self
            .storage
            .installments
            .get_by_card(card_id)?
            .into_iter()
            .filter(|i| include_paid || !i.paid)
            .collect())
    }

    /// Resolve a full or short installment ID
    pub fn resolve(&self, reference: &str) -> FaturaResult<Installment> {
        self.storage
            .installments
            .find(reference)?
            .ok_or_else(|| FaturaError::installment_not_found(reference))
    }

    /// Mark an installment paid, on `date` or today
    pub fn pay(&self, reference: &str, date: Option<NaiveDate>) -> FaturaResult<Installment> {
        let mut installment = self.resolve(reference)?;
        if installment.paid {
            return Err(FaturaError::Validation(format!(
                "Installment {} is already paid",
                installment.position_label()
            )));
        }

        let before = installment.clone();
        installment.mark_paid(date.unwrap_or_else(|| Local::now().date_naive()));
        self.save(&before, &installment)?;

        tracing::info!(installment = %installment.id, "Installment paid");
        Ok(installment)
    }

    /// Reopen a paid installment
    pub fn unpay(&self, reference: &str) -> FaturaResult<Installment> {
        let mut installment = self.resolve(reference)?;
        if !installment.paid {
            return Err(FaturaError::Validation(format!(
                "Installment {} is not paid",
                installment.position_label()
            )));
        }

        let before = installment.clone();
        installment.mark_unpaid();
        self.save(&before, &installment)?;

        tracing::info!(installment = %installment.id, "Installment reopened");
        Ok(installment)
    }

    fn save(&self, before: &Installment, after: &Installment) -> FaturaResult<()> {
        self.storage.installments.upsert(after.clone())?;
        self.storage.installments.save()?;
        self.storage.log_update(
            EntityType::Installment,
            after.id.to_string(),
            Some(after.to_string()),
            before,
            after,
        )
    }
}
