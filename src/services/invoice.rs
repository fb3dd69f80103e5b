//! Invoice service
//!
//! Runs the invoice engine over the stored records and records invoice
//! payments. Every call works on a fresh snapshot, so results always reflect
//! the latest mutation.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};

use crate::audit::EntityType;
use crate::engine::{self, CreditSummary, InvoiceBucket};
use crate::error::{FaturaError, FaturaResult};
use crate::models::{CardId, InvoicePeriod, Money, PaidInvoiceRecord};
use crate::storage::Storage;

pub struct InvoiceService<'a> {
    storage: &'a Storage,
}

impl<'a> InvoiceService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Sorted invoice buckets for one card
    pub fn list(&self, card_id: CardId) -> FaturaResult<Vec<InvoiceBucket>> {
        let records = self.storage.records()?;
        let snapshot = records.snapshot();
        let card = snapshot
            .card(card_id)
            .ok_or_else(|| FaturaError::card_not_found(card_id.to_string()))?;

        let buckets = engine::compute_card_invoices(&snapshot, card)?;
        tracing::debug!(card = %card_id, buckets = buckets.len(), "Computed invoices");
        Ok(buckets)
    }

    /// Invoice buckets for every card
    pub fn list_all(&self) -> FaturaResult<BTreeMap<CardId, Vec<InvoiceBucket>>> {
        let records = self.storage.records()?;
        engine::compute_invoices(&records.snapshot())
    }

    /// The bucket for `period`, if it has any charges
    pub fn show(&self, card_id: CardId, period: InvoicePeriod) -> FaturaResult<Option<InvoiceBucket>> {
        Ok(self
            .list(card_id)?
            .into_iter()
            .find(|bucket| bucket.period == period))
    }

    /// Record the invoice for `period` as paid.
    ///
    /// `total` defaults to the bucket's current total (zero for an empty
    /// period) and `paid_date` to today. Paying an already paid invoice
    /// replaces the earlier record.
    pub fn mark_paid(
        &self,
        card_id: CardId,
        period: InvoicePeriod,
        total: Option<Money>,
        paid_date: Option<NaiveDate>,
    ) -> FaturaResult<PaidInvoiceRecord> {
        if self.storage.cards.get(card_id)?.is_none() {
            return Err(FaturaError::card_not_found(card_id.to_string()));
        }

        let total = match total {
            Some(total) => total,
            None => self
                .show(card_id, period)?
                .map_or_else(Money::zero, |bucket| bucket.total),
        };
        if total.is_negative() {
            return Err(FaturaError::Validation(format!(
                "Paid total cannot be negative: {}",
                total
            )));
        }
        let paid_date = paid_date.unwrap_or_else(|| Local::now().date_naive());

        let replaced = self
            .storage
            .paid_invoices
            .mark_paid(card_id, period, total, paid_date)?;
        self.storage.paid_invoices.save()?;

        let record = self
            .storage
            .paid_invoices
            .get(card_id, period)?
            .ok_or_else(|| FaturaError::paid_invoice_not_found(period.key()))?;

        match &replaced {
            Some(before) => self.storage.log_update(
                EntityType::PaidInvoice,
                record.id.to_string(),
                Some(period.key()),
                before,
                &record,
            )?,
            None => self.storage.log_create(
                EntityType::PaidInvoice,
                record.id.to_string(),
                Some(period.key()),
                &record,
            )?,
        }

        tracing::info!(
            card = %card_id,
            period = %period,
            total = %total,
            paid_date = %paid_date,
            replaced = replaced.is_some(),
            "Invoice marked paid"
        );

        Ok(record)
    }

    /// Remove the payment record for `period`
    pub fn unmark_paid(&self, card_id: CardId, period: InvoicePeriod) -> FaturaResult<PaidInvoiceRecord> {
        let record = self
            .storage
            .paid_invoices
            .unmark_paid(card_id, period)?
            .ok_or_else(|| FaturaError::paid_invoice_not_found(period.key()))?;
        self.storage.paid_invoices.save()?;

        self.storage.log_delete(
            EntityType::PaidInvoice,
            record.id.to_string(),
            Some(period.key()),
            &record,
        )?;
        tracing::info!(card = %card_id, period = %period, "Invoice payment removed");

        Ok(record)
    }

    /// Available credit for one card as of `today`
    pub fn credit(&self, card_id: CardId, today: NaiveDate) -> FaturaResult<CreditSummary> {
        let records = self.storage.records()?;
        let snapshot = records.snapshot();
        let card = snapshot
            .card(card_id)
            .ok_or_else(|| FaturaError::card_not_found(card_id.to_string()))?;

        Ok(engine::compute_card_credit(&snapshot, card, today))
    }

    /// Available credit for every card as of `today`
    pub fn credit_all(&self, today: NaiveDate) -> FaturaResult<Vec<CreditSummary>> {
        let records = self.storage.records()?;
        Ok(engine::compute_credit_summaries(&records.snapshot(), today))
    }
}
