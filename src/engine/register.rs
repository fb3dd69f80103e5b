//! Paid invoice register
//!
//! Keyed map of manually confirmed invoice payments. The key is the
//! `(card, period)` pair, so a second payment for the same invoice replaces
//! the first instead of creating a duplicate.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{FaturaError, FaturaResult};
use crate::models::{CardId, InvoicePeriod, Money, PaidInvoiceRecord};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaidInvoiceRegister {
    records: BTreeMap<(CardId, InvoicePeriod), PaidInvoiceRecord>,
}

impl PaidInvoiceRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a register from persisted records. Later duplicates win.
    pub fn from_records(
        records: impl IntoIterator<Item = PaidInvoiceRecord>,
    ) -> FaturaResult<Self> {
        let mut register = Self::new();
        for record in records {
            register.insert(record)?;
        }
        Ok(register)
    }

    /// Insert a record as-is, replacing any record for the same invoice
    pub fn insert(&mut self, record: PaidInvoiceRecord) -> FaturaResult<Option<PaidInvoiceRecord>> {
        let period = record.period().ok_or_else(|| {
            FaturaError::Validation(format!(
                "Paid invoice {} has invalid reference month {}",
                record.id, record.month_reference
            ))
        })?;
        Ok(self.records.insert((record.card_id, period), record))
    }

    /// Record that the invoice for `period` was paid.
    ///
    /// Upserts on `(card_id, period)`; an existing record keeps its ID and
    /// gets the new date and total. Returns the record that was replaced.
    pub fn mark_paid(
        &mut self,
        card_id: CardId,
        period: InvoicePeriod,
        total_paid: Money,
        paid_date: NaiveDate,
    ) -> Option<PaidInvoiceRecord> {
        let mut record = PaidInvoiceRecord::new(card_id, period, paid_date, total_paid);
        if let Some(existing) = self.records.get(&(card_id, period)) {
            record.id = existing.id;
        }
        self.records.insert((card_id, period), record)
    }

    /// Remove the payment record for `period`, returning it if present
    pub fn unmark_paid(&mut self, card_id: CardId, period: InvoicePeriod) -> Option<PaidInvoiceRecord> {
        self.records.remove(&(card_id, period))
    }

    pub fn get(&self, card_id: CardId, period: InvoicePeriod) -> Option<&PaidInvoiceRecord> {
        self.records.get(&(card_id, period))
    }

    /// All records for a card, ordered by period
    pub fn records_for_card(&self, card_id: CardId) -> impl Iterator<Item = &PaidInvoiceRecord> {
        let start = InvoicePeriod {
            year: i32::MIN,
            month: 1,
        };
        let end = InvoicePeriod {
            year: i32::MAX,
            month: 12,
        };
        self.records
            .range((card_id, start)..=(card_id, end))
            .map(|(_, record)| record)
    }

    /// The card's most recent payment by paid date.
    ///
    /// Two payments on the same day resolve to the later reference period.
    pub fn latest_for_card(&self, card_id: CardId) -> Option<&PaidInvoiceRecord> {
        self.records_for_card(card_id)
            .max_by_key(|record| (record.paid_date, record.year_reference, record.month_reference))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaidInvoiceRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(y: i32, m: u32) -> InvoicePeriod {
        InvoicePeriod::new(y, m).unwrap()
    }

    #[test]
    fn test_mark_paid_upserts_on_card_and_period() {
        let card = CardId::new();
        let mut register = PaidInvoiceRegister::new();

        assert!(register
            .mark_paid(card, period(2025, 6), Money::from_cents(100), date(2025, 7, 1))
            .is_none());
        let first_id = register.get(card, period(2025, 6)).unwrap().id;

        let replaced = register
            .mark_paid(card, period(2025, 6), Money::from_cents(250), date(2025, 7, 3))
            .unwrap();
        assert_eq!(replaced.total_paid, Money::from_cents(100));

        assert_eq!(register.len(), 1);
        let current = register.get(card, period(2025, 6)).unwrap();
        assert_eq!(current.id, first_id);
        assert_eq!(current.total_paid, Money::from_cents(250));
        assert_eq!(current.paid_date, date(2025, 7, 3));
    }

    #[test]
    fn test_unmark_paid() {
        let card = CardId::new();
        let mut register = PaidInvoiceRegister::new();
        register.mark_paid(card, period(2025, 6), Money::zero(), date(2025, 7, 1));

        assert!(register.unmark_paid(card, period(2025, 6)).is_some());
        assert!(register.get(card, period(2025, 6)).is_none());
        assert!(register.unmark_paid(card, period(2025, 6)).is_none());
    }

    #[test]
    fn test_latest_for_card_uses_paid_date() {
        let card = CardId::new();
        let other = CardId::new();
        let mut register = PaidInvoiceRegister::new();
        register.mark_paid(card, period(2025, 8), Money::zero(), date(2025, 8, 5));
        register.mark_paid(card, period(2025, 6), Money::zero(), date(2025, 9, 1));
        register.mark_paid(other, period(2025, 9), Money::zero(), date(2025, 10, 1));

        let latest = register.latest_for_card(card).unwrap();
        assert_eq!(latest.month_reference, 6);
        assert_eq!(register.records_for_card(card).count(), 2);
        assert!(register.latest_for_card(CardId::new()).is_none());
    }

    #[test]
    fn test_from_records_rejects_bad_month() {
        let mut record =
            PaidInvoiceRecord::new(CardId::new(), period(2025, 1), date(2025, 1, 5), Money::zero());
        record.month_reference = 13;
        assert!(PaidInvoiceRegister::from_records(vec![record]).is_err());
    }
}
