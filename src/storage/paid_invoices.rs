//! Paid invoice repository for JSON storage
//!
//! Persists the paid invoice register to paid_invoices.json. The in-memory
//! form is the engine's [`PaidInvoiceRegister`], so the one-record-per-invoice
//! rule holds for everything loaded from disk as well.

use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::engine::PaidInvoiceRegister;
use crate::error::{FaturaError, FaturaResult};
use crate::models::{CardId, InvoicePeriod, Money, PaidInvoiceRecord};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct PaidInvoiceData {
    paid_invoices: Vec<PaidInvoiceRecord>,
}

pub struct PaidInvoiceRepository {
    path: PathBuf,
    data: RwLock<PaidInvoiceRegister>,
}

impl PaidInvoiceRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(PaidInvoiceRegister::new()),
        }
    }

    /// Load records from disk. Duplicate invoices collapse to the last one.
    pub fn load(&self) -> FaturaResult<()> {
        let file_data: PaidInvoiceData = read_json(&self.path)?;
        let register = PaidInvoiceRegister::from_records(file_data.paid_invoices)
            .map_err(|e| FaturaError::Storage(format!("{}: {}", self.path.display(), e)))?;

        let mut data = self
            .data
            .write()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = register;

        Ok(())
    }

    pub fn save(&self) -> FaturaResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = PaidInvoiceData {
            paid_invoices: data.iter().cloned().collect(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Copy of the whole register, for building engine snapshots
    pub fn register(&self) -> FaturaResult<PaidInvoiceRegister> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.clone())
    }

    pub fn get(&self, card_id: CardId, period: InvoicePeriod) -> FaturaResult<Option<PaidInvoiceRecord>> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(card_id, period).cloned())
    }

    pub fn records_for_card(&self, card_id: CardId) -> FaturaResult<Vec<PaidInvoiceRecord>> {
        let data = self
            .data
            .read()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.records_for_card(card_id).cloned().collect())
    }

    /// Upsert the payment for an invoice; returns the replaced record
    pub fn mark_paid(
        &self,
        card_id: CardId,
        period: InvoicePeriod,
        total_paid: Money,
        paid_date: NaiveDate,
    ) -> FaturaResult<Option<PaidInvoiceRecord>> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.mark_paid(card_id, period, total_paid, paid_date))
    }

    pub fn unmark_paid(&self, card_id: CardId, period: InvoicePeriod) -> FaturaResult<Option<PaidInvoiceRecord>> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.unmark_paid(card_id, period))
    }

    /// Drop every payment record of a card
    pub fn delete_by_card(&self, card_id: CardId) -> FaturaResult<Vec<PaidInvoiceRecord>> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FaturaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let periods: Vec<_> = data
            .records_for_card(card_id)
            .filter_map(PaidInvoiceRecord::period)
            .collect();

        Ok(periods
            .into_iter()
            .filter_map(|period| data.unmark_paid(card_id, period))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(y: i32, m: u32) -> InvoicePeriod {
        InvoicePeriod::new(y, m).unwrap()
    }

    #[test]
    fn test_mark_paid_persists_one_record_per_invoice() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("paid_invoices.json");
        let repo = PaidInvoiceRepository::new(path.clone());
        let card_id = CardId::new();

        assert!(repo
            .mark_paid(card_id, period(2025, 6), Money::from_cents(200), date(2025, 7, 1))
            .unwrap()
            .is_none());
        let replaced = repo
            .mark_paid(card_id, period(2025, 6), Money::from_cents(250), date(2025, 7, 2))
            .unwrap();
        assert!(replaced.is_some());
        repo.save().unwrap();

        let reloaded = PaidInvoiceRepository::new(path);
        reloaded.load().unwrap();
        let records = reloaded.records_for_card(card_id).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total_paid, Money::from_cents(250));
        assert_eq!(records[0].paid_date, date(2025, 7, 2));
    }

    #[test]
    fn test_load_rejects_bad_reference_month() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("paid_invoices.json");
        let mut record = PaidInvoiceRecord::new(
            CardId::new(),
            period(2025, 1),
            date(2025, 1, 5),
            Money::zero(),
        );
        record.month_reference = 13;
        write_json_atomic(&path, &PaidInvoiceData { paid_invoices: vec![record] }).unwrap();

        let repo = PaidInvoiceRepository::new(path);
        assert!(matches!(repo.load(), Err(FaturaError::Storage(_))));
    }

    #[test]
    fn test_delete_by_card() {
        let temp_dir = TempDir::new().unwrap();
        let repo = PaidInvoiceRepository::new(temp_dir.path().join("paid_invoices.json"));
        let card_id = CardId::new();
        let other = CardId::new();

        repo.mark_paid(card_id, period(2025, 1), Money::zero(), date(2025, 2, 1)).unwrap();
        repo.mark_paid(card_id, period(2025, 2), Money::zero(), date(2025, 3, 1)).unwrap();
        repo.mark_paid(other, period(2025, 2), Money::zero(), date(2025, 3, 1)).unwrap();

        assert_eq!(repo.delete_by_card(card_id).unwrap().len(), 2);
        assert!(repo.records_for_card(card_id).unwrap().is_empty());
        assert_eq!(repo.register().unwrap().len(), 1);
    }
}
