//! Purchase service
//!
//! Records purchases, expands installment plans into installment records
//! and keeps recurring markers in step with their purchase.

use chrono::{Datelike, NaiveDate};

use crate::audit::EntityType;
use crate::engine::calendar::{add_months, billing_date};
use crate::engine::{PaidInvoiceRegister, PeriodResolver};
use crate::error::{FaturaError, FaturaResult};
use crate::models::{
    Card, CardId, Installment, InvoicePeriod, Money, Purchase, PurchaseId, RecurringMarker,
};
use crate::storage::Storage;

pub struct PurchaseService<'a> {
    storage: &'a Storage,
}

/// Input for [`PurchaseService::record`]
#[derive(Debug, Clone)]
pub struct NewPurchase {
    pub card_id: Option<CardId>,
    pub amount: Money,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    /// Number of installments; 1 means a single charge
    pub installments: u32,
    /// Month a recurring charge is billed for
    pub recurring: Option<InvoicePeriod>,
}

impl NewPurchase {
    pub fn new(card_id: Option<CardId>, amount: Money, date: NaiveDate) -> Self {
        Self {
            card_id,
            amount,
            date,
            description: String::new(),
            category: String::new(),
            installments: 1,
            recurring: None,
        }
    }
}

/// A purchase together with the records generated from it
#[derive(Debug, Clone)]
pub struct RecordedPurchase {
    pub purchase: Purchase,
    pub installments: Vec<Installment>,
    pub recurring: Option<RecurringMarker>,
}

/// Build the installment records for a purchase paid over
/// `purchase.total_installments` months.
///
/// The value is split so the parts add up to the purchase amount, with any
/// leftover cents on the first installment. The first installment is billed
/// on the invoice the purchase falls into and each following one on the next
/// month's invoice.
pub fn plan_installments(
    card: &Card,
    purchase: &Purchase,
    paid_invoices: &PaidInvoiceRegister,
) -> FaturaResult<Vec<Installment>> {
    let first_period = PeriodResolver::new(card, paid_invoices).for_purchase(purchase.date)?;
    let first_due = installment_date(card, first_period)?;
    let total = purchase.total_installments;

    purchase
        .amount
        .split_even(total)
        .into_iter()
        .zip(1..=total)
        .map(|(amount, number)| {
            let offset = number as i32 - 1;
            let due_date = add_months(first_due, offset).ok_or_else(|| {
                let period = first_period.shift(offset);
                FaturaError::InvalidDate {
                    year: period.year,
                    month: period.month,
                    day: first_due.day(),
                }
            })?;
            let mut installment =
                Installment::new(card.id, Some(purchase.id), amount, number, total, due_date);
            installment.description = purchase.description.clone();
            Ok(installment)
        })
        .collect()
}

/// Date an installment billed on `period` carries.
///
/// Installments are bucketed by the default closing-day rule, so the date
/// sits before the closing day inside `period`, on the due day when that
/// is early enough. With a closing day of 1 no day of `period` stays in it,
/// and the due day of the previous month is used instead. Day numbers only
/// shrink under month clamping, so adding months to this date keeps every
/// later installment on its own invoice.
fn installment_date(card: &Card, period: InvoicePeriod) -> FaturaResult<NaiveDate> {
    if card.closing_day > 1 {
        billing_date(period, card.due_day.min(card.closing_day - 1))
    } else {
        billing_date(period.prev(), card.due_day)
    }
}

impl<'a> PurchaseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a purchase, generating installments and a recurring marker
    /// as requested
    pub fn record(&self, input: NewPurchase) -> FaturaResult<RecordedPurchase> {
        let card = match input.card_id {
            Some(id) => Some(
                self.storage
                    .cards
                    .get(id)?
                    .ok_or_else(|| FaturaError::card_not_found(id.to_string()))?,
            ),
            None => None,
        };

        if input.installments > 1 && input.recurring.is_some() {
            return Err(FaturaError::Validation(
                "A recurring purchase cannot be split into installments".into(),
            ));
        }

        let mut purchase = Purchase::new(input.card_id, input.date, input.amount);
        purchase.description = input.description.trim().to_string();
        purchase.category = input.category.trim().to_string();
        purchase.total_installments = input.installments;
        purchase.installment_plan = input.installments > 1;

        purchase.validate().map_err(FaturaError::Validation)?;

        let installments = match &card {
            Some(card) if purchase.installment_plan => {
                let register = self.storage.paid_invoices.register()?;
                plan_installments(card, &purchase, &register)?
            }
            _ => Vec::new(),
        };

        let recurring = input
            .recurring
            .map(|period| RecurringMarker::new(purchase.id, period));

        self.storage.purchases.upsert(purchase.clone())?;
        for installment in &installments {
            self.storage.installments.upsert(installment.clone())?;
        }
        if let Some(marker) = recurring {
            self.storage.recurring.upsert(marker)?;
        }
        if let Err(err) = self.save_files() {
            self.storage.purchases.delete(purchase.id)?;
            self.storage.installments.delete_by_purchase(purchase.id)?;
            self.storage.recurring.delete(purchase.id)?;
            if let Err(restore_err) = self.save_files() {
                tracing::warn!(error = %restore_err, "Could not restore purchase files");
            }
            return Err(err);
        }

        self.storage.log_create(
            EntityType::Purchase,
            purchase.id.to_string(),
            Some(purchase.description.clone()),
            &purchase,
        )?;
        for installment in &installments {
            self.storage.log_create(
                EntityType::Installment,
                installment.id.to_string(),
                Some(installment.to_string()),
                installment,
            )?;
        }
        if let Some(marker) = &recurring {
            self.storage.log_create(
                EntityType::RecurringMarker,
                purchase.id.to_string(),
                None,
                marker,
            )?;
        }

        tracing::info!(
            purchase = %purchase.id,
            amount = %purchase.amount,
            installments = installments.len(),
            recurring = recurring.is_some(),
            "Recorded purchase"
        );

        Ok(RecordedPurchase {
            purchase,
            installments,
            recurring,
        })
    }

    pub fn get(&self, id: PurchaseId) -> FaturaResult<Option<Purchase>> {
        self.storage.purchases.get(id)
    }

    /// Find a purchase by full or short ID
    pub fn find(&self, reference: &str) -> FaturaResult<Option<Purchase>> {
        self.storage.purchases.find(reference)
    }

    /// Purchases newest first, optionally for a single card
    pub fn list(&self, card_id: Option<CardId>) -> FaturaResult<Vec<Purchase>> {
        match card_id {
            Some(id) => self.storage.purchases.get_by_card(id),
            None => self.storage.purchases.get_all(),
        }
    }

    pub fn recurring_marker(&self, id: PurchaseId) -> FaturaResult<Option<RecurringMarker>> {
        self.storage.recurring.get(id)
    }

    /// Delete a purchase along with its installments and recurring marker
    pub fn delete(&self, id: PurchaseId) -> FaturaResult<RecordedPurchase> {
        let purchase = self
            .storage
            .purchases
            .delete(id)?
            .ok_or_else(|| FaturaError::purchase_not_found(id.to_string()))?;
        let installments = self.storage.installments.delete_by_purchase(id)?;
        let recurring = self.storage.recurring.delete(id)?;

        self.save_files()?;

        for installment in &installments {
            self.storage.log_delete(
                EntityType::Installment,
                installment.id.to_string(),
                Some(installment.to_string()),
                installment,
            )?;
        }
        if let Some(marker) = &recurring {
            self.storage.log_delete(
                EntityType::RecurringMarker,
                purchase.id.to_string(),
                None,
                marker,
            )?;
        }
        self.storage.log_delete(
            EntityType::Purchase,
            purchase.id.to_string(),
            Some(purchase.description.clone()),
            &purchase,
        )?;

        tracing::info!(purchase = %purchase.id, installments = installments.len(), "Deleted purchase");

        Ok(RecordedPurchase {
            purchase,
            installments,
            recurring,
        })
    }

    fn save_files(&self) -> FaturaResult<()> {
        self.storage.purchases.save()?;
        self.storage.installments.save()?;
        self.storage.recurring.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FaturaPaths;
    use crate::engine::resolver::default_period;
    use crate::services::{CardService, InvoiceService};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(y: i32, m: u32) -> InvoicePeriod {
        InvoicePeriod::new(y, m).unwrap()
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FaturaPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn create_card(storage: &Storage, closing_day: u32, due_day: u32) -> Card {
        CardService::new(storage)
            .create("Nubank", Money::from_cents(500_000), closing_day, due_day, None)
            .unwrap()
    }

    #[test]
    fn test_plan_installments_split_and_schedule() {
        let card = Card::new("Nubank", Money::from_cents(500_000), 10, 20);
        let mut purchase = Purchase::on_card(card.id, date(2025, 11, 15), Money::from_cents(1000), "TV");
        purchase.total_installments = 3;
        purchase.installment_plan = true;

        let plan = plan_installments(&card, &purchase, &PaidInvoiceRegister::new()).unwrap();

        let amounts: Vec<_> = plan.iter().map(|i| i.amount.cents()).collect();
        assert_eq!(amounts, vec![334, 333, 333]);

        // 2025-11-15 is past the closing day, so the first invoice is 2025-12
        let due: Vec<_> = plan.iter().map(|i| i.due_date).collect();
        assert_eq!(due, vec![date(2025, 12, 9), date(2026, 1, 9), date(2026, 2, 9)]);
        let periods: Vec<_> = plan
            .iter()
            .map(|i| default_period(i.due_date, card.closing_day))
            .collect();
        assert_eq!(periods, vec![period(2025, 12), period(2026, 1), period(2026, 2)]);
        assert_eq!(plan[2].position_label(), "3/3");
        assert!(plan.iter().all(|i| i.purchase_id == Some(purchase.id)));
    }

    #[test]
    fn test_plan_installments_due_day_before_closing() {
        let card = Card::new("Inter", Money::zero(), 25, 5);
        let mut purchase = Purchase::on_card(card.id, date(2025, 3, 30), Money::from_cents(200), "");
        purchase.total_installments = 2;
        purchase.installment_plan = true;

        let plan = plan_installments(&card, &purchase, &PaidInvoiceRegister::new()).unwrap();
        assert_eq!(plan[0].due_date, date(2025, 4, 5));
        assert_eq!(plan[1].due_date, date(2025, 5, 5));
    }

    #[test]
    fn test_plan_installments_month_end_closing_day() {
        let card = Card::new("C6", Money::zero(), 31, 31);
        let mut purchase = Purchase::on_card(card.id, date(2025, 1, 30), Money::from_cents(400), "");
        purchase.total_installments = 4;
        purchase.installment_plan = true;

        let plan = plan_installments(&card, &purchase, &PaidInvoiceRegister::new()).unwrap();
        let periods: Vec<_> = plan
            .iter()
            .map(|i| default_period(i.due_date, card.closing_day))
            .collect();
        assert_eq!(
            periods,
            vec![period(2025, 1), period(2025, 2), period(2025, 3), period(2025, 4)]
        );
        assert_eq!(plan[1].due_date, date(2025, 2, 28));
    }

    #[test]
    fn test_plan_installments_closing_on_first_day() {
        let card = Card::new("Inter", Money::zero(), 1, 31);
        let mut purchase = Purchase::on_card(card.id, date(2025, 1, 15), Money::from_cents(300), "");
        purchase.total_installments = 3;
        purchase.installment_plan = true;

        let plan = plan_installments(&card, &purchase, &PaidInvoiceRegister::new()).unwrap();
        let due: Vec<_> = plan.iter().map(|i| i.due_date).collect();
        assert_eq!(due, vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 31)]);
        let periods: Vec<_> = plan.iter().map(|i| default_period(i.due_date, 1)).collect();
        assert_eq!(periods, vec![period(2025, 2), period(2025, 3), period(2025, 4)]);
    }

    #[test]
    fn test_plan_installments_follow_early_closing() {
        let card = Card::new("Nubank", Money::zero(), 10, 20);
        let mut paid = PaidInvoiceRegister::new();
        paid.mark_paid(card.id, period(2024, 3), Money::zero(), date(2024, 4, 2));
        let mut purchase = Purchase::on_card(card.id, date(2024, 4, 5), Money::from_cents(200), "");
        purchase.total_installments = 2;
        purchase.installment_plan = true;

        let plan = plan_installments(&card, &purchase, &paid).unwrap();
        let periods: Vec<_> = plan.iter().map(|i| default_period(i.due_date, 10)).collect();
        assert_eq!(periods, vec![period(2024, 5), period(2024, 6)]);
    }

    #[test]
    fn test_recorded_plan_lands_on_consecutive_invoices() {
        let (_temp_dir, storage) = create_test_storage();
        let card = create_card(&storage, 10, 20);

        let mut input = NewPurchase::new(Some(card.id), Money::from_cents(30_000), date(2025, 6, 1));
        input.installments = 3;
        PurchaseService::new(&storage).record(input).unwrap();

        let buckets = InvoiceService::new(&storage).list(card.id).unwrap();
        let periods: Vec<_> = buckets.iter().map(|b| b.key()).collect();
        assert_eq!(periods, vec!["2025-06", "2025-07", "2025-08"]);
        assert!(buckets.iter().all(|b| b.purchases.is_empty()));
        assert!(buckets.iter().all(|b| b.total == Money::from_cents(10_000)));
    }

    #[test]
    fn test_record_installment_plan() {
        let (_temp_dir, storage) = create_test_storage();
        let card = create_card(&storage, 10, 20);
        let service = PurchaseService::new(&storage);

        let mut input = NewPurchase::new(Some(card.id), Money::from_cents(100_000), date(2025, 6, 1));
        input.description = "Notebook".into();
        input.installments = 4;

        let recorded = service.record(input).unwrap();
        assert!(recorded.purchase.installment_plan);
        assert_eq!(recorded.installments.len(), 4);
        assert_eq!(storage.installments.get_by_purchase(recorded.purchase.id).unwrap().len(), 4);

        let total: Money = recorded.installments.iter().map(|i| i.amount).sum();
        assert_eq!(total, Money::from_cents(100_000));
    }

    #[test]
    fn test_record_recurring_marker() {
        let (_temp_dir, storage) = create_test_storage();
        let card = create_card(&storage, 10, 20);
        let service = PurchaseService::new(&storage);

        let mut input = NewPurchase::new(Some(card.id), Money::from_cents(3990), date(2025, 6, 1));
        input.recurring = InvoicePeriod::new(2025, 12);

        let recorded = service.record(input).unwrap();
        let marker = service.recurring_marker(recorded.purchase.id).unwrap().unwrap();
        assert_eq!((marker.year, marker.month), (2025, 12));
    }

    #[test]
    fn test_record_rejects_invalid_input() {
        let (_temp_dir, storage) = create_test_storage();
        let card = create_card(&storage, 10, 20);
        let service = PurchaseService::new(&storage);

        let zero = NewPurchase::new(Some(card.id), Money::zero(), date(2025, 6, 1));
        assert!(service.record(zero).unwrap_err().is_validation());

        let mut plan_without_card = NewPurchase::new(None, Money::from_cents(100), date(2025, 6, 1));
        plan_without_card.installments = 2;
        assert!(service.record(plan_without_card).unwrap_err().is_validation());

        let unknown_card = NewPurchase::new(Some(CardId::new()), Money::from_cents(100), date(2025, 6, 1));
        assert!(service.record(unknown_card).unwrap_err().is_not_found());
    }

    #[test]
    fn test_failed_save_leaves_no_partial_purchase() {
        let (temp_dir, storage) = create_test_storage();
        let card = create_card(&storage, 10, 20);
        let paths = FaturaPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::create_dir_all(paths.installments_file()).unwrap();

        let mut input = NewPurchase::new(Some(card.id), Money::from_cents(600), date(2025, 6, 1));
        input.installments = 2;
        assert!(PurchaseService::new(&storage).record(input).is_err());

        assert_eq!(storage.purchases.count().unwrap(), 0);
        assert_eq!(storage.installments.count().unwrap(), 0);

        let reloaded = Storage::new(paths).unwrap();
        reloaded.purchases.load().unwrap();
        assert_eq!(reloaded.purchases.count().unwrap(), 0);
    }

    #[test]
    fn test_delete_cascades() {
        let (_temp_dir, storage) = create_test_storage();
        let card = create_card(&storage, 10, 20);
        let service = PurchaseService::new(&storage);

        let mut input = NewPurchase::new(Some(card.id), Money::from_cents(900), date(2025, 6, 1));
        input.installments = 3;
        let recorded = service.record(input).unwrap();

        let deleted = service.delete(recorded.purchase.id).unwrap();
        assert_eq!(deleted.installments.len(), 3);
        assert_eq!(storage.installments.count().unwrap(), 0);
        assert!(service.delete(recorded.purchase.id).unwrap_err().is_not_found());
    }
}
