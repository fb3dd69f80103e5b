//! Invoice aggregation
//!
//! Folds a card's purchases and open installments into one bucket per
//! invoice period, then orders the buckets for display: open invoices first
//! by due date, paid invoices after them, also by due date.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::calendar::billing_date;
use super::register::PaidInvoiceRegister;
use super::resolver::PeriodResolver;
use crate::error::FaturaResult;
use crate::models::{Card, Installment, InvoicePeriod, Money, Purchase};

/// All charges billed together on one card for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceBucket {
    pub period: InvoicePeriod,
    pub closing_date: NaiveDate,
    pub due_date: NaiveDate,
    /// Most recent first
    pub purchases: Vec<Purchase>,
    /// Soonest due first
    pub installments: Vec<Installment>,
    pub total: Money,
    pub paid: bool,
    pub paid_date: Option<NaiveDate>,
}

impl InvoiceBucket {
    fn open(
        card: &Card,
        period: InvoicePeriod,
        paid_invoices: &PaidInvoiceRegister,
    ) -> FaturaResult<Self> {
        let record = paid_invoices.get(card.id, period);
        Ok(Self {
            period,
            closing_date: billing_date(period, card.closing_day)?,
            due_date: billing_date(period.next(), card.due_day)?,
            purchases: Vec::new(),
            installments: Vec::new(),
            total: Money::zero(),
            paid: record.is_some(),
            paid_date: record.map(|r| r.paid_date),
        })
    }

    /// Grouping key, e.g. `"2025-06"`
    pub fn key(&self) -> String {
        self.period.key()
    }

    pub fn item_count(&self) -> usize {
        self.purchases.len() + self.installments.len()
    }

    /// Sum of the items, independent of the running `total`
    pub fn items_total(&self) -> Money {
        let purchases: Money = self.purchases.iter().map(|p| p.amount).sum();
        let installments: Money = self.installments.iter().map(|i| i.amount).sum();
        purchases + installments
    }
}

/// Build the sorted invoice list for one card.
///
/// Purchases for other cards and paid installments are ignored.
pub fn aggregate_card<'a>(
    card: &Card,
    purchases: impl IntoIterator<Item = &'a Purchase>,
    installments: impl IntoIterator<Item = &'a Installment>,
    paid_invoices: &PaidInvoiceRegister,
) -> FaturaResult<Vec<InvoiceBucket>> {
    let resolver = PeriodResolver::new(card, paid_invoices);
    let mut buckets: BTreeMap<InvoicePeriod, InvoiceBucket> = BTreeMap::new();

    for purchase in purchases {
        if purchase.card_id != Some(card.id) {
            continue;
        }
        let period = resolver.for_purchase(purchase.date)?;
        let bucket = bucket_for(&mut buckets, card, period, paid_invoices)?;
        bucket.total += purchase.amount;
        bucket.purchases.push(purchase.clone());
    }

    for installment in installments {
        if installment.card_id != card.id || installment.paid {
            continue;
        }
        let period = resolver.for_installment(installment.due_date);
        let bucket = bucket_for(&mut buckets, card, period, paid_invoices)?;
        bucket.total += installment.amount;
        bucket.installments.push(installment.clone());
    }

    let mut list: Vec<InvoiceBucket> = buckets.into_values().collect();
    for bucket in &mut list {
        bucket.purchases.sort_by(|a, b| b.date.cmp(&a.date));
        bucket.installments.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        debug_assert_eq!(bucket.total, bucket.items_total());
    }
    sort_buckets(&mut list);

    Ok(list)
}

/// Unpaid before paid, each group by due date ascending
pub fn sort_buckets(buckets: &mut [InvoiceBucket]) {
    buckets.sort_by(|a, b| {
        a.paid
            .cmp(&b.paid)
            .then(a.due_date.cmp(&b.due_date))
            .then(a.period.cmp(&b.period))
    });
}

fn bucket_for<'m>(
    buckets: &'m mut BTreeMap<InvoicePeriod, InvoiceBucket>,
    card: &Card,
    period: InvoicePeriod,
    paid_invoices: &PaidInvoiceRegister,
) -> FaturaResult<&'m mut InvoiceBucket> {
    match buckets.entry(period) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => Ok(entry.insert(InvoiceBucket::open(card, period, paid_invoices)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CardId;
    use chrono::Datelike;

    const NO_INSTALLMENTS: &[Installment] = &[];

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(y: i32, m: u32) -> InvoicePeriod {
        InvoicePeriod::new(y, m).unwrap()
    }

    fn reais(units: i64) -> Money {
        Money::from_units_cents(units, 0)
    }

    fn sample_card() -> Card {
        Card::new("Nubank", reais(5000), 10, 20)
    }

    #[test]
    fn test_scenario_two_purchases_around_closing_day() {
        let card = sample_card();
        let purchases = vec![
            Purchase::on_card(card.id, date(2025, 6, 9), reais(200), "Mercado"),
            Purchase::on_card(card.id, date(2025, 6, 10), reais(300), "Posto"),
        ];

        let buckets =
            aggregate_card(&card, &purchases, NO_INSTALLMENTS, &PaidInvoiceRegister::new()).unwrap();

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].period, period(2025, 6));
        assert_eq!(buckets[0].total, reais(200));
        assert_eq!(buckets[0].closing_date, date(2025, 6, 10));
        assert_eq!(buckets[0].due_date, date(2025, 7, 20));
        assert_eq!(buckets[1].period, period(2025, 7));
        assert_eq!(buckets[1].total, reais(300));
        assert_eq!(buckets[1].closing_date, date(2025, 7, 10));
        assert_eq!(buckets[1].due_date, date(2025, 8, 20));
    }

    #[test]
    fn test_items_sorted_within_bucket() {
        let card = sample_card();
        let purchases = vec![
            Purchase::on_card(card.id, date(2025, 6, 1), reais(10), "a"),
            Purchase::on_card(card.id, date(2025, 6, 7), reais(20), "b"),
            Purchase::on_card(card.id, date(2025, 6, 3), reais(30), "c"),
        ];
        let installments = vec![
            Installment::new(card.id, None, reais(40), 2, 3, date(2025, 6, 8)),
            Installment::new(card.id, None, reais(50), 1, 3, date(2025, 6, 2)),
        ];

        let buckets =
            aggregate_card(&card, &purchases, &installments, &PaidInvoiceRegister::new()).unwrap();

        assert_eq!(buckets.len(), 1);
        let dates: Vec<_> = buckets[0].purchases.iter().map(|p| p.date.day0()).collect();
        assert_eq!(dates, vec![6, 2, 0]);
        let due: Vec<_> = buckets[0].installments.iter().map(|i| i.due_date).collect();
        assert_eq!(due, vec![date(2025, 6, 2), date(2025, 6, 8)]);
        assert_eq!(buckets[0].total, buckets[0].items_total());
        assert_eq!(buckets[0].total, reais(150));
    }

    #[test]
    fn test_paid_installments_and_foreign_items_are_skipped() {
        let card = sample_card();
        let other = CardId::new();
        let mut paid_installment = Installment::new(card.id, None, reais(99), 1, 2, date(2025, 6, 2));
        paid_installment.mark_paid(date(2025, 6, 1));
        let installments = vec![
            paid_installment,
            Installment::new(other, None, reais(70), 1, 1, date(2025, 6, 2)),
        ];
        let purchases = vec![
            Purchase::new(None, date(2025, 6, 2), reais(15)),
            Purchase::on_card(other, date(2025, 6, 2), reais(25), "other card"),
        ];

        let buckets =
            aggregate_card(&card, &purchases, &installments, &PaidInvoiceRegister::new()).unwrap();
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_paid_buckets_sort_last() {
        let card = sample_card();
        let purchases = vec![
            Purchase::on_card(card.id, date(2025, 1, 2), reais(10), "jan"),
            Purchase::on_card(card.id, date(2025, 2, 2), reais(20), "feb"),
            Purchase::on_card(card.id, date(2025, 3, 2), reais(30), "mar"),
        ];
        let mut paid = PaidInvoiceRegister::new();
        paid.mark_paid(card.id, period(2025, 1), reais(10), date(2025, 1, 1));

        let buckets = aggregate_card(&card, &purchases, NO_INSTALLMENTS, &paid).unwrap();
        let order: Vec<_> = buckets.iter().map(|b| (b.period, b.paid)).collect();
        assert_eq!(
            order,
            vec![
                (period(2025, 2), false),
                (period(2025, 3), false),
                (period(2025, 1), true),
            ]
        );
        assert_eq!(buckets[2].paid_date, Some(date(2025, 1, 1)));
    }

    #[test]
    fn test_sort_buckets_two_keys() {
        let card = sample_card();
        let paid = PaidInvoiceRegister::new();
        let make = |p: InvoicePeriod, is_paid: bool, due: NaiveDate| {
            let mut bucket = InvoiceBucket::open(&card, p, &paid).unwrap();
            bucket.paid = is_paid;
            bucket.due_date = due;
            bucket
        };
        let mut buckets = vec![
            make(period(2024, 12), true, date(2025, 1, 10)),
            make(period(2025, 2), false, date(2025, 3, 5)),
            make(period(2025, 1), false, date(2025, 2, 5)),
        ];

        sort_buckets(&mut buckets);
        let due: Vec<_> = buckets.iter().map(|b| (b.due_date, b.paid)).collect();
        assert_eq!(
            due,
            vec![
                (date(2025, 2, 5), false),
                (date(2025, 3, 5), false),
                (date(2025, 1, 10), true),
            ]
        );
    }

    #[test]
    fn test_invalid_billing_day_is_reported() {
        let mut card = sample_card();
        card.due_day = 0;
        let purchases = vec![Purchase::on_card(card.id, date(2025, 6, 1), reais(1), "x")];

        let result = aggregate_card(&card, &purchases, NO_INSTALLMENTS, &PaidInvoiceRegister::new());
        assert!(matches!(
            result,
            Err(crate::error::FaturaError::InvalidDate { .. })
        ));
    }
}
