//! Available credit
//!
//! `available = limit - (open installments + counted purchases)`. Recurring
//! charges tagged for a future month are left out until that month arrives.
//! The result may be negative when the limit is already exceeded.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Card, CardId, Installment, Money, Purchase, PurchaseId, RecurringMarker};

/// Credit usage for one card as of a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreditSummary {
    pub card_id: CardId,
    pub limit: Money,
    pub unpaid_installments: Money,
    pub counted_purchases: Money,
    /// Recurring charges billed for a future month, not yet counted
    pub deferred_recurring: Money,
    pub used: Money,
    pub available: Money,
}

impl CreditSummary {
    /// Share of the limit in use, in whole percent. `None` for a zero limit.
    pub fn usage_percent(&self) -> Option<i64> {
        if self.limit.is_zero() {
            return None;
        }
        Some(self.used.cents() * 100 / self.limit.cents())
    }

    pub fn is_over_limit(&self) -> bool {
        self.available.is_negative()
    }
}

/// Whether a purchase counts against the limit on `today`
pub fn counts_toward_limit(
    purchase: &Purchase,
    recurring: &HashMap<PurchaseId, RecurringMarker>,
    today: NaiveDate,
) -> bool {
    recurring
        .get(&purchase.id)
        .map_or(true, |marker| marker.is_due_by(today))
}

/// Compute the credit summary for `card`.
///
/// Items belonging to other cards and paid installments are ignored.
pub fn available_credit<'a>(
    card: &Card,
    purchases: impl IntoIterator<Item = &'a Purchase>,
    installments: impl IntoIterator<Item = &'a Installment>,
    recurring: &HashMap<PurchaseId, RecurringMarker>,
    today: NaiveDate,
) -> CreditSummary {
    let unpaid_installments: Money = installments
        .into_iter()
        .filter(|i| i.card_id == card.id && !i.paid)
        .map(|i| i.amount)
        .sum();

    let mut counted_purchases = Money::zero();
    let mut deferred_recurring = Money::zero();
    for purchase in purchases
        .into_iter()
        .filter(|p| p.card_id == Some(card.id))
    {
        if counts_toward_limit(purchase, recurring, today) {
            counted_purchases += purchase.amount;
        } else {
            deferred_recurring += purchase.amount;
        }
    }

    let used = unpaid_installments + counted_purchases;
    CreditSummary {
        card_id: card.id,
        limit: card.limit,
        unpaid_installments,
        counted_purchases,
        deferred_recurring,
        used,
        available: card.limit - used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvoicePeriod;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reais(units: i64) -> Money {
        Money::from_units_cents(units, 0)
    }

    #[test]
    fn test_recurring_purchase_excluded_until_its_month() {
        let card = Card::new("Itaú", reais(1000), 10, 20);
        let purchase = Purchase::on_card(card.id, date(2025, 10, 1), reais(100), "Streaming");
        let mut recurring = HashMap::new();
        recurring.insert(
            purchase.id,
            RecurringMarker::new(purchase.id, InvoicePeriod::new(2025, 12).unwrap()),
        );
        let purchases = vec![purchase];

        let october = available_credit(&card, &purchases, &[] as &[Installment], &recurring, date(2025, 10, 20));
        assert_eq!(october.available, reais(1000));
        assert_eq!(october.deferred_recurring, reais(100));

        let december = available_credit(&card, &purchases, &[] as &[Installment], &recurring, date(2025, 12, 1));
        assert_eq!(december.available, reais(900));

        let next_year = available_credit(&card, &purchases, &[] as &[Installment], &recurring, date(2026, 2, 1));
        assert_eq!(next_year.available, reais(900));
        assert_eq!(next_year.deferred_recurring, Money::zero());
    }

    #[test]
    fn test_unpaid_installments_always_count() {
        let card = Card::new("Inter", reais(1000), 10, 20);
        let mut paid = Installment::new(card.id, None, reais(50), 1, 3, date(2025, 1, 20));
        paid.mark_paid(date(2025, 1, 19));
        let installments = vec![
            paid,
            Installment::new(card.id, None, reais(50), 2, 3, date(2025, 2, 20)),
            Installment::new(card.id, None, reais(50), 3, 3, date(2030, 3, 20)),
            Installment::new(CardId::new(), None, reais(500), 1, 1, date(2025, 2, 20)),
        ];

        let summary = available_credit(&card, &[] as &[Purchase], &installments, &HashMap::new(), date(2025, 1, 25));
        assert_eq!(summary.unpaid_installments, reais(100));
        assert_eq!(summary.available, reais(900));
        assert_eq!(summary.usage_percent(), Some(10));
    }

    #[test]
    fn test_negative_available_is_valid() {
        let card = Card::new("C6", reais(100), 10, 20);
        let purchases = vec![Purchase::on_card(card.id, date(2025, 6, 1), reais(150), "TV")];

        let summary = available_credit(&card, &purchases, &[] as &[Installment], &HashMap::new(), date(2025, 6, 2));
        assert_eq!(summary.available, reais(-50));
        assert!(summary.is_over_limit());
    }
}
