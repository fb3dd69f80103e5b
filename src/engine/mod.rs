//! Invoice engine
//!
//! Pure, synchronous computations over an already-loaded [`Snapshot`] of the
//! stored records. Nothing here mutates its inputs or keeps state between
//! calls: the same snapshot always yields the same buckets and the same
//! credit figures.
//!
//! - `calendar`: month-length-safe date arithmetic
//! - `resolver`: which invoice period a charge belongs to
//! - `aggregator`: grouping charges into sorted invoice buckets
//! - `credit`: available credit per card
//! - `register`: paid invoice records keyed by card and period

pub mod aggregator;
pub mod calendar;
pub mod credit;
pub mod register;
pub mod resolver;

pub use aggregator::{aggregate_card, sort_buckets, InvoiceBucket};
pub use credit::{available_credit, CreditSummary};
pub use register::PaidInvoiceRegister;
pub use resolver::PeriodResolver;

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;

use crate::error::FaturaResult;
use crate::models::{Card, CardId, Installment, Purchase, PurchaseId, RecurringMarker};

/// Borrowed view of every record the engine reads
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub cards: &'a [Card],
    pub purchases: &'a [Purchase],
    pub installments: &'a [Installment],
    pub paid_invoices: &'a PaidInvoiceRegister,
    pub recurring: &'a HashMap<PurchaseId, RecurringMarker>,
}

impl<'a> Snapshot<'a> {
    /// Purchases whose value is carried by installment records.
    ///
    /// These are billed through their installments and are not counted a
    /// second time on the purchase side.
    pub fn purchases_with_installments(&self) -> HashSet<PurchaseId> {
        self.installments
            .iter()
            .filter_map(|i| i.purchase_id)
            .collect()
    }

    /// Purchases billed directly on `card_id`
    pub fn card_purchases<'s>(
        &'s self,
        card_id: CardId,
        carried: &'s HashSet<PurchaseId>,
    ) -> impl Iterator<Item = &'a Purchase> + 's {
        self.purchases
            .iter()
            .filter(move |p| p.card_id == Some(card_id) && !carried.contains(&p.id))
    }

    /// Installments for `card_id`, paid or not
    pub fn card_installments(&self, card_id: CardId) -> impl Iterator<Item = &'a Installment> {
        self.installments
            .iter()
            .filter(move |i| i.card_id == card_id)
    }

    pub fn card(&self, card_id: CardId) -> Option<&'a Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }
}

/// Invoice buckets for a single card
pub fn compute_card_invoices(snapshot: &Snapshot<'_>, card: &Card) -> FaturaResult<Vec<InvoiceBucket>> {
    let carried = snapshot.purchases_with_installments();
    aggregate_card(
        card,
        snapshot.card_purchases(card.id, &carried),
        snapshot.card_installments(card.id),
        snapshot.paid_invoices,
    )
}

/// Invoice buckets for every card in the snapshot.
///
/// Purchases and installments pointing at a card that is not in the
/// snapshot are left out.
pub fn compute_invoices(snapshot: &Snapshot<'_>) -> FaturaResult<BTreeMap<CardId, Vec<InvoiceBucket>>> {
    let known: HashSet<CardId> = snapshot.cards.iter().map(|c| c.id).collect();
    let orphaned_purchases = snapshot
        .purchases
        .iter()
        .filter(|p| p.card_id.is_some_and(|id| !known.contains(&id)))
        .count();
    let orphaned_installments = snapshot
        .installments
        .iter()
        .filter(|i| !known.contains(&i.card_id))
        .count();
    if orphaned_purchases + orphaned_installments > 0 {
        tracing::debug!(
            orphaned_purchases,
            orphaned_installments,
            "Skipping charges for unknown cards"
        );
    }

    let carried = snapshot.purchases_with_installments();
    let mut invoices = BTreeMap::new();
    for card in snapshot.cards {
        let buckets = aggregate_card(
            card,
            snapshot.card_purchases(card.id, &carried),
            snapshot.card_installments(card.id),
            snapshot.paid_invoices,
        )?;
        tracing::trace!(card = %card.id, buckets = buckets.len(), "Aggregated invoices");
        invoices.insert(card.id, buckets);
    }

    Ok(invoices)
}

/// Credit summary for a single card
pub fn compute_card_credit(snapshot: &Snapshot<'_>, card: &Card, today: NaiveDate) -> CreditSummary {
    let carried = snapshot.purchases_with_installments();
    available_credit(
        card,
        snapshot.card_purchases(card.id, &carried),
        snapshot.card_installments(card.id),
        snapshot.recurring,
        today,
    )
}

/// Credit summaries for every card, in snapshot order
pub fn compute_credit_summaries(snapshot: &Snapshot<'_>, today: NaiveDate) -> Vec<CreditSummary> {
    snapshot
        .cards
        .iter()
        .map(|card| compute_card_credit(snapshot, card, today))
        .collect()
}
