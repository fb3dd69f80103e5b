//! Invoice period resolution
//!
//! Decides which monthly invoice a charge belongs to. The default rule is
//! purely numeric: a charge made on or after the card's closing day goes to
//! the next month's invoice. A manually recorded early closing (the most
//! recent paid invoice) opens a fresh period that runs until the next regular
//! closing date.

use chrono::{Datelike, NaiveDate};

use super::calendar::billing_date;
use super::register::PaidInvoiceRegister;
use crate::error::FaturaResult;
use crate::models::{Card, InvoicePeriod};

/// Default rule: day-of-month compared against the closing day
pub fn default_period(date: NaiveDate, closing_day: u32) -> InvoicePeriod {
    let period = InvoicePeriod::of_date(date);
    if date.day() >= closing_day {
        period.next()
    } else {
        period
    }
}

/// Resolves invoice periods for one card
#[derive(Debug, Clone, Copy)]
pub struct PeriodResolver<'a> {
    card: &'a Card,
    last_early_closing: Option<NaiveDate>,
}

impl<'a> PeriodResolver<'a> {
    pub fn new(card: &'a Card, paid_invoices: &PaidInvoiceRegister) -> Self {
        Self {
            card,
            last_early_closing: paid_invoices
                .latest_for_card(card.id)
                .map(|record| record.paid_date),
        }
    }

    /// Resolver that ignores paid invoice history
    pub fn without_history(card: &'a Card) -> Self {
        Self {
            card,
            last_early_closing: None,
        }
    }

    /// Period for a purchase made on `date`
    pub fn for_purchase(&self, date: NaiveDate) -> FaturaResult<InvoicePeriod> {
        if let Some(closed_on) = self.last_early_closing {
            if date > closed_on {
                let candidate = InvoicePeriod::of_date(closed_on).next();
                let candidate_closing = billing_date(candidate, self.card.closing_day)?;
                if date < candidate_closing {
                    return Ok(candidate);
                }
            }
        }

        Ok(default_period(date, self.card.closing_day))
    }

    /// Period for an installment due on `due_date`.
    ///
    /// Installments carry an explicit due date, so early closings never
    /// move them.
    pub fn for_installment(&self, due_date: NaiveDate) -> InvoicePeriod {
        default_period(due_date, self.card.closing_day)
    }
}
