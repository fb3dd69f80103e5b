//! Recurring purchase marker
//!
//! Tags a purchase as a monthly recurring charge nominally billed for a given
//! month, independent of the purchase date.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ids::PurchaseId;
use super::period::InvoicePeriod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringMarker {
    #[serde(rename = "compra_id")]
    pub purchase_id: PurchaseId,

    /// Nominal billing month, 1-12
    #[serde(rename = "mes")]
    pub month: u32,

    #[serde(rename = "ano")]
    pub year: i32,
}

impl RecurringMarker {
    pub fn new(purchase_id: PurchaseId, period: InvoicePeriod) -> Self {
        Self {
            purchase_id,
            month: period.month,
            year: period.year,
        }
    }

    /// Whether the nominal billing month has arrived as of `today`
    pub fn is_due_by(&self, today: NaiveDate) -> bool {
        (self.year, self.month) <= (today.year(), today.month())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_is_due_by() {
        let marker = RecurringMarker::new(PurchaseId::new(), InvoicePeriod::new(2025, 12).unwrap());
        assert!(!marker.is_due_by(date(2025, 10, 15)));
        assert!(!marker.is_due_by(date(2025, 11, 30)));
        assert!(marker.is_due_by(date(2025, 12, 1)));
        assert!(marker.is_due_by(date(2026, 1, 1)));
    }
}
