//! Paid invoice record
//!
//! A manual confirmation that a card's invoice for a given month was paid.
//! There is at most one record per card and reference month.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{CardId, PaidInvoiceId};
use super::money::Money;
use super::period::InvoicePeriod;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaidInvoiceRecord {
    pub id: PaidInvoiceId,

    #[serde(rename = "cartao_id")]
    pub card_id: CardId,

    /// Reference month, 1-12
    #[serde(rename = "mes_referencia")]
    pub month_reference: u32,

    #[serde(rename = "ano_referencia")]
    pub year_reference: i32,

    #[serde(rename = "data_pagamento")]
    pub paid_date: NaiveDate,

    #[serde(rename = "total_pago")]
    pub total_paid: Money,
}

impl PaidInvoiceRecord {
    pub fn new(
        card_id: CardId,
        period: InvoicePeriod,
        paid_date: NaiveDate,
        total_paid: Money,
    ) -> Self {
        Self {
            id: PaidInvoiceId::new(),
            card_id,
            month_reference: period.month,
            year_reference: period.year,
            paid_date,
            total_paid,
        }
    }

    /// The invoice period this record refers to.
    ///
    /// Returns `None` for a record whose month is outside 1-12.
    pub fn period(&self) -> Option<InvoicePeriod> {
        InvoicePeriod::new(self.year_reference, self.month_reference)
    }
}
