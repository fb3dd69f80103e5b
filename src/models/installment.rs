//! Installment model
//!
//! One slice of a purchase paid over several months. The installment's due
//! date decides which invoice it lands on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CardId, InstallmentId, PurchaseId};
use super::money::Money;

/// A single installment of a card purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub id: InstallmentId,

    #[serde(rename = "compra_id")]
    pub purchase_id: Option<PurchaseId>,

    #[serde(rename = "cartao_id")]
    pub card_id: CardId,

    #[serde(rename = "descricao", default)]
    pub description: String,

    #[serde(rename = "valor")]
    pub amount: Money,

    /// 1-based position within the plan
    #[serde(rename = "numero_parcela")]
    pub number: u32,

    #[serde(rename = "total_parcelas")]
    pub total: u32,

    #[serde(rename = "data_vencimento")]
    pub due_date: NaiveDate,

    #[serde(rename = "paga", default)]
    pub paid: bool,

    #[serde(rename = "data_pagamento", default)]
    pub paid_date: Option<NaiveDate>,
}

impl Installment {
    pub fn new(
        card_id: CardId,
        purchase_id: Option<PurchaseId>,
        amount: Money,
        number: u32,
        total: u32,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: InstallmentId::new(),
            purchase_id,
            card_id,
            description: String::new(),
            amount,
            number,
            total,
            due_date,
            paid: false,
            paid_date: None,
        }
    }

    /// Mark this installment as paid on `date`
    pub fn mark_paid(&mut self, date: NaiveDate) {
        self.paid = true;
        self.paid_date = Some(date);
    }

    /// Reopen a paid installment
    pub fn mark_unpaid(&mut self) {
        self.paid = false;
        self.paid_date = None;
    }

    /// Label such as "2/10"
    pub fn position_label(&self) -> String {
        format!("{}/{}", self.number, self.total)
    }
}

impl fmt::Display for Installment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.description, self.position_label())
    }
}
