//! Purchase model
//!
//! A purchase is a single charge. Only purchases with a `card_id` take part in
//! invoice allocation; the rest are plain expenses.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CardId, PurchaseId};
use super::money::Money;

/// A purchase, optionally charged to a credit card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,

    #[serde(rename = "cartao_id")]
    pub card_id: Option<CardId>,

    #[serde(rename = "descricao", default)]
    pub description: String,

    #[serde(rename = "valor")]
    pub amount: Money,

    #[serde(rename = "data")]
    pub date: NaiveDate,

    #[serde(rename = "categoria", default)]
    pub category: String,

    /// Whether the value was split into installments
    #[serde(rename = "parcelada", default)]
    pub installment_plan: bool,

    #[serde(rename = "total_parcelas", default = "default_total_installments")]
    pub total_installments: u32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_total_installments() -> u32 {
    1
}

impl Purchase {
    /// Create a single-payment purchase
    pub fn new(card_id: Option<CardId>, date: NaiveDate, amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: PurchaseId::new(),
            card_id,
            description: String::new(),
            amount,
            date,
            category: String::new(),
            installment_plan: false,
            total_installments: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a card purchase with a description
    pub fn on_card(
        card_id: CardId,
        date: NaiveDate,
        amount: Money,
        description: impl Into<String>,
    ) -> Self {
        let mut purchase = Self::new(Some(card_id), date, amount);
        purchase.description = description.into();
        purchase
    }

    /// Check if this purchase is charged to a card
    pub fn is_card_purchase(&self) -> bool {
        self.card_id.is_some()
    }

    /// Validate the purchase
    pub fn validate(&self) -> Result<(), String> {
        if !self.amount.is_positive() {
            return Err(format!("Purchase value must be positive, got {}", self.amount));
        }
        if self.total_installments == 0 {
            return Err("Number of installments must be at least 1".into());
        }
        if self.installment_plan && self.card_id.is_none() {
            return Err("Installment plans require a card".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate() {
        let card = CardId::new();
        let mut purchase = Purchase::on_card(card, date(2025, 6, 9), Money::from_cents(20000), "Mercado");
        assert!(purchase.validate().is_ok());

        purchase.amount = Money::zero();
        assert!(purchase.validate().is_err());

        let mut plan = Purchase::new(None, date(2025, 6, 9), Money::from_cents(100));
        plan.installment_plan = true;
        plan.total_installments = 3;
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_deserialize_persisted_shape() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "cartao_id": null,
            "descricao": "Farmácia",
            "valor": 4590,
            "data": "2025-06-10",
            "categoria": "Saúde",
            "created_at": "2025-06-10T12:00:00Z",
            "updated_at": "2025-06-10T12:00:00Z"
        }"#;
        let purchase: Purchase = serde_json::from_str(json).unwrap();
        assert!(!purchase.is_card_purchase());
        assert_eq!(purchase.total_installments, 1);
        assert_eq!(purchase.date, date(2025, 6, 10));
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "cartao_id": null,
            "valor": 100,
            "data": "2025-02-30",
            "created_at": "2025-06-10T12:00:00Z",
            "updated_at": "2025-06-10T12:00:00Z"
        }"#;
        assert!(serde_json::from_str::<Purchase>(json).is_err());
    }
}
