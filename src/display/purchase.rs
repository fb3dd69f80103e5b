//! Purchase and installment display formatting

use std::collections::HashMap;

use crate::config::Settings;
use crate::models::{Card, CardId, Installment, Purchase, PurchaseId, RecurringMarker};

/// Format purchases, newest first as given
pub fn format_purchase_list(
    purchases: &[Purchase],
    cards: &[Card],
    recurring: &HashMap<PurchaseId, RecurringMarker>,
    settings: &Settings,
) -> String {
    if purchases.is_empty() {
        return "No purchases found.".to_string();
    }

    let card_names: HashMap<CardId, &str> = cards.iter().map(|c| (c.id, c.name.as_str())).collect();

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:<12}  {:>14}  {:<15}  {}\n",
        "Date", "Card", "Value", "Plan", "Description"
    ));
    output.push_str(&format!(
        "{:-<10}  {:-<12}  {:->14}  {:-<15}  {:-<20}\n",
        "", "", "", "", ""
    ));

    for purchase in purchases {
        let card = purchase
            .card_id
            .and_then(|id| card_names.get(&id).copied())
            .unwrap_or("-");

        let plan = if purchase.installment_plan {
            format!("{}x", purchase.total_installments)
        } else if let Some(marker) = recurring.get(&purchase.id) {
            format!("monthly {}-{:02}", marker.year, marker.month)
        } else {
            String::new()
        };

        output.push_str(&format!(
            "{:<10}  {:<12}  {:>14}  {:<15}  {}\n",
            settings.format_date(purchase.date),
            card,
            settings.format_money(purchase.amount),
            plan,
            purchase.description,
        ));
        output.push_str(&format!("{:<10}  id {}\n", "", purchase.id));
    }

    output
}

/// Format a card's installments
pub fn format_installment_list(installments: &[Installment], settings: &Settings) -> String {
    if installments.is_empty() {
        return "No installments found.".to_string();
    }

    let mut output = String::new();
    for installment in installments {
        let status = match installment.paid_date {
            Some(date) if installment.paid => format!("paid {}", settings.format_date(date)),
            _ if installment.paid => "paid".to_string(),
            _ => "open".to_string(),
        };
        output.push_str(&format!(
            "  {}  {:>5}  {:>14}  {:<16}  {}  {}\n",
            settings.format_date(installment.due_date),
            installment.position_label(),
            settings.format_money(installment.amount),
            status,
            installment.id,
            installment.description,
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InvoicePeriod, Money};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_purchase_list() {
        let card = Card::new("Nubank", Money::from_cents(100_000), 10, 20);
        let mut streaming = Purchase::on_card(card.id, date(2025, 6, 1), Money::from_cents(3990), "Streaming");
        let cash = Purchase::new(None, date(2025, 5, 30), Money::from_cents(500));
        streaming.category = "Lazer".into();

        let mut recurring = HashMap::new();
        recurring.insert(
            streaming.id,
            RecurringMarker::new(streaming.id, InvoicePeriod::new(2025, 7).unwrap()),
        );

        let output = format_purchase_list(
            &[streaming, cash],
            &[card],
            &recurring,
            &Settings::default(),
        );

        assert!(output.contains("Nubank"));
        assert!(output.contains("R$39.90"));
        assert!(output.contains("monthly 2025-07"));
    }

    #[test]
    fn test_format_installment_list() {
        let mut installment = Installment::new(
            crate::models::CardId::new(),
            None,
            Money::from_cents(3334),
            1,
            3,
            date(2025, 7, 20),
        );
        installment.mark_paid(date(2025, 7, 18));

        let output = format_installment_list(&[installment], &Settings::default());
        assert!(output.contains("1/3"));
        assert!(output.contains("paid 2025-07-18"));
        assert!(output.contains("R$33.34"));
    }
}
