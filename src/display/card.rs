//! Card display formatting

use crate::config::Settings;
use crate::engine::CreditSummary;
use crate::models::Card;

/// Format cards as a table, with available credit when known
pub fn format_card_list(cards: &[(Card, Option<CreditSummary>)], settings: &Settings) -> String {
    if cards.is_empty() {
        return "No cards found. Add one with `fatura card add`.".to_string();
    }

    let name_width = cards
        .iter()
        .map(|(c, _)| c.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>7}  {:>5}  {:>14}  {:>14}  {}\n",
        "Name", "Closes", "Due", "Limit", "Available", "ID",
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->7}  {:->5}  {:->14}  {:->14}  {:-<13}\n",
        "", "", "", "", "", "",
    ));

    for (card, credit) in cards {
        let available = credit
            .as_ref()
            .map(|c| settings.format_money(c.available))
            .unwrap_or_default();
        output.push_str(&format!(
            "{:<name_width$}  {:>7}  {:>5}  {:>14}  {:>14}  {}\n",
            card.name,
            card.closing_day,
            card.due_day,
            settings.format_money(card.limit),
            available,
            card.id,
        ));
    }

    output
}

/// Format a single card's details
pub fn format_card_details(card: &Card, credit: &CreditSummary, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Card: {}\n", card.name));
    output.push_str(&format!("  ID:           {}\n", card.id));
    if !card.brand.is_empty() {
        output.push_str(&format!("  Brand:        {}\n", card.brand));
    }
    output.push_str(&format!("  Closing day:  {}\n", card.closing_day));
    output.push_str(&format!("  Due day:      {}\n", card.due_day));
    output.push('\n');
    output.push_str(&format!("  Limit:        {}\n", settings.format_money(card.limit)));
    output.push_str(&format!("  Used:         {}\n", settings.format_money(credit.used)));
    output.push_str(&format!(
        "  Available:    {}\n",
        settings.format_money(credit.available)
    ));

    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        card.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        card.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}
