//! Available credit display formatting

use crate::config::Settings;
use crate::engine::CreditSummary;
use crate::models::{Card, Money};

/// One line per card plus a total when there is more than one card
pub fn format_credit_summaries(rows: &[(Card, CreditSummary)], settings: &Settings) -> String {
    if rows.is_empty() {
        return "No cards found.".to_string();
    }

    let name_width = rows
        .iter()
        .map(|(c, _)| c.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>14}  {:>14}  {:>14}  {:>6}\n",
        "Card", "Limit", "Used", "Available", "Use %"
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->14}  {:->14}  {:->14}  {:->6}\n",
        "", "", "", "", ""
    ));

    for (card, summary) in rows {
        let usage = summary
            .usage_percent()
            .map(|p| format!("{}%", p))
            .unwrap_or_else(|| "-".to_string());
        let flag = if summary.is_over_limit() { "  over limit" } else { "" };

        output.push_str(&format!(
            "{:<name_width$}  {:>14}  {:>14}  {:>14}  {:>6}{}\n",
            card.name,
            settings.format_money(summary.limit),
            settings.format_money(summary.used),
            settings.format_money(summary.available),
            usage,
            flag,
        ));
    }

    if rows.len() > 1 {
        let limit: Money = rows.iter().map(|(_, s)| s.limit).sum();
        let used: Money = rows.iter().map(|(_, s)| s.used).sum();
        let available: Money = rows.iter().map(|(_, s)| s.available).sum();
        output.push_str(&format!(
            "{:<name_width$}  {:>14}  {:>14}  {:>14}\n",
            "TOTAL",
            settings.format_money(limit),
            settings.format_money(used),
            settings.format_money(available),
        ));
    }

    output
}

/// Breakdown of a single card's credit usage
pub fn format_credit_details(card: &Card, summary: &CreditSummary, settings: &Settings) -> String {
    let mut output = String::new();
    output.push_str(&format!("Credit for {}\n", card.name));
    output.push_str(&format!("  Limit:                {}\n", settings.format_money(summary.limit)));
    output.push_str(&format!(
        "  Open installments:    {}\n",
        settings.format_money(summary.unpaid_installments)
    ));
    output.push_str(&format!(
        "  Purchases:            {}\n",
        settings.format_money(summary.counted_purchases)
    ));
    if !summary.deferred_recurring.is_zero() {
        output.push_str(&format!(
            "  Future recurring:     {} (not counted)\n",
            settings.format_money(summary.deferred_recurring)
        ));
    }
    output.push_str(&format!(
        "  Available:            {}\n",
        settings.format_money(summary.available)
    ));
    output
}
