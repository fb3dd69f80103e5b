//! Available credit command

use crate::config::Settings;
use crate::display::{format_credit_details, format_credit_summaries};
use crate::error::FaturaResult;
use crate::services::{CardService, InvoiceService};
use crate::storage::Storage;

use super::today;

/// Print available credit for one card, or a table for all cards
pub fn handle_credit_command(storage: &Storage, settings: &Settings, card: Option<String>) -> FaturaResult<()> {
    let cards = CardService::new(storage);
    let service = InvoiceService::new(storage);

    match card {
        Some(reference) => {
            let card = cards.resolve(&reference)?;
            let summary = service.credit(card.id, today())?;
            print!("{}", format_credit_details(&card, &summary, settings));
        }
        None => {
            let summaries = service.credit_all(today())?;
            let rows: Vec<_> = cards
                .list()?
                .into_iter()
                .filter_map(|card| {
                    let summary = summaries.iter().find(|s| s.card_id == card.id).copied()?;
                    Some((card, summary))
                })
                .collect();
            print!("{}", format_credit_summaries(&rows, settings));
        }
    }

    Ok(())
}
