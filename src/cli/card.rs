//! Card CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_card_details, format_card_list};
use crate::error::FaturaResult;
use crate::services::{CardService, CardUpdate, InvoiceService};
use crate::storage::Storage;

use super::{parse_money, today};

#[derive(Subcommand)]
pub enum CardCommands {
    /// Add a new card
    Add {
        /// Card name
        name: String,
        /// Credit limit (e.g. "5000" or "5000,00")
        #[arg(short, long, default_value = "0")]
        limit: String,
        /// Day of month the invoice closes (1-31)
        #[arg(short, long)]
        closing: Option<u32>,
        /// Day of month the invoice is due (1-31)
        #[arg(short, long)]
        due: Option<u32>,
        /// Card brand (Visa, Mastercard, ...)
        #[arg(short, long)]
        brand: Option<String>,
    },
    /// List all cards
    List,
    /// Show card details
    Show {
        /// Card name or ID
        card: String,
    },
    /// Edit a card
    Edit {
        /// Card name or ID
        card: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        limit: Option<String>,
        #[arg(short, long)]
        closing: Option<u32>,
        #[arg(short, long)]
        due: Option<u32>,
        #[arg(short, long)]
        brand: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a card
    Delete {
        /// Card name or ID
        card: String,
        /// Also delete the card's purchases, installments and payments
        #[arg(long)]
        cascade: bool,
    },
}

pub fn handle_card_command(storage: &Storage, settings: &Settings, cmd: CardCommands) -> FaturaResult<()> {
    let service = CardService::new(storage);

    match cmd {
        CardCommands::Add {
            name,
            limit,
            closing,
            due,
            brand,
        } => {
            let limit = parse_money(&limit)?;
            let card = service.create(
                &name,
                limit,
                closing.unwrap_or(settings.default_closing_day),
                due.unwrap_or(settings.default_due_day),
                brand.as_deref(),
            )?;

            println!("Created card: {}", card.name);
            println!("  Limit:       {}", settings.format_money(card.limit));
            println!("  Closing day: {}", card.closing_day);
            println!("  Due day:     {}", card.due_day);
            println!("  ID: {}", card.id);
        }

        CardCommands::List => {
            let credit = InvoiceService::new(storage).credit_all(today())?;
            let rows: Vec<_> = service
                .list()?
                .into_iter()
                .map(|card| {
                    let summary = credit.iter().find(|s| s.card_id == card.id).copied();
                    (card, summary)
                })
                .collect();
            println!("{}", format_card_list(&rows, settings));
        }

        CardCommands::Show { card } => {
            let card = service.resolve(&card)?;
            let credit = InvoiceService::new(storage).credit(card.id, today())?;
            print!("{}", format_card_details(&card, &credit, settings));
        }

        CardCommands::Edit {
            card,
            name,
            limit,
            closing,
            due,
            brand,
            color,
        } => {
            let card = service.resolve(&card)?;
            let changes = CardUpdate {
                name,
                brand,
                limit: limit.as_deref().map(parse_money).transpose()?,
                closing_day: closing,
                due_day: due,
                color,
            };

            if changes.is_empty() {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update(card.id, changes)?;
            println!("Updated card: {}", updated.name);
        }

        CardCommands::Delete { card, cascade } => {
            let card = service.resolve(&card)?;
            let (card, removed) = service.delete(card.id, cascade)?;
            println!("Deleted card: {}", card.name);
            if cascade {
                println!(
                    "  Removed {} purchase(s), {} installment(s), {} paid invoice(s)",
                    removed.purchases, removed.installments, removed.paid_invoices
                );
            }
        }
    }

    Ok(())
}
