//! Invoice CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_invoice_details, format_invoice_list};
use crate::error::FaturaResult;
use crate::services::{CardService, InvoiceService};
use crate::storage::Storage;

use super::{parse_date, parse_money, parse_period};

#[derive(Subcommand)]
pub enum InvoiceCommands {
    /// List a card's invoices, open ones first
    List {
        /// Card name or ID
        card: String,
    },
    /// Show the charges on one invoice
    Show {
        /// Card name or ID
        card: String,
        /// Invoice month (YYYY-MM)
        month: String,
    },
    /// Record an invoice as paid
    Pay {
        /// Card name or ID
        card: String,
        /// Invoice month (YYYY-MM)
        month: String,
        /// Amount paid (defaults to the invoice total)
        #[arg(short, long)]
        total: Option<String>,
        /// Payment date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Remove an invoice payment
    Unpay {
        /// Card name or ID
        card: String,
        /// Invoice month (YYYY-MM)
        month: String,
    },
}

pub fn handle_invoice_command(
    storage: &Storage,
    settings: &Settings,
    cmd: InvoiceCommands,
) -> FaturaResult<()> {
    let cards = CardService::new(storage);
    let service = InvoiceService::new(storage);

    match cmd {
        InvoiceCommands::List { card } => {
            let card = cards.resolve(&card)?;
            let buckets = service.list(card.id)?;
            print!("{}", format_invoice_list(&card.name, &buckets, settings));
        }

        InvoiceCommands::Show { card, month } => {
            let card = cards.resolve(&card)?;
            let period = parse_period(&month)?;
            match service.show(card.id, period)? {
                Some(bucket) => print!("{}", format_invoice_details(&card.name, &bucket, settings)),
                None => println!("No charges on the {} invoice of {}.", period, card.name),
            }
        }

        InvoiceCommands::Pay {
            card,
            month,
            total,
            date,
        } => {
            let card = cards.resolve(&card)?;
            let period = parse_period(&month)?;
            let total = total.as_deref().map(parse_money).transpose()?;
            let date = date.as_deref().map(parse_date).transpose()?;

            let record = service.mark_paid(card.id, period, total, date)?;
            println!(
                "Invoice {} of {} marked paid: {} on {}",
                period,
                card.name,
                settings.format_money(record.total_paid),
                settings.format_date(record.paid_date)
            );
        }

        InvoiceCommands::Unpay { card, month } => {
            let card = cards.resolve(&card)?;
            let period = parse_period(&month)?;
            service.unmark_paid(card.id, period)?;
            println!("Invoice {} of {} is open again", period, card.name);
        }
    }

    Ok(())
}
