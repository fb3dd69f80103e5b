//! Purchase CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_purchase_list;
use crate::error::{FaturaError, FaturaResult};
use crate::services::{CardService, NewPurchase, PurchaseService};
use crate::storage::Storage;

use super::{parse_date, parse_money, parse_period, today};

#[derive(Subcommand)]
pub enum PurchaseCommands {
    /// Record a purchase on a card
    Add {
        /// Card name or ID
        card: String,
        /// Purchase value (e.g. "150.90")
        amount: String,
        /// Purchase date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// Category label
        #[arg(short, long)]
        category: Option<String>,
        /// Split the value into this many monthly installments
        #[arg(short, long, default_value = "1")]
        installments: u32,
        /// Mark as a recurring charge billed for this month (YYYY-MM)
        #[arg(short, long)]
        recurring: Option<String>,
    },
    /// List purchases
    List {
        /// Only purchases on this card
        #[arg(short, long)]
        card: Option<String>,
    },
    /// Delete a purchase and its installments
    Delete {
        /// Purchase ID
        id: String,
    },
}

pub fn handle_purchase_command(
    storage: &Storage,
    settings: &Settings,
    cmd: PurchaseCommands,
) -> FaturaResult<()> {
    let service = PurchaseService::new(storage);
    let cards = CardService::new(storage);

    match cmd {
        PurchaseCommands::Add {
            card,
            amount,
            date,
            description,
            category,
            installments,
            recurring,
        } => {
            let card = cards.resolve(&card)?;
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => today(),
            };

            let mut input = NewPurchase::new(Some(card.id), parse_money(&amount)?, date);
            input.description = description.unwrap_or_default();
            input.category = category.unwrap_or_default();
            input.installments = installments;
            input.recurring = recurring.as_deref().map(parse_period).transpose()?;

            let recorded = service.record(input)?;
            let purchase = &recorded.purchase;

            println!(
                "Recorded {} on {} ({})",
                settings.format_money(purchase.amount),
                card.name,
                settings.format_date(purchase.date)
            );
            for installment in &recorded.installments {
                println!(
                    "  {:>5}  {}  due {}",
                    installment.position_label(),
                    settings.format_money(installment.amount),
                    settings.format_date(installment.due_date)
                );
            }
            if let Some(marker) = recorded.recurring {
                println!("  Recurring, billed for {}-{:02}", marker.year, marker.month);
            }
            println!("  ID: {}", purchase.id);
        }

        PurchaseCommands::List { card } => {
            let card_id = match card {
                Some(reference) => Some(cards.resolve(&reference)?.id),
                None => None,
            };
            let purchases = service.list(card_id)?;
            let recurring = storage.recurring.get_all()?;
            println!(
                "{}",
                format_purchase_list(&purchases, &cards.list()?, &recurring, settings)
            );
        }

        PurchaseCommands::Delete { id } => {
            let purchase = service
                .find(&id)?
                .ok_or_else(|| FaturaError::purchase_not_found(&id))?;
            let removed = service.delete(purchase.id)?;
            println!(
                "Deleted purchase {} ({})",
                removed.purchase.id,
                settings.format_money(removed.purchase.amount)
            );
            if !removed.installments.is_empty() {
                println!("  Removed {} installment(s)", removed.installments.len());
            }
        }
    }

    Ok(())
}
