//! Installment CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_installment_list;
use crate::error::FaturaResult;
use crate::services::{CardService, InstallmentService};
use crate::storage::Storage;

use super::parse_date;

#[derive(Subcommand)]
pub enum InstallmentCommands {
    /// List a card's installments
    List {
        /// Card name or ID
        card: String,
        /// Include paid installments
        #[arg(short, long)]
        all: bool,
    },
    /// Mark an installment as paid
    Pay {
        /// Installment ID
        id: String,
        /// Payment date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Reopen a paid installment
    Unpay {
        /// Installment ID
        id: String,
    },
}

pub fn handle_installment_command(
    storage: &Storage,
    settings: &Settings,
    cmd: InstallmentCommands,
) -> FaturaResult<()> {
    let service = InstallmentService::new(storage);

    match cmd {
        InstallmentCommands::List { card, all } => {
            let card = CardService::new(storage).resolve(&card)?;
            let installments = service.list(card.id, all)?;
            print!("{}", format_installment_list(&installments, settings));
        }

        InstallmentCommands::Pay { id, date } => {
            let date = date.as_deref().map(parse_date).transpose()?;
            let installment = service.pay(&id, date)?;
            println!(
                "Paid installment {} of {}",
                installment.position_label(),
                settings.format_money(installment.amount)
            );
        }

        InstallmentCommands::Unpay { id } => {
            let installment = service.unpay(&id)?;
            println!("Reopened installment {}", installment.position_label());
        }
    }

    Ok(())
}
