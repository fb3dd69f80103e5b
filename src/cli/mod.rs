//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Handlers print to
//! stdout and return errors to `main`.

pub mod card;
pub mod credit;
pub mod installment;
pub mod invoice;
pub mod purchase;

pub use card::{handle_card_command, CardCommands};
pub use credit::handle_credit_command;
pub use installment::{handle_installment_command, InstallmentCommands};
pub use invoice::{handle_invoice_command, InvoiceCommands};
pub use purchase::{handle_purchase_command, PurchaseCommands};

use chrono::{Local, NaiveDate};

use crate::error::{FaturaError, FaturaResult};
use crate::models::{InvoicePeriod, Money};

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn parse_date(value: &str) -> FaturaResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        FaturaError::Validation(format!(
            "Invalid date '{}'. Use the YYYY-MM-DD format",
            value
        ))
    })
}

pub(crate) fn parse_money(value: &str) -> FaturaResult<Money> {
    Money::parse(value).map_err(|e| {
        FaturaError::Validation(format!(
            "Invalid amount '{}'. Use a format like '150.90' or '150,90'. Error: {}",
            value, e
        ))
    })
}

pub(crate) fn parse_period(value: &str) -> FaturaResult<InvoicePeriod> {
    InvoicePeriod::parse(value)
        .map_err(|e| FaturaError::Validation(format!("Invalid invoice month '{}': {}", value, e)))
}
